use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::Utc;
use gallery_core::{update, AppState, AppViewModel, GalleryPhase, Msg};
use gallery_engine::{EngineEvent, EngineHandle, GalleryPipeline, ProbeResult};
use gallery_logging::{gallery_info, gallery_warn};

use super::config::{self, AppConfig, DEFAULT_CONFIG_FILENAME};
use super::effects::{map_event, EffectRunner};
use super::logging;
use super::render::{render, render_notice};
use super::report::GalleryReport;

const POLL_INTERVAL: Duration = Duration::from_millis(75);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));
    let config = config::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    logging::initialize(&config.output);

    let pipeline =
        GalleryPipeline::from_settings(config.engine_settings()).context("building pipeline")?;
    let runner = EffectRunner::new(EngineHandle::new(pipeline));
    let mut session = Session::new(&config);

    session.dispatch(&runner, Msg::LoadRequested);
    loop {
        let Some(event) = runner.recv(POLL_INTERVAL).context("engine stopped")? else {
            continue;
        };
        if let EngineEvent::ProbeSettled(result) = &event {
            session.probes.push(result.clone());
        }
        if let Some(msg) = map_event(event) {
            session.dispatch(&runner, msg);
        }

        match session.state.phase() {
            GalleryPhase::Failed => {
                session.print_report()?;
                let view = session.state.view();
                let reason = view
                    .gallery
                    .notice
                    .as_ref()
                    .map(render_notice)
                    .unwrap_or_else(|| "gallery failed".to_string());
                bail!(reason);
            }
            GalleryPhase::Ready if !session.reported => {
                session.print_report()?;
            }
            _ => {}
        }

        if session.reported && session.advances_left == 0 {
            break;
        }
    }

    gallery_info!("done");
    Ok(())
}

struct Session {
    state: AppState,
    probes: Vec<ProbeResult>,
    list_all: bool,
    reported: bool,
    advances_left: u32,
    last_phase: GalleryPhase,
    last_slide: usize,
}

impl Session {
    fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::with_settings(config.core_settings()),
            probes: Vec::new(),
            list_all: config.output.list_all,
            reported: false,
            advances_left: config.slideshow.advances,
            last_phase: GalleryPhase::Idle,
            last_slide: 0,
        }
    }

    fn dispatch(&mut self, runner: &EffectRunner, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        runner.enqueue(effects);

        if was_dirty {
            let view = self.state.view();
            let phase = view.gallery.phase;
            if phase != self.last_phase || phase == GalleryPhase::Probing {
                self.last_phase = phase;
                for line in render(&view) {
                    println!("{line}");
                }
            }
            if view.carousel.current != self.last_slide {
                self.last_slide = view.carousel.current;
                self.advances_left = self.advances_left.saturating_sub(1);
                if let Some(tile) = view.gallery.tiles.get(view.carousel.current) {
                    println!("Slide {}: {}", view.carousel.current + 1, tile.url);
                }
            }
        }
    }

    fn print_report(&mut self) -> anyhow::Result<()> {
        let view = self.state.view();
        let probes = self.list_all.then_some(self.probes.as_slice());
        let report = GalleryReport::build(
            &view,
            self.state.selection(),
            probes,
            Utc::now().to_rfc3339(),
        );
        println!("{}", report.to_json().context("serializing report")?);
        if self.state.selection().is_some_and(|s| s.is_low_supply()) {
            gallery_warn!("not enough working images; a larger feed count may help");
        }
        self.advances_left = slideshow_advances(self.advances_left, &view);
        self.reported = true;
        Ok(())
    }
}

/// Advances left to wait for. A single slide never advances, so its slideshow is skipped.
fn slideshow_advances(requested: u32, view: &AppViewModel) -> u32 {
    if requested > 0 && view.carousel.roles.len() < 2 {
        gallery_info!("slideshow skipped; it needs at least two images");
        return 0;
    }
    requested
}
