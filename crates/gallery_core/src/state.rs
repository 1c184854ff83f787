use serde::Serialize;

use crate::carousel::{Carousel, CarouselSettings};
use crate::selection::{select_for_display, DisplaySelection, DEFAULT_MAX_DISPLAY};
use crate::view_model::{AppViewModel, CarouselView, GalleryView, LightboxView, TileView};
use crate::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreSettings {
    pub max_display: usize,
    pub carousel: CarouselSettings,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            max_display: DEFAULT_MAX_DISPLAY,
            carousel: CarouselSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryPhase {
    #[default]
    Idle,
    Loading,
    Probing,
    Ready,
    Failed,
}

/// User-facing message attached to the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// The feed returned no image URLs.
    NoImagesFound,
    /// URLs were returned but none of them loaded.
    NoneLoaded,
    /// Advisory: fewer images than wanted could be shown.
    LowSupply { verified: usize, wanted: usize },
    LoadFailed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct GalleryState {
    phase: GalleryPhase,
    username: Option<String>,
    candidate_count: usize,
    settled: usize,
    verified_so_far: usize,
    selection: Option<DisplaySelection>,
    notice: Option<Notice>,
    lightbox: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: CoreSettings,
    gallery: GalleryState,
    carousel: Carousel,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_settings(CoreSettings::default())
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            settings,
            gallery: GalleryState::default(),
            carousel: Carousel::new(settings.carousel),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let gallery = &self.gallery;
        let tiles = self.tiles();
        let lightbox = gallery
            .lightbox
            .and_then(|index| tiles.get(index))
            .map(|tile| LightboxView {
                url: tile.url.clone(),
                title: tile.alt.clone(),
            });
        let progress = match gallery.phase {
            GalleryPhase::Probing => Some((gallery.settled, gallery.candidate_count)),
            _ => None,
        };

        AppViewModel {
            gallery: GalleryView {
                phase: gallery.phase,
                username: gallery.username.clone(),
                candidates: gallery.candidate_count,
                tiles,
                notice: gallery.notice.clone(),
                progress,
                verified_so_far: gallery.verified_so_far,
                lightbox,
            },
            carousel: CarouselView {
                current: self.carousel.current(),
                roles: self.carousel.roles(),
                phase: self.carousel.phase(),
                autoplay: self.carousel.autoplay(),
            },
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> GalleryPhase {
        self.gallery.phase
    }

    /// Display selection of the last finished probing pass.
    pub fn selection(&self) -> Option<&DisplaySelection> {
        self.gallery.selection.as_ref()
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_loading(&self) -> bool {
        matches!(
            self.gallery.phase,
            GalleryPhase::Loading | GalleryPhase::Probing
        )
    }

    /// Clears the previous gallery. Returns the effects of emptying the carousel.
    pub(crate) fn begin_load(&mut self) -> Vec<Effect> {
        self.gallery = GalleryState {
            phase: GalleryPhase::Loading,
            ..GalleryState::default()
        };
        self.mark_dirty();
        if self.carousel.total() == 0 {
            Vec::new()
        } else {
            self.carousel.load(0)
        }
    }

    pub(crate) fn apply_feed(&mut self, username: String, candidates: usize) {
        let gallery = &mut self.gallery;
        gallery.username = Some(username);
        gallery.candidate_count = candidates;
        if candidates == 0 {
            gallery.phase = GalleryPhase::Failed;
            gallery.selection = Some(DisplaySelection::EmptyInput);
            gallery.notice = Some(Notice::NoImagesFound);
        } else {
            gallery.phase = GalleryPhase::Probing;
        }
        self.mark_dirty();
    }

    pub(crate) fn apply_probe(&mut self, verified: bool) {
        self.gallery.settled += 1;
        if verified {
            self.gallery.verified_so_far += 1;
        }
        self.mark_dirty();
    }

    /// Returns the carousel effects for the freshly shown tiles.
    pub(crate) fn finish_probing(&mut self, verified: Vec<String>) -> Vec<Effect> {
        let max_display = self.settings.max_display;
        let selection =
            select_for_display(self.gallery.candidate_count, verified, max_display);
        let gallery = &mut self.gallery;
        gallery.settled = gallery.candidate_count;
        gallery.notice = match &selection {
            DisplaySelection::EmptyInput => Some(Notice::NoImagesFound),
            DisplaySelection::AllFailed { .. } => Some(Notice::NoneLoaded),
            DisplaySelection::Ready {
                verified,
                low_supply: true,
                ..
            } => Some(Notice::LowSupply {
                verified: *verified,
                wanted: max_display.max(1),
            }),
            DisplaySelection::Ready { .. } => None,
        };
        gallery.phase = match selection {
            DisplaySelection::Ready { .. } => GalleryPhase::Ready,
            _ => GalleryPhase::Failed,
        };
        let shown = selection.shown().len();
        gallery.selection = Some(selection);
        self.mark_dirty();
        self.carousel.load(shown)
    }

    pub(crate) fn fail_load(&mut self, message: String) {
        self.gallery.phase = GalleryPhase::Failed;
        self.gallery.notice = Some(Notice::LoadFailed { message });
        self.mark_dirty();
    }

    pub(crate) fn open_lightbox(&mut self, index: usize) {
        let shown = self.gallery.selection.as_ref().map_or(0, |s| s.shown().len());
        if index < shown && self.gallery.lightbox != Some(index) {
            self.gallery.lightbox = Some(index);
            self.mark_dirty();
        }
    }

    pub(crate) fn close_lightbox(&mut self) {
        if self.gallery.lightbox.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Runs a carousel transition, marking the state dirty if the carousel changed.
    pub(crate) fn with_carousel(
        &mut self,
        transition: impl FnOnce(&mut Carousel) -> Vec<Effect>,
    ) -> Vec<Effect> {
        let before = self.carousel.clone();
        let effects = transition(&mut self.carousel);
        if self.carousel != before {
            self.mark_dirty();
        }
        effects
    }

    fn tiles(&self) -> Vec<TileView> {
        let username = self.gallery.username.as_deref().unwrap_or_default();
        self.gallery
            .selection
            .as_ref()
            .map(|selection| {
                selection
                    .shown()
                    .iter()
                    .enumerate()
                    .map(|(index, url)| TileView {
                        url: url.clone(),
                        alt: format!("@{username} - Image {}", index + 1),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
