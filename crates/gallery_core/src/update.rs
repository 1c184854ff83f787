use gallery_logging::{gallery_debug, gallery_info};

use crate::{AppState, Effect, GalleryPhase, Key, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoadRequested | Msg::RetryClicked => {
            if state.is_loading() {
                gallery_debug!("load already in flight; ignoring request");
                Vec::new()
            } else {
                let mut effects = state.begin_load();
                effects.push(Effect::LoadFeed);
                effects
            }
        }
        Msg::FeedFetched {
            username,
            candidates,
        } => {
            if state.phase() == GalleryPhase::Loading {
                gallery_info!("feed for @{} has {} candidates", username, candidates);
                state.apply_feed(username, candidates);
            }
            Vec::new()
        }
        Msg::ProbeSettled { index: _, verified } => {
            if state.phase() == GalleryPhase::Probing {
                state.apply_probe(verified);
            }
            Vec::new()
        }
        Msg::ProbesFinished { verified } => {
            if state.phase() == GalleryPhase::Probing {
                state.finish_probing(verified)
            } else {
                Vec::new()
            }
        }
        Msg::LoadFailed(message) => {
            if state.is_loading() {
                state.fail_load(message);
            }
            Vec::new()
        }
        Msg::TileClicked(index) => {
            state.open_lightbox(index);
            Vec::new()
        }
        Msg::LightboxClosed | Msg::KeyPressed(Key::Escape) => {
            state.close_lightbox();
            Vec::new()
        }
        Msg::KeyPressed(Key::ArrowRight) | Msg::NextClicked => {
            state.with_carousel(|carousel| carousel.next())
        }
        Msg::KeyPressed(Key::ArrowLeft) | Msg::PrevClicked => {
            state.with_carousel(|carousel| carousel.prev())
        }
        Msg::IndicatorClicked(index) => state.with_carousel(|carousel| carousel.go_to(index)),
        Msg::Swiped { dx, dy } => state.with_carousel(|carousel| carousel.swipe(dx, dy)),
        Msg::PointerEntered => state.with_carousel(|carousel| carousel.pointer_entered()),
        Msg::PointerLeft => state.with_carousel(|carousel| carousel.pointer_left()),
        Msg::AutoplayTick => state.with_carousel(|carousel| carousel.autoplay_tick()),
        Msg::AnimationFinished => state.with_carousel(|carousel| {
            carousel.animation_finished();
            Vec::new()
        }),
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
