use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

use gallery_core::{Effect, Msg};
use gallery_engine::{EngineEvent, EngineHandle, TimerId};
use gallery_logging::{gallery_debug, gallery_info};

const ANIMATION_TIMER: TimerId = 1;
const AUTOPLAY_TIMER: TimerId = 2;

/// Executes core effects on the engine and maps engine events back to messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadFeed => {
                    gallery_info!("LoadFeed");
                    self.engine.load();
                }
                Effect::ScheduleAnimationUnlock { delay } => {
                    self.engine.start_timer(ANIMATION_TIMER, delay, false);
                }
                Effect::StartAutoplay { interval } => {
                    gallery_debug!("autoplay every {:?}", interval);
                    self.engine.start_timer(AUTOPLAY_TIMER, interval, true);
                }
                Effect::StopAutoplay => {
                    self.engine.cancel_timer(AUTOPLAY_TIMER);
                }
            }
        }
    }

    pub fn recv(&self, timeout: Duration) -> Result<Option<EngineEvent>, RecvTimeoutError> {
        match self.engine.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

pub fn map_event(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::FeedFetched {
            username,
            candidates,
        } => Msg::FeedFetched {
            username,
            candidates,
        },
        EngineEvent::ProbeSettled(result) => Msg::ProbeSettled {
            index: result.index,
            verified: result.verified,
        },
        EngineEvent::ProbesFinished { verified } => Msg::ProbesFinished { verified },
        EngineEvent::LoadFailed(err) => Msg::LoadFailed(err.to_string()),
        EngineEvent::TimerFired {
            timer_id: ANIMATION_TIMER,
        } => Msg::AnimationFinished,
        EngineEvent::TimerFired {
            timer_id: AUTOPLAY_TIMER,
        } => Msg::AutoplayTick,
        EngineEvent::TimerFired { timer_id } => {
            gallery_debug!("ignoring unknown timer {}", timer_id);
            return None;
        }
    };
    Some(msg)
}
