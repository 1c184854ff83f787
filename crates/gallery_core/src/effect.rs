use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the feed and probe its candidates.
    LoadFeed,
    /// Fire `Msg::AnimationFinished` after `delay`.
    ScheduleAnimationUnlock { delay: Duration },
    /// (Re)start the autoplay timer, replacing any running one.
    StartAutoplay { interval: Duration },
    StopAutoplay,
}
