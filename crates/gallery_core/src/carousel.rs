use std::time::Duration;

use crate::Effect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSettings {
    /// How long navigation stays locked after a slide change.
    pub animation_lock: Duration,
    pub autoplay_interval: Duration,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            animation_lock: Duration::from_millis(800),
            autoplay_interval: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarouselPhase {
    #[default]
    Idle,
    Animating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Autoplay {
    #[default]
    Stopped,
    Running,
    /// Suspended while the pointer is over the slider.
    Paused,
}

/// Position of a slide relative to the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRole {
    Active,
    Previous,
    Next,
    Hidden,
}

/// Slider navigation state.
///
/// Every navigation is rejected while a slide change is animating; the lock is
/// released by [`Carousel::animation_finished`], which the runtime calls when the
/// `ScheduleAnimationUnlock` timer fires.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Carousel {
    current: usize,
    total: usize,
    phase: CarouselPhase,
    autoplay: Autoplay,
    hovered: bool,
    settings: CarouselSettings,
}

impl Carousel {
    pub fn new(settings: CarouselSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn phase(&self) -> CarouselPhase {
        self.phase
    }

    pub fn autoplay(&self) -> Autoplay {
        self.autoplay
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Replace the slide set and start over at the first slide.
    ///
    /// Autoplay only runs when there is more than one slide.
    pub fn load(&mut self, total: usize) -> Vec<Effect> {
        self.current = 0;
        self.total = total;
        self.phase = CarouselPhase::Idle;
        if total < 2 {
            self.autoplay = Autoplay::Stopped;
            return vec![Effect::StopAutoplay];
        }
        if self.hovered {
            self.autoplay = Autoplay::Paused;
            Vec::new()
        } else {
            self.autoplay = Autoplay::Running;
            vec![self.start_autoplay()]
        }
    }

    pub fn next(&mut self) -> Vec<Effect> {
        if !self.can_navigate() || self.total < 2 {
            return Vec::new();
        }
        self.navigate((self.current + 1) % self.total)
    }

    pub fn prev(&mut self) -> Vec<Effect> {
        if !self.can_navigate() || self.total < 2 {
            return Vec::new();
        }
        let target = if self.current == 0 {
            self.total - 1
        } else {
            self.current - 1
        };
        self.navigate(target)
    }

    pub fn go_to(&mut self, index: usize) -> Vec<Effect> {
        if !self.can_navigate() || index == self.current || index >= self.total {
            return Vec::new();
        }
        self.navigate(index)
    }

    /// `dx`/`dy` are start minus end, so dragging left (positive `dx`) advances.
    pub fn swipe(&mut self, dx: f32, dy: f32) -> Vec<Effect> {
        if dx.abs() <= dy.abs() {
            return Vec::new();
        }
        if dx > 0.0 {
            self.next()
        } else {
            self.prev()
        }
    }

    pub fn autoplay_tick(&mut self) -> Vec<Effect> {
        if self.autoplay != Autoplay::Running {
            return Vec::new();
        }
        self.next()
    }

    pub fn animation_finished(&mut self) {
        self.phase = CarouselPhase::Idle;
    }

    pub fn pointer_entered(&mut self) -> Vec<Effect> {
        self.hovered = true;
        if self.autoplay == Autoplay::Running {
            self.autoplay = Autoplay::Paused;
            vec![Effect::StopAutoplay]
        } else {
            Vec::new()
        }
    }

    pub fn pointer_left(&mut self) -> Vec<Effect> {
        self.hovered = false;
        if self.autoplay == Autoplay::Paused {
            self.autoplay = Autoplay::Running;
            vec![self.start_autoplay()]
        } else {
            Vec::new()
        }
    }

    /// Role of every slide, in slide order.
    pub fn roles(&self) -> Vec<SlideRole> {
        (0..self.total).map(|index| self.role_of(index)).collect()
    }

    fn role_of(&self, index: usize) -> SlideRole {
        if index == self.current {
            SlideRole::Active
        } else if index == (self.current + self.total - 1) % self.total {
            SlideRole::Previous
        } else if index == (self.current + 1) % self.total {
            SlideRole::Next
        } else {
            SlideRole::Hidden
        }
    }

    fn can_navigate(&self) -> bool {
        self.total > 0 && self.phase == CarouselPhase::Idle
    }

    fn navigate(&mut self, target: usize) -> Vec<Effect> {
        self.current = target;
        self.phase = CarouselPhase::Animating;
        let mut effects = vec![Effect::ScheduleAnimationUnlock {
            delay: self.settings.animation_lock,
        }];
        // Manual navigation restarts the autoplay countdown.
        if self.autoplay == Autoplay::Running {
            effects.push(self.start_autoplay());
        }
        effects
    }

    fn start_autoplay(&self) -> Effect {
        Effect::StartAutoplay {
            interval: self.settings.autoplay_interval,
        }
    }
}
