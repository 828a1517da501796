//! Explicit tween state objects advanced by a scheduler.
//!
//! Animated properties (alpha fades, slides) are driven by plain state
//! records advanced with `tick(dt)`; there is no suspend/resume control
//! flow. The engine starts, stops, and queries tweens, nothing more.

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Handle for a tween owned by a [`TweenScheduler`].
    pub struct TweenId;
}

/// Easing curve applied to a tween's progress.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Quadratic ease-in (slow start).
    EaseIn,
    /// Quadratic ease-out (slow end).
    EaseOut,
    /// Quadratic ease-in-out (slow start and end).
    EaseInOut,
}

impl Easing {
    /// Map `t` in [0, 1] to an eased value in [0, 1].
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// A single in-flight interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Starting value.
    pub start: f32,
    /// Target value.
    pub target: f32,
    /// Seconds elapsed so far.
    pub elapsed: f32,
    /// Total duration in seconds.
    pub duration: f32,
    /// Easing curve.
    pub easing: Easing,
}

impl Tween {
    /// Construct a tween from `start` to `target` over `duration` seconds.
    pub fn new(start: f32, target: f32, duration: f32, easing: Easing) -> Self {
        Self {
            start,
            target,
            elapsed: 0.0,
            duration,
            easing,
        }
    }

    /// Advance by a time step.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    /// Raw progress in [0, 1]. A zero-duration tween is complete at once.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Current interpolated value.
    pub fn value(&self) -> f32 {
        let t = self.easing.apply(self.progress());
        self.start + (self.target - self.start) * t
    }

    /// Has the tween reached its target?
    pub fn finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Owns all active tweens and advances them once per frame.
#[derive(Debug, Default)]
pub struct TweenScheduler {
    /// Active tween storage.
    tweens: SlotMap<TweenId, Tween>,
}

impl TweenScheduler {
    /// Construct an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a tween and return its handle.
    pub fn start(&mut self, tween: Tween) -> TweenId {
        self.tweens.insert(tween)
    }

    /// Stop and discard a tween.
    pub fn stop(&mut self, id: TweenId) {
        self.tweens.remove(id);
    }

    /// Query a tween by handle.
    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(id)
    }

    /// Advance every active tween by a time step.
    pub fn tick(&mut self, dt: f32) {
        for tween in self.tweens.values_mut() {
            tween.advance(dt);
        }
    }

    /// Remove tweens that have reached their target.
    pub fn prune(&mut self) {
        self.tweens.retain(|_, tween| !tween.finished());
    }
}
