//! Time-driven scalar animations.

use web_time::{Duration, Instant};

use super::easing::EasingFunction;
use crate::compositor::CompositorHandle;
use crate::error::Result;
use crate::property::{PropertyRef, Value};

/// What happens when an animation reaches its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Hold the end value and finish.
    #[default]
    Once,
    /// Jump back to the start value and run again.
    Repeat,
    /// Run backwards to the start value, then forwards again.
    PingPong,
}

/// Tween of one scalar property from `from` to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarAnimation {
    property: PropertyRef,
    from: f32,
    to: f32,
    duration: Duration,
    easing: EasingFunction,
    loop_mode: LoopMode,
}

impl ScalarAnimation {
    /// Linear, non-looping tween.
    #[must_use]
    pub fn new(property: PropertyRef, from: f32, to: f32, duration: Duration) -> Self {
        Self {
            property,
            from,
            to,
            duration,
            easing: EasingFunction::Linear,
            loop_mode: LoopMode::Once,
        }
    }

    /// Replace the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Replace the loop mode.
    #[must_use]
    pub fn with_loop_mode(mut self, loop_mode: LoopMode) -> Self {
        self.loop_mode = loop_mode;
        self
    }

    /// Animated property.
    #[must_use]
    pub fn property(&self) -> &PropertyRef {
        &self.property
    }

    /// Length of one pass.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Value after `elapsed` time.
    #[must_use]
    pub fn sample(&self, elapsed: Duration) -> f32 {
        let t = self.progress(elapsed);
        self.easing.interpolate(self.from, self.to, t)
    }

    /// Whether a `Once` animation has reached its end. Looping animations
    /// never finish.
    #[must_use]
    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.loop_mode == LoopMode::Once && elapsed >= self.duration
    }

    fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let raw = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        match self.loop_mode {
            LoopMode::Once => raw.min(1.0),
            LoopMode::Repeat => raw.fract(),
            LoopMode::PingPong => {
                let phase = raw % 2.0;
                if phase > 1.0 { 2.0 - phase } else { phase }
            }
        }
    }
}

#[derive(Debug)]
struct Track {
    animation: ScalarAnimation,
    start_time: Instant,
}

/// Drives running [`ScalarAnimation`]s from a clock.
///
/// Call [`Self::update`] once per frame before [`Compositor::evaluate`].
///
/// [`Compositor::evaluate`]: crate::compositor::Compositor::evaluate
#[derive(Debug)]
pub struct Animator {
    compositor: CompositorHandle,
    tracks: Vec<Track>,
}

impl Animator {
    /// Animator writing into `compositor`'s graphs.
    #[must_use]
    pub fn new(compositor: &CompositorHandle) -> Self {
        Self {
            compositor: compositor.clone(),
            tracks: Vec::new(),
        }
    }

    /// Start `animation` now. An animation already running on the same
    /// property is replaced.
    pub fn start(&mut self, animation: ScalarAnimation) {
        self.start_at(animation, Instant::now());
    }

    /// Start `animation` at an explicit time.
    pub fn start_at(&mut self, animation: ScalarAnimation, start_time: Instant) {
        self.tracks
            .retain(|t| t.animation.property != animation.property);
        log::debug!(
            "animating {} over {:?}",
            animation.property,
            animation.duration
        );
        self.tracks.push(Track {
            animation,
            start_time,
        });
    }

    /// Stop any animation on `property`, leaving its current value.
    pub fn stop(&mut self, property: &PropertyRef) {
        self.tracks.retain(|t| &t.animation.property != property);
    }

    /// Number of running animations.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tracks.len()
    }

    /// Whether nothing is running.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Write every running animation's value for time `now`. Finished
    /// animations write their end value and are removed, as are animations
    /// whose graph was destroyed. Returns whether any remain.
    ///
    /// Fails if an animated property is bound or no longer scalar; the
    /// offending animation is removed before the error is returned.
    pub fn update(&mut self, now: Instant) -> Result<bool> {
        let store = self.compositor.upgrade()?;
        let mut failure = None;
        self.tracks.retain(|track| {
            let property = &track.animation.property;
            if !self.compositor.contains_graph(property.graph()) {
                log::debug!("dropping animation of {property}: graph destroyed");
                return false;
            }
            let elapsed = now.saturating_duration_since(track.start_time);
            let value = Value::Scalar(track.animation.sample(elapsed));
            if let Err(e) = store.borrow_mut().write(property, value) {
                log::warn!("animation of {property} stopped: {e}");
                let _ = failure.get_or_insert(e);
                return false;
            }
            !track.animation.is_finished(elapsed)
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(!self.tracks.is_empty()),
        }
    }
}
