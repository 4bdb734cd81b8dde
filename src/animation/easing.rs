//! Easing curves mapping normalized progress to eased progress.

/// Easing curve applied to animation progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Constant speed.
    Linear,
    /// Slow start.
    QuadraticIn,
    /// Slow finish.
    QuadraticOut,
    /// Slow start and finish (`3t² - 2t³`).
    SmoothStep,
    /// Bezier-style curve with inner control values `c1` and `c2`:
    /// `c1·3t(1-t)² + c2·3(1-t)t² + t³`.
    CubicHermite {
        /// First inner control value.
        c1: f32,
        /// Second inner control value.
        c2: f32,
    },
}

impl EasingFunction {
    /// Gentle ease-out used for camera moves.
    pub const DEFAULT: Self = Self::CubicHermite { c1: 0.33, c2: 1.0 };

    /// Eased progress for `t`, which is clamped into `[0, 1]` first.
    /// Every curve maps 0 to 0 and 1 to 1.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }

    /// Interpolate from `from` to `to` at eased progress `t`.
    #[inline]
    #[must_use]
    pub fn interpolate(&self, from: f32, to: f32, t: f32) -> f32 {
        from + (to - from) * self.evaluate(t)
    }
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 5] = [
        EasingFunction::Linear,
        EasingFunction::QuadraticIn,
        EasingFunction::QuadraticOut,
        EasingFunction::SmoothStep,
        EasingFunction::DEFAULT,
    ];

    #[test]
    fn curves_hit_both_endpoints() {
        for easing in ALL {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing:?}");
            assert!((easing.evaluate(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn progress_outside_unit_range_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.evaluate(-2.0), 0.0);
            assert!((easing.evaluate(3.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn midpoints() {
        assert_eq!(EasingFunction::QuadraticIn.evaluate(0.5), 0.25);
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
        assert_eq!(EasingFunction::SmoothStep.evaluate(0.5), 0.5);
        assert!(EasingFunction::DEFAULT.evaluate(0.25) > 0.25);
    }

    #[test]
    fn interpolate_scales_range() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.interpolate(10.0, 20.0, 0.25), 12.5);
        assert_eq!(linear.interpolate(20.0, 10.0, 1.0), 10.0);
    }
}
