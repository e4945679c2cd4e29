//! Easing curves for position tweens.

/// Maps normalized progress `t` in `[0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Accelerate through the first half, decelerate through the second.
    #[default]
    EaseInOutQuad,
    EaseOutCubic,
}

impl Easing {
    /// Eased progress for `t`, clamped to `[0, 1]`.
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseInOutQuad => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t
                } else {
                    let t = t - 1.0;
                    -0.5 * (t * (t - 2.0) - 1.0)
                }
            }
            Self::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
        }
    }

    /// Value between `from` and `to` at progress `t`.
    pub fn interpolate(&self, from: f32, to: f32, t: f32) -> f32 {
        from + (to - from) * self.apply(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 3] = [Easing::Linear, Easing::EaseInOutQuad, Easing::EaseOutCubic];

    #[test]
    fn test_endpoints_fixed() {
        for easing in ALL {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_quad_midpoint_and_symmetry() {
        let quad = Easing::EaseInOutQuad;
        assert!((quad.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((quad.apply(0.25) - 0.125).abs() < 1e-6);
        assert!((quad.apply(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_clamped() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(3.0), 1.0);
        assert_eq!(Easing::Linear.apply(f32::NAN), 1.0);
    }

    #[test]
    fn test_interpolate() {
        assert_eq!(Easing::Linear.interpolate(10.0, 20.0, 0.5), 15.0);
        assert_eq!(Easing::EaseInOutQuad.interpolate(-25.0, 0.0, 1.0), 0.0);
    }
}
