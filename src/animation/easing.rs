//! Easing curves mapping linear progress `[0, 1]` to eased progress `[0, 1]`.

/// An easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// `t²`: starts slow, ends fast.
    QuadraticIn,
    /// `1 - (1 - t)²`: starts fast, ends slow.
    QuadraticOut,
    /// Quadratic in for the first half, out for the second.
    QuadraticInOut,
    /// `t³`.
    CubicIn,
    /// `1 - (1 - t)³`.
    CubicOut,
}

impl Easing {
    /// Map linear progress `t` to eased progress. `t` is clamped to `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::QuadraticIn,
        Easing::QuadraticOut,
        Easing::QuadraticInOut,
        Easing::CubicIn,
        Easing::CubicOut,
    ];

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert!(approx(easing.apply(0.0), 0.0), "{easing:?} at 0");
            assert!(approx(easing.apply(1.0), 1.0), "{easing:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        for easing in ALL {
            assert!(approx(easing.apply(-1.0), 0.0));
            assert!(approx(easing.apply(2.0), 1.0));
        }
    }

    #[test]
    fn quadratic_formulas() {
        assert!(approx(Easing::QuadraticIn.apply(0.5), 0.25));
        assert!(approx(Easing::QuadraticOut.apply(0.5), 0.75));
        assert!(approx(Easing::QuadraticOut.apply(0.25), 1.0 - 0.75 * 0.75));
    }

    #[test]
    fn ease_out_leads_ease_in() {
        for t in [0.1, 0.3, 0.5, 0.7, 0.9] {
            assert!(Easing::QuadraticOut.apply(t) > Easing::Linear.apply(t));
            assert!(Easing::QuadraticIn.apply(t) < Easing::Linear.apply(t));
        }
    }

    #[test]
    fn monotonic() {
        for easing in ALL {
            let mut last = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v + 1e-6 >= last, "{easing:?} not monotonic at {i}");
                last = v;
            }
        }
    }
}
