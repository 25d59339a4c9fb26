//! Easing functions for tweens
//!
//! Every curve maps normalized time `t` in `[0, 1]` to progress, with
//! `f(0) = 0` and `f(1) = 1`. Back, elastic and bounce may overshoot in
//! between.

use std::f64::consts::PI;
use tracing::debug;

const BACK_OVERSHOOT: f64 = 1.70158;
const ELASTIC_PERIOD: f64 = 0.3;
const BOUNCE_N1: f64 = 7.5625;
const BOUNCE_D1: f64 = 2.75;

/// Named easing curve
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseInCubic,
    EaseInQuart,
    EaseInQuint,
    EaseInSine,
    EaseInExpo,
    EaseInCirc,
    EaseInBack,
    EaseOutQuad,
    #[default]
    EaseOutCubic,
    EaseOutQuart,
    EaseOutQuint,
    EaseOutSine,
    EaseOutExpo,
    EaseOutCirc,
    EaseOutBack,
    EaseInOutQuad,
    EaseInOutCubic,
    EaseInOutQuart,
    EaseInOutSine,
    EaseInOutExpo,
    Elastic,
    Bounce,
}

impl Easing {
    /// The registry, in lookup order
    pub const ALL: [Easing; 24] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseInCubic,
        Easing::EaseInQuart,
        Easing::EaseInQuint,
        Easing::EaseInSine,
        Easing::EaseInExpo,
        Easing::EaseInCirc,
        Easing::EaseInBack,
        Easing::EaseOutQuad,
        Easing::EaseOutCubic,
        Easing::EaseOutQuart,
        Easing::EaseOutQuint,
        Easing::EaseOutSine,
        Easing::EaseOutExpo,
        Easing::EaseOutCirc,
        Easing::EaseOutBack,
        Easing::EaseInOutQuad,
        Easing::EaseInOutCubic,
        Easing::EaseInOutQuart,
        Easing::EaseInOutSine,
        Easing::EaseInOutExpo,
        Easing::Elastic,
        Easing::Bounce,
    ];

    /// Registry name of this curve
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseInQuad => "easeInQuad",
            Easing::EaseInCubic => "easeInCubic",
            Easing::EaseInQuart => "easeInQuart",
            Easing::EaseInQuint => "easeInQuint",
            Easing::EaseInSine => "easeInSine",
            Easing::EaseInExpo => "easeInExpo",
            Easing::EaseInCirc => "easeInCirc",
            Easing::EaseInBack => "easeInBack",
            Easing::EaseOutQuad => "easeOutQuad",
            Easing::EaseOutCubic => "easeOutCubic",
            Easing::EaseOutQuart => "easeOutQuart",
            Easing::EaseOutQuint => "easeOutQuint",
            Easing::EaseOutSine => "easeOutSine",
            Easing::EaseOutExpo => "easeOutExpo",
            Easing::EaseOutCirc => "easeOutCirc",
            Easing::EaseOutBack => "easeOutBack",
            Easing::EaseInOutQuad => "easeInOutQuad",
            Easing::EaseInOutCubic => "easeInOutCubic",
            Easing::EaseInOutQuart => "easeInOutQuart",
            Easing::EaseInOutSine => "easeInOutSine",
            Easing::EaseInOutExpo => "easeInOutExpo",
            Easing::Elastic => "elastic",
            Easing::Bounce => "bounce",
        }
    }

    /// Find a curve by registry name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|easing| easing.name() == name)
    }

    /// Find a curve by registry name, falling back to `easeOutCubic`
    pub fn lookup(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            debug!(name, "unknown easing, using easeOutCubic");
            Easing::default()
        })
    }

    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,

            Easing::EaseInQuad => t * t,
            Easing::EaseInCubic => t * t * t,
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseInQuint => t * t * t * t * t,
            Easing::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * (t - 1.0))
                }
            }
            Easing::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Easing::EaseInBack => (BACK_OVERSHOOT + 1.0) * t * t * t - BACK_OVERSHOOT * t * t,

            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::EaseOutQuart => {
                let u = t - 1.0;
                1.0 - u * u * u * u
            }
            Easing::EaseOutQuint => {
                let u = t - 1.0;
                1.0 + u * u * u * u * u
            }
            Easing::EaseOutSine => (t * PI / 2.0).sin(),
            Easing::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Easing::EaseOutCirc => {
                let u = t - 1.0;
                (1.0 - u * u).sqrt()
            }
            Easing::EaseOutBack => {
                let u = t - 1.0;
                1.0 + (BACK_OVERSHOOT + 1.0) * u.powi(3) + BACK_OVERSHOOT * u.powi(2)
            }

            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 - 8.0 * u * u * u * u
                }
            }
            Easing::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::EaseInOutExpo => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }

            Easing::Elastic => {
                if t == 0.0 || t == 1.0 {
                    t
                } else {
                    2f64.powf(-10.0 * t)
                        * ((t - ELASTIC_PERIOD / 4.0) * (2.0 * PI) / ELASTIC_PERIOD).sin()
                        + 1.0
                }
            }
            Easing::Bounce => bounce_out(t),
        }
    }
}

/// Which of the four bounce arcs `t` falls on
fn bounce_segment_of(t: f64) -> usize {
    if t < 1.0 / BOUNCE_D1 {
        0
    } else if t < 2.0 / BOUNCE_D1 {
        1
    } else if t < 2.5 / BOUNCE_D1 {
        2
    } else {
        3
    }
}

/// Evaluate bounce arc `segment` at `t`
fn bounce_segment(segment: usize, t: f64) -> f64 {
    match segment {
        0 => BOUNCE_N1 * t * t,
        1 => {
            let u = t - 1.5 / BOUNCE_D1;
            BOUNCE_N1 * u * u + 0.75
        }
        2 => {
            let u = t - 2.25 / BOUNCE_D1;
            BOUNCE_N1 * u * u + 0.9375
        }
        _ => {
            let u = t - 2.625 / BOUNCE_D1;
            BOUNCE_N1 * u * u + 0.984375
        }
    }
}

fn bounce_out(t: f64) -> f64 {
    bounce_segment(bounce_segment_of(t), t)
}
