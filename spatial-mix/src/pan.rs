//! Pan laws: pan position → per-channel gains

use std::f32::consts::FRAC_PI_4;

/// Validated pan position in [-1.0, 1.0] (hard left to hard right)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct PanValue(f32);

impl PanValue {
    pub const LEFT: PanValue = PanValue(-1.0);
    pub const CENTER: PanValue = PanValue(0.0);
    pub const RIGHT: PanValue = PanValue(1.0);

    /// Returns `None` for values outside [-1.0, 1.0] and for NaN
    pub fn new(value: f32) -> Option<Self> {
        if (-1.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

/// Left/right gain pair, each in [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGains {
    pub left: f32,
    pub right: f32,
}

/// Gain law used to turn a pan position into channel gains
///
/// Every law gives `right == 0` at hard left, `left == 0` at hard right
/// and `left == right` at center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanLaw {
    /// Full gain on the near side, linear cut on the far side.
    /// Unity on both channels at center.
    #[default]
    Balance,
    /// Linear crossfade; gains always sum to 1 (-6 dB at center)
    ConstantGain,
    /// Sine/cosine crossfade; power stays constant (-3 dB at center)
    ConstantPower,
}

impl PanLaw {
    pub fn gains(self, pan: PanValue) -> PanGains {
        let p = pan.value();
        match self {
            PanLaw::Balance => PanGains {
                left: (1.0 - p).min(1.0),
                right: (1.0 + p).min(1.0),
            },
            PanLaw::ConstantGain => PanGains {
                left: (1.0 - p) * 0.5,
                right: (1.0 + p) * 0.5,
            },
            PanLaw::ConstantPower => {
                let angle = (p + 1.0) * FRAC_PI_4;
                // cos(π/2) is ~-4e-8 in f32
                PanGains {
                    left: angle.cos().max(0.0),
                    right: angle.sin().max(0.0),
                }
            }
        }
    }
}
