//! Per-voxel color derivation from neighbor count and age.

use serde::{Deserialize, Serialize};

/// How voxel attributes map to color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientMode {
    /// Plain white.
    Solid,
    /// Shift hue and brighten as a voxel stays alive (saturates at 30 steps).
    Age,
    /// Shift hue and brighten with crowding (saturates at 8 neighbors).
    #[default]
    Neighbors,
}

/// Hue, saturation, lightness, each in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const WHITE: Hsl = Hsl {
        h: 0.0,
        s: 0.0,
        l: 1.0,
    };

    /// Convert to RGB components in [0, 1].
    pub fn to_rgb(self) -> [f32; 3] {
        if self.s <= 0.0 {
            return [self.l, self.l, self.l];
        }
        let q = if self.l < 0.5 {
            self.l * (1.0 + self.s)
        } else {
            self.l + self.s - self.l * self.s
        };
        let p = 2.0 * self.l - q;
        [
            hue_to_channel(p, q, self.h + 1.0 / 3.0),
            hue_to_channel(p, q, self.h),
            hue_to_channel(p, q, self.h - 1.0 / 3.0),
        ]
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Map a voxel's attributes to a color under `mode`.
pub fn voxel_color(neighbor_count: u8, age: u16, mode: GradientMode) -> Hsl {
    match mode {
        GradientMode::Solid => Hsl::WHITE,
        GradientMode::Age => {
            let t = (f32::from(age) / 30.0).min(1.0);
            Hsl {
                h: 0.58 - 0.4 * t,
                s: 0.7,
                l: 0.5 + 0.15 * t,
            }
        }
        GradientMode::Neighbors => {
            let t = (f32::from(neighbor_count) / 8.0).min(1.0);
            Hsl {
                h: 0.9 - 0.65 * t,
                s: 0.7,
                l: 0.45 + 0.2 * t,
            }
        }
    }
}
