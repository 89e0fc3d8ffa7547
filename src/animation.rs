use serde::*;
use std::f64::consts::PI;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Constant-rate rotation about a single axis.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    pub axis: Axis,
    /// Radians per tick.
    pub rate: f32,
}

impl Spin {
    pub fn new(axis: Axis, rate: f32) -> Self {
        Spin { axis, rate }
    }

    /// The angle after `tick` ticks. Computed in `f64` so large ticks don't lose precision
    /// before the final narrowing. An angle too large for `f32` is reduced into one turn
    /// even when `wrap` is off, so the pose stays finite.
    pub fn angle_at(&self, tick: u64, wrap: bool) -> f32 {
        let angle = tick as f64 * self.rate as f64;
        if wrap || angle.abs() > f32::MAX as f64 {
            angle.rem_euclid(2.0 * PI) as f32
        } else {
            angle as f32
        }
    }
}

/// Where a drawable is and how it's rotated at a given tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
}

/// A drawable's motion as a pure function of the tick count.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub position: [f32; 3],
    pub spin: Spin,
    /// Reduce the angle into `[0, 2π)`. Off by default, so the angle grows without bound.
    #[serde(default)]
    pub wrap_angles: bool,
}

impl Animation {
    pub fn new(position: [f32; 3], spin: Spin) -> Self {
        Animation { position, spin, wrap_angles: false }
    }

    pub fn pose_at(&self, tick: u64) -> Pose {
        let mut rotation = [0.0; 3];
        rotation[self.spin.axis.index()] = self.spin.angle_at(tick, self.wrap_angles);
        Pose { position: self.position, rotation }
    }
}
