use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TrajectoryKind {
    Stationary = 0,
    /// Non-parametric, interpolated between snapshots.
    Interpolate = 1,
    Linear = 2,
    LinearStop = 3,
    Sine = 4,
    Gravity = 5,
    GravityWater = 6,
    Rotating = 7,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrajectoryError {
    #[error("unknown trajectory kind {0}")]
    UnknownKind(u8),
}

impl TryFrom<u8> for TrajectoryKind {
    type Error = TrajectoryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Ok(match code {
            0 => Self::Stationary,
            1 => Self::Interpolate,
            2 => Self::Linear,
            3 => Self::LinearStop,
            4 => Self::Sine,
            5 => Self::Gravity,
            6 => Self::GravityWater,
            7 => Self::Rotating,
            other => return Err(TrajectoryError::UnknownKind(other)),
        })
    }
}

impl From<TrajectoryKind> for u8 {
    fn from(kind: TrajectoryKind) -> Self {
        kind as u8
    }
}

/// Parametric motion sampled by time in milliseconds.
///
/// `duration` only matters for `LinearStop` and `Sine`; `time` is the origin
/// time, except for `Rotating` where its sign selects how elapsed time is
/// derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub kind: TrajectoryKind,
    pub time: i32,
    pub duration: i32,
    pub base: Vec3,
    pub delta: Vec3,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::stationary(Vec3::ZERO)
    }
}

impl Trajectory {
    pub fn stationary(base: Vec3) -> Self {
        Self {
            kind: TrajectoryKind::Stationary,
            time: 0,
            duration: 0,
            base,
            delta: Vec3::ZERO,
        }
    }

    pub fn interpolate(base: Vec3, delta: Vec3) -> Self {
        Self {
            kind: TrajectoryKind::Interpolate,
            time: 0,
            duration: 0,
            base,
            delta,
        }
    }

    pub fn linear(time: i32, base: Vec3, delta: Vec3) -> Self {
        Self {
            kind: TrajectoryKind::Linear,
            time,
            duration: 0,
            base,
            delta,
        }
    }

    pub fn linear_stop(time: i32, duration: i32, base: Vec3, delta: Vec3) -> Self {
        Self {
            kind: TrajectoryKind::LinearStop,
            time,
            duration,
            base,
            delta,
        }
    }

    pub fn sine(time: i32, duration: i32, base: Vec3, delta: Vec3) -> Self {
        Self {
            kind: TrajectoryKind::Sine,
            time,
            duration,
            base,
            delta,
        }
    }

    pub fn gravity(time: i32, base: Vec3, delta: Vec3) -> Self {
        Self {
            kind: TrajectoryKind::Gravity,
            time,
            duration: 0,
            base,
            delta,
        }
    }

    pub fn gravity_water(time: i32, base: Vec3, delta: Vec3) -> Self {
        Self {
            kind: TrajectoryKind::GravityWater,
            time,
            duration: 0,
            base,
            delta,
        }
    }

    pub fn rotating(time: i32, base: Vec3, angular_rate: Vec3) -> Self {
        Self {
            kind: TrajectoryKind::Rotating,
            time,
            duration: 0,
            base,
            delta: angular_rate,
        }
    }

    /// Rebuilds a trajectory from its wire representation.
    pub fn from_raw(
        kind: u8,
        time: i32,
        duration: i32,
        base: Vec3,
        delta: Vec3,
    ) -> Result<Self, TrajectoryError> {
        Ok(Self {
            kind: TrajectoryKind::try_from(kind)?,
            time,
            duration,
            base,
            delta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_round_trip() {
        for code in 0..8u8 {
            let kind = TrajectoryKind::try_from(code).unwrap();
            assert_eq!(u8::from(kind), code);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_eq!(
            TrajectoryKind::try_from(8),
            Err(TrajectoryError::UnknownKind(8))
        );
        assert!(Trajectory::from_raw(42, 0, 0, Vec3::ZERO, Vec3::ZERO).is_err());
    }
}
