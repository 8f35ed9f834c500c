mod evaluate;
mod types;

pub use types::{Trajectory, TrajectoryError, TrajectoryKind};
