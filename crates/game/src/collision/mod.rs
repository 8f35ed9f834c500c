mod flags;
mod trace;

pub use flags::{ContentFlags, SurfaceFlags};
pub use trace::{CollisionWorld, EntityId, Trace};
