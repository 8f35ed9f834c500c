mod entity;
mod queue;
mod types;

pub use entity::{EntityFlags, EntityKind, EntityState};
pub use queue::{EventRecord, PredictableEvents};
pub use types::EntityEvent;
