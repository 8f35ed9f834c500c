mod brush;
mod objects;
mod testing_ground;

pub use brush::{Brush, BrushSide, BrushWorld, SURFACE_CLIP_EPSILON};
pub use objects::{MapObject, MapObjectKind};
pub use testing_ground::TestingGround;
