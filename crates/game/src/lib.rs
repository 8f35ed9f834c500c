pub mod collision;
pub mod event;
pub mod map;
pub mod math;
pub mod movement;
pub mod player;
pub mod simulation;
pub mod trajectory;
pub mod weapon;

pub use collision::{CollisionWorld, ContentFlags, EntityId, SurfaceFlags, Trace};
pub use event::{EntityEvent, EntityFlags, EntityKind, EntityState, EventRecord, PredictableEvents};
pub use map::{Brush, BrushSide, BrushWorld, MapObject, MapObjectKind, TestingGround};
pub use movement::{PmoveOptions, PmoveResult};
pub use player::{PlayerController, PlayerState, PmFlags, PmType, PmoveConfig, Team, WeaponState};
pub use simulation::{
    BroadcastEvent, Buttons, ClientPrediction, ClientSession, CommandBuffer, CommandError,
    FixedTimestep, ServerSimulation, ThinkSettings, UserCommand,
};
pub use trajectory::{Trajectory, TrajectoryError, TrajectoryKind};
pub use weapon::{AmmoInventory, AmmoLedger, Weapon, WeaponClass, WeaponInfo, WeaponTable};
