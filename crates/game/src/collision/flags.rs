use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// What a volume is made of. Traces only stop on contents in their mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ContentFlags: u32 {
        const SOLID = 1;
        const LAVA = 8;
        const SLIME = 16;
        const WATER = 32;
        const FOG = 64;
        const PLAYERCLIP = 0x10000;
        const MONSTERCLIP = 0x20000;
        const BOTCLIP = 0x400000;
        const BODY = 0x2000000;
        const CORPSE = 0x4000000;
        const TRIGGER = 0x40000000;
    }
}

impl ContentFlags {
    pub const MASK_PLAYERSOLID: Self = Self::SOLID.union(Self::PLAYERCLIP).union(Self::BODY);
    pub const MASK_WATER: Self = Self::WATER.union(Self::LAVA).union(Self::SLIME);
}

bitflags! {
    /// Per-face properties reported by the trace that hit the face.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SurfaceFlags: u32 {
        const NODAMAGE = 0x1;
        const SLICK = 0x2;
        const SKY = 0x4;
        const LADDER = 0x8;
        const NOIMPACT = 0x10;
        const NOMARKS = 0x20;
        const FLESH = 0x40;
        const NODRAW = 0x80;
        const METALSTEPS = 0x1000;
        const NOSTEPS = 0x2000;
    }
}
