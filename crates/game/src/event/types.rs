use serde::{Deserialize, Serialize};

/// Events raised by movement and weapon ticks, replayed identically by the
/// client so predicted sounds match what the server broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityEvent {
    Footstep = 1,
    FootstepMetal = 2,
    FootstepFlesh = 3,
    FootSplash = 4,
    Swim = 5,
    Step4 = 6,
    Step8 = 7,
    Step12 = 8,
    Step16 = 9,
    FallShort = 10,
    FallMedium = 11,
    FallFar = 12,
    Jump = 13,
    WaterTouch = 14,
    WaterLeave = 15,
    WaterUnder = 16,
    WaterClear = 17,
    NoAmmo = 18,
    FireWeapon = 19,
}

impl EntityEvent {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::Footstep,
            2 => Self::FootstepMetal,
            3 => Self::FootstepFlesh,
            4 => Self::FootSplash,
            5 => Self::Swim,
            6 => Self::Step4,
            7 => Self::Step8,
            8 => Self::Step12,
            9 => Self::Step16,
            10 => Self::FallShort,
            11 => Self::FallMedium,
            12 => Self::FallFar,
            13 => Self::Jump,
            14 => Self::WaterTouch,
            15 => Self::WaterLeave,
            16 => Self::WaterUnder,
            17 => Self::WaterClear,
            18 => Self::NoAmmo,
            19 => Self::FireWeapon,
            _ => return None,
        })
    }

    pub fn is_footstep(self) -> bool {
        matches!(
            self,
            Self::Footstep | Self::FootstepMetal | Self::FootstepFlesh
        )
    }

    pub fn is_fall(self) -> bool {
        matches!(self, Self::FallShort | Self::FallMedium | Self::FallFar)
    }

    /// Step events by climbed height, `None` below two units.
    pub fn for_step_height(delta: f32) -> Option<Self> {
        if delta <= 2.0 {
            None
        } else if delta < 7.0 {
            Some(Self::Step4)
        } else if delta < 11.0 {
            Some(Self::Step8)
        } else if delta < 15.0 {
            Some(Self::Step12)
        } else {
            Some(Self::Step16)
        }
    }
}
