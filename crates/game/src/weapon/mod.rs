mod ammo;
mod table;

pub use ammo::{AmmoInventory, AmmoLedger, INFINITE_AMMO};
pub use table::{Weapon, WeaponClass, WeaponError, WeaponInfo, WeaponTable};
