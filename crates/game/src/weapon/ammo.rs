use std::collections::HashMap;

use super::table::Weapon;

/// Ammo counts at or above this never deplete.
pub const INFINITE_AMMO: i32 = 9999;

/// Authoritative ammo bookkeeping, consulted only on the server.
pub trait AmmoLedger {
    fn ammo(&self, client: u16, weapon: Weapon) -> i32;
    fn add_ammo(&mut self, client: u16, weapon: Weapon, delta: i32);
}

/// Per-client, per-weapon ammo counts. Missing entries read as zero.
#[derive(Debug, Clone, Default)]
pub struct AmmoInventory {
    counts: HashMap<(u16, Weapon), i32>,
}

impl AmmoInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, client: u16, weapon: Weapon, count: i32) {
        self.counts.insert((client, weapon), count);
    }

    pub fn clear_client(&mut self, client: u16) {
        self.counts.retain(|(owner, _), _| *owner != client);
    }
}

impl AmmoLedger for AmmoInventory {
    fn ammo(&self, client: u16, weapon: Weapon) -> i32 {
        self.counts.get(&(client, weapon)).copied().unwrap_or(0)
    }

    fn add_ammo(&mut self, client: u16, weapon: Weapon, delta: i32) {
        let count = self.counts.entry((client, weapon)).or_insert(0);
        *count = (*count + delta).max(0);
    }
}
