use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Weapon {
    #[default]
    None = 0,
    Gauntlet = 1,
    Machinegun = 2,
    Shotgun = 3,
    GrenadeLauncher = 4,
    RocketLauncher = 5,
    Lightning = 6,
    Railgun = 7,
    Plasmagun = 8,
    Bfg = 9,
    Nailgun = 10,
    ProxLauncher = 11,
    Chaingun = 12,
    Physgun = 13,
    Gravitygun = 14,
    Toolgun = 15,
}

impl Weapon {
    pub const COUNT: usize = 16;

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WeaponError {
    #[error("unknown weapon id {0}")]
    UnknownWeapon(u8),
}

impl TryFrom<u8> for Weapon {
    type Error = WeaponError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Ok(match id {
            0 => Self::None,
            1 => Self::Gauntlet,
            2 => Self::Machinegun,
            3 => Self::Shotgun,
            4 => Self::GrenadeLauncher,
            5 => Self::RocketLauncher,
            6 => Self::Lightning,
            7 => Self::Railgun,
            8 => Self::Plasmagun,
            9 => Self::Bfg,
            10 => Self::Nailgun,
            11 => Self::ProxLauncher,
            12 => Self::Chaingun,
            13 => Self::Physgun,
            14 => Self::Gravitygun,
            15 => Self::Toolgun,
            other => return Err(WeaponError::UnknownWeapon(other)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    None,
    Melee,
    Bullet,
    Shotgun,
    Missile,
    Lightning,
    Railgun,
    Empty,
    Toolgun,
}

/// Static per-weapon properties. Times are milliseconds, distances units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponInfo {
    pub class: WeaponClass,
    pub projectile: Option<&'static str>,
    pub delay: i32,
    pub count: i32,
    pub damage: i32,
    pub splash_damage: i32,
    pub splash_radius: i32,
    pub range: i32,
    pub speed: i32,
    pub speed_random: i32,
    pub spread: i32,
    pub timeout: i32,
    pub guided: bool,
    pub gravity: bool,
    pub bounce: bool,
    pub bounce_modifier: f32,
}

impl WeaponInfo {
    const fn hitscan(
        class: WeaponClass,
        delay: i32,
        count: i32,
        damage: i32,
        range: i32,
        spread: i32,
    ) -> Self {
        Self {
            class,
            projectile: None,
            delay,
            count,
            damage,
            splash_damage: 0,
            splash_radius: 0,
            range,
            speed: 0,
            speed_random: 0,
            spread,
            timeout: 0,
            guided: false,
            gravity: false,
            bounce: false,
            bounce_modifier: 0.0,
        }
    }

    const fn missile(
        name: &'static str,
        delay: i32,
        damage: i32,
        splash_damage: i32,
        splash_radius: i32,
        speed: i32,
        timeout: i32,
    ) -> Self {
        Self {
            class: WeaponClass::Missile,
            projectile: Some(name),
            delay,
            count: 1,
            damage,
            splash_damage,
            splash_radius,
            range: 0,
            speed,
            speed_random: 0,
            spread: 0,
            timeout,
            guided: false,
            gravity: false,
            bounce: false,
            bounce_modifier: 0.0,
        }
    }

    pub fn is_melee(&self) -> bool {
        self.class == WeaponClass::Melee
    }
}

#[derive(Debug, Clone)]
pub struct WeaponTable {
    rows: [WeaponInfo; Weapon::COUNT],
}

impl Default for WeaponTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl WeaponTable {
    pub fn standard() -> Self {
        use WeaponClass::{Bullet, Empty, Melee, Toolgun};

        let none = WeaponInfo::hitscan(WeaponClass::None, 0, 0, 0, 0, 0);
        let gauntlet = WeaponInfo::hitscan(Melee, 400, 1, 50, 64, 0);
        let machinegun = WeaponInfo::hitscan(Bullet, 100, 1, 7, 131072, 200);
        let shotgun = WeaponInfo::hitscan(WeaponClass::Shotgun, 1000, 11, 10, 8192, 700);
        let grenade = WeaponInfo {
            gravity: true,
            bounce: true,
            bounce_modifier: 0.65,
            ..WeaponInfo::missile("grenade", 800, 100, 100, 150, 700, 2500)
        };
        let rocket = WeaponInfo::missile("rocket", 800, 100, 100, 120, 900, 15000);
        let lightning = WeaponInfo::hitscan(WeaponClass::Lightning, 50, 1, 8, 768, 0);
        let railgun = WeaponInfo::hitscan(WeaponClass::Railgun, 1500, 1, 100, 16384, 0);
        let plasma = WeaponInfo::missile("plasma", 100, 20, 15, 20, 2000, 10000);
        let bfg = WeaponInfo::missile("bfg", 200, 100, 100, 120, 2000, 10000);
        let nailgun = WeaponInfo {
            count: 16,
            speed_random: 1800,
            spread: 500,
            ..WeaponInfo::missile("nail", 1000, 20, 0, 0, 555, 10000)
        };
        let prox = WeaponInfo {
            gravity: true,
            ..WeaponInfo::missile("mine", 800, 0, 100, 150, 700, 3000)
        };
        let chaingun = WeaponInfo::hitscan(Bullet, 30, 1, 7, 131072, 600);
        let physgun = WeaponInfo::hitscan(Empty, 100, 1, 0, 8192, 0);
        let gravitygun = WeaponInfo::hitscan(Empty, 100, 1, 0, 1024, 0);
        let toolgun = WeaponInfo::hitscan(Toolgun, 200, 1, 0, 4096, 0);

        Self {
            rows: [
                none, gauntlet, machinegun, shotgun, grenade, rocket, lightning, railgun, plasma,
                bfg, nailgun, prox, chaingun, physgun, gravitygun, toolgun,
            ],
        }
    }

    pub fn get(&self, weapon: Weapon) -> &WeaponInfo {
        &self.rows[weapon.index()]
    }

    pub fn fire_delay(&self, weapon: Weapon) -> i32 {
        self.get(weapon).delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_delays() {
        let table = WeaponTable::standard();
        assert_eq!(table.fire_delay(Weapon::None), 0);
        assert_eq!(table.fire_delay(Weapon::Gauntlet), 400);
        assert_eq!(table.fire_delay(Weapon::Machinegun), 100);
        assert_eq!(table.fire_delay(Weapon::Railgun), 1500);
        assert_eq!(table.fire_delay(Weapon::Chaingun), 30);
        assert_eq!(table.fire_delay(Weapon::Toolgun), 200);
    }

    #[test]
    fn gauntlet_is_the_melee_weapon() {
        let table = WeaponTable::standard();
        assert!(table.get(Weapon::Gauntlet).is_melee());
        assert_eq!(table.get(Weapon::Gauntlet).range, 64);
        assert!(!table.get(Weapon::Machinegun).is_melee());
    }

    #[test]
    fn grenades_bounce() {
        let table = WeaponTable::standard();
        let grenade = table.get(Weapon::GrenadeLauncher);
        assert!(grenade.gravity && grenade.bounce);
        assert_eq!(grenade.projectile, Some("grenade"));
        assert!(table.get(Weapon::ProxLauncher).gravity);
        assert_eq!(table.get(Weapon::Nailgun).count, 16);
    }

    #[test]
    fn unknown_weapon_id() {
        assert_eq!(Weapon::try_from(13), Ok(Weapon::Physgun));
        assert_eq!(Weapon::try_from(16), Err(WeaponError::UnknownWeapon(16)));
    }
}
