//! Coins, permanent upgrades and power-up tiers
//!
//! Every purchase checks all of its preconditions before touching state, so a
//! failed purchase never leaves the balance and the owned flags out of step.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{GameConfig, ShopConfig};
use crate::consts::{MAX_EFFECT_TIER, MAX_EXPLOSION_BOOST};
use crate::ledger::Ledger;
use crate::persistence::{self, KeyValueStore, keys};
use crate::sim::{EffectKind, EffectLevels, RunLoadout, RunnerUpgrades};

/// Shop and skin request failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("not enough coins: need {price}, have {balance}")]
    InsufficientCoins { price: u64, balance: u64 },
    #[error("{0} already owned")]
    AlreadyOwned(&'static str),
    #[error("{0} is already at its maximum level")]
    MaxLevel(&'static str),
    #[error("{0} has no upgrade tiers")]
    NotUpgradable(&'static str),
    #[error("unknown skin {0:?}")]
    UnknownSkin(String),
    #[error("skin {0:?} is locked")]
    SkinLocked(String),
    #[error("invalid code")]
    InvalidCode,
    #[error("skin {0:?} is already unlocked")]
    AlreadyUnlocked(String),
}

/// One-time purchases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Upgrade {
    DashRecharge,
    SpeedBoost,
    ShieldSpawner,
    SkinFire,
    SkinRobot,
}

impl Upgrade {
    pub const ALL: [Upgrade; 5] = [
        Upgrade::DashRecharge,
        Upgrade::SpeedBoost,
        Upgrade::ShieldSpawner,
        Upgrade::SkinFire,
        Upgrade::SkinRobot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Upgrade::DashRecharge => "dash_recharge",
            Upgrade::SpeedBoost => "speed_boost",
            Upgrade::ShieldSpawner => "shield_spawner",
            Upgrade::SkinFire => "skin_fire",
            Upgrade::SkinRobot => "skin_robot",
        }
    }

    /// Skin unlocked by this purchase
    pub fn skin(&self) -> Option<&'static str> {
        match self {
            Upgrade::SkinFire => Some("fire"),
            Upgrade::SkinRobot => Some("robot"),
            _ => None,
        }
    }

    pub fn price(&self, prices: &ShopConfig) -> u64 {
        match self {
            Upgrade::DashRecharge => prices.dash_recharge_price,
            Upgrade::SpeedBoost => prices.speed_boost_price,
            Upgrade::ShieldSpawner => prices.shield_spawner_price,
            Upgrade::SkinFire | Upgrade::SkinRobot => prices.skin_price,
        }
    }
}

/// Owned one-time purchases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upgrades {
    pub dash_recharge: bool,
    pub speed_boost: bool,
    pub shield_spawner: bool,
    pub skin_fire: bool,
    pub skin_robot: bool,
}

impl Upgrades {
    pub fn owns(&self, upgrade: Upgrade) -> bool {
        match upgrade {
            Upgrade::DashRecharge => self.dash_recharge,
            Upgrade::SpeedBoost => self.speed_boost,
            Upgrade::ShieldSpawner => self.shield_spawner,
            Upgrade::SkinFire => self.skin_fire,
            Upgrade::SkinRobot => self.skin_robot,
        }
    }

    fn grant(&mut self, upgrade: Upgrade) {
        let flag = match upgrade {
            Upgrade::DashRecharge => &mut self.dash_recharge,
            Upgrade::SpeedBoost => &mut self.speed_boost,
            Upgrade::ShieldSpawner => &mut self.shield_spawner,
            Upgrade::SkinFire => &mut self.skin_fire,
            Upgrade::SkinRobot => &mut self.skin_robot,
        };
        *flag = true;
    }
}

#[derive(Debug, Clone)]
pub struct Shop {
    prices: ShopConfig,
    /// Coin cost per effect tier
    tier_costs: [u64; 3],
    coins: u64,
    upgrades: Upgrades,
    effect_levels: EffectLevels,
    explosion_boost: u8,
}

impl Shop {
    /// Empty wallet, nothing owned
    pub fn new(config: &GameConfig) -> Self {
        Self {
            prices: config.shop.clone(),
            tier_costs: config.powerups.upgrade_costs,
            coins: 0,
            upgrades: Upgrades::default(),
            effect_levels: EffectLevels::default(),
            explosion_boost: 0,
        }
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn upgrades(&self) -> Upgrades {
        self.upgrades
    }

    pub fn effect_levels(&self) -> EffectLevels {
        self.effect_levels
    }

    pub fn explosion_boost(&self) -> u8 {
        self.explosion_boost
    }

    pub fn add_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    fn charge(&mut self, price: u64) -> Result<(), ShopError> {
        if self.coins < price {
            return Err(ShopError::InsufficientCoins {
                price,
                balance: self.coins,
            });
        }
        self.coins -= price;
        Ok(())
    }

    /// Buy a one-time upgrade. Skin purchases also unlock the skin.
    pub fn buy_upgrade(&mut self, upgrade: Upgrade, ledger: &mut Ledger) -> Result<(), ShopError> {
        if self.upgrades.owns(upgrade) {
            return Err(ShopError::AlreadyOwned(upgrade.as_str()));
        }
        self.charge(upgrade.price(&self.prices))?;
        self.upgrades.grant(upgrade);
        if let Some(skin) = upgrade.skin() {
            ledger.unlock_skin(skin);
        }
        log::info!("Bought {} ({} coins left)", upgrade.as_str(), self.coins);
        Ok(())
    }

    /// Cost of the next tier of an effect, `None` once maxed
    pub fn next_tier_cost(&self, kind: EffectKind) -> Option<u64> {
        let next = self.effect_levels.get(kind) + 1;
        if next > MAX_EFFECT_TIER {
            return None;
        }
        self.tier_costs.get(next as usize - 1).copied()
    }

    /// Raise an effect to its next tier; returns the new tier
    pub fn upgrade_effect(&mut self, kind: EffectKind) -> Result<u8, ShopError> {
        if !EffectLevels::UPGRADABLE.contains(&kind) {
            return Err(ShopError::NotUpgradable(kind.as_str()));
        }
        let cost = self
            .next_tier_cost(kind)
            .ok_or(ShopError::MaxLevel(kind.as_str()))?;
        self.charge(cost)?;
        let tier = self.effect_levels.get(kind) + 1;
        self.effect_levels.set(kind, tier);
        log::info!("Upgraded {} to tier {}", kind.as_str(), tier);
        Ok(tier)
    }

    /// Raise the cut-tail spawn weight; returns the new level
    pub fn upgrade_explosion_boost(&mut self) -> Result<u8, ShopError> {
        if self.explosion_boost >= MAX_EXPLOSION_BOOST {
            return Err(ShopError::MaxLevel("explosion_boost"));
        }
        self.charge(self.prices.explosion_boost_price)?;
        self.explosion_boost += 1;
        log::info!("Explosion boost level {}", self.explosion_boost);
        Ok(self.explosion_boost)
    }

    /// What the next run gets from the shop
    pub fn loadout(&self, best_level: u32) -> RunLoadout {
        RunLoadout {
            upgrades: RunnerUpgrades {
                speed_boost: self.upgrades.speed_boost,
                dash_recharge: self.upgrades.dash_recharge,
            },
            shield_spawner: self.upgrades.shield_spawner,
            explosion_boost: self.explosion_boost,
            effect_levels: self.effect_levels,
            best_level,
        }
    }

    pub fn load<S: KeyValueStore + ?Sized>(config: &GameConfig, store: &S) -> Self {
        let mut shop = Self::new(config);
        shop.coins = persistence::load_json(store, keys::COINS);
        shop.upgrades = persistence::load_json(store, keys::UPGRADES);
        shop.effect_levels = persistence::load_json(store, keys::EFFECT_LEVELS);
        shop.explosion_boost =
            persistence::load_json::<u8, _>(store, keys::EXPLOSION_BOOST).min(MAX_EXPLOSION_BOOST);
        for kind in EffectLevels::UPGRADABLE {
            let tier = shop.effect_levels.get(kind).clamp(1, MAX_EFFECT_TIER);
            shop.effect_levels.set(kind, tier);
        }
        shop
    }

    /// Persist only the wallet (written on every coin pickup)
    pub fn save_coins<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        persistence::save_json(store, keys::COINS, &self.coins);
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        self.save_coins(store);
        persistence::save_json(store, keys::UPGRADES, &self.upgrades);
        persistence::save_json(store, keys::EFFECT_LEVELS, &self.effect_levels);
        persistence::save_json(store, keys::EXPLOSION_BOOST, &self.explosion_boost);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn shop_with(coins: u64) -> (Shop, Ledger) {
        let mut shop = Shop::new(&GameConfig::default());
        shop.add_coins(coins);
        (shop, Ledger::new())
    }

    #[test]
    fn test_buy_upgrade() {
        let (mut shop, mut ledger) = shop_with(120);
        shop.buy_upgrade(Upgrade::DashRecharge, &mut ledger).unwrap();
        assert_eq!(shop.coins(), 20);
        assert!(shop.upgrades().dash_recharge);
        assert!(shop.loadout(0).upgrades.dash_recharge);
    }

    #[test]
    fn test_unaffordable_changes_nothing() {
        let (mut shop, mut ledger) = shop_with(99);
        let err = shop
            .buy_upgrade(Upgrade::DashRecharge, &mut ledger)
            .unwrap_err();
        assert_eq!(
            err,
            ShopError::InsufficientCoins {
                price: 100,
                balance: 99
            }
        );
        assert_eq!(shop.coins(), 99);
        assert!(!shop.upgrades().dash_recharge);
    }

    #[test]
    fn test_owned_upgrade_not_charged_twice() {
        let (mut shop, mut ledger) = shop_with(500);
        shop.buy_upgrade(Upgrade::SpeedBoost, &mut ledger).unwrap();
        assert_eq!(
            shop.buy_upgrade(Upgrade::SpeedBoost, &mut ledger),
            Err(ShopError::AlreadyOwned("speed_boost"))
        );
        assert_eq!(shop.coins(), 350);
    }

    #[test]
    fn test_skin_purchase_unlocks_skin() {
        let (mut shop, mut ledger) = shop_with(300);
        shop.buy_upgrade(Upgrade::SkinFire, &mut ledger).unwrap();
        assert!(ledger.is_skin_unlocked("fire"));
        assert_eq!(shop.coins(), 0);
    }

    #[test]
    fn test_effect_tiers() {
        let (mut shop, _) = shop_with(200);
        assert_eq!(shop.next_tier_cost(EffectKind::Ghost), Some(50));
        assert_eq!(shop.upgrade_effect(EffectKind::Ghost), Ok(2));
        assert_eq!(shop.upgrade_effect(EffectKind::Ghost), Ok(3));
        assert_eq!(shop.coins(), 80);
        assert_eq!(
            shop.upgrade_effect(EffectKind::Ghost),
            Err(ShopError::MaxLevel("ghost"))
        );
        assert_eq!(shop.coins(), 80);
        assert_eq!(
            shop.upgrade_effect(EffectKind::VisionImpair),
            Err(ShopError::NotUpgradable("vision_impair"))
        );
        assert_eq!(shop.loadout(0).effect_levels.ghost, 3);
    }

    #[test]
    fn test_explosion_boost_capped() {
        let (mut shop, _) = shop_with(1000);
        for level in 1..=3 {
            assert_eq!(shop.upgrade_explosion_boost(), Ok(level));
        }
        assert_eq!(
            shop.upgrade_explosion_boost(),
            Err(ShopError::MaxLevel("explosion_boost"))
        );
        assert_eq!(shop.coins(), 400);
    }

    #[test]
    fn test_save_load() {
        let mut store = MemoryStore::new();
        let config = GameConfig::default();
        let (mut shop, mut ledger) = shop_with(400);
        shop.buy_upgrade(Upgrade::ShieldSpawner, &mut ledger).unwrap();
        shop.upgrade_effect(EffectKind::Magneto).unwrap();
        shop.save(&mut store);

        let loaded = Shop::load(&config, &store);
        assert_eq!(loaded.coins(), 150);
        assert!(loaded.upgrades().shield_spawner);
        assert_eq!(loaded.effect_levels().magneto, 2);
        assert_eq!(loaded.explosion_boost(), 0);
    }

    #[test]
    fn test_load_clamps_bad_tiers() {
        let mut store = MemoryStore::new();
        store.set(keys::EFFECT_LEVELS, r#"{"ghost": 9, "shield": 0}"#);
        store.set(keys::EXPLOSION_BOOST, "12");
        let shop = Shop::load(&GameConfig::default(), &store);
        assert_eq!(shop.effect_levels().ghost, 3);
        assert_eq!(shop.effect_levels().shield, 1);
        assert_eq!(shop.effect_levels().magneto, 1);
        assert_eq!(shop.explosion_boost(), 3);
    }
}
