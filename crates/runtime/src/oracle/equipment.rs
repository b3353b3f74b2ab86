//! Stat bonuses from equipped items, implementing
//! [`battle_core::StatBonusOracle`].
//!
//! Bonuses are read live on every stat lookup, so equipping or unequipping
//! mid-battle takes effect on the next read. They apply to the party only.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use battle_core::{StatBonusOracle, StatKind};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EquipmentItem {
    pub name: String,
    pub buffs: HashMap<StatKind, i32>,
    pub penalties: HashMap<StatKind, i32>,
}

impl EquipmentItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn buff(mut self, stat: StatKind, amount: i32) -> Self {
        *self.buffs.entry(stat).or_default() += amount;
        self
    }

    pub fn penalty(mut self, stat: StatKind, amount: i32) -> Self {
        *self.penalties.entry(stat).or_default() += amount;
        self
    }

    fn net(&self, stat: StatKind) -> i32 {
        let buff = self.buffs.get(&stat).copied().unwrap_or(0);
        let penalty = self.penalties.get(&stat).copied().unwrap_or(0);
        buff - penalty
    }
}

/// The party's shared equipment.
#[derive(Debug, Default)]
pub struct EquipmentBonusOracle {
    items: RwLock<Vec<EquipmentItem>>,
}

impl EquipmentBonusOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: impl IntoIterator<Item = EquipmentItem>) -> Self {
        Self {
            items: RwLock::new(items.into_iter().collect()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<EquipmentItem>> {
        self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<EquipmentItem>> {
        self.items.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn equip(&self, item: EquipmentItem) {
        tracing::debug!(target: "runtime::equipment", item = %item.name, "equipped");
        self.write().push(item);
    }

    /// Removes the first item with this name.
    pub fn unequip(&self, name: &str) -> Option<EquipmentItem> {
        let mut items = self.write();
        let index = items.iter().position(|item| item.name == name)?;
        tracing::debug!(target: "runtime::equipment", item = name, "unequipped");
        Some(items.remove(index))
    }

    pub fn equipped(&self) -> Vec<String> {
        self.read().iter().map(|item| item.name.clone()).collect()
    }
}

impl StatBonusOracle for EquipmentBonusOracle {
    fn stat_bonus(&self, stat: StatKind) -> i32 {
        self.read().iter().map(|item| item.net(stat)).sum()
    }
}
