//! 泊位
//!
//! 泊位持有若干岸桥，并至多停靠一艘船。占用与可用互斥：
//! `occupant.is_some()` 当且仅当 `!available`。

use serde::{Deserialize, Serialize};

use super::crane::Crane;
use super::id::{DockId, ShipId};

/// 船舶与泊位共用的尺寸等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// 该尺寸的船能否停靠 `dock` 尺寸的泊位：
    /// 小船任意泊位，中船非小泊位，大船只能大泊位
    pub fn fits_dock(self, dock: SizeClass) -> bool {
        match self {
            SizeClass::Small => true,
            SizeClass::Medium => dock != SizeClass::Small,
            SizeClass::Large => dock == SizeClass::Large,
        }
    }
}

#[derive(Debug)]
pub struct Dock {
    id: DockId,
    size: SizeClass,
    available: bool,
    cranes: Vec<Crane>,
    occupant: Option<ShipId>,
}

impl Dock {
    pub fn new(id: DockId, size: SizeClass, cranes: usize) -> Self {
        Self {
            id,
            size,
            available: true,
            cranes: (0..cranes).map(|_| Crane::new()).collect(),
            occupant: None,
        }
    }

    pub fn id(&self) -> DockId {
        self.id
    }

    pub fn size(&self) -> SizeClass {
        self.size
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn occupant(&self) -> Option<ShipId> {
        self.occupant
    }

    pub fn cranes(&self) -> &[Crane] {
        &self.cranes
    }

    pub(crate) fn crane_mut(&mut self, index: usize) -> Option<&mut Crane> {
        self.cranes.get_mut(index)
    }

    /// 第一台空闲岸桥的下标
    pub(crate) fn free_crane(&self) -> Option<usize> {
        self.cranes.iter().position(|c| c.is_available())
    }

    pub(crate) fn occupy(&mut self, ship: ShipId) {
        self.occupant = Some(ship);
        self.available = false;
    }

    /// 释放泊位；空手的岸桥一并复位
    pub(crate) fn vacate(&mut self) -> Option<ShipId> {
        for crane in &mut self.cranes {
            if crane.holding().is_none() {
                crane.release();
            }
        }
        self.available = true;
        self.occupant.take()
    }
}
