use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::HarborError;
use crate::model::DockId;
use crate::sim::SimTime;

/// 一条船舶事件（文本审计记录）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipEventRecord {
    pub at: SimTime,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockedShipInfo {
    pub ship: String,
    pub dock: DockId,
}

/// 某一时刻的港口状态（按日期保存）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarborSnapshot {
    pub taken_at: SimTime,
    pub waiting: Vec<String>,
    pub docked: Vec<DockedShipInfo>,
    pub sailing: Vec<String>,
    pub available_docks: usize,
    pub available_agvs: usize,
    pub storage_capacity: u64,
    pub storage_occupied: u64,
    pub containers_in_storage: usize,
}

/// 内存中的历史记录：船舶事件按船名归档，快照按日期归档
#[derive(Debug, Default)]
pub struct HarborHistory {
    ship_events: HashMap<String, Vec<ShipEventRecord>>,
    snapshots: BTreeMap<NaiveDate, HarborSnapshot>,
}

impl HarborHistory {
    pub fn record_ship_event(&mut self, ship: &str, at: SimTime, text: impl Into<String>) {
        self.ship_events
            .entry(ship.to_string())
            .or_default()
            .push(ShipEventRecord {
                at,
                text: text.into(),
            });
    }

    /// 同一天重复记录时以最后一次为准
    pub fn record_snapshot(&mut self, at: SimTime, snapshot: HarborSnapshot) {
        self.snapshots.insert(at.date(), snapshot);
    }

    /// 某艘船的事件文本，按记录顺序
    pub fn ship_events(&self, ship: &str) -> Vec<String> {
        self.ship_event_records(ship)
            .iter()
            .map(|r| r.text.clone())
            .collect()
    }

    pub fn ship_event_records(&self, ship: &str) -> &[ShipEventRecord] {
        self.ship_events
            .get(ship)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn snapshot(&self, date: NaiveDate) -> Result<&HarborSnapshot, HarborError> {
        self.snapshots
            .get(&date)
            .ok_or(HarborError::SnapshotNotFound(date))
    }

    pub fn snapshots(&self) -> impl Iterator<Item = (&NaiveDate, &HarborSnapshot)> {
        self.snapshots.iter()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}
