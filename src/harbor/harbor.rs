//! 港口（聚合根）
//!
//! 港口持有全部船舶、泊位、AGV 与堆场，并在每个 tick 按固定顺序执行：
//! 航行推进与排队 -> 靠泊 -> 集装箱转运 -> 装卸计划 -> 航行计划。
//! 每艘船任一时刻至多位于等待队列、靠泊列表、航行列表之一。

use std::collections::VecDeque;
use tracing::{debug, info};

use super::handling::TransferJob;
use super::notify::{HarborEvent, HarborListener};
use super::stats::HarborStats;
use crate::error::HarborError;
use crate::history::{DockedShipInfo, HarborHistory, HarborSnapshot};
use crate::model::{
    Agv, AgvId, Container, ContainerId, ContainerSize, ContainerStorage, Dock, DockId, Ship,
    ShipId,
};
use crate::sim::{SimTime, World};

pub struct Harbor {
    name: String,
    now: SimTime,
    location_start: i64,
    location_end: i64,
    pub(crate) ships: Vec<Ship>,
    pub(crate) waiting: VecDeque<ShipId>,
    pub(crate) docked: Vec<ShipId>,
    pub(crate) sailing: Vec<ShipId>,
    pub(crate) docks: Vec<Dock>,
    pub(crate) agvs: Vec<Agv>,
    pub(crate) storage: ContainerStorage,
    /// 每艘船的转运作业队列（下标为 ShipId）
    pub(crate) jobs: Vec<VecDeque<TransferJob>>,
    next_container_id: u64,
    pub(crate) history: HarborHistory,
    listeners: Vec<HarborListener>,
    pub stats: HarborStats,
}

impl Harbor {
    pub fn new(
        name: impl Into<String>,
        location_start: i64,
        location_end: i64,
        storage: ContainerStorage,
        start: SimTime,
    ) -> Result<Self, HarborError> {
        if location_start > location_end {
            return Err(HarborError::InvalidArgument(format!(
                "harbor location range {location_start}..={location_end} is empty"
            )));
        }
        Ok(Self {
            name: name.into(),
            now: start,
            location_start,
            location_end,
            ships: Vec::new(),
            waiting: VecDeque::new(),
            docked: Vec::new(),
            sailing: Vec::new(),
            docks: Vec::new(),
            agvs: Vec::new(),
            storage,
            jobs: Vec::new(),
            next_container_id: 0,
            history: HarborHistory::default(),
            listeners: Vec::new(),
            stats: HarborStats::default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn location_range(&self) -> (i64, i64) {
        (self.location_start, self.location_end)
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(id.0)
    }

    /// 按船名查找（船名是事实上的外部键）
    pub fn ship_by_name(&self, name: &str) -> Option<&Ship> {
        self.ships.iter().find(|s| s.name() == name)
    }

    pub fn waiting_queue(&self) -> impl Iterator<Item = ShipId> + '_ {
        self.waiting.iter().copied()
    }

    pub fn docked_ships(&self) -> &[ShipId] {
        &self.docked
    }

    pub fn sailing_ships(&self) -> &[ShipId] {
        &self.sailing
    }

    pub fn docks(&self) -> &[Dock] {
        &self.docks
    }

    pub fn dock(&self, id: DockId) -> Option<&Dock> {
        self.docks.get(id.0)
    }

    pub fn agvs(&self) -> &[Agv] {
        &self.agvs
    }

    pub fn agv(&self, id: AgvId) -> Option<&Agv> {
        self.agvs.get(id.0)
    }

    pub fn storage(&self) -> &ContainerStorage {
        &self.storage
    }

    pub fn history(&self) -> &HarborHistory {
        &self.history
    }

    /// 船舶当前排队中的转运作业数
    pub fn pending_jobs(&self, ship: ShipId) -> usize {
        self.jobs.get(ship.0).map_or(0, VecDeque::len)
    }

    pub fn subscribe(&mut self, listener: HarborListener) {
        self.listeners.push(listener);
    }

    pub(crate) fn emit(&mut self, event: HarborEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    pub(crate) fn ship_ref(&self, id: ShipId) -> Result<&Ship, HarborError> {
        self.ships
            .get(id.0)
            .ok_or_else(|| HarborError::UnknownShip(format!("#{}", id.0)))
    }

    pub(crate) fn ship_id_by_name(&self, name: &str) -> Result<ShipId, HarborError> {
        self.ship_by_name(name)
            .map(Ship::id)
            .ok_or_else(|| HarborError::UnknownShip(name.to_string()))
    }

    /// 记录船舶事件，文本末尾附带当前时间
    pub(crate) fn record_ship_event(&mut self, ship: ShipId, text: &str) {
        let now = self.now;
        if let Some(s) = self.ships.get(ship.0) {
            let line = format!("{} {} at {}", s.name(), text, now);
            self.history.record_ship_event(s.name(), now, line);
        }
    }

    pub(crate) fn new_container(&mut self, size: ContainerSize) -> Container {
        let id = ContainerId(self.next_container_id);
        self.next_container_id = self.next_container_id.wrapping_add(1);
        Container::new(id, format!("Container {}", id.0), size)
    }

    pub(crate) fn check_location(&self, location: i64) -> Result<(), HarborError> {
        if location < self.location_start || location > self.location_end {
            return Err(HarborError::LocationOutOfRange {
                location,
                start: self.location_start,
                end: self.location_end,
            });
        }
        Ok(())
    }

    /// 当前港口状态快照
    pub fn snapshot(&self) -> HarborSnapshot {
        let name_of = |id: &ShipId| self.ships[id.0].name().to_string();
        HarborSnapshot {
            taken_at: self.now,
            waiting: self.waiting.iter().map(name_of).collect(),
            docked: self
                .docked
                .iter()
                .filter_map(|id| {
                    let ship = &self.ships[id.0];
                    ship.docked_at().map(|dock| DockedShipInfo {
                        ship: ship.name().to_string(),
                        dock,
                    })
                })
                .collect(),
            sailing: self.sailing.iter().map(name_of).collect(),
            available_docks: self.docks.iter().filter(|d| d.is_available()).count(),
            available_agvs: self.agvs.iter().filter(|a| a.is_available()).count(),
            storage_capacity: self.storage.capacity(),
            storage_occupied: self.storage.occupied_space(),
            containers_in_storage: self.storage.container_count(),
        }
    }

    /// 执行一个 tick 的全部阶段
    #[tracing::instrument(skip(self), fields(harbor = %self.name))]
    pub fn tick(&mut self, now: SimTime) {
        let elapsed_minutes = (now.0 - self.now.0).num_seconds().max(0) as f64 / 60.0;
        self.now = now;
        debug!(elapsed_minutes, "推进港口");

        self.advance_voyages(elapsed_minutes);
        self.admit_arrivals();
        self.dock_waiting_ships();
        self.run_transfers();
        self.evaluate_handlings();
        self.evaluate_sailings();
    }

    /// 午夜：记录快照并累计堆存天数
    pub fn record_daily_snapshot(&mut self, now: SimTime) {
        self.storage.add_storage_day();
        let snapshot = self.snapshot();
        self.history.record_snapshot(now, snapshot);
        self.stats.snapshots += 1;
        info!(date = %now.date(), "📸 记录每日快照");
    }
}

impl World for Harbor {
    fn on_tick(&mut self, now: SimTime) {
        self.tick(now);
    }

    fn on_midnight(&mut self, now: SimTime) {
        self.record_daily_snapshot(now);
    }
}
