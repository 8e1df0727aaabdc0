//! 船舶
//!
//! 船舶在整个运行期间持续存在：排队、靠泊、装卸、航行，抵达后重新排队。

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::container::Container;
use super::dock::SizeClass;
use super::id::{DockId, ShipId};
use super::schedule::{ScheduledHandling, ScheduledSailing};

/// 船型，决定航速
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipModel {
    Feeder,
    Panamax,
    PostPanamax,
}

impl ShipModel {
    /// 航速（位置单位 / 小时）
    pub fn speed_per_hour(self) -> f64 {
        match self {
            ShipModel::Feeder => 30.0,
            ShipModel::Panamax => 24.0,
            ShipModel::PostPanamax => 20.0,
        }
    }
}

/// 船舶状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipState {
    /// 已创建，尚未进入等待队列
    Idle,
    Waiting,
    Docked,
    Unloading,
    Loading,
    ReadyToSail,
    Sailing,
}

impl ShipState {
    pub fn is_docked(self) -> bool {
        matches!(
            self,
            ShipState::Docked | ShipState::Unloading | ShipState::Loading | ShipState::ReadyToSail
        )
    }
}

/// 一次航行：按航速对距离积分
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voyage {
    pub origin: i64,
    pub destination: i64,
    pub travelled: f64,
}

impl Voyage {
    pub fn distance(&self) -> f64 {
        (self.destination - self.origin).abs() as f64
    }

    /// 推进 `minutes` 分钟；返回是否抵达
    pub fn advance(&mut self, speed_per_hour: f64, minutes: f64) -> bool {
        self.travelled += speed_per_hour * minutes / 60.0;
        self.travelled >= self.distance()
    }
}

#[derive(Debug)]
pub struct Ship {
    id: ShipId,
    name: String,
    model: ShipModel,
    size: SizeClass,
    location: i64,
    destination: Option<i64>,
    pub(crate) containers: VecDeque<Container>,
    docked_at: Option<DockId>,
    state: ShipState,
    has_reached_destination: bool,
    waiting_for_sailing: bool,
    voyage: Option<Voyage>,
    pub(crate) sailings: Vec<ScheduledSailing>,
    pub(crate) handlings: Vec<ScheduledHandling>,
}

impl Ship {
    pub fn new(
        id: ShipId,
        name: impl Into<String>,
        model: ShipModel,
        size: SizeClass,
        location: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            model,
            size,
            location,
            destination: None,
            containers: VecDeque::new(),
            docked_at: None,
            state: ShipState::Idle,
            has_reached_destination: false,
            waiting_for_sailing: false,
            voyage: None,
            sailings: Vec::new(),
            handlings: Vec::new(),
        }
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> ShipModel {
        self.model
    }

    pub fn size(&self) -> SizeClass {
        self.size
    }

    pub fn location(&self) -> i64 {
        self.location
    }

    pub fn destination(&self) -> Option<i64> {
        self.destination
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn docked_at(&self) -> Option<DockId> {
        self.docked_at
    }

    pub fn state(&self) -> ShipState {
        self.state
    }

    pub fn is_sailing(&self) -> bool {
        self.state == ShipState::Sailing
    }

    pub fn is_ready_to_sail(&self) -> bool {
        self.state == ShipState::ReadyToSail
    }

    pub fn has_reached_destination(&self) -> bool {
        self.has_reached_destination
    }

    /// 仅作提示：计划时刻到了但船未就绪
    pub fn is_waiting_for_sailing(&self) -> bool {
        self.waiting_for_sailing
    }

    pub fn voyage(&self) -> Option<&Voyage> {
        self.voyage.as_ref()
    }

    pub fn sailings(&self) -> &[ScheduledSailing] {
        &self.sailings
    }

    pub fn handlings(&self) -> &[ScheduledHandling] {
        &self.handlings
    }

    pub(crate) fn set_state(&mut self, state: ShipState) {
        self.state = state;
    }

    pub(crate) fn set_waiting_for_sailing(&mut self, waiting: bool) {
        self.waiting_for_sailing = waiting;
    }

    pub(crate) fn dock_at(&mut self, dock: DockId) {
        self.docked_at = Some(dock);
        self.has_reached_destination = false;
        self.state = ShipState::Docked;
    }

    pub(crate) fn undock(&mut self) -> Option<DockId> {
        self.docked_at.take()
    }

    pub(crate) fn begin_voyage(&mut self, destination: i64) {
        self.destination = Some(destination);
        self.has_reached_destination = false;
        self.waiting_for_sailing = false;
        self.state = ShipState::Sailing;
        self.voyage = Some(Voyage {
            origin: self.location,
            destination,
            travelled: 0.0,
        });
    }

    /// 推进航行；抵达时更新位置并返回 true
    pub(crate) fn advance_voyage(&mut self, minutes: f64) -> bool {
        let speed = self.model.speed_per_hour();
        let Some(voyage) = self.voyage.as_mut() else {
            return false;
        };
        if !voyage.advance(speed, minutes) {
            return false;
        }
        self.location = voyage.destination;
        self.voyage = None;
        self.has_reached_destination = true;
        true
    }
}
