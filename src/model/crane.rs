//! 吊机
//!
//! 岸桥（泊位侧）与门式吊机（存储列侧）行为相同：一次只能吊一个集装箱，
//! 每次交接前需要累计若干 tick 的作业时间。

use super::container::Container;
use super::id::AgvId;

/// 岸桥作业阈值（船 <-> AGV，tick）
pub const SHIP_CRANE_HANDLING_TICKS: u32 = 30;
/// 门式吊机放箱阈值（AGV -> 存储列，tick）
pub const PORTAL_CRANE_PLACE_TICKS: u32 = 30;
/// 门式吊机取箱阈值（存储列 -> AGV，tick）
pub const PORTAL_CRANE_RETRIEVE_TICKS: u32 = 60;

/// 单占用吊机
#[derive(Debug)]
pub struct Crane {
    available: bool,
    handling_time: u32,
    holding: Option<Container>,
    /// 正在与之交接的 AGV（累计阶段内有效）
    engaged_with: Option<AgvId>,
}

/// 门式吊机与岸桥共用同一实现
pub type PortalCrane = Crane;

impl Default for Crane {
    fn default() -> Self {
        Self::new()
    }
}

impl Crane {
    pub fn new() -> Self {
        Self {
            available: true,
            handling_time: 0,
            holding: None,
            engaged_with: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn handling_time(&self) -> u32 {
        self.handling_time
    }

    pub fn holding(&self) -> Option<&Container> {
        self.holding.as_ref()
    }

    pub fn engaged_with(&self) -> Option<AgvId> {
        self.engaged_with
    }

    /// 是否可以为 `agv` 作业：空闲，或已在为它作业
    pub(crate) fn can_serve(&self, agv: AgvId) -> bool {
        self.available || self.engaged_with == Some(agv)
    }

    pub(crate) fn engage(&mut self, agv: AgvId) {
        self.available = false;
        self.engaged_with = Some(agv);
    }

    /// 累计作业时间；返回是否已到达阈值
    pub(crate) fn accumulate(&mut self, threshold: u32) -> bool {
        if self.handling_time < threshold {
            self.handling_time += 1;
            return false;
        }
        true
    }

    /// 吊起集装箱；已持有时原样退回
    pub(crate) fn lift(&mut self, container: Container) -> Result<(), Container> {
        if self.holding.is_some() {
            return Err(container);
        }
        self.holding = Some(container);
        Ok(())
    }

    /// 放下集装箱并复位：可用、计数清零、解除交接
    pub(crate) fn release(&mut self) -> Option<Container> {
        self.available = true;
        self.handling_time = 0;
        self.engaged_with = None;
        self.holding.take()
    }
}
