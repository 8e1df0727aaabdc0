//! 自动导引车（AGV）
//!
//! AGV 每次只运一个集装箱，在岸桥与门式吊机之间往返。

use super::container::Container;
use super::id::AgvId;

#[derive(Debug)]
pub struct Agv {
    id: AgvId,
    location: i64,
    available: bool,
    /// 每分钟移动的位置单位（不参与路径规划）
    speed: u32,
    cargo: Option<Container>,
}

pub const DEFAULT_AGV_SPEED: u32 = 1;

impl Agv {
    pub fn new(id: AgvId, location: i64) -> Self {
        Self {
            id,
            location,
            available: true,
            speed: DEFAULT_AGV_SPEED,
            cargo: None,
        }
    }

    pub fn id(&self) -> AgvId {
        self.id
    }

    pub fn location(&self) -> i64 {
        self.location
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn cargo(&self) -> Option<&Container> {
        self.cargo.as_ref()
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub(crate) fn set_location(&mut self, location: i64) {
        self.location = location;
    }

    /// 装上集装箱；已载货时原样退回
    pub(crate) fn load(&mut self, container: Container) -> Result<(), Container> {
        if self.cargo.is_some() {
            return Err(container);
        }
        self.cargo = Some(container);
        Ok(())
    }

    pub(crate) fn unload(&mut self) -> Option<Container> {
        self.cargo.take()
    }
}
