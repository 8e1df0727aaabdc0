//! 资源池：泊位、岸桥与 AGV 的可用性查询
//!
//! 资源不足不是错误：查询返回 `None`，请求方在后续 tick 重试。
//! 只有“完全没有配置某类资源”才是致命的配置错误。

use tracing::trace;

use super::harbor::Harbor;
use crate::error::HarborError;
use crate::model::{Agv, AgvId, Dock, DockId, SizeClass};

impl Harbor {
    pub(crate) fn add_dock(&mut self, size: SizeClass, cranes: usize) -> DockId {
        let id = DockId(self.docks.len());
        self.docks.push(Dock::new(id, size, cranes));
        id
    }

    pub(crate) fn add_agv(&mut self, location: i64) -> AgvId {
        let id = AgvId(self.agvs.len());
        self.agvs.push(Agv::new(id, location));
        id
    }

    /// 适配 `size` 的空闲泊位；多个候选时取尺寸最小者（同尺寸取最先配置的）
    pub fn available_dock_of_size(&self, size: SizeClass) -> Option<DockId> {
        let found = self
            .docks
            .iter()
            .filter(|d| d.is_available() && size.fits_dock(d.size()))
            .min_by_key(|d| d.size())
            .map(Dock::id);
        trace!(?size, ?found, "查找空闲泊位");
        found
    }

    /// 第一辆空闲 AGV
    pub fn available_agv(&self) -> Option<AgvId> {
        self.agvs.iter().find(|a| a.is_available()).map(Agv::id)
    }

    /// 运行前校验：泊位、AGV、船舶都不能为空
    pub fn validate_resources(&self) -> Result<(), HarborError> {
        if self.docks.is_empty() {
            return Err(HarborError::EmptyResource("docks"));
        }
        if self.agvs.is_empty() {
            return Err(HarborError::EmptyResource("AGVs"));
        }
        if self.ships.is_empty() {
            return Err(HarborError::EmptyResource("ships"));
        }
        Ok(())
    }
}
