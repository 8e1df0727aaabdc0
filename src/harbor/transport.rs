//! 集装箱转运管线
//!
//! 四个方向（船->AGV、AGV->堆场、堆场->AGV、AGV->船）都是两阶段协议：
//! 1. 累计阶段：吊机作业时间低于阈值时每次调用加一，不转移任何集装箱，
//!    吊机对其他 AGV 不可用；
//! 2. 完成阶段：到达阈值后一次性转移所有权、写入历史、复位吊机。
//!
//! 每次调用代表一个 tick 内对该吊机的唯一一次写入。

use tracing::{debug, trace};

use super::harbor::Harbor;
use crate::error::HarborError;
use crate::model::{
    AgvId, ColumnId, Container, CraneId, PORTAL_CRANE_PLACE_TICKS, PORTAL_CRANE_RETRIEVE_TICKS,
    SHIP_CRANE_HANDLING_TICKS, ShipId,
};

/// 单次转运调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    /// 累计中：已累计 `elapsed` / `threshold` 个 tick
    Pending { elapsed: u32, threshold: u32 },
    /// 吊机或 AGV 正被其他请求占用，下个 tick 重试
    Blocked,
    /// 所有权已转移
    Done,
}

impl Harbor {
    fn check_ship_at_crane(&self, ship: ShipId, crane: CraneId) -> Result<(), HarborError> {
        let s = self.ship_ref(ship)?;
        if s.docked_at() != Some(crane.dock) {
            return Err(HarborError::InvalidState(format!(
                "ship `{}` is not docked at {}",
                s.name(),
                crane.dock
            )));
        }
        let dock = self
            .docks
            .get(crane.dock.0)
            .ok_or(HarborError::UnknownDock(crane.dock))?;
        let c = dock
            .cranes()
            .get(crane.index)
            .ok_or(HarborError::UnknownCrane {
                dock: crane.dock,
                index: crane.index,
            })?;
        if c.holding().is_some() {
            return Err(HarborError::ResourceMisuse(format!(
                "{crane} already holds a container"
            )));
        }
        Ok(())
    }

    /// 船 -> 岸桥 -> AGV
    #[tracing::instrument(skip(self), fields(ship = ship.0, agv = agv.0))]
    pub fn ship_to_agv(
        &mut self,
        ship: ShipId,
        crane: CraneId,
        agv: AgvId,
    ) -> Result<TransferStep, HarborError> {
        self.check_ship_at_crane(ship, crane)?;
        if self.ships[ship.0].container_count() == 0 {
            self.release_crane_for(crane, agv);
            let name = self.ships[ship.0].name().to_string();
            return Err(HarborError::ShipHasNoContainers(name));
        }
        let a = self.agvs.get(agv.0).ok_or(HarborError::UnknownAgv(agv))?;
        if a.cargo().is_some() {
            return Err(HarborError::ResourceMisuse(format!(
                "{agv} already carries a container"
            )));
        }
        let c = &self.docks[crane.dock.0].cranes()[crane.index];
        if !c.can_serve(agv) || (!a.is_available() && c.engaged_with() != Some(agv)) {
            trace!("岸桥或 AGV 被占用");
            return Ok(TransferStep::Blocked);
        }

        let now = self.now();
        let Some(c) = self.docks[crane.dock.0].crane_mut(crane.index) else {
            return Err(HarborError::UnknownCrane {
                dock: crane.dock,
                index: crane.index,
            });
        };
        c.engage(agv);
        self.agvs[agv.0].set_available(false);
        if !c.accumulate(SHIP_CRANE_HANDLING_TICKS) {
            trace!(elapsed = c.handling_time(), "岸桥累计作业时间");
            return Ok(TransferStep::Pending {
                elapsed: c.handling_time(),
                threshold: SHIP_CRANE_HANDLING_TICKS,
            });
        }

        let ship_ref = &mut self.ships[ship.0];
        let Some(container) = ship_ref.containers.pop_front() else {
            c.release();
            self.agvs[agv.0].set_available(true);
            return Err(HarborError::ShipHasNoContainers(ship_ref.name().to_string()));
        };
        if let Err(container) = c.lift(container) {
            ship_ref.containers.push_front(container);
            return Err(HarborError::ResourceMisuse(format!(
                "{crane} already holds a container"
            )));
        }
        let Some(mut container) = c.release() else {
            return Err(HarborError::InvalidState(format!("{crane} dropped its container")));
        };
        container.record_move(now, ship_ref.name(), &agv.to_string());
        debug!(container = %container, "船 -> AGV 完成");
        self.load_agv(agv, container)?;
        self.stats.containers_moved += 1;
        Ok(TransferStep::Done)
    }

    /// AGV -> 门式吊机 -> 存储列
    #[tracing::instrument(skip(self), fields(agv = agv.0, column = column.0))]
    pub fn agv_to_storage(
        &mut self,
        agv: AgvId,
        column: ColumnId,
    ) -> Result<TransferStep, HarborError> {
        let a = self.agvs.get(agv.0).ok_or(HarborError::UnknownAgv(agv))?;
        let weight = a
            .cargo()
            .map(Container::space_weight)
            .ok_or(HarborError::AgvEmpty(agv))?;
        let col = self
            .storage
            .column(column)
            .ok_or(HarborError::UnknownColumn(column))?;
        let portal = col.portal_crane();
        if portal.holding().is_some() {
            return Err(HarborError::ResourceMisuse(format!(
                "portal crane of {column} already holds a container"
            )));
        }
        if col.free_space() < weight {
            return Err(HarborError::InsufficientSpace {
                column,
                free: col.free_space(),
                requested: weight,
            });
        }
        if !portal.can_serve(agv) {
            trace!("门式吊机被占用");
            return Ok(TransferStep::Blocked);
        }

        let now = self.now();
        let Some(col) = self.storage.column_mut(column) else {
            return Err(HarborError::UnknownColumn(column));
        };
        let location = col.location();
        let portal = col.portal_crane_mut();
        portal.engage(agv);
        if !portal.accumulate(PORTAL_CRANE_PLACE_TICKS) {
            trace!(elapsed = portal.handling_time(), "门式吊机累计放箱时间");
            return Ok(TransferStep::Pending {
                elapsed: portal.handling_time(),
                threshold: PORTAL_CRANE_PLACE_TICKS,
            });
        }

        let agv_ref = &mut self.agvs[agv.0];
        let Some(container) = agv_ref.unload() else {
            portal.release();
            return Err(HarborError::AgvEmpty(agv));
        };
        if let Err(container) = portal.lift(container) {
            let _ = agv_ref.load(container);
            return Err(HarborError::ResourceMisuse(format!(
                "portal crane of {column} already holds a container"
            )));
        }
        let Some(mut container) = portal.release() else {
            return Err(HarborError::InvalidState(format!(
                "portal crane of {column} dropped its container"
            )));
        };
        container.record_move(now, &agv.to_string(), &column.to_string());
        debug!(container = %container, "AGV -> 堆场完成");
        if let Err(mut container) = col.store(container) {
            container.undo_last_move();
            let err = HarborError::CapacityExceeded {
                column,
                occupied: col.occupied_space(),
                capacity: col.capacity(),
                requested: container.space_weight(),
            };
            let _ = agv_ref.load(container);
            return Err(err);
        }
        agv_ref.set_location(location);
        agv_ref.set_available(true);
        self.stats.containers_moved += 1;
        Ok(TransferStep::Done)
    }

    /// 存储列 -> 门式吊机 -> AGV
    ///
    /// 空列立即报错，AGV 的可用性保持不变。
    #[tracing::instrument(skip(self), fields(column = column.0, agv = agv.0))]
    pub fn storage_to_agv(
        &mut self,
        column: ColumnId,
        agv: AgvId,
    ) -> Result<TransferStep, HarborError> {
        let col = self
            .storage
            .column(column)
            .ok_or(HarborError::UnknownColumn(column))?;
        if col.is_empty() {
            self.release_portal_for(column, agv);
            return Err(HarborError::NoContainerAvailable(column));
        }
        let a = self.agvs.get(agv.0).ok_or(HarborError::UnknownAgv(agv))?;
        if a.cargo().is_some() {
            return Err(HarborError::ResourceMisuse(format!(
                "{agv} already carries a container"
            )));
        }
        let portal = col.portal_crane();
        if portal.holding().is_some() {
            return Err(HarborError::ResourceMisuse(format!(
                "portal crane of {column} already holds a container"
            )));
        }
        if !portal.can_serve(agv) || (!a.is_available() && portal.engaged_with() != Some(agv)) {
            trace!("门式吊机或 AGV 被占用");
            return Ok(TransferStep::Blocked);
        }

        let now = self.now();
        let Some(col) = self.storage.column_mut(column) else {
            return Err(HarborError::UnknownColumn(column));
        };
        col.portal_crane_mut().engage(agv);
        self.agvs[agv.0].set_available(false);
        let portal = col.portal_crane_mut();
        if !portal.accumulate(PORTAL_CRANE_RETRIEVE_TICKS) {
            trace!(elapsed = portal.handling_time(), "门式吊机累计取箱时间");
            return Ok(TransferStep::Pending {
                elapsed: portal.handling_time(),
                threshold: PORTAL_CRANE_RETRIEVE_TICKS,
            });
        }

        let container = match col.take_front() {
            Ok(container) => container,
            Err(e) => {
                col.portal_crane_mut().release();
                self.agvs[agv.0].set_available(true);
                return Err(e);
            }
        };
        if let Err(container) = col.portal_crane_mut().lift(container) {
            let _ = col.store(container);
            return Err(HarborError::ResourceMisuse(format!(
                "portal crane of {column} already holds a container"
            )));
        }
        let Some(mut container) = col.portal_crane_mut().release() else {
            return Err(HarborError::InvalidState(format!(
                "portal crane of {column} dropped its container"
            )));
        };
        container.record_move(now, &column.to_string(), &agv.to_string());
        debug!(container = %container, "堆场 -> AGV 完成");
        self.load_agv(agv, container)?;
        self.stats.containers_moved += 1;
        Ok(TransferStep::Done)
    }

    /// AGV -> 岸桥 -> 船
    #[tracing::instrument(skip(self), fields(agv = agv.0, ship = ship.0))]
    pub fn agv_to_ship(
        &mut self,
        agv: AgvId,
        crane: CraneId,
        ship: ShipId,
    ) -> Result<TransferStep, HarborError> {
        let a = self.agvs.get(agv.0).ok_or(HarborError::UnknownAgv(agv))?;
        if a.cargo().is_none() {
            return Err(HarborError::AgvEmpty(agv));
        }
        self.check_ship_at_crane(ship, crane)?;
        let c = &self.docks[crane.dock.0].cranes()[crane.index];
        if !c.can_serve(agv) {
            trace!("岸桥被占用");
            return Ok(TransferStep::Blocked);
        }

        let now = self.now();
        let Some(c) = self.docks[crane.dock.0].crane_mut(crane.index) else {
            return Err(HarborError::UnknownCrane {
                dock: crane.dock,
                index: crane.index,
            });
        };
        c.engage(agv);
        if !c.accumulate(SHIP_CRANE_HANDLING_TICKS) {
            trace!(elapsed = c.handling_time(), "岸桥累计作业时间");
            return Ok(TransferStep::Pending {
                elapsed: c.handling_time(),
                threshold: SHIP_CRANE_HANDLING_TICKS,
            });
        }

        let agv_ref = &mut self.agvs[agv.0];
        let Some(container) = agv_ref.unload() else {
            c.release();
            return Err(HarborError::AgvEmpty(agv));
        };
        if let Err(container) = c.lift(container) {
            let _ = agv_ref.load(container);
            return Err(HarborError::ResourceMisuse(format!(
                "{crane} already holds a container"
            )));
        }
        let Some(mut container) = c.release() else {
            return Err(HarborError::InvalidState(format!("{crane} dropped its container")));
        };
        let ship_ref = &mut self.ships[ship.0];
        container.record_move(now, &agv.to_string(), ship_ref.name());
        debug!(container = %container, "AGV -> 船完成");
        ship_ref.containers.push_back(container);
        agv_ref.set_available(true);
        self.stats.containers_moved += 1;
        Ok(TransferStep::Done)
    }

    /// 放弃交接：岸桥空手且正为 `agv` 累计时复位岸桥，并放回空载的 AGV
    pub(crate) fn release_crane_for(&mut self, crane: CraneId, agv: AgvId) {
        let Some(c) = self
            .docks
            .get_mut(crane.dock.0)
            .and_then(|d| d.crane_mut(crane.index))
        else {
            return;
        };
        if c.engaged_with() == Some(agv) && c.holding().is_none() {
            c.release();
            self.free_empty_agv(agv);
        }
    }

    /// 门式吊机版本的 [`Harbor::release_crane_for`]
    pub(crate) fn release_portal_for(&mut self, column: ColumnId, agv: AgvId) {
        let Some(col) = self.storage.column_mut(column) else {
            return;
        };
        let portal = col.portal_crane_mut();
        if portal.engaged_with() == Some(agv) && portal.holding().is_none() {
            portal.release();
            self.free_empty_agv(agv);
        }
    }

    /// 载货的 AGV 保持占用，空载的恢复可用
    fn free_empty_agv(&mut self, agv: AgvId) {
        if let Some(a) = self.agvs.get_mut(agv.0) {
            if a.cargo().is_none() {
                a.set_available(true);
            }
        }
    }

    fn load_agv(&mut self, agv: AgvId, container: Container) -> Result<(), HarborError> {
        let agv_ref = &mut self.agvs[agv.0];
        agv_ref.set_available(false);
        agv_ref.load(container).map_err(|_| {
            HarborError::ResourceMisuse(format!("{agv} already carries a container"))
        })
    }

    /// 卡车从船上提走 `floor(count * fraction)` 个集装箱（从队首开始）
    pub fn remove_fraction_from_ship(
        &mut self,
        ship: ShipId,
        fraction: f64,
    ) -> Result<Vec<Container>, HarborError> {
        check_fraction(fraction)?;
        self.ship_ref(ship)?;
        let now = self.now();
        let s = &mut self.ships[ship.0];
        let n = (s.container_count() as f64 * fraction).floor() as usize;
        let mut removed = Vec::with_capacity(n);
        for _ in 0..n {
            let Some(mut container) = s.containers.pop_front() else {
                break;
            };
            container.record_move(now, s.name(), "truck");
            removed.push(container);
        }
        debug!(ship = %s.name(), removed = removed.len(), "卡车提箱（船）");
        Ok(removed)
    }

    /// 卡车从存储列提走 `floor(count * fraction)` 个集装箱（从最早存入的开始）
    pub fn remove_fraction_from_column(
        &mut self,
        column: ColumnId,
        fraction: f64,
    ) -> Result<Vec<Container>, HarborError> {
        check_fraction(fraction)?;
        let now = self.now();
        let col = self
            .storage
            .column_mut(column)
            .ok_or(HarborError::UnknownColumn(column))?;
        let n = (col.container_count() as f64 * fraction).floor() as usize;
        let mut removed = Vec::with_capacity(n);
        for _ in 0..n {
            let Ok(mut container) = col.take_front() else {
                break;
            };
            container.record_move(now, &column.to_string(), "truck");
            removed.push(container);
        }
        debug!(column = column.0, removed = removed.len(), "卡车提箱（堆场）");
        Ok(removed)
    }
}

fn check_fraction(fraction: f64) -> Result<(), HarborError> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(HarborError::InvalidArgument(format!(
            "fraction {fraction} is outside [0, 1]"
        )));
    }
    Ok(())
}
