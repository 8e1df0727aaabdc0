//! 船舶生命周期
//!
//! 状态流转：Waiting -> Docked(Unloading/Loading) -> ReadyToSail -> Sailing -> Waiting。
//! 等待队列采用出队再入队的重试方式：没有合适泊位的船回到队尾，不阻塞后续船舶。

use tracing::{debug, info};

use super::harbor::Harbor;
use super::notify::HarborEvent;
use crate::error::HarborError;
use crate::model::{DockId, HandlingKind, ShipId, ShipState};

impl Harbor {
    /// 将船舶放入等待队列。
    ///
    /// 队列中已有同名船舶时不做任何事并返回 `Ok(false)`。
    #[tracing::instrument(skip(self), fields(ship = ship.0))]
    pub fn admit(&mut self, ship: ShipId) -> Result<bool, HarborError> {
        let s = self.ship_ref(ship)?;
        let name = s.name().to_string();
        if self
            .waiting
            .iter()
            .any(|id| self.ships[id.0].name() == name)
        {
            debug!(%name, "已在等待队列中，忽略");
            return Ok(false);
        }
        if s.state().is_docked() {
            return Err(HarborError::InvalidState(format!(
                "ship `{name}` is docked and cannot be queued"
            )));
        }
        if s.is_sailing() && !s.has_reached_destination() {
            return Err(HarborError::InvalidState(format!(
                "ship `{name}` is still at sea"
            )));
        }

        self.sailing.retain(|id| *id != ship);
        self.waiting.push_back(ship);
        self.ships[ship.0].set_state(ShipState::Waiting);
        self.record_ship_event(ship, "entered the waiting queue");
        self.stats.arrivals += 1;
        info!(%name, queue_len = self.waiting.len(), "⚓ 船舶进入等待队列");

        let at = self.now();
        self.emit(HarborEvent::ShipArrived { ship, name, at });
        Ok(true)
    }

    /// 推进所有航行中船舶的航程
    pub(crate) fn advance_voyages(&mut self, minutes: f64) {
        if minutes <= 0.0 {
            return;
        }
        let sailing = self.sailing.clone();
        for id in sailing {
            if self.ships[id.0].advance_voyage(minutes) {
                let location = self.ships[id.0].location();
                info!(ship = %self.ships[id.0].name(), location, "🏁 船舶抵达目的地");
                self.record_ship_event(id, &format!("reached destination {location}"));
            }
        }
    }

    /// 排队阶段：新建船舶与已抵达目的地的船舶进入等待队列
    pub(crate) fn admit_arrivals(&mut self) {
        let pending: Vec<ShipId> = self
            .ships
            .iter()
            .filter(|s| {
                s.state() == ShipState::Idle || (s.is_sailing() && s.has_reached_destination())
            })
            .map(|s| s.id())
            .collect();
        for id in pending {
            // 上面已筛选出可入队的船舶
            let _ = self.admit(id);
        }
    }

    /// 靠泊阶段：每艘等待中的船尝试一次
    pub(crate) fn dock_waiting_ships(&mut self) {
        let rounds = self.waiting.len();
        for _ in 0..rounds {
            let Some(id) = self.waiting.pop_front() else {
                break;
            };
            let ship = &self.ships[id.0];
            let dock = if ship.is_sailing() {
                None
            } else {
                self.available_dock_of_size(ship.size())
            };
            match dock {
                Some(dock) => self.dock_ship(id, dock),
                None => self.waiting.push_back(id),
            }
        }
    }

    fn dock_ship(&mut self, ship: ShipId, dock: DockId) {
        self.docks[dock.0].occupy(ship);
        self.ships[ship.0].dock_at(dock);
        self.docked.push(ship);
        self.stats.dockings += 1;
        self.record_ship_event(ship, &format!("docked at {dock}"));
        info!(ship = %self.ships[ship.0].name(), dock = dock.0, "🚢 船舶靠泊");
    }

    /// 离泊：释放泊位与岸桥，从靠泊列表移除
    pub(crate) fn undock_ship(&mut self, ship: ShipId) {
        self.docked.retain(|id| *id != ship);
        if let Some(dock) = self.ships[ship.0].undock() {
            self.docks[dock.0].vacate();
            self.record_ship_event(ship, &format!("left {dock}"));
        }
    }

    /// 靠泊船舶的状态：有作业时为装/卸，否则为就绪
    pub(crate) fn refresh_docked_states(&mut self) {
        for id in self.docked.clone() {
            let state = match self.jobs.get(id.0).and_then(|q| q.front()) {
                Some(job) if job.kind() == HandlingKind::Unload => ShipState::Unloading,
                Some(_) => ShipState::Loading,
                None => ShipState::ReadyToSail,
            };
            let ship = &mut self.ships[id.0];
            if ship.state() != state {
                debug!(ship = %ship.name(), from = ?ship.state(), to = ?state, "船舶状态变化");
                ship.set_state(state);
            }
        }
    }
}
