//! 航行计划
//!
//! 每艘船只看最早登记的航行条目。时刻匹配时：就绪则离港，已抵达目的地则回到等待，
//! 否则仅标记“等待出航”。一次性条目在执行后移除，周期条目保留。

use tracing::{debug, info};

use super::harbor::Harbor;
use super::notify::HarborEvent;
use crate::error::HarborError;
use crate::model::{Recurrence, ScheduledSailing, ShipId};

impl Harbor {
    /// 登记航行计划；目的地为负或与已有条目相同时拒绝
    pub fn schedule_sailing(
        &mut self,
        ship: ShipId,
        entry: ScheduledSailing,
    ) -> Result<(), HarborError> {
        let s = self.ship_ref(ship)?;
        if entry.destination < 0 {
            return Err(HarborError::InvalidArgument(format!(
                "destination {} is negative",
                entry.destination
            )));
        }
        if s.sailings().contains(&entry) {
            return Err(HarborError::DuplicateSailing(s.name().to_string()));
        }
        debug!(ship = %s.name(), at = %entry.at, recurrence = ?entry.recurrence, "登记航行计划");
        self.ships[ship.0].sailings.push(entry);
        Ok(())
    }

    /// 航行计划阶段
    pub(crate) fn evaluate_sailings(&mut self) {
        let now = self.now();
        for idx in 0..self.ships.len() {
            let id = ShipId(idx);
            let Some(entry) = self.ships[idx].sailings.first().copied() else {
                continue;
            };
            if !entry.is_due(now) {
                continue;
            }
            let ship = &self.ships[idx];
            if ship.is_ready_to_sail() && !ship.is_sailing() {
                self.depart(id, entry.destination);
                if entry.recurrence == Recurrence::Once {
                    self.ships[idx].sailings.remove(0);
                }
            } else if ship.has_reached_destination() {
                // 抵达后的重新入队；已在队列中时为空操作
                let _ = self.admit(id);
            } else {
                debug!(ship = %ship.name(), state = ?ship.state(), "计划时刻到达但船舶未就绪");
                self.ships[idx].set_waiting_for_sailing(true);
            }
        }
    }

    fn depart(&mut self, ship: ShipId, destination: i64) {
        self.undock_ship(ship);
        self.ships[ship.0].begin_voyage(destination);
        self.sailing.push(ship);
        self.stats.departures += 1;
        self.record_ship_event(ship, &format!("departed for {destination}"));

        let name = self.ships[ship.0].name().to_string();
        info!(%name, destination, "⛵ 船舶离港");
        let at = self.now();
        self.emit(HarborEvent::ShipDeparted { ship, name, at });
    }
}
