//! 装卸计划与转运作业
//!
//! 计划条目在时刻匹配时变为船舶的转运作业；作业逐个集装箱地驱动转运管线，
//! 每个 tick 只调用一次管线操作。资源不足时作业停在原阶段等待下个 tick。

use tracing::{debug, error, info, warn};

use super::harbor::Harbor;
use super::notify::HarborEvent;
use super::transport::TransferStep;
use crate::error::HarborError;
use crate::model::{
    AgvId, ColumnId, CraneId, DockId, HandlingKind, Recurrence, ScheduledHandling, ShipId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobStage {
    Idle,
    /// 船 -> AGV
    Lifting { crane: CraneId, agv: AgvId },
    /// AGV -> 堆场；列在首次找到空间时确定
    Hauling { agv: AgvId, column: Option<ColumnId> },
    /// 堆场 -> AGV
    Retrieving { column: ColumnId, agv: AgvId },
    /// AGV -> 船；岸桥在 AGV 载货后再挑选
    Delivering { agv: AgvId, crane: Option<CraneId> },
}

/// 一艘船的一次装/卸作业
#[derive(Debug, Clone)]
pub(crate) struct TransferJob {
    kind: HandlingKind,
    start: ColumnId,
    end: ColumnId,
    remaining: u32,
    stage: JobStage,
}

impl TransferJob {
    fn new(entry: &ScheduledHandling, count: u32) -> Self {
        Self {
            kind: entry.kind,
            start: entry.start,
            end: entry.end,
            remaining: count,
            stage: JobStage::Idle,
        }
    }

    pub(crate) fn kind(&self) -> HandlingKind {
        self.kind
    }
}

impl Harbor {
    /// 登记装卸计划；数量为零、列范围非法或与已有条目重复时拒绝
    pub fn schedule_handling(
        &mut self,
        ship: ShipId,
        entry: ScheduledHandling,
    ) -> Result<(), HarborError> {
        let s = self.ship_ref(ship)?;
        if entry.count == 0 {
            return Err(HarborError::InvalidCount {
                what: "handling container",
                count: 0,
            });
        }
        self.storage.check_range(entry.start, entry.end)?;
        if s.handlings().iter().any(|h| h.duplicates(&entry)) {
            return Err(HarborError::DuplicateHandling(s.name().to_string()));
        }
        debug!(ship = %s.name(), at = %entry.at, kind = ?entry.kind, "登记装卸计划");
        self.ships[ship.0].handlings.push(entry);
        Ok(())
    }

    /// 装卸计划阶段：时刻匹配的条目转为作业，一次性条目随即移除
    pub(crate) fn evaluate_handlings(&mut self) {
        let now = self.now();
        for idx in 0..self.ships.len() {
            let ship = &mut self.ships[idx];
            if ship.handlings.is_empty() {
                continue;
            }
            let due: Vec<ScheduledHandling> = ship
                .handlings
                .iter()
                .filter(|h| h.is_due(now))
                .copied()
                .collect();
            if due.is_empty() {
                continue;
            }
            ship.handlings
                .retain(|h| !(h.recurrence == Recurrence::Once && h.is_due(now)));
            for entry in due {
                self.start_handling(ShipId(idx), entry);
            }
        }
        self.refresh_docked_states();
    }

    fn start_handling(&mut self, ship: ShipId, entry: ScheduledHandling) {
        let verb = match entry.kind {
            HandlingKind::Unload => "unloading",
            HandlingKind::Load => "loading",
        };
        let s = &self.ships[ship.0];
        if !s.state().is_docked() {
            warn!(ship = %s.name(), at = %entry.at, "船舶未靠泊，装卸计划错过");
            self.record_ship_event(ship, &format!("missed scheduled {verb} (not docked)"));
            return;
        }

        let count = match entry.kind {
            HandlingKind::Unload => {
                let n = entry.count.min(s.container_count() as u32);
                let needed: u64 = s
                    .containers()
                    .take(n as usize)
                    .map(|c| c.space_weight() as u64)
                    .sum();
                let free = self.storage.free_space_in(entry.start, entry.end);
                if free < needed {
                    let err = HarborError::InsufficientSpace {
                        column: entry.start,
                        free: free.min(u32::MAX as u64) as u32,
                        requested: needed.min(u32::MAX as u64) as u32,
                    };
                    warn!(ship = %s.name(), %err, "堆场空间不足，卸货计划跳过");
                    self.record_ship_event(ship, &format!("skipped {verb}: {err}"));
                    return;
                }
                n
            }
            HandlingKind::Load => entry.count,
        };

        info!(ship = %s.name(), count, kind = ?entry.kind, "📦 开始装卸作业");
        self.jobs[ship.0].push_back(TransferJob::new(&entry, count));
        self.stats.jobs_started += 1;
        self.record_ship_event(
            ship,
            &format!(
                "started {verb} {count} containers via columns {}..={}",
                entry.start.0, entry.end.0
            ),
        );
    }

    /// 转运阶段：每艘靠泊船舶推进其队首作业
    pub(crate) fn run_transfers(&mut self) {
        for id in self.docked.clone() {
            let Some(mut job) = self.jobs.get_mut(id.0).and_then(|q| q.pop_front()) else {
                continue;
            };
            match self.step_job(id, &mut job) {
                Ok(true) => self.finish_job(id, &job),
                Ok(false) => self.jobs[id.0].push_front(job),
                Err(e) => {
                    error!(ship = %self.ships[id.0].name(), error = %e, "转运作业中止");
                    self.abandon_stage(job.stage);
                    self.record_ship_event(id, &format!("aborted handling: {e}"));
                }
            }
        }
        self.refresh_docked_states();
    }

    fn finish_job(&mut self, ship: ShipId, job: &TransferJob) {
        self.stats.jobs_completed += 1;
        let name = self.ships[ship.0].name().to_string();
        let at = self.now();
        let event = match job.kind {
            HandlingKind::Unload => {
                self.record_ship_event(ship, "completed unloading");
                HarborEvent::ShipCompletedUnloading { ship, name, at }
            }
            HandlingKind::Load => {
                self.record_ship_event(ship, "completed loading");
                HarborEvent::ShipCompletedLoading { ship, name, at }
            }
        };
        info!(ship = ship.0, kind = ?job.kind, "✅ 装卸作业完成");
        self.emit(event);
    }

    /// 推进一个作业一步；返回作业是否结束
    fn step_job(&mut self, ship: ShipId, job: &mut TransferJob) -> Result<bool, HarborError> {
        let dock = self.ships[ship.0].docked_at().ok_or_else(|| {
            HarborError::InvalidState(format!(
                "ship `{}` has a transfer job but is not docked",
                self.ships[ship.0].name()
            ))
        })?;
        loop {
            match job.stage {
                JobStage::Idle => {
                    if job.remaining == 0 {
                        return Ok(true);
                    }
                    match job.kind {
                        HandlingKind::Unload => {
                            if self.ships[ship.0].container_count() == 0 {
                                debug!("船上已无集装箱，卸货提前结束");
                                return Ok(true);
                            }
                            let Some(crane) = self.free_crane(dock) else {
                                return Ok(false);
                            };
                            let Some(agv) = self.available_agv() else {
                                debug!("没有空闲 AGV，推迟");
                                return Ok(false);
                            };
                            job.stage = JobStage::Lifting { crane, agv };
                        }
                        HandlingKind::Load => {
                            let Some(column) = self.storage.first_nonempty_in(job.start, job.end)
                            else {
                                warn!(
                                    start = job.start.0,
                                    end = job.end.0,
                                    "列范围内没有集装箱，装货提前结束"
                                );
                                return Ok(true);
                            };
                            let Some(agv) = self.available_agv() else {
                                debug!("没有空闲 AGV，推迟");
                                return Ok(false);
                            };
                            job.stage = JobStage::Retrieving { column, agv };
                        }
                    }
                }
                JobStage::Lifting { crane, agv } => {
                    match self.ship_to_agv(ship, crane, agv) {
                        Ok(TransferStep::Done) => {
                            job.stage = JobStage::Hauling { agv, column: None };
                        }
                        Ok(_) => {}
                        // 吊运途中船被提空（例如卡车提箱）；岸桥与 AGV 已由转运复位
                        Err(HarborError::ShipHasNoContainers(_)) => {
                            debug!("船上已无集装箱，卸货提前结束");
                            job.stage = JobStage::Idle;
                            return Ok(true);
                        }
                        Err(e) => return Err(e),
                    }
                    return Ok(false);
                }
                JobStage::Hauling { agv, column } => {
                    let column = match column {
                        Some(column) => column,
                        None => {
                            let weight = self.agvs[agv.0]
                                .cargo()
                                .map(|c| c.space_weight())
                                .ok_or(HarborError::AgvEmpty(agv))?;
                            match self
                                .storage
                                .placement_column(job.start, job.start, job.end, weight)
                            {
                                Ok(column) => column,
                                Err(e @ HarborError::InsufficientSpace { .. }) => {
                                    warn!(error = %e, "堆场空间不足，AGV 等待");
                                    return Ok(false);
                                }
                                Err(e) => return Err(e),
                            }
                        }
                    };
                    job.stage = JobStage::Hauling {
                        agv,
                        column: Some(column),
                    };
                    match self.agv_to_storage(agv, column) {
                        Ok(TransferStep::Done) => {
                            job.remaining -= 1;
                            job.stage = JobStage::Idle;
                            return Ok(job.remaining == 0);
                        }
                        Ok(_) => return Ok(false),
                        Err(HarborError::InsufficientSpace { .. }) => {
                            self.release_portal_for(column, agv);
                            job.stage = JobStage::Hauling { agv, column: None };
                            return Ok(false);
                        }
                        Err(e) => return Err(e),
                    }
                }
                JobStage::Retrieving { column, agv } => {
                    match self.storage_to_agv(column, agv) {
                        Ok(TransferStep::Done) => {
                            job.stage = JobStage::Delivering { agv, crane: None };
                        }
                        Ok(_) => {}
                        Err(HarborError::NoContainerAvailable(_)) => {
                            self.release_portal_for(column, agv);
                            self.agvs[agv.0].set_available(true);
                            job.stage = JobStage::Idle;
                        }
                        Err(e) => return Err(e),
                    }
                    return Ok(false);
                }
                JobStage::Delivering { agv, crane } => {
                    let crane = match crane {
                        Some(crane) => crane,
                        None => match self.free_crane(dock) {
                            Some(crane) => crane,
                            None => return Ok(false),
                        },
                    };
                    job.stage = JobStage::Delivering {
                        agv,
                        crane: Some(crane),
                    };
                    if self.agv_to_ship(agv, crane, ship)? == TransferStep::Done {
                        job.remaining -= 1;
                        job.stage = JobStage::Idle;
                        return Ok(job.remaining == 0);
                    }
                    return Ok(false);
                }
            }
        }
    }

    fn free_crane(&self, dock: DockId) -> Option<CraneId> {
        self.docks[dock.0]
            .free_crane()
            .map(|index| CraneId { dock, index })
    }

    /// 作业中止时归还当前阶段占用的吊机；仍载货的 AGV 保持占用
    fn abandon_stage(&mut self, stage: JobStage) {
        match stage {
            JobStage::Idle => {}
            JobStage::Lifting { crane, agv }
            | JobStage::Delivering {
                agv,
                crane: Some(crane),
            } => self.release_crane_for(crane, agv),
            JobStage::Retrieving { column, agv }
            | JobStage::Hauling {
                agv,
                column: Some(column),
            } => self.release_portal_for(column, agv),
            JobStage::Hauling { column: None, .. } | JobStage::Delivering { crane: None, .. } => {}
        }
    }
}
