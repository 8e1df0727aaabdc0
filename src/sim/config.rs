use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::simulator::{DEFAULT_STEP_MINUTES, Simulator};
use super::time::SimTime;
use crate::error::HarborError;
use crate::harbor::Harbor;
use crate::model::{
    ColumnId, ContainerSize, ContainerStorage, HandlingKind, Recurrence, ScheduledHandling,
    ScheduledSailing, ShipModel, SizeClass,
};

/// 一次港口仿真运行的完整描述（JSON）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarborSpec {
    pub name: String,
    pub location_start: i64,
    pub location_end: i64,
    pub start: SimTime,
    pub end: SimTime,
    /// 每个 tick 的分钟数，默认 1
    #[serde(default)]
    pub step_minutes: Option<i64>,
    pub storage: StorageSpec,
    pub docks: Vec<DockGroupSpec>,
    pub ships: Vec<ShipGroupSpec>,
    pub agvs: Vec<AgvGroupSpec>,
    #[serde(default)]
    pub sailings: Vec<SailingSpec>,
    #[serde(default)]
    pub handlings: Vec<HandlingSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSpec {
    pub name: String,
    pub location_start: i64,
    pub location_end: i64,
    pub long_locations: Vec<i64>,
    #[serde(default)]
    pub short_locations: Vec<i64>,
    pub long_length: i64,
    pub short_length: i64,
    pub long_count: i64,
    pub short_count: i64,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockGroupSpec {
    pub count: i64,
    pub size: SizeClass,
    pub cranes_per_dock: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipGroupSpec {
    pub start_location: i64,
    pub count: i64,
    pub model: ShipModel,
    pub size: SizeClass,
    #[serde(default)]
    pub container_count: i64,
    #[serde(default = "default_container_size")]
    pub container_size: ContainerSize,
}

fn default_container_size() -> ContainerSize {
    ContainerSize::Small
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgvGroupSpec {
    pub count: i64,
    pub location: i64,
}

/// 航行计划，按船名指定船舶
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SailingSpec {
    pub ship: String,
    pub at: SimTime,
    pub destination: i64,
    #[serde(default)]
    pub recurrence: Recurrence,
}

/// 装卸计划，按船名指定船舶
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlingSpec {
    pub ship: String,
    pub at: SimTime,
    pub start_column: usize,
    pub end_column: usize,
    pub count: u32,
    pub kind: HandlingKind,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl HarborSpec {
    pub fn from_json(raw: &str) -> Result<Self, HarborError> {
        serde_json::from_str(raw).map_err(|e| HarborError::Config(e.to_string()))
    }

    /// 构建港口与仿真器；任何配置错误都会中止构建
    pub fn build(&self) -> Result<(Harbor, Simulator), HarborError> {
        if self.end < self.start {
            return Err(HarborError::Config(format!(
                "end {} is before start {}",
                self.end, self.start
            )));
        }
        let step_minutes = self.step_minutes.unwrap_or(DEFAULT_STEP_MINUTES);
        if step_minutes <= 0 {
            return Err(HarborError::InvalidCount {
                what: "step minute",
                count: step_minutes,
            });
        }

        let st = &self.storage;
        let storage = ContainerStorage::new(&st.name, st.location_start, st.location_end)?;
        let mut harbor = Harbor::new(
            &self.name,
            self.location_start,
            self.location_end,
            storage,
            self.start,
        )?;
        harbor.initialize_storage_columns(
            &st.long_locations,
            &st.short_locations,
            st.long_length,
            st.short_length,
            st.long_count,
            st.short_count,
            st.width,
            st.height,
        )?;
        for d in &self.docks {
            harbor.initialize_docks(d.count, d.size, d.cranes_per_dock)?;
        }
        for s in &self.ships {
            harbor.initialize_ships(
                s.start_location,
                s.count,
                s.model,
                s.size,
                s.container_count,
                s.container_size,
            )?;
        }
        for a in &self.agvs {
            harbor.initialize_agvs(a.count, a.location)?;
        }
        harbor.validate_resources()?;

        for s in &self.sailings {
            let ship = harbor.ship_id_by_name(&s.ship)?;
            harbor.schedule_sailing(
                ship,
                ScheduledSailing::new(s.at, s.destination, s.recurrence),
            )?;
        }
        for h in &self.handlings {
            let ship = harbor.ship_id_by_name(&h.ship)?;
            harbor.schedule_handling(
                ship,
                ScheduledHandling::new(
                    h.at,
                    ColumnId(h.start_column),
                    ColumnId(h.end_column),
                    h.count,
                    h.kind,
                    h.recurrence,
                ),
            )?;
        }

        let sim = Simulator::new(self.start, self.end)
            .with_step(Duration::minutes(step_minutes));
        Ok((harbor, sim))
    }
}
