//! 实体构建
//!
//! 运行开始前批量创建泊位、船舶、AGV 与存储列。所有参数先校验再写入，
//! 任何一项失败都不会留下部分创建的实体。

use std::collections::VecDeque;
use tracing::info;

use super::harbor::Harbor;
use crate::error::HarborError;
use crate::model::{
    AgvId, ColumnId, ContainerSize, DockId, Ship, ShipId, ShipModel, SizeClass,
};

fn positive(what: &'static str, count: i64) -> Result<u32, HarborError> {
    if count <= 0 || count > u32::MAX as i64 {
        return Err(HarborError::InvalidCount { what, count });
    }
    Ok(count as u32)
}

impl Harbor {
    /// 创建 `count` 个同尺寸泊位，每个泊位 `cranes_per_dock` 台岸桥
    pub fn initialize_docks(
        &mut self,
        count: i64,
        size: SizeClass,
        cranes_per_dock: i64,
    ) -> Result<Vec<DockId>, HarborError> {
        let count = positive("dock", count)?;
        let cranes = positive("crane per dock", cranes_per_dock)?;
        let ids = (0..count)
            .map(|_| self.add_dock(size, cranes as usize))
            .collect::<Vec<_>>();
        info!(count, ?size, cranes, "创建泊位");
        Ok(ids)
    }

    /// 创建 `count` 艘同型船，每艘装载 `container_count` 个集装箱
    pub fn initialize_ships(
        &mut self,
        start_location: i64,
        count: i64,
        model: ShipModel,
        size: SizeClass,
        container_count: i64,
        container_size: ContainerSize,
    ) -> Result<Vec<ShipId>, HarborError> {
        let count = positive("ship", count)?;
        if container_count < 0 {
            return Err(HarborError::InvalidCount {
                what: "container",
                count: container_count,
            });
        }
        self.check_location(start_location)?;
        let first = self.ships.len() + 1;
        let names: Vec<String> = (first..first + count as usize)
            .map(|n| format!("Ship {n}"))
            .collect();
        if let Some(taken) = names.iter().find(|n| self.ship_by_name(n).is_some()) {
            return Err(HarborError::InvalidArgument(format!(
                "ship name `{taken}` is already taken"
            )));
        }
        let mut ids = Vec::with_capacity(count as usize);
        for name in names {
            let id = self.add_ship(name, model, size, start_location)?;
            self.load_new_containers(id, container_count as u32, container_size)?;
            ids.push(id);
        }
        info!(count, ?model, ?size, container_count, "创建船舶");
        Ok(ids)
    }

    /// 创建一艘具名船舶；船名必须唯一
    pub fn add_ship(
        &mut self,
        name: impl Into<String>,
        model: ShipModel,
        size: SizeClass,
        location: i64,
    ) -> Result<ShipId, HarborError> {
        let name = name.into();
        self.check_location(location)?;
        if self.ship_by_name(&name).is_some() {
            return Err(HarborError::InvalidArgument(format!(
                "ship name `{name}` is already taken"
            )));
        }
        let id = ShipId(self.ships.len());
        self.ships.push(Ship::new(id, name, model, size, location));
        self.jobs.push(VecDeque::new());
        Ok(id)
    }

    /// 为船舶新造 `count` 个集装箱并装船
    pub fn load_new_containers(
        &mut self,
        ship: ShipId,
        count: u32,
        size: ContainerSize,
    ) -> Result<(), HarborError> {
        self.ship_ref(ship)?;
        for _ in 0..count {
            let container = self.new_container(size);
            self.ships[ship.0].containers.push_back(container);
        }
        Ok(())
    }

    /// 在 `location` 创建 `count` 辆 AGV
    pub fn initialize_agvs(
        &mut self,
        count: i64,
        location: i64,
    ) -> Result<Vec<AgvId>, HarborError> {
        let count = positive("AGV", count)?;
        self.check_location(location)?;
        let ids = (0..count)
            .map(|_| self.add_agv(location))
            .collect::<Vec<_>>();
        info!(count, location, "创建 AGV");
        Ok(ids)
    }

    /// 在每个长列位置创建 `long_count` 个长列，在每个短列位置创建 `short_count` 个短列
    #[allow(clippy::too_many_arguments)]
    pub fn initialize_storage_columns(
        &mut self,
        long_locations: &[i64],
        short_locations: &[i64],
        long_length: i64,
        short_length: i64,
        long_count: i64,
        short_count: i64,
        width: i64,
        height: i64,
    ) -> Result<Vec<ColumnId>, HarborError> {
        let long_count = positive("long column", long_count)?;
        let short_count = positive("short column", short_count)?;
        let long_length = positive("long column length", long_length)?;
        let short_length = positive("short column length", short_length)?;
        let width = positive("column width", width)?;
        let height = positive("column height", height)?;
        let (start, end) = self.storage.location_range();
        if let Some(&location) = long_locations
            .iter()
            .chain(short_locations)
            .find(|l| **l < start || **l > end)
        {
            return Err(HarborError::LocationOutOfRange {
                location,
                start,
                end,
            });
        }

        let mut ids = Vec::new();
        let groups = [
            (long_locations, long_length, long_count),
            (short_locations, short_length, short_count),
        ];
        for (locations, length, count) in groups {
            for &location in locations {
                for _ in 0..count {
                    ids.push(self.storage.add_column(location, length, width, height)?);
                }
            }
        }
        info!(columns = ids.len(), capacity = self.storage.capacity(), "创建存储列");
        Ok(ids)
    }
}
