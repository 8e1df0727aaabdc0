//! 堆场存储
//!
//! 存储列按空间单位记账：`occupied <= capacity` 且 `occupied` 恒等于列内
//! 集装箱空间权重之和。堆场总量一律由各列求和得到，不单独记账。

use std::collections::VecDeque;

use super::container::Container;
use super::crane::PortalCrane;
use super::id::ColumnId;
use crate::error::HarborError;

#[derive(Debug)]
pub struct StorageColumn {
    id: ColumnId,
    location: i64,
    length: u32,
    width: u32,
    height: u32,
    occupied: u32,
    available: bool,
    containers: VecDeque<Container>,
    portal_crane: PortalCrane,
}

impl StorageColumn {
    pub fn new(id: ColumnId, location: i64, length: u32, width: u32, height: u32) -> Self {
        Self {
            id,
            location,
            length,
            width,
            height,
            occupied: 0,
            available: true,
            containers: VecDeque::new(),
            portal_crane: PortalCrane::new(),
        }
    }

    pub fn id(&self) -> ColumnId {
        self.id
    }

    pub fn location(&self) -> i64 {
        self.location
    }

    /// (长, 宽, 高)
    pub fn dimensions(&self) -> (u32, u32, u32) {
        (self.length, self.width, self.height)
    }

    pub fn capacity(&self) -> u32 {
        self.length
            .saturating_mul(self.width)
            .saturating_mul(self.height)
    }

    pub fn occupied_space(&self) -> u32 {
        self.occupied
    }

    pub fn free_space(&self) -> u32 {
        self.capacity().saturating_sub(self.occupied)
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    pub fn portal_crane(&self) -> &PortalCrane {
        &self.portal_crane
    }

    pub(crate) fn portal_crane_mut(&mut self) -> &mut PortalCrane {
        &mut self.portal_crane
    }

    /// 记入集装箱占用；超出容量时标记不可用并报错，占用保持不变
    pub fn occupy_space(&mut self, container: &Container) -> Result<(), HarborError> {
        let requested = container.space_weight();
        let next = self.occupied.saturating_add(requested);
        if next > self.capacity() {
            self.available = false;
            return Err(HarborError::CapacityExceeded {
                column: self.id,
                occupied: self.occupied,
                capacity: self.capacity(),
                requested,
            });
        }
        self.occupied = next;
        Ok(())
    }

    /// 释放集装箱占用；要求 `0 < occupied <= capacity` 且足以扣减
    pub fn deoccupy_space(&mut self, container: &Container) -> Result<(), HarborError> {
        let weight = container.space_weight();
        if self.occupied == 0 || self.occupied > self.capacity() || self.occupied < weight {
            return Err(HarborError::InvalidState(format!(
                "{} cannot release {} space units (occupied {}, capacity {})",
                self.id,
                weight,
                self.occupied,
                self.capacity()
            )));
        }
        self.occupied -= weight;
        self.available = true;
        Ok(())
    }

    /// 存入集装箱；容量不足时原样退回
    pub(crate) fn store(&mut self, container: Container) -> Result<(), Container> {
        if self.occupy_space(&container).is_err() {
            return Err(container);
        }
        self.containers.push_back(container);
        Ok(())
    }

    /// 取出最早存入的集装箱
    pub(crate) fn take_front(&mut self) -> Result<Container, HarborError> {
        let Some(front) = self.containers.pop_front() else {
            return Err(HarborError::NoContainerAvailable(self.id));
        };
        if let Err(e) = self.deoccupy_space(&front) {
            self.containers.push_front(front);
            return Err(e);
        }
        Ok(front)
    }

    pub(crate) fn add_storage_day(&mut self) {
        for container in &mut self.containers {
            container.add_storage_day();
        }
    }
}

/// 堆场：一组存储列及其合法位置范围
#[derive(Debug)]
pub struct ContainerStorage {
    name: String,
    location_start: i64,
    location_end: i64,
    columns: Vec<StorageColumn>,
}

impl ContainerStorage {
    pub fn new(
        name: impl Into<String>,
        location_start: i64,
        location_end: i64,
    ) -> Result<Self, HarborError> {
        if location_start > location_end {
            return Err(HarborError::InvalidArgument(format!(
                "storage location range {location_start}..={location_end} is empty"
            )));
        }
        Ok(Self {
            name: name.into(),
            location_start,
            location_end,
            columns: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location_range(&self) -> (i64, i64) {
        (self.location_start, self.location_end)
    }

    /// 新增存储列；位置必须位于堆场范围内，尺寸必须为正
    pub fn add_column(
        &mut self,
        location: i64,
        length: u32,
        width: u32,
        height: u32,
    ) -> Result<ColumnId, HarborError> {
        if location < self.location_start || location > self.location_end {
            return Err(HarborError::LocationOutOfRange {
                location,
                start: self.location_start,
                end: self.location_end,
            });
        }
        for (what, v) in [("column length", length), ("column width", width), ("column height", height)] {
            if v == 0 {
                return Err(HarborError::InvalidCount { what, count: 0 });
            }
        }
        let id = ColumnId(self.columns.len());
        self.columns
            .push(StorageColumn::new(id, location, length, width, height));
        Ok(id)
    }

    pub fn columns(&self) -> &[StorageColumn] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&StorageColumn> {
        self.columns.get(id.0)
    }

    pub(crate) fn column_mut(&mut self, id: ColumnId) -> Option<&mut StorageColumn> {
        self.columns.get_mut(id.0)
    }

    /// 总容量（各列之和）
    pub fn capacity(&self) -> u64 {
        self.columns.iter().map(|c| c.capacity() as u64).sum()
    }

    /// 总占用（各列之和）
    pub fn occupied_space(&self) -> u64 {
        self.columns.iter().map(|c| c.occupied_space() as u64).sum()
    }

    pub fn free_space(&self) -> u64 {
        self.capacity().saturating_sub(self.occupied_space())
    }

    pub fn container_count(&self) -> usize {
        self.columns.iter().map(|c| c.container_count()).sum()
    }

    /// 校验列范围 `start..=end`
    pub fn check_range(&self, start: ColumnId, end: ColumnId) -> Result<(), HarborError> {
        if start > end {
            return Err(HarborError::InvalidArgument(format!(
                "column range {}..={} is reversed",
                start.0, end.0
            )));
        }
        if end.0 >= self.columns.len() {
            return Err(HarborError::UnknownColumn(end));
        }
        Ok(())
    }

    /// 范围内的空闲空间之和
    pub fn free_space_in(&self, start: ColumnId, end: ColumnId) -> u64 {
        self.columns
            .iter()
            .filter(|c| c.id() >= start && c.id() <= end)
            .map(|c| c.free_space() as u64)
            .sum()
    }

    /// 选择放箱列：从 `preferred` 起向后溢出到 `end`
    pub fn placement_column(
        &self,
        preferred: ColumnId,
        start: ColumnId,
        end: ColumnId,
        weight: u32,
    ) -> Result<ColumnId, HarborError> {
        if preferred < start || preferred > end {
            return Err(HarborError::ColumnOutOfRange {
                column: preferred,
                start,
                end,
            });
        }
        let first = self
            .column(preferred)
            .ok_or(HarborError::UnknownColumn(preferred))?;
        self.columns
            .iter()
            .filter(|c| c.id() >= preferred && c.id() <= end)
            .find(|c| c.free_space() >= weight)
            .map(|c| c.id())
            .ok_or(HarborError::InsufficientSpace {
                column: preferred,
                free: first.free_space(),
                requested: weight,
            })
    }

    /// 范围内第一个非空列
    pub fn first_nonempty_in(&self, start: ColumnId, end: ColumnId) -> Option<ColumnId> {
        self.columns
            .iter()
            .filter(|c| c.id() >= start && c.id() <= end)
            .find(|c| !c.is_empty())
            .map(|c| c.id())
    }

    pub(crate) fn add_storage_day(&mut self) {
        for column in &mut self.columns {
            column.add_storage_day();
        }
    }
}
