//! 集装箱
//!
//! 集装箱在任意时刻只属于一个持有者（船、岸桥、AGV、门式吊机或存储列）。
//! 所有权通过 move 在这些持有者之间转移，类型系统保证不会被复制。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::ContainerId;
use crate::sim::SimTime;

/// 集装箱尺寸，每种尺寸占用固定的空间权重
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerSize {
    Small,
    Large,
}

impl ContainerSize {
    /// 占用的空间单位
    pub fn space_weight(self) -> u32 {
        match self {
            ContainerSize::Small => 1,
            ContainerSize::Large => 2,
        }
    }
}

/// 集装箱
#[derive(Debug, PartialEq, Eq)]
pub struct Container {
    id: ContainerId,
    name: String,
    size: ContainerSize,
    history: Vec<String>,
    days_in_storage: u32,
}

impl Container {
    pub fn new(id: ContainerId, name: impl Into<String>, size: ContainerSize) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            history: Vec::new(),
            days_in_storage: 0,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> ContainerSize {
        self.size
    }

    pub fn space_weight(&self) -> u32 {
        self.size.space_weight()
    }

    /// 按时间顺序追加的历史记录
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn days_in_storage(&self) -> u32 {
        self.days_in_storage
    }

    /// 记录一次移动："<container> moved at <time> from <source> to <destination>"
    pub(crate) fn record_move(&mut self, at: SimTime, from: &str, to: &str) {
        let line = format!("{} moved at {} from {} to {}", self.name, at, from, to);
        self.history.push(line);
    }

    pub(crate) fn undo_last_move(&mut self) {
        self.history.pop();
    }

    pub(crate) fn add_storage_day(&mut self) {
        self.days_in_storage = self.days_in_storage.saturating_add(1);
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
