//! 标识符类型
//!
//! 定义港口实体的唯一标识符（均为各自集合中的下标）。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 船舶标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub usize);

/// 泊位标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DockId(pub usize);

/// AGV 标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgvId(pub usize);

/// 存储列标识符；装卸计划用起止列号描述范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnId(pub usize);

/// 集装箱标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(pub u64);

/// 泊位上的岸桥：泊位 + 泊位内下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CraneId {
    pub dock: DockId,
    pub index: usize,
}

impl fmt::Display for DockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dock {}", self.0)
    }
}

impl fmt::Display for AgvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AGV {}", self.0)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage column {}", self.0)
    }
}

impl fmt::Display for CraneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "crane {} of dock {}", self.index, self.dock.0)
    }
}
