//! 错误类型
//!
//! 港口仿真中所有可失败操作共用的错误枚举。资源争用（无可用泊位/AGV/吊机）
//! 不属于错误，而是以 `None` 或 `TransferStep::Blocked` 表示并推迟到后续 tick。

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{AgvId, ColumnId, DockId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HarborError {
    /// 配置错误：港口没有任何泊位或 AGV
    #[error("harbor has no {0} configured")]
    EmptyResource(&'static str),

    #[error("{what} count must be positive, got {count}")]
    InvalidCount { what: &'static str, count: i64 },

    #[error("location {location} lies outside {start}..={end}")]
    LocationOutOfRange { location: i64, start: i64, end: i64 },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("column {column:?} is outside the range {start:?}..={end:?}")]
    ColumnOutOfRange {
        column: ColumnId,
        start: ColumnId,
        end: ColumnId,
    },

    #[error("unknown ship `{0}`")]
    UnknownShip(String),

    #[error("unknown dock {0:?}")]
    UnknownDock(DockId),

    #[error("unknown crane {index} on dock {dock:?}")]
    UnknownCrane { dock: DockId, index: usize },

    #[error("unknown AGV {0:?}")]
    UnknownAgv(AgvId),

    #[error("unknown storage column {0:?}")]
    UnknownColumn(ColumnId),

    /// 容量错误：写入后将超过存储列容量
    #[error(
        "column {column:?} capacity exceeded: occupied {occupied} + {requested} > {capacity}"
    )]
    CapacityExceeded {
        column: ColumnId,
        occupied: u32,
        capacity: u32,
        requested: u32,
    },

    #[error("insufficient space in column {column:?}: {free} free, {requested} requested")]
    InsufficientSpace {
        column: ColumnId,
        free: u32,
        requested: u32,
    },

    #[error("no container available in column {0:?}")]
    NoContainerAvailable(ColumnId),

    #[error("ship `{0}` carries no containers")]
    ShipHasNoContainers(String),

    #[error("AGV {0:?} carries no container")]
    AgvEmpty(AgvId),

    #[error("invalid state: {0}")]
    InvalidState(String),

    /// 单占用约束被破坏（程序错误，而非可恢复情况）
    #[error("resource misuse: {0}")]
    ResourceMisuse(String),

    #[error("ship `{0}` already has an identical sailing scheduled")]
    DuplicateSailing(String),

    #[error("ship `{0}` already has an identical container handling scheduled")]
    DuplicateHandling(String),

    #[error("no snapshot recorded for {0}")]
    SnapshotNotFound(NaiveDate),
}
