//! 统计信息
//!
//! 定义港口仿真统计数据结构。

use serde::{Deserialize, Serialize};

/// 港口统计信息
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarborStats {
    pub arrivals: u64,
    pub dockings: u64,
    pub departures: u64,
    pub containers_moved: u64,
    pub jobs_started: u64,
    pub jobs_completed: u64,
    pub snapshots: u64,
}
