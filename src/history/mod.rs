//! 历史记录（审计轨迹与每日快照）
//!
//! 设计目标：
//! - **显式注入**：由港口持有，随一次运行创建与销毁
//! - **结构化**：快照可直接序列化为 JSON
//! - **按键查询**：船名为事件键，日历日期为快照键

mod types;

pub use types::{DockedShipInfo, HarborHistory, HarborSnapshot, ShipEventRecord};
