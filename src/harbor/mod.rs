//! 港口模块
//!
//! 此模块包含港口聚合根及其每个 tick 的组件：资源池、船舶生命周期、
//! 转运管线、装卸计划与航行计划。

// 子模块声明
mod builder;
mod handling;
#[allow(clippy::module_inception)]
mod harbor;
mod lifecycle;
mod notify;
mod resources;
mod sailing;
mod stats;
mod transport;

// 重新导出公共接口
pub use harbor::Harbor;
pub use notify::{HarborEvent, HarborListener};
pub use stats::HarborStats;
pub use transport::TransferStep;
