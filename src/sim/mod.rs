//! 仿真核心模块
//!
//! 此模块包含固定步长仿真的核心组件，如仿真时间、世界、仿真器和运行配置。

// 子模块声明
mod config;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use config::{
    AgvGroupSpec, DockGroupSpec, HandlingSpec, HarborSpec, SailingSpec, ShipGroupSpec,
    StorageSpec,
};
pub use simulator::{DEFAULT_STEP_MINUTES, Simulator};
pub use time::SimTime;
pub use world::World;
