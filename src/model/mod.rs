//! 港口实体模块
//!
//! 此模块包含港口仿真的实体：集装箱、吊机、AGV、泊位、船舶、堆场与计划条目。

// 子模块声明
mod agv;
mod container;
mod crane;
mod dock;
mod id;
mod schedule;
mod ship;
mod storage;

// 重新导出公共接口
pub use agv::{Agv, DEFAULT_AGV_SPEED};
pub use container::{Container, ContainerSize};
pub use crane::{
    Crane, PORTAL_CRANE_PLACE_TICKS, PORTAL_CRANE_RETRIEVE_TICKS, PortalCrane,
    SHIP_CRANE_HANDLING_TICKS,
};
pub use dock::{Dock, SizeClass};
pub use id::{AgvId, ColumnId, ContainerId, CraneId, DockId, ShipId};
pub use schedule::{HandlingKind, Recurrence, ScheduledHandling, ScheduledSailing};
pub use ship::{Ship, ShipModel, ShipState, Voyage};
pub use storage::{ContainerStorage, StorageColumn};
