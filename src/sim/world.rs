//! 世界 trait
//!
//! 定义仿真世界接口。

use super::time::SimTime;

/// 仿真世界：由业务层实现（例如港口）。
pub trait World {
    /// 每个 tick 调用一次，`now` 为推进后的时间
    fn on_tick(&mut self, now: SimTime);

    /// 午夜边界（00:00）在 `on_tick` 之后调用
    fn on_midnight(&mut self, _now: SimTime) {}
}
