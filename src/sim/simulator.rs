//! 仿真器
//!
//! 定义固定步长的时钟驱动器：每次推进一个步长，然后按固定顺序驱动世界。
//! 驱动器本身不包含任何业务逻辑。

use super::time::SimTime;
use super::world::World;
use chrono::Duration;
use tracing::{debug, info};

/// 默认步长：一分钟
pub const DEFAULT_STEP_MINUTES: i64 = 1;

/// 固定步长仿真器：维护当前时间、步长与结束时间。
#[derive(Debug, Clone)]
pub struct Simulator {
    now: SimTime,
    step: Duration,
    end: SimTime,
    ticks: u64,
}

impl Simulator {
    pub fn new(start: SimTime, end: SimTime) -> Self {
        Self {
            now: start,
            step: Duration::minutes(DEFAULT_STEP_MINUTES),
            end,
            ticks: 0,
        }
    }

    /// 设置步长；非正步长保持原值
    pub fn with_step(mut self, step: Duration) -> Self {
        if step > Duration::zero() {
            self.step = step;
        }
        self
    }

    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn end(&self) -> SimTime {
        self.end
    }

    pub fn step_size(&self) -> Duration {
        self.step
    }

    /// 已执行的 tick 数
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// 推进一个步长并驱动世界
    pub fn step(&mut self, world: &mut dyn World) {
        self.now = self.now.advance(self.step);
        self.ticks = self.ticks.wrapping_add(1);
        world.on_tick(self.now);
        if self.now.is_midnight() {
            debug!(now = %self.now, "午夜快照");
            world.on_midnight(self.now);
        }
    }

    /// 运行直到当前时间 >= `until`。
    pub fn run_until(&mut self, until: SimTime, world: &mut dyn World) {
        while self.now < until {
            self.step(world);
        }
    }

    /// 运行到配置的结束时间。
    #[tracing::instrument(skip(self, world), fields(start = %self.now, end = %self.end))]
    pub fn run(&mut self, world: &mut dyn World) {
        info!("▶️  开始运行仿真");
        let end = self.end;
        self.run_until(end, world);
        info!(total_ticks = self.ticks, final_time = %self.now, "✅ 仿真完成");
    }
}
