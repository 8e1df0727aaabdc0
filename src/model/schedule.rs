//! 航行与装卸计划条目

use serde::{Deserialize, Serialize};

use super::id::ColumnId;
use crate::sim::SimTime;

/// 计划的重复方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    /// 只触发一次，执行后移除
    #[default]
    #[serde(alias = "none")]
    Once,
    Daily,
    Weekly,
}

impl Recurrence {
    /// 周期性计划：时分秒相同、当前日期不早于起始日期，且每周计划需星期相同
    fn matches_calendar(self, at: SimTime, now: SimTime) -> bool {
        if self == Recurrence::Weekly && now.weekday() != at.weekday() {
            return false;
        }
        now.date() >= at.date() && now.same_time_of_day(at)
    }
}

/// 装卸方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlingKind {
    /// 存储 -> 船
    Load,
    /// 船 -> 存储
    Unload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSailing {
    pub at: SimTime,
    pub destination: i64,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl ScheduledSailing {
    pub fn new(at: SimTime, destination: i64, recurrence: Recurrence) -> Self {
        Self {
            at,
            destination,
            recurrence,
        }
    }

    /// 一次性航行在计划日期当天或之后第一次时刻匹配且船就绪时出发
    pub fn is_due(&self, now: SimTime) -> bool {
        self.recurrence.matches_calendar(self.at, now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledHandling {
    pub at: SimTime,
    pub start: ColumnId,
    pub end: ColumnId,
    pub count: u32,
    pub kind: HandlingKind,
    #[serde(default)]
    pub recurrence: Recurrence,
}

impl ScheduledHandling {
    pub fn new(
        at: SimTime,
        start: ColumnId,
        end: ColumnId,
        count: u32,
        kind: HandlingKind,
        recurrence: Recurrence,
    ) -> Self {
        Self {
            at,
            start,
            end,
            count,
            kind,
            recurrence,
        }
    }

    /// 一次性装卸要求时间戳完全相同
    pub fn is_due(&self, now: SimTime) -> bool {
        match self.recurrence {
            Recurrence::Once => now == self.at,
            r => r.matches_calendar(self.at, now),
        }
    }

    /// 同时间、同列范围、同数量、同方向视为重复
    pub fn duplicates(&self, other: &ScheduledHandling) -> bool {
        self.at == other.at
            && self.start == other.start
            && self.end == other.end
            && self.count == other.count
            && self.kind == other.kind
    }
}
