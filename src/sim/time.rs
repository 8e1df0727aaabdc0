//! 仿真时间类型
//!
//! 港口仿真以日历时间推进（默认每个 tick 一分钟），因此时间直接包装
//! `chrono::NaiveDateTime`，便于按星期/时分秒匹配航行与装卸计划。

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 仿真时间（日历时间，精确到秒）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub NaiveDateTime);

impl SimTime {
    /// 由年月日时分秒构造；非法日期返回 `None`
    pub fn from_ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Option<SimTime> {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, min, s))
            .map(SimTime)
    }

    /// 向前推进 `step`
    pub fn advance(self, step: Duration) -> SimTime {
        SimTime(self.0.checked_add_signed(step).unwrap_or(self.0))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// 时分秒是否相同（忽略日期）
    pub fn same_time_of_day(&self, other: SimTime) -> bool {
        self.0.time() == other.0.time()
    }

    /// 午夜边界：hour == 0 且 minute == 0
    pub fn is_midnight(&self) -> bool {
        self.hour() == 0 && self.minute() == 0
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}
