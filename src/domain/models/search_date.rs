// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// 搜索日期
///
/// 按站点日期选择器的无障碍标签格式呈现：完整月份名、不补零的日期加逗号、四位年份，
/// 例如 `May 3, 2024`。创建后不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchDate {
    date: NaiveDate,
}

impl SearchDate {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// 以 `today` 为基准向后偏移若干天
    ///
    /// 超出日历范围时停在 `NaiveDate::MAX`
    pub fn from_offset(today: NaiveDate, days_from_now: u32) -> Self {
        let date = today
            .checked_add_days(Days::new(u64::from(days_from_now)))
            .unwrap_or(NaiveDate::MAX);
        Self { date }
    }

    /// 以本地时区的今天为基准
    pub fn days_from_today(days_from_now: u32) -> Self {
        Self::from_offset(Local::now().date_naive(), days_from_now)
    }

    /// 日历上的日（1-31），用于日期选择的降级方案
    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// 用于文件名的形式：空格替换为下划线
    pub fn file_token(&self) -> String {
        self.to_string().replace(' ', "_")
    }
}

impl fmt::Display for SearchDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {}, {}",
            self.date.format("%B"),
            self.date.day(),
            self.date.year()
        )
    }
}

impl Serialize for SearchDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
