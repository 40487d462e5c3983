// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::route::Route;
use super::search_date::SearchDate;

/// 抓取任务
///
/// 一条航线加一个搜索日期。放入共享队列后恰好被一个工作器消费一次。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightTask {
    /// 航线
    pub route: Route,
    /// 出发日期
    pub date: SearchDate,
}

impl FlightTask {
    pub fn new(route: Route, date: SearchDate) -> Self {
        Self { route, date }
    }
}

impl fmt::Display for FlightTask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} on {}", self.route, self.date)
    }
}

/// 任务结果汇总
///
/// 无论抓取成功与否，每个任务都产生一条汇总。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub origin: String,
    pub destination: String,
    pub date: String,
    /// 抓到的航班数量，失败为 0
    pub flights_found: usize,
    /// JSON 输出路径，未写出时为 null
    pub json_file: Option<String>,
    /// CSV 输出路径，未写出时为 null
    pub csv_file: Option<String>,
}

impl ResultSummary {
    /// 失败（零结果）的汇总
    pub fn empty(task: &FlightTask) -> Self {
        Self {
            origin: task.route.origin.clone(),
            destination: task.route.destination.clone(),
            date: task.date.to_string(),
            flights_found: 0,
            json_file: None,
            csv_file: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.flights_found > 0
    }
}
