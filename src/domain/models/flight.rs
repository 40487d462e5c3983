// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Local;
use serde::{Deserialize, Serialize};

use super::route::Route;
use super::search_date::SearchDate;

/// 航班时间缺失时的占位值
pub const TIME_NOT_AVAILABLE: &str = "Not available";
/// 航空公司缺失时的占位值
pub const AIRLINE_UNKNOWN: &str = "Unknown";
/// 价格缺失时的占位值
pub const PRICE_NOT_AVAILABLE: &str = "Price not available";
/// 飞行时长缺失时的占位值
pub const DURATION_NOT_AVAILABLE: &str = "Not available";
/// 经停信息缺失时的占位值
pub const STOPS_NOT_AVAILABLE: &str = "Not available";

/// 航班记录
///
/// 每个可见的结果行生成一条记录。所有文本字段总是有值，
/// 抓取失败的字段使用对应的占位值，而不是缺省或 null。
/// 字段顺序即 JSON 键顺序和 CSV 表头顺序。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightRecord {
    pub origin: String,
    pub destination: String,
    /// 搜索日期的展示字符串
    pub date: String,
    /// 结果行序号，从 1 开始
    pub flight_number: usize,
    /// 抓取时间，`%Y-%m-%d %H:%M:%S`
    pub scrape_time: String,
    /// 出发/到达时间文本
    pub time: String,
    pub airline: String,
    pub price: String,
    pub duration: String,
    pub stops: String,
}

/// 单行抓取得到的字段值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightFields {
    pub time: String,
    pub airline: String,
    pub price: String,
    pub duration: String,
    pub stops: String,
}

impl Default for FlightFields {
    fn default() -> Self {
        Self {
            time: TIME_NOT_AVAILABLE.to_string(),
            airline: AIRLINE_UNKNOWN.to_string(),
            price: PRICE_NOT_AVAILABLE.to_string(),
            duration: DURATION_NOT_AVAILABLE.to_string(),
            stops: STOPS_NOT_AVAILABLE.to_string(),
        }
    }
}

impl FlightRecord {
    /// 序列化键名，按输出顺序
    pub const FIELD_NAMES: [&'static str; 10] = [
        "origin",
        "destination",
        "date",
        "flight_number",
        "scrape_time",
        "time",
        "airline",
        "price",
        "duration",
        "stops",
    ];

    /// 以当前本地时间作为抓取时间创建记录
    pub fn new(route: &Route, date: &SearchDate, flight_number: usize, fields: FlightFields) -> Self {
        Self {
            origin: route.origin.clone(),
            destination: route.destination.clone(),
            date: date.to_string(),
            flight_number,
            scrape_time: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            time: fields.time,
            airline: fields.airline,
            price: fields.price,
            duration: fields.duration,
            stops: fields.stops,
        }
    }

    /// 记录所属的航线
    pub fn route(&self) -> Route {
        Route::new(self.origin.clone(), self.destination.clone())
    }
}
