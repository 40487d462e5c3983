// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::flight::{
    FlightFields, FlightRecord, AIRLINE_UNKNOWN, DURATION_NOT_AVAILABLE, PRICE_NOT_AVAILABLE,
    STOPS_NOT_AVAILABLE, TIME_NOT_AVAILABLE,
};
use crate::domain::models::route::Route;
use crate::domain::models::search_date::SearchDate;
use crate::engines::traits::{EngineError, ResultRow};
use crate::infrastructure::metrics::{FLIGHTS_EXTRACTED_TOTAL, ROWS_SKIPPED_TOTAL};
use metrics::counter;
use tracing::{debug, info, warn};

/// 字段抽取规则
///
/// 按顺序尝试行内 CSS 选择器，第一个能定位到元素的选择器决定取值，
/// 全部失败时使用占位值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub strategies: &'static [&'static str],
    pub sentinel: &'static str,
}

pub const TIME_FIELD: FieldSpec = FieldSpec {
    name: "time",
    strategies: &[r#"div[class*="vmXl"] span"#, r#"div[class*="time"]"#],
    sentinel: TIME_NOT_AVAILABLE,
};

pub const AIRLINE_FIELD: FieldSpec = FieldSpec {
    name: "airline",
    strategies: &[r#"div[class*="c_cgF"]"#, r#"div[class*="carrier"]"#],
    sentinel: AIRLINE_UNKNOWN,
};

pub const PRICE_FIELD: FieldSpec = FieldSpec {
    name: "price",
    strategies: &[r#"div[class*="price-text"]"#, r#"div[class*="price"]"#],
    sentinel: PRICE_NOT_AVAILABLE,
};

pub const DURATION_FIELD: FieldSpec = FieldSpec {
    name: "duration",
    strategies: &[r#"div[class*="duration"]"#],
    sentinel: DURATION_NOT_AVAILABLE,
};

pub const STOPS_FIELD: FieldSpec = FieldSpec {
    name: "stops",
    strategies: &[r#"div[class*="stops"]"#],
    sentinel: STOPS_NOT_AVAILABLE,
};

impl FieldSpec {
    /// 读取字段文本
    ///
    /// 行失效（StaleElement）会直接返回错误，由调用方跳过整行；
    /// 其他错误都视为该选择器未命中。
    pub async fn extract(&self, row: &dyn ResultRow) -> Result<String, EngineError> {
        for css in self.strategies {
            match row.text_of(css).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_stale() => return Err(e),
                Err(e) => debug!("{} not found with {}: {}", self.name, css, e),
            }
        }
        Ok(self.sentinel.to_string())
    }
}

/// 从单行结果中抽取一条航班记录
pub async fn extract_row(
    row: &dyn ResultRow,
    route: &Route,
    date: &SearchDate,
    flight_number: usize,
) -> Result<FlightRecord, EngineError> {
    let fields = FlightFields {
        time: TIME_FIELD.extract(row).await?,
        airline: AIRLINE_FIELD.extract(row).await?,
        price: PRICE_FIELD.extract(row).await?,
        duration: DURATION_FIELD.extract(row).await?,
        stops: STOPS_FIELD.extract(row).await?,
    };
    Ok(FlightRecord::new(route, date, flight_number, fields))
}

/// 抽取全部结果行
///
/// 航班序号是行在结果列表中的位置（从 1 开始），跳过的行不会让后续序号前移。
pub async fn extract_flights(rows: &[Box<dyn ResultRow>], route: &Route, date: &SearchDate) -> Vec<FlightRecord> {
    let total = rows.len();
    let mut flights = Vec::with_capacity(total);

    for (index, row) in rows.iter().enumerate() {
        let flight_number = index + 1;
        match extract_row(row.as_ref(), route, date, flight_number).await {
            Ok(record) => {
                flights.push(record);
                info!("Processed flight {}/{}", flight_number, total);
            }
            Err(e) => {
                counter!(ROWS_SKIPPED_TOTAL).increment(1);
                warn!("Issue processing flight {}: {}", flight_number, e);
            }
        }
    }

    counter!(FLIGHTS_EXTRACTED_TOTAL).increment(flights.len() as u64);
    flights
}
