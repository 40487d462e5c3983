// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;

use crate::domain::models::flight::FlightRecord;
use crate::domain::models::route::Route;

/// 一种并发策略的评估结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyMetrics {
    pub label: String,
    pub time_secs: f64,
    /// 全部记录数
    pub total: usize,
    /// 不同 (出发地, 目的地) 的数量
    pub unique: usize,
    /// total - unique
    pub overlap: usize,
    /// unique / 航线对数量
    pub coverage: f64,
    /// 重点航线中被抓到的比例
    pub quality: f64,
}

/// 计算策略指标
///
/// 所有记录按 (出发地, 目的地) 展平后统计。`pair_count` 为 0 时覆盖率为 0，
/// 重点航线为空时质量为 0。
pub fn compute_metrics(
    label: impl Into<String>,
    results: &[Vec<FlightRecord>],
    pair_count: usize,
    priority: &[Route],
    elapsed: Duration,
) -> StrategyMetrics {
    let crawled: Vec<Route> = results.iter().flatten().map(FlightRecord::route).collect();

    let total = crawled.len();
    let crawled_set: HashSet<&Route> = crawled.iter().collect();
    let unique = crawled_set.len();

    let coverage = if pair_count == 0 {
        0.0
    } else {
        unique as f64 / pair_count as f64
    };

    let priority_set: HashSet<&Route> = priority.iter().collect();
    let quality = if priority_set.is_empty() {
        0.0
    } else {
        priority_set.intersection(&crawled_set).count() as f64 / priority_set.len() as f64
    };

    StrategyMetrics {
        label: label.into(),
        time_secs: elapsed.as_secs_f64(),
        total,
        unique,
        overlap: total - unique,
        coverage,
        quality,
    }
}
