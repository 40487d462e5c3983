// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_gauge};

pub const SCRAPE_ATTEMPTS_TOTAL: &str = "scrape_attempts_total";
pub const SCRAPE_RETRIES_TOTAL: &str = "scrape_retries_total";
pub const ROWS_SKIPPED_TOTAL: &str = "flight_rows_skipped_total";
pub const FLIGHTS_EXTRACTED_TOTAL: &str = "flights_extracted_total";
pub const TASKS_COMPLETED_TOTAL: &str = "farm_tasks_completed_total";
pub const ACTIVE_WORKERS: &str = "farm_active_workers";

/// 注册指标描述
///
/// 未安装 recorder 时所有记录都是空操作。
pub fn describe_metrics() {
    describe_counter!(SCRAPE_ATTEMPTS_TOTAL, "Total number of scrape attempts, retries included");
    describe_counter!(SCRAPE_RETRIES_TOTAL, "Total number of scrape retries");
    describe_counter!(
        ROWS_SKIPPED_TOTAL,
        "Result rows skipped because they went stale during extraction"
    );
    describe_counter!(FLIGHTS_EXTRACTED_TOTAL, "Total number of flight records extracted");
    describe_counter!(
        TASKS_COMPLETED_TOTAL,
        "Total number of farm tasks acknowledged, by outcome"
    );
    describe_gauge!(ACTIVE_WORKERS, "Number of farm workers currently running");
}
