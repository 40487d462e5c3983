// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use parking_lot::Mutex;
use tracing::{error, info, instrument};

use crate::domain::models::route::Route;
use crate::domain::models::search_date::SearchDate;
use crate::domain::models::task::{FlightTask, ResultSummary};
use crate::domain::services::scrape_service::FlightScraper;
use crate::infrastructure::storage::FlightStorage;
use crate::queue::task_queue::{InMemoryTaskQueue, TaskQueue};
use crate::utils::errors::WorkerError;
use crate::utils::retry_policy::JitterBand;
use crate::workers::manager::WorkerManager;

// === Section: Task Building ===

/// 生成 航线 × 日期偏移 的全部任务，按航线优先的顺序排列
pub fn build_tasks(routes: &[Route], days_ahead: &[u32], today: NaiveDate) -> Vec<FlightTask> {
    routes
        .iter()
        .flat_map(|route| {
            days_ahead
                .iter()
                .map(move |days| FlightTask::new(route.clone(), SearchDate::from_offset(today, *days)))
        })
        .collect()
}

// === Section: Use Case Definition ===

/// 一次农场运行的结果
#[derive(Debug, Clone)]
pub struct FarmOutcome {
    /// 每个任务一条汇总，按完成顺序
    pub summaries: Vec<ResultSummary>,
    /// 实际启动的工作器数量
    pub workers: usize,
}

pub struct RunFarmUseCase {
    scraper: Arc<dyn FlightScraper>,
    storage: Arc<dyn FlightStorage>,
    pre_task_pause: JitterBand,
}

// === Section: Implementation ===

impl RunFarmUseCase {
    pub fn new(scraper: Arc<dyn FlightScraper>, storage: Arc<dyn FlightStorage>, pre_task_pause: JitterBand) -> Self {
        Self {
            scraper,
            storage,
            pre_task_pause,
        }
    }

    /// 运行抓取农场
    ///
    /// 所有任务入队后启动 `min(max(max_workers, 1), 任务数)` 个工作器，等待每个任务都被确认，
    /// 然后逐条记录 SUCCESS/FAILED 并返回汇总。
    #[instrument(skip_all, fields(routes = routes.len(), days = days_ahead.len(), max_workers = max_workers))]
    pub async fn run_scraper_farm(
        &self,
        routes: &[Route],
        days_ahead: &[u32],
        max_workers: usize,
    ) -> Result<FarmOutcome, WorkerError> {
        let queue = Arc::new(InMemoryTaskQueue::new());
        for task in build_tasks(routes, days_ahead, Local::now().date_naive()) {
            queue.enqueue(task).await?;
        }
        info!("Queued {} tasks", queue.len());

        let summaries = Arc::new(Mutex::new(Vec::new()));
        let mut manager = WorkerManager::new(
            queue,
            self.scraper.clone(),
            self.storage.clone(),
            summaries.clone(),
            self.pre_task_pause,
        );
        let workers = manager.start_workers(max_workers);
        manager.wait_for_completion().await;

        let summaries = std::mem::take(&mut *summaries.lock());
        log_summaries(&summaries);

        Ok(FarmOutcome { summaries, workers })
    }

    /// 保存本次运行的汇总文件，失败只记录错误
    pub async fn save_summary(&self, summaries: &[ResultSummary]) -> Option<PathBuf> {
        match self.storage.save_summary(summaries).await {
            Ok(path) => {
                info!("Summary saved to {}", path.display());
                Some(path)
            }
            Err(e) => {
                error!("Failed to save summary: {}", e);
                None
            }
        }
    }
}

fn log_summaries(summaries: &[ResultSummary]) {
    info!("Scraping completed for {} route-date combinations", summaries.len());
    for summary in summaries {
        let status = if summary.succeeded() { "SUCCESS" } else { "FAILED" };
        info!(
            "{}: {} to {} on {}: {} flights",
            status, summary.origin, summary.destination, summary.date, summary.flights_found
        );
    }
}
