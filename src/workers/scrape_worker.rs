// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::{FlightTask, ResultSummary};
use crate::domain::services::scrape_service::FlightScraper;
use crate::infrastructure::metrics::TASKS_COMPLETED_TOTAL;
use crate::infrastructure::storage::FlightStorage;
use crate::queue::task_queue::TaskQueue;
use crate::utils::errors::WorkerError;
use crate::utils::retry_policy::JitterBand;
use crate::workers::worker::Worker;
use async_trait::async_trait;
use futures::FutureExt;
use metrics::counter;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// 调用方持有的汇总收集器
pub type SummaryCollector = Arc<Mutex<Vec<ResultSummary>>>;

/// 抓取工作器
///
/// 不断从队列取任务直到队列为空。每个任务无论结果如何都会产生一条汇总并被确认。
pub struct ScrapeWorker {
    name: String,
    queue: Arc<dyn TaskQueue>,
    scraper: Arc<dyn FlightScraper>,
    storage: Arc<dyn FlightStorage>,
    summaries: SummaryCollector,
    pre_task_pause: JitterBand,
}

impl ScrapeWorker {
    pub fn new(
        id: usize,
        queue: Arc<dyn TaskQueue>,
        scraper: Arc<dyn FlightScraper>,
        storage: Arc<dyn FlightStorage>,
        summaries: SummaryCollector,
        pre_task_pause: JitterBand,
    ) -> Self {
        Self {
            name: format!("scrape-worker-{}", id),
            queue,
            scraper,
            storage,
            summaries,
            pre_task_pause,
        }
    }

    /// 处理单个任务，捕获任务内部的 panic
    #[instrument(skip_all, fields(worker = %self.name, task = %task))]
    async fn process_task(&self, task: &FlightTask) -> ResultSummary {
        let delay = self.pre_task_pause.sample();
        info!("Worker waiting {:.2} seconds before starting task", delay.as_secs_f64());
        tokio::time::sleep(delay).await;

        match AssertUnwindSafe(self.scrape_and_store(task)).catch_unwind().await {
            Ok(summary) => summary,
            Err(payload) => {
                error!("Task {} panicked: {}", task, panic_message(payload.as_ref()));
                ResultSummary::empty(task)
            }
        }
    }

    async fn scrape_and_store(&self, task: &FlightTask) -> ResultSummary {
        let flights = self.scraper.scrape(&task.route, &task.date).await;
        if flights.is_empty() {
            warn!("No flight data found for {}", task);
            return ResultSummary::empty(task);
        }

        let mut summary = ResultSummary::empty(task);
        summary.flights_found = flights.len();

        match self.storage.save_flights(task, &flights).await {
            Ok(files) => {
                info!(
                    "Saved {} flights to {} and {}",
                    flights.len(),
                    files.json_file.display(),
                    files.csv_file.display()
                );
                summary.json_file = Some(files.json_file.to_string_lossy().to_string());
                summary.csv_file = Some(files.csv_file.to_string_lossy().to_string());
            }
            Err(e) => error!("Failed to save results for {}: {}", task, e),
        }
        summary
    }
}

#[async_trait]
impl Worker for ScrapeWorker {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("{} started", self.name);

        while let Some(task) = self.queue.dequeue().await? {
            let summary = self.process_task(&task).await;
            let outcome = if summary.succeeded() { "success" } else { "empty" };
            counter!(TASKS_COMPLETED_TOTAL, "outcome" => outcome).increment(1);

            self.summaries.lock().push(summary);
            self.queue.complete(&task).await?;
        }

        info!("{} finished, queue is empty", self.name);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
