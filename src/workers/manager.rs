// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::scrape_service::FlightScraper;
use crate::infrastructure::metrics::ACTIVE_WORKERS;
use crate::infrastructure::storage::FlightStorage;
use crate::queue::task_queue::TaskQueue;
use crate::utils::errors::WorkerError;
use crate::utils::retry_policy::JitterBand;
use crate::workers::scrape_worker::{ScrapeWorker, SummaryCollector};
use crate::workers::worker::Worker;
use metrics::gauge;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// 工作管理器
///
/// 启动固定数量的抓取工作器，工作器数量不超过队列中的任务数。
pub struct WorkerManager {
    queue: Arc<dyn TaskQueue>,
    scraper: Arc<dyn FlightScraper>,
    storage: Arc<dyn FlightStorage>,
    summaries: SummaryCollector,
    pre_task_pause: JitterBand,
    handles: Vec<JoinHandle<Result<(), WorkerError>>>,
}

impl WorkerManager {
    pub fn new(
        queue: Arc<dyn TaskQueue>,
        scraper: Arc<dyn FlightScraper>,
        storage: Arc<dyn FlightStorage>,
        summaries: SummaryCollector,
        pre_task_pause: JitterBand,
    ) -> Self {
        Self {
            queue,
            scraper,
            storage,
            summaries,
            pre_task_pause,
            handles: Vec::new(),
        }
    }

    /// 启动工作器
    ///
    /// # 参数
    ///
    /// * `max_workers` - 工作器数量上限
    ///
    /// # 返回值
    ///
    /// 实际启动的数量，即 `min(max_workers, 队列长度)`；队列非空时至少启动一个
    pub fn start_workers(&mut self, max_workers: usize) -> usize {
        let pending = self.queue.len();
        if max_workers == 0 && pending > 0 {
            warn!("max_workers is 0 with {} pending tasks, starting one worker", pending);
        }
        let count = max_workers.max(1).min(pending);

        for id in 1..=count {
            let worker = ScrapeWorker::new(
                id,
                self.queue.clone(),
                self.scraper.clone(),
                self.storage.clone(),
                self.summaries.clone(),
                self.pre_task_pause,
            );

            let handle = tokio::spawn(async move {
                gauge!(ACTIVE_WORKERS).increment(1.0);
                let result = worker.run().await;
                gauge!(ACTIVE_WORKERS).decrement(1.0);
                if let Err(e) = &result {
                    error!("Worker {} stopped with error: {}", worker.name(), e);
                }
                result
            });
            self.handles.push(handle);
        }

        info!(
            "Started {} workers, pre-task pause {:?}..{:?}",
            count,
            self.pre_task_pause.lower_bound(),
            self.pre_task_pause.upper_bound()
        );
        count
    }

    /// 启动的工作器数量
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// 等待队列中的全部任务被确认，然后回收工作器
    pub async fn wait_for_completion(&mut self) {
        self.queue.join().await;
        info!("All tasks completed");

        for handle in self.handles.drain(..) {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Worker returned error: {}", e),
                Err(e) => error!("Worker task failed to join: {}", WorkerError::from(e)),
            }
        }
    }
}
