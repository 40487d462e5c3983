// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use rayon::prelude::*;
use thiserror::Error;
use tokio::process::Command;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

use crate::domain::models::flight::FlightRecord;
use crate::domain::models::route::Route;
use crate::domain::models::search_date::SearchDate;
use crate::domain::services::scrape_service::FlightScraper;
use crate::infrastructure::storage::{save_numbered_json, StorageError};

/// 每个航线对一份结果，顺序与输入一致
pub type PairResults = Vec<Vec<FlightRecord>>;

/// 基准测试错误类型
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Chart error: {0}")]
    Chart(#[from] image::ImageError),

    #[error("Worker process failed: {0}")]
    ChildProcess(String),
}

/// 并发策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// 逐个顺序执行
    Sequential,
    /// 有界异步并发
    AsyncPool,
    /// 每个航线对一个子进程
    ProcessPool,
    /// rayon 并行映射
    ParallelMap,
    /// 分成 n 块，每块一个子进程，块内并发
    Hybrid(usize),
}

impl Strategy {
    /// 固定策略（不含混合策略扫描）
    pub const FIXED: [Strategy; 4] = [
        Strategy::Sequential,
        Strategy::AsyncPool,
        Strategy::ProcessPool,
        Strategy::ParallelMap,
    ];

    /// 报告中的执行时间行
    pub fn timing_line(&self, elapsed: Duration) -> String {
        let secs = elapsed.as_secs_f64();
        match self {
            Strategy::Hybrid(_) => format!("Hybrid Execution Time (Process + Task): {:.2} seconds\n", secs),
            other => format!("{} Execution Time: {:.2} seconds\n", other, secs),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Strategy::Sequential => write!(f, "Sequential"),
            Strategy::AsyncPool => write!(f, "AsyncPool"),
            Strategy::ProcessPool => write!(f, "ProcessPool"),
            Strategy::ParallelMap => write!(f, "ParallelMap"),
            Strategy::Hybrid(n) => write!(f, "Hybrid-{}", n),
        }
    }
}

/// 把航线对切成大小为 `ceil(len / n)` 的块，块数可能少于 n
pub fn chunkify(pairs: &[Route], num_chunks: usize) -> Vec<Vec<Route>> {
    if pairs.is_empty() {
        return Vec::new();
    }
    let size = pairs.len().div_ceil(num_chunks.max(1));
    pairs.chunks(size).map(|c| c.to_vec()).collect()
}

/// 单个航线对的抓取
#[async_trait]
pub trait PairRunner: Send + Sync {
    async fn run_pair(&self, route: &Route) -> Vec<FlightRecord>;
}

/// 基准测试使用的航线对抓取：今天的日期，结果另存为自增编号的 JSON 文件
pub struct BenchPairRunner {
    scraper: Arc<dyn FlightScraper>,
    output_dir: PathBuf,
    base_name: String,
}

impl BenchPairRunner {
    pub fn new(scraper: Arc<dyn FlightScraper>, output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            scraper,
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }
}

#[async_trait]
impl PairRunner for BenchPairRunner {
    async fn run_pair(&self, route: &Route) -> Vec<FlightRecord> {
        let date = SearchDate::days_from_today(0);
        let flights = self.scraper.scrape(route, &date).await;

        match save_numbered_json(&self.output_dir, &self.base_name, &flights).await {
            Ok(path) => info!("Flight data for {} saved to {}", route, path.display()),
            Err(e) => error!("Failed to save flight data for {}: {}", route, e),
        }
        flights
    }
}

/// 在当前进程中执行一块航线对，`concurrent` 为 true 时块内并发
pub async fn run_chunk_in_process(runner: &dyn PairRunner, pairs: &[Route], concurrent: bool) -> PairResults {
    if concurrent {
        futures::future::join_all(pairs.iter().map(|route| runner.run_pair(route))).await
    } else {
        let mut results = Vec::with_capacity(pairs.len());
        for route in pairs {
            results.push(runner.run_pair(route).await);
        }
        results
    }
}

/// 在独立进程中执行一块航线对
#[async_trait]
pub trait ChunkRunner: Send + Sync {
    async fn run_chunk(&self, pairs: &[Route], concurrent: bool) -> Result<PairResults, BenchError>;
}

/// 通过子进程 `<program> worker --pairs <json> [--concurrent]` 执行，
/// 子进程把结果以 JSON 写到标准输出
pub struct ChildProcessRunner {
    program: PathBuf,
}

impl ChildProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// 使用当前可执行文件
    pub fn current_exe() -> Result<Self, BenchError> {
        Ok(Self::new(std::env::current_exe()?))
    }
}

#[async_trait]
impl ChunkRunner for ChildProcessRunner {
    async fn run_chunk(&self, pairs: &[Route], concurrent: bool) -> Result<PairResults, BenchError> {
        let mut command = Command::new(&self.program);
        command
            .arg("worker")
            .arg("--pairs")
            .arg(serde_json::to_string(pairs)?)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit());
        if concurrent {
            command.arg("--concurrent");
        }

        let output = command.output().await?;
        if !output.status.success() {
            return Err(BenchError::ChildProcess(format!(
                "{} exited with {}",
                self.program.display(),
                output.status
            )));
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// 策略执行器
pub struct StrategyRunner {
    pairs: Arc<dyn PairRunner>,
    chunks: Arc<dyn ChunkRunner>,
    pool_workers: usize,
}

impl StrategyRunner {
    pub fn new(pairs: Arc<dyn PairRunner>, chunks: Arc<dyn ChunkRunner>, pool_workers: Option<usize>) -> Self {
        let pool_workers = pool_workers
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(4)
            .max(1);
        Self {
            pairs,
            chunks,
            pool_workers,
        }
    }

    pub fn pool_workers(&self) -> usize {
        self.pool_workers
    }

    /// 执行一种策略并计时
    pub async fn run(&self, strategy: Strategy, pairs: &[Route]) -> (PairResults, Duration) {
        info!("Running {} over {} pairs", strategy, pairs.len());
        let start = Instant::now();

        let results = match strategy {
            Strategy::Sequential => run_chunk_in_process(self.pairs.as_ref(), pairs, false).await,
            Strategy::AsyncPool => self.async_pool(pairs).await,
            Strategy::ProcessPool => self.process_pool(pairs).await,
            Strategy::ParallelMap => self.parallel_map(pairs).await,
            Strategy::Hybrid(n) => self.hybrid(pairs, n).await,
        };

        (results, start.elapsed())
    }

    async fn async_pool(&self, pairs: &[Route]) -> PairResults {
        stream::iter(pairs)
            .map(|route| self.pairs.run_pair(route))
            .buffered(self.pool_workers)
            .collect()
            .await
    }

    async fn process_pool(&self, pairs: &[Route]) -> PairResults {
        let per_pair: Vec<PairResults> = stream::iter(pairs)
            .map(|route| self.chunk_or_empty(std::slice::from_ref(route), false))
            .buffered(self.pool_workers)
            .collect()
            .await;
        per_pair.into_iter().flatten().collect()
    }

    async fn parallel_map(&self, pairs: &[Route]) -> PairResults {
        let runner = self.pairs.clone();
        let handle = Handle::current();
        let owned = pairs.to_vec();

        let joined = tokio::task::spawn_blocking(move || {
            owned
                .par_iter()
                .map(|route| handle.block_on(runner.run_pair(route)))
                .collect::<PairResults>()
        })
        .await;

        match joined {
            Ok(results) => results,
            Err(e) => {
                error!("Parallel map failed: {}", e);
                vec![Vec::new(); pairs.len()]
            }
        }
    }

    async fn hybrid(&self, pairs: &[Route], num_chunks: usize) -> PairResults {
        let chunks = chunkify(pairs, num_chunks);
        info!("Hybrid run with {} chunks", chunks.len());

        let nested =
            futures::future::join_all(chunks.iter().map(|chunk| self.chunk_or_empty(chunk, true))).await;
        nested.into_iter().flatten().collect()
    }

    /// 子进程失败时该块的每个航线对都记为空结果
    async fn chunk_or_empty(&self, chunk: &[Route], concurrent: bool) -> PairResults {
        match self.chunks.run_chunk(chunk, concurrent).await {
            Ok(results) if results.len() == chunk.len() => results,
            Ok(results) => {
                warn!(
                    "Worker returned {} results for {} pairs, discarding",
                    results.len(),
                    chunk.len()
                );
                vec![Vec::new(); chunk.len()]
            }
            Err(e) => {
                error!("Chunk of {} pairs failed: {}", chunk.len(), e);
                vec![Vec::new(); chunk.len()]
            }
        }
    }
}
