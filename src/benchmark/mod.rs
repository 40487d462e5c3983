// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 并发策略基准测试
//!
//! 对同一组航线对依次运行各个并发策略，计算重复数、覆盖率和质量，
//! 追加写入文本报告，最后输出一张柱状图。

pub mod chart;
pub mod metrics;
pub mod report;
pub mod strategies;

use std::path::PathBuf;

use tracing::{error, info};

use crate::benchmark::metrics::{compute_metrics, StrategyMetrics};
use crate::benchmark::report::{report_entry, ReportWriter};
use crate::benchmark::strategies::{BenchError, Strategy, StrategyRunner};
use crate::domain::models::route::Route;

/// 基准测试流程
pub struct BenchmarkHarness {
    runner: StrategyRunner,
    report: ReportWriter,
    priority: Vec<Route>,
    chart_path: PathBuf,
}

impl BenchmarkHarness {
    pub fn new(runner: StrategyRunner, report: ReportWriter, priority: Vec<Route>, chart_path: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            report,
            priority,
            chart_path: chart_path.into(),
        }
    }

    /// 运行单个策略并记录其指标
    pub async fn run_strategy(&self, strategy: Strategy, pairs: &[Route]) -> StrategyMetrics {
        if let Strategy::Hybrid(n) = strategy {
            self.append(&format!("Number of threads: {}\n", n)).await;
        }

        let (results, elapsed) = self.runner.run(strategy, pairs).await;
        let metrics = compute_metrics(strategy.to_string(), &results, pairs.len(), &self.priority, elapsed);

        let entry = report_entry(&metrics, &self.priority);
        info!("{}", entry);
        self.append(&entry).await;
        self.append(&strategy.timing_line(elapsed)).await;

        metrics
    }

    /// 运行全部固定策略和混合策略扫描，然后输出图表
    pub async fn run_all(&self, pairs: &[Route], hybrid_workers: &[usize]) -> Result<Vec<StrategyMetrics>, BenchError> {
        let strategies = Strategy::FIXED
            .into_iter()
            .chain(hybrid_workers.iter().map(|n| Strategy::Hybrid(*n)));

        let mut all = Vec::new();
        for strategy in strategies {
            all.push(self.run_strategy(strategy, pairs).await);
        }

        chart::save_chart(&all, &self.chart_path)?;
        info!("Chart saved to {}", self.chart_path.display());
        self.append(&chart::legend_line(&all)).await;
        Ok(all)
    }

    async fn append(&self, text: &str) {
        if let Err(e) = self.report.append(text).await {
            error!("Failed to write report {}: {}", self.report.path().display(), e);
        }
    }
}
