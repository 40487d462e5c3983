// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::benchmark::metrics::StrategyMetrics;
use crate::domain::models::route::Route;

/// 追加写入的文本报告
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, text: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(text.as_bytes()).await?;
        file.flush().await
    }
}

/// `[('Berlin', 'Paris'), ('Berlin', 'London')]`
pub fn format_priority_pairs(priority: &[Route]) -> String {
    let pairs: Vec<String> = priority
        .iter()
        .map(|r| format!("('{}', '{}')", r.origin, r.destination))
        .collect();
    format!("[{}]", pairs.join(", "))
}

/// 单个策略的指标块
pub fn metrics_block(metrics: &StrategyMetrics) -> String {
    format!(
        "\n=== {} Metrics ===\n\
         Total Crawled: {}\n\
         Unique Crawled: {}\n\
         Overlap: {}\n\
         Coverage: {:.2}\n\
         Quality: {:.2}\n\
         ==================================\n",
        metrics.label, metrics.total, metrics.unique, metrics.overlap, metrics.coverage, metrics.quality
    )
}

/// 写入报告文件的完整指标段落（重点航线行 + 指标块）
pub fn report_entry(metrics: &StrategyMetrics, priority: &[Route]) -> String {
    format!(
        "Priority Pairs: {}\n{}",
        format_priority_pairs(priority),
        metrics_block(metrics)
    )
}
