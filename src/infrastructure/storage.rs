// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::flight::FlightRecord;
use crate::domain::models::task::{FlightTask, ResultSummary};

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Other(String),
}

/// 一个任务写出的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub json_file: PathBuf,
    pub csv_file: PathBuf,
}

/// 航班结果存储
#[async_trait]
pub trait FlightStorage: Send + Sync {
    /// 保存一个任务的结果（JSON 和 CSV），同名文件直接覆盖
    async fn save_flights(&self, task: &FlightTask, flights: &[FlightRecord]) -> Result<SavedFiles, StorageError>;

    /// 保存本次运行的汇总
    async fn save_summary(&self, summaries: &[ResultSummary]) -> Result<PathBuf, StorageError>;
}

/// 本地文件系统存储
///
/// 布局：`{data_dir}/json/`、`{data_dir}/csv/` 以及 `{data_dir}/summary_*.json`。
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn json_dir(&self) -> PathBuf {
        self.base_path.join("json")
    }

    pub fn csv_dir(&self) -> PathBuf {
        self.base_path.join("csv")
    }

    /// 创建输出目录
    pub async fn prepare(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.json_dir()).await?;
        fs::create_dir_all(self.csv_dir()).await?;
        Ok(())
    }

    fn file_stem(task: &FlightTask) -> String {
        format!(
            "{}_{}_{}",
            task.route.origin,
            task.route.destination,
            task.date.file_token()
        )
    }
}

#[async_trait]
impl FlightStorage for LocalStorage {
    async fn save_flights(&self, task: &FlightTask, flights: &[FlightRecord]) -> Result<SavedFiles, StorageError> {
        self.prepare().await?;
        let stem = Self::file_stem(task);

        let json_file = self.json_dir().join(format!("{}.json", stem));
        write_json(&json_file, flights).await?;

        let csv_file = self.csv_dir().join(format!("{}.csv", stem));
        fs::write(&csv_file, to_csv(flights)?).await?;

        Ok(SavedFiles { json_file, csv_file })
    }

    async fn save_summary(&self, summaries: &[ResultSummary]) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.base_path).await?;
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.base_path.join(format!("summary_{}.json", timestamp));
        write_json(&path, summaries).await?;
        Ok(path)
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, body).await?;
    Ok(())
}

/// 序列化为带表头的 CSV
///
/// 空列表只输出表头。
pub fn to_csv(flights: &[FlightRecord]) -> Result<Vec<u8>, StorageError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if flights.is_empty() {
        writer.write_record(FlightRecord::FIELD_NAMES)?;
    }
    for flight in flights {
        writer.serialize(flight)?;
    }
    writer
        .into_inner()
        .map_err(|e| StorageError::Other(e.to_string()))
}

/// 以 `{base_name}_{n}.json` 保存，n 取目录中最小的未被占用的正整数
///
/// 通过 `create_new` 原子地占用文件名，并发写入不会拿到同一个编号。
pub async fn save_numbered_json(
    dir: &Path,
    base_name: &str,
    flights: &[FlightRecord],
) -> Result<PathBuf, StorageError> {
    fs::create_dir_all(dir).await?;
    let body = serde_json::to_vec_pretty(flights)?;

    for n in 1u32.. {
        let path = dir.join(format!("{}_{}.json", base_name, n));
        match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(mut file) => {
                file.write_all(&body).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Err(StorageError::Other(format!(
        "no free file name for {} in {}",
        base_name,
        dir.display()
    )))
}
