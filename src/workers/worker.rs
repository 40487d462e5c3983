// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::WorkerError;
use async_trait::async_trait;

/// 工作器
///
/// `run` 持续消费队列直到队列为空后返回；只有队列本身出错才返回错误。
#[async_trait]
pub trait Worker: Send + Sync {
    async fn run(&self) -> Result<(), WorkerError>;

    fn name(&self) -> &str;
}
