// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use std::time::Duration;

/// 抖动区间
///
/// 固定基础时长加上 `[min_extra, max_extra)` 内的均匀随机时长，
/// 用于页面停顿和重试退避，避免可被检测的固定节奏。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct JitterBand {
    /// 基础时长（秒）
    pub base_secs: f64,
    /// 随机附加时长下限（秒）
    pub min_extra_secs: f64,
    /// 随机附加时长上限（秒）
    pub max_extra_secs: f64,
}

impl JitterBand {
    pub const fn new(base_secs: f64, min_extra_secs: f64, max_extra_secs: f64) -> Self {
        Self {
            base_secs,
            min_extra_secs,
            max_extra_secs,
        }
    }

    /// 无随机部分的固定时长
    pub const fn fixed(secs: f64) -> Self {
        Self::new(secs, 0.0, 0.0)
    }

    /// 采样一次停顿时长
    pub fn sample(&self) -> Duration {
        let extra = if self.max_extra_secs > self.min_extra_secs {
            rand::random_range(self.min_extra_secs..self.max_extra_secs)
        } else {
            self.min_extra_secs
        };
        Duration::from_secs_f64((self.base_secs + extra).max(0.0))
    }

    /// 可能的最短停顿
    pub fn lower_bound(&self) -> Duration {
        Duration::from_secs_f64((self.base_secs + self.min_extra_secs).max(0.0))
    }

    /// 可能的最长停顿
    pub fn upper_bound(&self) -> Duration {
        Duration::from_secs_f64((self.base_secs + self.max_extra_secs.max(self.min_extra_secs)).max(0.0))
    }

    /// 按采样时长休眠
    pub async fn pause(&self) {
        tokio::time::sleep(self.sample()).await;
    }
}

/// 重试策略配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// 首次尝试之外的最大重试次数
    pub max_retries: u32,
    /// 每次重试前的退避区间
    pub backoff: JitterBand,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: JitterBand::new(5.0, 2.0, 5.0),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: JitterBand) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// 计算下次重试的退避时间
    pub fn calculate_backoff(&self) -> Duration {
        self.backoff.sample()
    }

    /// 是否应该重试
    ///
    /// `retries_so_far` 为已经发生过的重试次数
    pub fn should_retry(&self, retries_so_far: u32) -> bool {
        retries_so_far < self.max_retries
    }

    /// 包含首次尝试在内的总尝试次数
    pub fn total_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}
