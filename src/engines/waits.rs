// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 显式等待
//!
//! 以固定间隔轮询会话状态直到条件满足或超时。轮询期间的"元素尚未出现"类错误视为条件未满足，
//! 其他错误立即返回。

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

use crate::engines::traits::{BrowserSession, EngineError, Locator, ResultRow};

/// 等待参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wait {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Wait {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// 轮询 `check` 直到它返回 `Some`
    pub async fn until<T, F, Fut>(&self, what: &str, mut check: F) -> Result<T, EngineError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, EngineError>>,
    {
        let deadline = Instant::now() + self.timeout;
        loop {
            match check().await {
                Ok(Some(value)) => return Ok(value),
                Ok(None) => {}
                Err(e) if e.is_transient() => {}
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(EngineError::Timeout(format!(
                    "{} after {:.1}s",
                    what,
                    self.timeout.as_secs_f64()
                )));
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    /// 等待元素可见（近似"可点击"）
    pub async fn for_clickable(&self, session: &dyn BrowserSession, locator: &Locator) -> Result<(), EngineError> {
        self.until(&format!("clickable {}", locator), || async move {
            Ok(session.is_visible(locator).await?.then_some(()))
        })
        .await
    }

    /// 等待元素出现在 DOM 中
    pub async fn for_presence(&self, session: &dyn BrowserSession, locator: &Locator) -> Result<(), EngineError> {
        self.until(&format!("presence of {}", locator), || async move {
            Ok((session.count(locator).await? > 0).then_some(()))
        })
        .await
    }

    /// 等待元素不可见或消失
    pub async fn for_invisibility(&self, session: &dyn BrowserSession, locator: &Locator) -> Result<(), EngineError> {
        self.until(&format!("invisibility of {}", locator), || async move {
            match session.is_visible(locator).await {
                Ok(visible) => Ok((!visible).then_some(())),
                // Gone from the DOM counts as invisible
                Err(EngineError::ElementNotFound(_)) | Err(EngineError::StaleElement(_)) => Ok(Some(())),
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// 等待至少一个匹配元素出现并返回全部匹配
    pub async fn for_all(
        &self,
        session: &dyn BrowserSession,
        locator: &Locator,
    ) -> Result<Vec<Box<dyn ResultRow>>, EngineError> {
        self.until(&format!("all of {}", locator), || async move {
            let rows = session.rows(locator).await?;
            Ok((!rows.is_empty()).then_some(rows))
        })
        .await
    }
}
