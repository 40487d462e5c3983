// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScraperSettings;
use crate::domain::services::selectors::KayakSelectors;
use crate::engines::traits::{BrowserSession, EngineError, ResultRow};
use crate::engines::waits::Wait;
use tokio::time::sleep;
use tracing::{info, warn};

/// 结果页服务
#[derive(Debug, Clone)]
pub struct ResultsService {
    selectors: KayakSelectors,
    settings: ScraperSettings,
}

impl ResultsService {
    pub fn new(selectors: KayakSelectors, settings: ScraperSettings) -> Self {
        Self { selectors, settings }
    }

    /// 搜索提交后切换到结果标签页
    ///
    /// 地址不像结果页时只记录警告，继续后续流程。
    pub async fn follow_results_tab(&self, session: &mut dyn BrowserSession) -> Result<(), EngineError> {
        sleep(self.settings.tab_switch_wait()).await;

        if session.window_count().await? > 1 && session.switch_to_other_window().await? {
            info!("Switched to results tab");
        }

        let url = session.current_url().await?;
        if !looks_like_results_url(&url) {
            warn!("Unexpected URL after search: {}", url);
        }
        Ok(())
    }

    /// 等待结果行出现
    ///
    /// 先等待加载动画消失（失败忽略），再依次用由具体到宽泛的选择器等待结果行。
    /// 所有选择器都超时时返回空列表。
    pub async fn wait_for_rows(&self, session: &dyn BrowserSession) -> Result<Vec<Box<dyn ResultRow>>, EngineError> {
        info!("Waiting for results to load...");
        let wait = Wait::new(self.settings.results_timeout(), self.settings.poll_interval());

        if let Err(e) = wait.for_invisibility(session, &self.selectors.spinner).await {
            info!("Loading indicator wait failed, continuing anyway: {}", e);
        }

        for locator in &self.selectors.result_rows {
            match wait.for_all(session, locator).await {
                Ok(rows) => {
                    info!("Found {} flight results with {}", rows.len(), locator);
                    return Ok(rows);
                }
                Err(e) if e.is_timeout() => {
                    warn!("No results matched {}", locator);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(Vec::new())
    }
}

fn looks_like_results_url(url: &str) -> bool {
    url.contains("kayak") && url.contains("flights")
}
