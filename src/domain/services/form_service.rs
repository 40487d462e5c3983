// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScraperSettings;
use crate::domain::models::route::Route;
use crate::domain::models::search_date::SearchDate;
use crate::domain::services::scrape_service::ScrapeError;
use crate::domain::services::selectors::{AutocompleteField, KayakSelectors};
use crate::engines::traits::{BrowserSession, EngineError};
use crate::engines::waits::Wait;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// 搜索表单服务
///
/// 负责搜索页上的全部交互：弹窗、行程类型、出发地/目的地、日期以及提交。
/// 每一步都有各自的等待上限，失败时由上层的整次重试处理。
#[derive(Debug, Clone)]
pub struct FormService {
    selectors: KayakSelectors,
    settings: ScraperSettings,
}

impl FormService {
    pub fn new(selectors: KayakSelectors, settings: ScraperSettings) -> Self {
        Self { selectors, settings }
    }

    fn element_wait(&self) -> Wait {
        Wait::new(self.settings.element_timeout(), self.settings.poll_interval())
    }

    fn form_wait(&self) -> Wait {
        Wait::new(self.settings.form_timeout(), self.settings.poll_interval())
    }

    /// 在自动补全输入框中选择第一项建议
    ///
    /// 每次尝试：等待输入框可点击、清空、键入、等待下拉列表出现，
    /// 有候选项则点击第一项。任何等待或定位失败都只记录警告并稍后重试。
    ///
    /// # 返回值
    ///
    /// 选择成功返回 true，所有尝试都失败返回 false
    pub async fn select_from_dropdown(
        &self,
        session: &dyn BrowserSession,
        field: &AutocompleteField,
        text: &str,
    ) -> bool {
        let attempts = self.settings.dropdown_attempts.max(1);
        let wait = self.element_wait();

        for attempt in 1..=attempts {
            let outcome: Result<usize, EngineError> = async {
                wait.for_clickable(session, &field.input).await?;
                session.clear_and_type(&field.input, text).await?;
                sleep(self.settings.settle()).await;

                wait.for_presence(session, &field.list).await?;
                let items = session.count(&field.items).await?;
                if items > 0 {
                    session.click(&field.items).await?;
                    sleep(self.settings.settle()).await;
                }
                Ok(items)
            }
            .await;

            match outcome {
                Ok(items) if items > 0 => {
                    info!("Selected {} from {} suggestions for {}", text, items, field.label);
                    return true;
                }
                Ok(_) => warn!(
                    "No dropdown items found for {} '{}', attempt {}/{}",
                    field.label, text, attempt, attempts
                ),
                Err(e) => warn!(
                    "Error selecting {} '{}' (attempt {}/{}): {}",
                    field.label, text, attempt, attempts, e
                ),
            }

            if attempt < attempts {
                sleep(self.settings.dropdown_retry_pause()).await;
            }
        }

        error!(
            "Failed to select {} '{}' after {} attempts",
            field.label, text, attempts
        );
        false
    }

    /// 尽力关闭 Cookie 提示和其他遮挡弹窗，错误只记录不返回
    pub async fn dismiss_popups(&self, session: &dyn BrowserSession) {
        match session.click_visible(&self.selectors.consent_buttons, Some(1)).await {
            Ok(0) => {}
            Ok(_) => {
                info!("Dismissed consent popup");
                sleep(self.settings.settle()).await;
            }
            Err(e) => debug!("Consent popup check failed: {}", e),
        }

        match session.click_visible(&self.selectors.close_buttons, None).await {
            Ok(0) => {}
            Ok(n) => {
                info!("Clicked {} close buttons", n);
                sleep(self.settings.settle()).await;
            }
            Err(e) => debug!("Close button check failed: {}", e),
        }
    }

    /// 切换为单程
    pub async fn select_one_way(&self, session: &dyn BrowserSession) -> Result<(), ScrapeError> {
        self.form_wait()
            .for_clickable(session, &self.selectors.trip_type)
            .await?;
        session.click(&self.selectors.trip_type).await?;
        sleep(self.settings.settle()).await;

        self.element_wait()
            .for_clickable(session, &self.selectors.one_way)
            .await?;
        session.click(&self.selectors.one_way).await?;
        info!("Selected one-way trip");
        sleep(self.settings.settle()).await;
        Ok(())
    }

    /// 移除输入框中预填的地点
    pub async fn clear_prefilled(&self, session: &dyn BrowserSession) {
        match session.click_visible(&self.selectors.remove_value, None).await {
            Ok(0) => {}
            Ok(n) => {
                debug!("Removed {} prefilled values", n);
                sleep(self.settings.settle()).await;
            }
            Err(e) => warn!("Could not clear prefilled values: {}", e),
        }
    }

    /// 依次填写出发地和目的地
    pub async fn select_route(&self, session: &dyn BrowserSession, route: &Route) -> Result<(), ScrapeError> {
        if !self
            .select_from_dropdown(session, &self.selectors.origin, &route.origin)
            .await
        {
            return Err(ScrapeError::OriginSelection(route.origin.clone()));
        }
        self.settings.field_pause.pause().await;

        if !self
            .select_from_dropdown(session, &self.selectors.destination, &route.destination)
            .await
        {
            return Err(ScrapeError::DestinationSelection(route.destination.clone()));
        }
        self.settings.field_pause.pause().await;
        Ok(())
    }

    /// 选择出发日期
    ///
    /// 先按完整日期标签查找，超时后打开日期输入框再按日号查找。
    pub async fn select_departure_date(
        &self,
        session: &dyn BrowserSession,
        date: &SearchDate,
    ) -> Result<(), ScrapeError> {
        let full = self.selectors.date_button(date);
        match self.form_wait().for_clickable(session, &full).await {
            Ok(()) => {
                session.click(&full).await?;
                info!("Selected date {}", date);
            }
            Err(e) if e.is_timeout() => {
                warn!("Date button for {} not found, trying day number", date);
                session.click(&self.selectors.date_input).await?;
                sleep(self.settings.settle()).await;
                session.click(&self.selectors.day_button(date.day())).await?;
                info!("Selected day {} via date input", date.day());
            }
            Err(e) => return Err(e.into()),
        }

        self.settings.field_pause.pause().await;
        Ok(())
    }

    /// 点击搜索按钮
    pub async fn submit(&self, session: &dyn BrowserSession) -> Result<(), ScrapeError> {
        self.element_wait()
            .for_clickable(session, &self.selectors.search_button)
            .await?;
        session.click(&self.selectors.search_button).await?;
        info!("Clicked search button");
        Ok(())
    }
}
