// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScraperSettings;
use crate::domain::models::flight::FlightRecord;
use crate::domain::models::route::Route;
use crate::domain::models::search_date::SearchDate;
use crate::domain::services::extraction_service::extract_flights;
use crate::domain::services::form_service::FormService;
use crate::domain::services::results_service::ResultsService;
use crate::domain::services::selectors::KayakSelectors;
use crate::engines::traits::{BrowserSession, EngineError, SessionLauncher};
use crate::infrastructure::metrics::{SCRAPE_ATTEMPTS_TOTAL, SCRAPE_RETRIES_TOTAL};
use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

/// 单次抓取尝试的错误
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 浏览器或页面交互错误
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// 出发地选择失败
    #[error("Failed to select origin: {0}")]
    OriginSelection(String),

    /// 目的地选择失败
    #[error("Failed to select destination: {0}")]
    DestinationSelection(String),

    /// 所有结果选择器都没有匹配到结果行
    #[error("No results found")]
    NoResults,
}

/// 航班抓取器
#[async_trait]
pub trait FlightScraper: Send + Sync {
    /// 抓取一条航线在某一天的全部航班
    ///
    /// 永不返回错误：所有失败都在内部重试，重试耗尽后返回空列表。
    async fn scrape(&self, route: &Route, date: &SearchDate) -> Vec<FlightRecord>;
}

#[async_trait]
impl<T: FlightScraper + ?Sized> FlightScraper for Arc<T> {
    async fn scrape(&self, route: &Route, date: &SearchDate) -> Vec<FlightRecord> {
        (**self).scrape(route, date).await
    }
}

/// Kayak 抓取器
///
/// 每次尝试都启动一个全新的浏览器会话，尝试结束（无论成败）都会关闭。
pub struct KayakScraper {
    launcher: Arc<dyn SessionLauncher>,
    settings: ScraperSettings,
    form: FormService,
    results: ResultsService,
    screenshot_dir: PathBuf,
}

impl KayakScraper {
    pub fn new(launcher: Arc<dyn SessionLauncher>, settings: ScraperSettings, screenshot_dir: impl Into<PathBuf>) -> Self {
        let selectors = KayakSelectors::default();
        Self {
            launcher,
            form: FormService::new(selectors.clone(), settings.clone()),
            results: ResultsService::new(selectors, settings.clone()),
            settings,
            screenshot_dir: screenshot_dir.into(),
        }
    }

    async fn attempt(
        &self,
        session: &mut dyn BrowserSession,
        route: &Route,
        date: &SearchDate,
    ) -> Result<Vec<FlightRecord>, ScrapeError> {
        session.navigate(&self.settings.base_url).await?;
        info!("Opened {}", self.settings.base_url);
        self.settings.page_load_pause.pause().await;

        self.form.dismiss_popups(&*session).await;
        self.form.select_one_way(&*session).await?;
        self.form.clear_prefilled(&*session).await;
        self.form.select_route(&*session, route).await?;
        self.form.select_departure_date(&*session, date).await?;
        self.form.submit(&*session).await?;

        self.results.follow_results_tab(session).await?;
        let rows = self.results.wait_for_rows(&*session).await?;

        if rows.is_empty() {
            let path = self.screenshot_dir.join(format!(
                "error_screenshot_{}_{}_{}.png",
                route.origin,
                route.destination,
                Utc::now().timestamp()
            ));
            match session.screenshot(&path).await {
                Ok(()) => warn!("No results found. Screenshot saved to {}", path.display()),
                Err(e) => warn!("No results found and screenshot failed: {}", e),
            }
            return Err(ScrapeError::NoResults);
        }

        Ok(extract_flights(&rows, route, date).await)
    }

    async fn run_attempt(&self, route: &Route, date: &SearchDate) -> Result<Vec<FlightRecord>, ScrapeError> {
        let engine = self.launcher.name();
        let mut session = self.launcher.launch().await?;
        info!("Launched {} session", engine);
        let outcome = self.attempt(session.as_mut(), route, date).await;

        match session.quit().await {
            Ok(()) => info!("Browser closed ({})", engine),
            Err(e) => warn!("Failed to close {} browser cleanly: {}", engine, e),
        }
        outcome
    }
}

#[async_trait]
impl FlightScraper for KayakScraper {
    #[instrument(skip_all, fields(route = %route, date = %date))]
    async fn scrape(&self, route: &Route, date: &SearchDate) -> Vec<FlightRecord> {
        let policy = self.settings.retry_policy();
        let mut retries = 0;

        loop {
            counter!(SCRAPE_ATTEMPTS_TOTAL).increment(1);

            match self.run_attempt(route, date).await {
                Ok(flights) => return flights,
                Err(ScrapeError::NoResults) => {}
                Err(e) => error!("Error during scraping {} on {}: {:?}", route, date, e),
            }

            if !policy.should_retry(retries) {
                error!(
                    "Failed to scrape {} on {} after {} attempts",
                    route,
                    date,
                    policy.total_attempts()
                );
                return Vec::new();
            }

            retries += 1;
            counter!(SCRAPE_RETRIES_TOTAL).increment(1);
            info!("Retrying ({}/{})...", retries, policy.max_retries);
            tokio::time::sleep(policy.calculate_backoff()).await;
        }
    }
}
