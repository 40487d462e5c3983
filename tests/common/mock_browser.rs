// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 脚本化的内存浏览器
//!
//! `MockSite` 描述页面上哪些元素可见、各定位器匹配多少元素、哪些定位器返回哪些结果行，
//! 同一个站点上启动的所有会话共享状态，便于统计启动/关闭次数。

use async_trait::async_trait;
use flightfarm::domain::services::selectors::KayakSelectors;
use flightfarm::engines::traits::{BrowserSession, EngineError, Locator, ResultRow, SessionLauncher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const PRIMARY_ROWS: &str = r#"div[class="Fxw9-result-item-container"]"#;
pub const DATE_BUTTON_PREFIX: &str = r#"//div[@role="button" and contains(@aria-label, ""#;

/// 结果行
#[derive(Debug, Clone, Default)]
pub struct MockRow {
    fields: HashMap<String, String>,
    stale: bool,
}

impl MockRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 行内 `css` 匹配到文本为 `text` 的元素
    pub fn with(mut self, css: &str, text: &str) -> Self {
        self.fields.insert(css.to_string(), text.to_string());
        self
    }

    /// 读取任何字段都报告失效
    pub fn stale(mut self) -> Self {
        self.stale = true;
        self
    }

    /// 主选择器全部命中的一行
    pub fn full(time: &str, airline: &str, price: &str) -> Self {
        Self::new()
            .with(r#"div[class*="vmXl"] span"#, time)
            .with(r#"div[class*="c_cgF"]"#, airline)
            .with(r#"div[class*="price-text"]"#, price)
            .with(r#"div[class*="duration"]"#, "3h 10m")
            .with(r#"div[class*="stops"]"#, "nonstop")
    }
}

#[async_trait]
impl ResultRow for MockRow {
    async fn text_of(&self, css: &str) -> Result<String, EngineError> {
        if self.stale {
            return Err(EngineError::StaleElement(css.to_string()));
        }
        self.fields
            .get(css)
            .cloned()
            .ok_or_else(|| EngineError::ElementNotFound(css.to_string()))
    }
}

#[derive(Debug, Default)]
struct SiteState {
    visible: Vec<String>,
    counts: HashMap<String, usize>,
    rows: HashMap<String, Vec<MockRow>>,
    windows: usize,
    results_url: String,
    launch_failures: usize,
    launches: usize,
    quits: usize,
    clicks: Vec<String>,
    typed: Vec<(String, String)>,
    screenshots: Vec<PathBuf>,
}

impl SiteState {
    fn is_visible(&self, locator: &Locator) -> bool {
        let key = locator.as_str();
        self.visible.iter().any(|v| key == v || key.starts_with(v.as_str()))
    }

    fn count(&self, locator: &Locator) -> usize {
        self.counts.get(locator.as_str()).copied().unwrap_or(0)
    }
}

/// 模拟站点
#[derive(Debug, Clone, Default)]
pub struct MockSite {
    state: Arc<Mutex<SiteState>>,
}

impl MockSite {
    /// 搜索表单所有控件都可用，结果行挂在主选择器下
    pub fn kayak(rows: Vec<MockRow>) -> Self {
        let s = KayakSelectors::default();
        let site = Self::default();
        {
            let mut state = site.state.lock().unwrap();
            state.visible = vec![
                s.trip_type.as_str().to_string(),
                s.one_way.as_str().to_string(),
                s.origin.input.as_str().to_string(),
                s.destination.input.as_str().to_string(),
                s.search_button.as_str().to_string(),
                DATE_BUTTON_PREFIX.to_string(),
            ];
            state.counts.insert(s.origin.list.as_str().to_string(), 1);
            state.counts.insert(s.origin.items.as_str().to_string(), 3);
            state.counts.insert(s.destination.list.as_str().to_string(), 1);
            state.counts.insert(s.destination.items.as_str().to_string(), 2);
            if !rows.is_empty() {
                state.rows.insert(PRIMARY_ROWS.to_string(), rows);
            }
            state.windows = 2;
            state.results_url = "https://www.kayak.com/flights/JED-DXB/2024-05-03".to_string();
        }
        site
    }

    pub fn set_count(&self, locator: &Locator, count: usize) {
        self.state
            .lock()
            .unwrap()
            .counts
            .insert(locator.as_str().to_string(), count);
    }

    pub fn set_rows(&self, css: &str, rows: Vec<MockRow>) {
        self.state.lock().unwrap().rows.insert(css.to_string(), rows);
    }

    /// 移除一个可见模式（完整定位器或前缀）
    pub fn hide(&self, pattern: &str) {
        self.state.lock().unwrap().visible.retain(|v| v != pattern);
    }

    pub fn show(&self, pattern: &str) {
        self.state.lock().unwrap().visible.push(pattern.to_string());
    }

    pub fn set_windows(&self, windows: usize) {
        self.state.lock().unwrap().windows = windows;
    }

    pub fn fail_next_launches(&self, n: usize) {
        self.state.lock().unwrap().launch_failures = n;
    }

    pub fn launches(&self) -> usize {
        self.state.lock().unwrap().launches
    }

    pub fn quits(&self) -> usize {
        self.state.lock().unwrap().quits
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }

    pub fn typed(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().typed.clone()
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().screenshots.clone()
    }

    pub fn launcher(&self) -> Arc<MockLauncher> {
        Arc::new(MockLauncher { site: self.clone() })
    }

    pub fn session(&self) -> MockSession {
        MockSession {
            site: self.clone(),
            url: "about:blank".to_string(),
            switched: false,
        }
    }
}

pub struct MockLauncher {
    site: MockSite,
}

#[async_trait]
impl SessionLauncher for MockLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        {
            let mut state = self.site.state.lock().unwrap();
            if state.launch_failures > 0 {
                state.launch_failures -= 1;
                return Err(EngineError::Launch("chrome not found".to_string()));
            }
            state.launches += 1;
        }
        Ok(Box::new(self.site.session()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

pub struct MockSession {
    site: MockSite,
    url: String,
    switched: bool,
}

impl MockSession {
    fn state(&self) -> std::sync::MutexGuard<'_, SiteState> {
        self.site.state.lock().unwrap()
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, EngineError> {
        if self.switched {
            Ok(self.state().results_url.clone())
        } else {
            Ok(self.url.clone())
        }
    }

    async fn count(&self, locator: &Locator) -> Result<usize, EngineError> {
        Ok(self.state().count(locator))
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, EngineError> {
        Ok(self.state().is_visible(locator))
    }

    async fn click(&self, locator: &Locator) -> Result<(), EngineError> {
        let mut state = self.state();
        if state.is_visible(locator) || state.count(locator) > 0 {
            state.clicks.push(locator.as_str().to_string());
            Ok(())
        } else {
            Err(EngineError::ElementNotFound(locator.to_string()))
        }
    }

    async fn click_visible(&self, locator: &Locator, limit: Option<usize>) -> Result<usize, EngineError> {
        let mut state = self.state();
        let mut n = if state.is_visible(locator) { state.count(locator).max(1) } else { 0 };
        if let Some(max) = limit {
            n = n.min(max);
        }
        for _ in 0..n {
            state.clicks.push(locator.as_str().to_string());
        }
        Ok(n)
    }

    async fn clear_and_type(&self, locator: &Locator, text: &str) -> Result<(), EngineError> {
        let mut state = self.state();
        if !state.is_visible(locator) {
            return Err(EngineError::ElementNotFound(locator.to_string()));
        }
        state.typed.push((locator.as_str().to_string(), text.to_string()));
        Ok(())
    }

    async fn window_count(&self) -> Result<usize, EngineError> {
        Ok(self.state().windows.max(1))
    }

    async fn switch_to_other_window(&mut self) -> Result<bool, EngineError> {
        let windows = self.state().windows;
        self.switched = windows > 1;
        Ok(self.switched)
    }

    async fn rows(&self, locator: &Locator) -> Result<Vec<Box<dyn ResultRow>>, EngineError> {
        Ok(self
            .state()
            .rows
            .get(locator.as_str())
            .map(|rows| {
                rows.iter()
                    .cloned()
                    .map(|row| Box::new(row) as Box<dyn ResultRow>)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn screenshot(&self, path: &Path) -> Result<(), EngineError> {
        self.state().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        self.state().quits += 1;
        Ok(())
    }
}
