// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{BrowserSession, EngineError, Locator, ResultRow, SessionLauncher};
use crate::engines::user_agents;
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::{Page, ScreenshotParams};
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const VISIBLE_JS: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    const s = window.getComputedStyle(this); \
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'; }";

const CLEAR_JS: &str = "function() { \
    this.focus(); \
    this.value = ''; \
    this.dispatchEvent(new Event('input', { bubbles: true })); }";

/// 单次启动使用的浏览器参数
///
/// 每次启动重新随机挑选 User-Agent。
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub headless: bool,
    pub proxy: Option<String>,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
    pub request_timeout: Duration,
    pub chrome_executable: Option<PathBuf>,
}

impl LaunchOptions {
    pub fn from_settings(settings: &BrowserSettings) -> Self {
        Self {
            headless: settings.headless,
            proxy: settings.proxy.clone().filter(|p| !p.trim().is_empty()),
            window_width: settings.window_width,
            window_height: settings.window_height,
            user_agent: user_agents::pick(&settings.user_agents),
            request_timeout: settings.request_timeout(),
            chrome_executable: settings.chrome_executable.clone(),
        }
    }

    /// 额外的命令行参数
    ///
    /// 无头模式由 `BrowserConfig` 自身处理，这里只放其余开关。
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--user-agent={}", self.user_agent),
            "--disable-notifications".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            "--disable-features=VizDisplayCompositor".to_string(),
        ];

        if self.headless {
            args.push(format!("--window-size={},{}", self.window_width, self.window_height));
        } else {
            args.push("--start-maximized".to_string());
        }

        if let Some(proxy) = &self.proxy {
            args.push(format!("--proxy-server={}", proxy));
        }

        args
    }
}

/// Chromium 启动器
///
/// 基于chromiumoxide，每次调用启动一个独立的浏览器进程，不在任务之间复用。
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError> {
        let options = LaunchOptions::from_settings(&self.settings);

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(options.request_timeout)
            .args(options.chrome_args());

        builder = if options.headless {
            builder
                .window_size(options.window_width, options.window_height)
                .viewport(Viewport {
                    width: options.window_width,
                    height: options.window_height,
                    ..Viewport::default()
                })
        } else {
            builder.with_head().viewport(None)
        };

        if let Some(exe) = &options.chrome_executable {
            builder = builder.chrome_executable(exe);
        }

        let config = builder.build().map_err(EngineError::Launch)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| EngineError::Launch(e.to_string()))?;

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(EngineError::Launch(e.to_string()));
            }
        };

        info!(
            headless = options.headless,
            proxy = options.proxy.as_deref().unwrap_or("-"),
            "Browser session started"
        );

        Ok(Box::new(ChromiumSession {
            browser,
            page,
            handler_task,
            closed: false,
        }))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// Chromium 浏览器会话
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    closed: bool,
}

impl ChromiumSession {
    async fn find_all(&self, locator: &Locator) -> Result<Vec<Element>, EngineError> {
        let found = match locator {
            Locator::Css(selector) => self.page.find_elements(selector.as_str()).await,
            Locator::XPath(expression) => self.page.find_xpaths(expression.as_str()).await,
        };
        match found {
            Ok(elements) => Ok(elements),
            Err(CdpError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(map_cdp(&locator.to_string(), e)),
        }
    }

    async fn first(&self, locator: &Locator) -> Result<Element, EngineError> {
        self.find_all(locator)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::ElementNotFound(locator.to_string()))
    }
}

async fn element_visible(element: &Element, context: &str) -> Result<bool, EngineError> {
    let returns = element
        .call_js_fn(VISIBLE_JS, false)
        .await
        .map_err(|e| map_cdp(context, e))?;
    Ok(returns
        .result
        .value
        .and_then(|v| v.as_bool())
        .unwrap_or(false))
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| EngineError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, EngineError> {
        let url = self.page.url().await.map_err(|e| map_cdp("current url", e))?;
        Ok(url.unwrap_or_default())
    }

    async fn count(&self, locator: &Locator) -> Result<usize, EngineError> {
        Ok(self.find_all(locator).await?.len())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, EngineError> {
        match self.find_all(locator).await?.first() {
            Some(element) => element_visible(element, &locator.to_string()).await,
            None => Ok(false),
        }
    }

    async fn click(&self, locator: &Locator) -> Result<(), EngineError> {
        let element = self.first(locator).await?;
        element
            .click()
            .await
            .map_err(|e| map_cdp(&locator.to_string(), e))?;
        Ok(())
    }

    async fn click_visible(&self, locator: &Locator, limit: Option<usize>) -> Result<usize, EngineError> {
        let context = locator.to_string();
        let mut clicked = 0;
        for element in self.find_all(locator).await? {
            if limit.is_some_and(|max| clicked >= max) {
                break;
            }
            if !element_visible(&element, &context).await.unwrap_or(false) {
                continue;
            }
            match element.click().await {
                Ok(_) => clicked += 1,
                Err(e) => warn!("Click on visible {} failed: {}", context, e),
            }
        }
        Ok(clicked)
    }

    async fn clear_and_type(&self, locator: &Locator, text: &str) -> Result<(), EngineError> {
        let context = locator.to_string();
        let element = self.first(locator).await?;
        element.click().await.map_err(|e| map_cdp(&context, e))?;
        element
            .call_js_fn(CLEAR_JS, false)
            .await
            .map_err(|e| map_cdp(&context, e))?;
        element
            .type_str(text)
            .await
            .map_err(|e| map_cdp(&context, e))?;
        Ok(())
    }

    async fn window_count(&self) -> Result<usize, EngineError> {
        let pages = self.browser.pages().await.map_err(|e| map_cdp("pages", e))?;
        Ok(pages.len())
    }

    async fn switch_to_other_window(&mut self) -> Result<bool, EngineError> {
        let current = self.page.target_id().clone();
        let pages = self.browser.pages().await.map_err(|e| map_cdp("pages", e))?;
        if pages.len() <= 1 {
            return Ok(false);
        }
        match pages.into_iter().find(|p| p.target_id() != &current) {
            Some(page) => {
                self.page = page;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn rows(&self, locator: &Locator) -> Result<Vec<Box<dyn ResultRow>>, EngineError> {
        Ok(self
            .find_all(locator)
            .await?
            .into_iter()
            .map(|element| Box::new(ChromiumRow { element }) as Box<dyn ResultRow>)
            .collect())
    }

    async fn screenshot(&self, path: &Path) -> Result<(), EngineError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page
            .save_screenshot(params, path)
            .await
            .map_err(|e| map_cdp("screenshot", e))?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            debug!("Browser process wait failed: {}", e);
        }
        self.handler_task.abort();
        closed.map_err(|e| map_cdp("close browser", e))?;
        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // The browser process itself is killed by Browser's own Drop
        if !self.closed {
            self.handler_task.abort();
        }
    }
}

/// 结果行
struct ChromiumRow {
    element: Element,
}

#[async_trait]
impl ResultRow for ChromiumRow {
    async fn text_of(&self, css: &str) -> Result<String, EngineError> {
        // querySelectorAll: no match is an empty list, not a describeNode(0) failure
        let matches = self
            .element
            .find_elements(css)
            .await
            .map_err(|e| map_cdp(css, e))?;
        let element = first_match(css, matches)?;
        let text = element.inner_text().await.map_err(|e| map_cdp(css, e))?;
        Ok(text.unwrap_or_default().trim().to_string())
    }
}

/// 行内查询的第一个结果，没有匹配时为 `ElementNotFound`
///
/// 只有行节点本身失效时查询才会报错，因此失效判断只针对查询错误。
fn first_match<T>(css: &str, matches: Vec<T>) -> Result<T, EngineError> {
    matches
        .into_iter()
        .next()
        .ok_or_else(|| EngineError::ElementNotFound(css.to_string()))
}

/// 将 CDP 错误归类为引擎错误
fn map_cdp(context: &str, err: CdpError) -> EngineError {
    match err {
        CdpError::NotFound => EngineError::ElementNotFound(context.to_string()),
        CdpError::Timeout => EngineError::Timeout(context.to_string()),
        other => {
            let message = other.to_string();
            if is_stale_message(&message) {
                EngineError::StaleElement(format!("{}: {}", context, message))
            } else if is_missing_message(&message) {
                EngineError::ElementNotFound(format!("{}: {}", context, message))
            } else {
                EngineError::Other(format!("{}: {}", context, message))
            }
        }
    }
}

/// 节点已从文档中移除（页面重新渲染）
pub fn is_stale_message(message: &str) -> bool {
    let message = message.to_lowercase();
    [
        "no node with given id",
        "could not find node with given id",
        "node is detached",
        "cannot find context with specified id",
        "does not belong to the document",
    ]
    .iter()
    .any(|p| message.contains(p))
}

fn is_missing_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("not found") || message.contains("no element")
}
