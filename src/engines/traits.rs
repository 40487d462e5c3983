// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器启动失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 元素未找到
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// 元素已失效（页面已重新渲染）
    #[error("Stale element: {0}")]
    StaleElement(String),
    /// 等待超时
    #[error("Timeout waiting for {0}")]
    Timeout(String),
    /// 文件读写错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 是否为"暂时还没出现"类错误，轮询等待时可以忽略
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EngineError::ElementNotFound(_) | EngineError::StaleElement(_) | EngineError::Timeout(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, EngineError::Timeout(_))
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, EngineError::StaleElement(_))
    }
}

/// 元素定位器
///
/// 页面级定位支持 CSS 和 XPath；XPath 只用于 CSS 无法表达的按文本匹配。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expression: impl Into<String>) -> Self {
        Locator::XPath(expression.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Locator::Css(s) | Locator::XPath(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css={}", s),
            Locator::XPath(s) => write!(f, "xpath={}", s),
        }
    }
}

/// 结果行句柄
///
/// 只暴露按行内 CSS 选择器读取文本的能力。
#[async_trait]
pub trait ResultRow: Send + Sync {
    /// 读取行内第一个匹配元素的可见文本
    ///
    /// 未找到返回 `ElementNotFound`，行已失效返回 `StaleElement`
    async fn text_of(&self, css: &str) -> Result<String, EngineError>;
}

/// 浏览器会话
///
/// 一个会话独占一个浏览器实例，只被一个工作器在一个任务期间使用。
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 导航到指定地址并等待加载
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError>;

    /// 当前标签页地址
    async fn current_url(&self) -> Result<String, EngineError>;

    /// 匹配元素数量
    async fn count(&self, locator: &Locator) -> Result<usize, EngineError>;

    /// 第一个匹配元素是否存在且可见
    async fn is_visible(&self, locator: &Locator) -> Result<bool, EngineError>;

    /// 点击第一个匹配元素
    async fn click(&self, locator: &Locator) -> Result<(), EngineError>;

    /// 依次点击当前可见的匹配元素，最多 `limit` 个，返回实际点击数
    async fn click_visible(&self, locator: &Locator, limit: Option<usize>) -> Result<usize, EngineError>;

    /// 清空输入框后键入文本
    async fn clear_and_type(&self, locator: &Locator, text: &str) -> Result<(), EngineError>;

    /// 当前打开的标签页数量
    async fn window_count(&self) -> Result<usize, EngineError>;

    /// 切换到任意一个非当前的标签页，没有其他标签页时返回 false
    async fn switch_to_other_window(&mut self) -> Result<bool, EngineError>;

    /// 获取全部匹配的结果行
    async fn rows(&self, locator: &Locator) -> Result<Vec<Box<dyn ResultRow>>, EngineError>;

    /// 保存当前页面截图（PNG）
    async fn screenshot(&self, path: &Path) -> Result<(), EngineError>;

    /// 关闭浏览器，释放所有资源
    async fn quit(&mut self) -> Result<(), EngineError>;
}

/// 浏览器会话启动器
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    /// 启动一个全新的、已完成配置的浏览器会话
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, EngineError>;

    /// 启动器名称
    fn name(&self) -> &'static str;
}
