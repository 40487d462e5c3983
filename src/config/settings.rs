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

use crate::domain::models::route::Route;
use crate::utils::retry_policy::{JitterBand, RetryPolicy};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含浏览器、抓取流程、任务农场、输出目录、日志和基准测试等所有配置项。
/// 每个分节都有完整的默认值，配置文件和环境变量只需覆盖需要修改的键。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// 浏览器配置
    #[serde(default)]
    pub browser: BrowserSettings,
    /// 抓取流程配置
    #[serde(default)]
    pub scraper: ScraperSettings,
    /// 任务农场配置
    #[serde(default)]
    pub farm: FarmSettings,
    /// 输出配置
    #[serde(default)]
    pub output: OutputSettings,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingSettings,
    /// 基准测试配置
    #[serde(default)]
    pub bench: BenchSettings,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 代理服务器地址（可选）
    pub proxy: Option<String>,
    /// 无头模式下的窗口宽度
    pub window_width: u32,
    /// 无头模式下的窗口高度
    pub window_height: u32,
    /// CDP 请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 轮换使用的 User-Agent 池
    pub user_agents: Vec<String>,
    /// 指定浏览器可执行文件（可选，默认自动探测）
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            proxy: None,
            window_width: 1920,
            window_height: 1080,
            request_timeout_secs: 30,
            user_agents: crate::engines::user_agents::default_pool(),
            chrome_executable: None,
        }
    }
}

impl BrowserSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 抓取流程配置设置
///
/// 所有等待上限和停顿区间都集中在这里，测试可以整体缩短。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    /// 站点根地址
    pub base_url: String,
    /// 外层重试次数（不含首次尝试）
    pub max_retries: u32,
    /// 自动补全下拉框的尝试次数
    pub dropdown_attempts: u32,
    /// 普通元素等待上限（秒）
    pub element_timeout_secs: u64,
    /// 行程类型控件和日期控件的等待上限（秒）
    pub form_timeout_secs: u64,
    /// 结果页等待上限（秒）
    pub results_timeout_secs: u64,
    /// 等待轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 点击搜索后等待新标签页的时间（秒）
    pub tab_switch_wait_secs: f64,
    /// 单次点击或输入后的固定停顿（秒）
    pub settle_secs: f64,
    /// 下拉框未出现时的重试停顿（秒）
    pub dropdown_retry_pause_secs: f64,
    /// 打开首页后的停顿区间
    pub page_load_pause: JitterBand,
    /// 表单字段之间的停顿区间
    pub field_pause: JitterBand,
    /// 外层重试前的退避区间
    pub retry_backoff: JitterBand,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.kayak.com/".to_string(),
            max_retries: 2,
            dropdown_attempts: 3,
            element_timeout_secs: 10,
            form_timeout_secs: 15,
            results_timeout_secs: 120,
            poll_interval_ms: 250,
            tab_switch_wait_secs: 5.0,
            settle_secs: 1.0,
            dropdown_retry_pause_secs: 2.0,
            page_load_pause: JitterBand::new(3.0, 1.0, 3.0),
            field_pause: JitterBand::new(1.0, 0.5, 1.5),
            retry_backoff: JitterBand::new(5.0, 2.0, 5.0),
        }
    }
}

impl ScraperSettings {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn form_timeout(&self) -> Duration {
        Duration::from_secs(self.form_timeout_secs)
    }

    pub fn results_timeout(&self) -> Duration {
        Duration::from_secs(self.results_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn tab_switch_wait(&self) -> Duration {
        Duration::from_secs_f64(self.tab_switch_wait_secs.max(0.0))
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs_f64(self.settle_secs.max(0.0))
    }

    pub fn dropdown_retry_pause(&self) -> Duration {
        Duration::from_secs_f64(self.dropdown_retry_pause_secs.max(0.0))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_backoff)
    }
}

/// 任务农场配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FarmSettings {
    /// 需要抓取的航线
    pub routes: Vec<Route>,
    /// 相对今天的出发日偏移（天）
    pub days_ahead: Vec<u32>,
    /// 最大并发工作器数量
    pub max_workers: usize,
    /// 每个任务开始前的随机停顿
    pub pre_task_pause: JitterBand,
}

impl Default for FarmSettings {
    fn default() -> Self {
        Self {
            routes: default_routes(),
            days_ahead: vec![0, 7, 14],
            max_workers: 3,
            pre_task_pause: JitterBand::new(0.0, 1.0, 5.0),
        }
    }
}

/// 内置的热门航线
pub fn default_routes() -> Vec<Route> {
    [
        ("Jeddah", "Dubai"),
        ("Jeddah", "Riyadh"),
        ("Dubai", "London"),
        ("Riyadh", "Cairo"),
        ("Jeddah", "Istanbul"),
    ]
    .into_iter()
    .map(|(o, d)| Route::new(o, d))
    .collect()
}

/// 输出配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// 数据目录，包含 json/、csv/ 和运行汇总
    pub data_dir: PathBuf,
    /// 诊断截图目录
    pub logs_dir: PathBuf,
    /// 基准测试单航线结果目录
    pub bench_dir: PathBuf,
    /// 基准测试结果文件名前缀
    pub bench_base_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            logs_dir: PathBuf::from("logs"),
            bench_dir: PathBuf::from("kayak_flights_data_EU"),
            bench_base_name: "kayak_flights_EU".to_string(),
        }
    }
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 追加写入的日志文件
    pub file: String,
    /// 未设置 RUST_LOG 时使用的过滤规则
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: "flight_scraper_farm.log".to_string(),
            filter: "info".to_string(),
        }
    }
}

/// 基准测试配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BenchSettings {
    /// 参与两两组合的城市
    pub origins: Vec<String>,
    /// 用于计算质量指标的优先航线
    pub priority_pairs: Vec<Route>,
    /// 混合策略扫描的进程数
    pub hybrid_workers: Vec<usize>,
    /// 线程池/进程池的并发上限（缺省为 CPU 数）
    pub pool_workers: Option<usize>,
    /// 追加写入的文本报告
    pub report_file: PathBuf,
    /// 图表目录
    pub plot_dir: PathBuf,
    /// 图表文件名
    pub plot_file: String,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            origins: vec!["London".into(), "Paris".into(), "Berlin".into()],
            priority_pairs: vec![Route::new("Berlin", "Paris"), Route::new("Berlin", "London")],
            hybrid_workers: vec![1, 2, 4, 6, 8],
            pool_workers: None,
            report_file: PathBuf::from("output_EU.txt"),
            plot_dir: PathBuf::from("plots"),
            plot_file: "performance_metrics_EU.png".to_string(),
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 加载顺序：内置默认值 → `config/default` → `config/{APP_ENVIRONMENT}` → `FLIGHTFARM__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("FLIGHTFARM")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("farm.days_ahead")
                    .with_list_parse_key("bench.origins")
                    .with_list_parse_key("bench.hybrid_workers")
                    .with_list_parse_key("browser.user_agents"),
            );

        builder.build()?.try_deserialize()
    }
}
