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

use flightfarm::application::usecases::run_farm::RunFarmUseCase;
use flightfarm::config::settings::Settings;
use flightfarm::domain::services::scrape_service::KayakScraper;
use flightfarm::engines::chromium_engine::ChromiumLauncher;
use flightfarm::infrastructure::metrics::describe_metrics;
use flightfarm::infrastructure::storage::LocalStorage;
use flightfarm::utils::telemetry::{self, ConsoleTarget};
use std::sync::Arc;
use tracing::{error, info};

/// 主函数
///
/// 加载配置、初始化日志后运行一次抓取农场。运行中的错误只记录日志，不影响退出码。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration, using defaults: {}", e);
            Settings::default()
        }
    };

    // 2. Initialize logging
    telemetry::init_telemetry(&settings.logging, ConsoleTarget::Stdout);
    describe_metrics();
    info!("Starting Flight Scraper Farm");

    if let Err(e) = run(settings).await {
        error!("Main program error: {:?}", e);
    }
    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    // 3. Prepare output directories
    tokio::fs::create_dir_all(&settings.output.logs_dir).await?;
    let storage = Arc::new(LocalStorage::new(&settings.output.data_dir));
    storage.prepare().await?;

    // 4. Initialize components
    let launcher = Arc::new(ChromiumLauncher::new(settings.browser.clone()));
    let scraper = Arc::new(KayakScraper::new(
        launcher,
        settings.scraper.clone(),
        &settings.output.logs_dir,
    ));
    let use_case = RunFarmUseCase::new(scraper, storage, settings.farm.pre_task_pause);

    // 5. Run the farm
    let outcome = use_case
        .run_scraper_farm(
            &settings.farm.routes,
            &settings.farm.days_ahead,
            settings.farm.max_workers,
        )
        .await?;
    info!("Farm finished with {} workers", outcome.workers);

    use_case.save_summary(&outcome.summaries).await;
    Ok(())
}
