// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::common::mock_browser::{MockRow, MockSite};
use crate::common::{no_pause, scraper_settings};
use flightfarm::application::usecases::run_farm::RunFarmUseCase;
use flightfarm::domain::models::flight::FlightRecord;
use flightfarm::domain::models::route::Route;
use flightfarm::domain::models::search_date::SearchDate;
use flightfarm::domain::models::task::ResultSummary;
use flightfarm::domain::services::scrape_service::KayakScraper;
use flightfarm::domain::services::selectors::KayakSelectors;
use flightfarm::infrastructure::storage::LocalStorage;
use std::sync::Arc;

fn routes() -> Vec<Route> {
    vec![Route::new("Jeddah", "Dubai"), Route::new("Riyadh", "Cairo")]
}

fn farm(site: &MockSite, root: &std::path::Path) -> RunFarmUseCase {
    let scraper = KayakScraper::new(site.launcher(), scraper_settings(), root.join("logs"));
    RunFarmUseCase::new(
        Arc::new(scraper),
        Arc::new(LocalStorage::new(root.join("data"))),
        no_pause(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_farm_run_writes_results_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let site = MockSite::kayak(vec![
        MockRow::full("06:00 – 08:10", "Saudia", "$180"),
        MockRow::full("09:30 – 11:45", "flynas", "$150"),
        MockRow::full("13:05 – 15:20", "Emirates", "$320"),
    ]);
    let farm = farm(&site, dir.path());

    let outcome = farm.run_scraper_farm(&routes(), &[0, 7], 2).await.unwrap();

    assert_eq!(outcome.workers, 2);
    assert_eq!(outcome.summaries.len(), 4);
    assert!(outcome.summaries.iter().all(|s| s.flights_found == 3));
    assert_eq!(site.launches(), 4);
    assert_eq!(site.quits(), 4);

    let token = SearchDate::days_from_today(7).file_token();
    let json_path = dir.path().join("data").join("json").join(format!("Riyadh_Cairo_{}.json", token));
    let flights: Vec<FlightRecord> = serde_json::from_slice(&std::fs::read(&json_path).unwrap()).unwrap();
    assert_eq!(flights.len(), 3);
    assert_eq!(flights[2].airline, "Emirates");
    assert_eq!(flights[2].flight_number, 3);
    assert_eq!(flights[0].date, SearchDate::days_from_today(7).to_string());

    let csv_path = dir.path().join("data").join("csv").join(format!("Riyadh_Cairo_{}.csv", token));
    assert_eq!(std::fs::read_to_string(csv_path).unwrap().lines().count(), 4);

    let summary_path = farm.save_summary(&outcome.summaries).await.unwrap();
    assert_eq!(summary_path.parent(), Some(dir.path().join("data").as_path()));
    let saved: Vec<ResultSummary> = serde_json::from_slice(&std::fs::read(summary_path).unwrap()).unwrap();
    assert_eq!(saved.len(), 4);
    assert!(saved.iter().all(|s| s.json_file.is_some() && s.csv_file.is_some()));
}

#[tokio::test(start_paused = true)]
async fn test_farm_run_with_unreachable_form_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    let site = MockSite::kayak(vec![MockRow::full("06:00", "Saudia", "$180")]);
    site.set_count(&KayakSelectors::default().origin.items, 0);
    let farm = farm(&site, dir.path());

    let outcome = farm.run_scraper_farm(&routes(), &[0, 7], 3).await.unwrap();

    // Every task uses all three attempts
    assert_eq!(outcome.workers, 3);
    assert_eq!(outcome.summaries.len(), 4);
    assert!(outcome.summaries.iter().all(|s| !s.succeeded() && s.json_file.is_none()));
    assert_eq!(site.launches(), 12);
    assert_eq!(site.quits(), 12);

    let summary_path = farm.save_summary(&outcome.summaries).await.unwrap();
    let saved: serde_json::Value = serde_json::from_slice(&std::fs::read(summary_path).unwrap()).unwrap();
    assert!(saved.as_array().unwrap().iter().all(|s| s["csv_file"].is_null()));
}
