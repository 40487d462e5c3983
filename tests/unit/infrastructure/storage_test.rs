// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use flightfarm::domain::models::flight::{FlightFields, FlightRecord};
    use flightfarm::domain::models::route::Route;
    use flightfarm::domain::models::search_date::SearchDate;
    use flightfarm::domain::models::task::{FlightTask, ResultSummary};
    use flightfarm::infrastructure::storage::{save_numbered_json, to_csv, FlightStorage, LocalStorage};
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn task() -> FlightTask {
        FlightTask::new(
            Route::new("Jeddah", "Dubai"),
            SearchDate::new(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()),
        )
    }

    fn flights(task: &FlightTask, n: usize) -> Vec<FlightRecord> {
        (1..=n)
            .map(|i| {
                FlightRecord::new(
                    &task.route,
                    &task.date,
                    i,
                    FlightFields {
                        airline: "Saudia".to_string(),
                        price: format!("${}", 150 + i),
                        ..FlightFields::default()
                    },
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_save_flights_writes_json_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let task = task();

        let saved = storage.save_flights(&task, &flights(&task, 2)).await.unwrap();

        assert_eq!(saved.json_file, dir.path().join("json").join("Jeddah_Dubai_May_3,_2024.json"));
        assert_eq!(saved.csv_file, dir.path().join("csv").join("Jeddah_Dubai_May_3,_2024.csv"));

        let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&saved.json_file).unwrap()).unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["flight_number"], 2);
        assert_eq!(records[1]["price"], "$152");
        assert_eq!(records[0]["time"], "Not available");

        let csv = std::fs::read_to_string(&saved.csv_file).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), FlightRecord::FIELD_NAMES.join(","));
        assert_eq!(lines.count(), 2);
    }

    #[tokio::test]
    async fn test_rerun_overwrites_same_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let task = task();

        let first = storage.save_flights(&task, &flights(&task, 3)).await.unwrap();
        let second = storage.save_flights(&task, &flights(&task, 1)).await.unwrap();

        assert_eq!(first, second);
        let json: Vec<FlightRecord> = serde_json::from_slice(&std::fs::read(&second.json_file).unwrap()).unwrap();
        assert_eq!(json.len(), 1);
        assert_eq!(std::fs::read_dir(dir.path().join("json")).unwrap().count(), 1);
    }

    #[test]
    fn test_empty_csv_has_header_only() {
        let body = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
        assert_eq!(
            body,
            "origin,destination,date,flight_number,scrape_time,time,airline,price,duration,stops\n"
        );
    }

    #[test]
    fn test_csv_quotes_date_with_comma() {
        let task = task();
        let body = String::from_utf8(to_csv(&flights(&task, 1)).unwrap()).unwrap();
        assert!(body.lines().nth(1).unwrap().starts_with("Jeddah,Dubai,\"May 3, 2024\",1,"));
    }

    #[tokio::test]
    async fn test_numbered_json_takes_lowest_free_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("kayak_flights_EU_1.json"), "[]").unwrap();
        std::fs::write(dir.path().join("kayak_flights_EU_3.json"), "[]").unwrap();

        let task = task();
        let second = save_numbered_json(dir.path(), "kayak_flights_EU", &flights(&task, 1))
            .await
            .unwrap();
        let fourth = save_numbered_json(dir.path(), "kayak_flights_EU", &[]).await.unwrap();

        assert_eq!(second, dir.path().join("kayak_flights_EU_2.json"));
        assert_eq!(fourth, dir.path().join("kayak_flights_EU_4.json"));
        assert_eq!(std::fs::read_to_string(&fourth).unwrap(), "[]");
        // Existing files are untouched
        assert_eq!(
            std::fs::read_to_string(dir.path().join("kayak_flights_EU_1.json")).unwrap(),
            "[]"
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_numbered_saves_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let base = base.clone();
                tokio::spawn(async move { save_numbered_json(&base, "kayak_flights_EU", &[]).await.unwrap() })
            })
            .collect();

        let mut paths = HashSet::new();
        for handle in handles {
            paths.insert(handle.await.unwrap());
        }

        assert_eq!(paths.len(), 8);
        let expected: HashSet<PathBuf> = (1..=8)
            .map(|n| base.join(format!("kayak_flights_EU_{}.json", n)))
            .collect();
        assert_eq!(paths, expected);
    }

    #[tokio::test]
    async fn test_summary_file_keeps_null_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let task = task();

        let mut success = ResultSummary::empty(&task);
        success.flights_found = 4;
        success.json_file = Some("data/json/x.json".to_string());
        success.csv_file = Some("data/csv/x.csv".to_string());
        let failure = ResultSummary::empty(&task);

        let path = storage.save_summary(&[success, failure]).await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("summary_"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "summary_20240503_101500.json".len());

        let json: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(json[0]["flights_found"], 4);
        assert_eq!(json[0]["date"], "May 3, 2024");
        assert!(json[1]["json_file"].is_null());
        assert!(json[1]["csv_file"].is_null());
    }
}
