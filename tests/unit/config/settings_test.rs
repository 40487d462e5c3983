// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use flightfarm::config::settings::Settings;
    use std::path::PathBuf;

    #[test]
    fn test_load_settings_from_default_toml() {
        let settings = Settings::new().unwrap();

        // From config/default.toml
        assert_eq!(settings.farm.max_workers, 2);
        assert_eq!(settings.farm.days_ahead, vec![0, 7, 14]);
        assert!(settings.browser.headless);
        assert_eq!(settings.output.data_dir, PathBuf::from("data"));
        assert_eq!(settings.logging.file, "flight_scraper_farm.log");

        // Built-in defaults for sections the file leaves out
        assert_eq!(settings.farm.routes.len(), 5);
        assert_eq!(settings.scraper.max_retries, 2);
        assert_eq!(settings.scraper.base_url, "https://www.kayak.com/");
        assert!(!settings.browser.user_agents.is_empty());
    }

    #[test]
    fn test_bench_defaults() {
        let settings = Settings::new().unwrap();

        assert_eq!(settings.bench.origins, vec!["London", "Paris", "Berlin"]);
        assert_eq!(settings.bench.hybrid_workers, vec![1, 2, 4, 6, 8]);
        assert_eq!(settings.bench.priority_pairs.len(), 2);
        assert_eq!(settings.output.bench_base_name, "kayak_flights_EU");
    }
}
