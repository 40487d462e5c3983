// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use flightfarm::benchmark::report::ReportWriter;
    use flightfarm::benchmark::strategies::{
        run_chunk_in_process, BenchError, ChunkRunner, PairResults, PairRunner, Strategy, StrategyRunner,
    };
    use flightfarm::benchmark::BenchmarkHarness;
    use flightfarm::domain::models::flight::{FlightFields, FlightRecord};
    use flightfarm::domain::models::route::Route;
    use flightfarm::domain::models::search_date::SearchDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// 每条航线返回两条记录
    #[derive(Default)]
    struct TwoFlights {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PairRunner for TwoFlights {
        async fn run_pair(&self, route: &Route) -> Vec<FlightRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let date = SearchDate::new(NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
            (1..=2)
                .map(|i| FlightRecord::new(route, &date, i, FlightFields::default()))
                .collect()
        }
    }

    /// 在当前进程内执行分块，代替子进程
    struct InProcessChunks {
        pairs: Arc<TwoFlights>,
        fail: bool,
        chunks: AtomicUsize,
    }

    #[async_trait]
    impl ChunkRunner for InProcessChunks {
        async fn run_chunk(&self, pairs: &[Route], concurrent: bool) -> Result<PairResults, BenchError> {
            self.chunks.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(BenchError::ChildProcess("exit status: 1".to_string()));
            }
            Ok(run_chunk_in_process(self.pairs.as_ref(), pairs, concurrent).await)
        }
    }

    fn pairs() -> Vec<Route> {
        Route::all_pairs(&["London", "Paris", "Berlin"])
    }

    fn build_runner(fail: bool) -> (StrategyRunner, Arc<TwoFlights>, Arc<InProcessChunks>) {
        let pairs = Arc::new(TwoFlights::default());
        let chunks = Arc::new(InProcessChunks {
            pairs: pairs.clone(),
            fail,
            chunks: AtomicUsize::new(0),
        });
        (StrategyRunner::new(pairs.clone(), chunks.clone(), Some(2)), pairs, chunks)
    }

    fn assert_in_pair_order(results: &PairResults, pairs: &[Route]) {
        assert_eq!(results.len(), pairs.len());
        for (flights, pair) in results.iter().zip(pairs) {
            assert_eq!(flights.len(), 2);
            assert!(flights.iter().all(|f| f.route() == *pair));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_strategy_keeps_pair_order() {
        let pairs = pairs();
        for strategy in Strategy::FIXED
            .into_iter()
            .chain([1, 2, 4, 8].map(Strategy::Hybrid))
        {
            let (runner, calls, _) = build_runner(false);
            let (results, _) = runner.run(strategy, &pairs).await;

            assert_in_pair_order(&results, &pairs);
            assert_eq!(calls.calls.load(Ordering::SeqCst), pairs.len(), "{}", strategy);
        }
    }

    #[tokio::test]
    async fn test_process_pool_runs_one_chunk_per_pair() {
        let pairs = pairs();
        let (runner, _, chunks) = build_runner(false);

        runner.run(Strategy::ProcessPool, &pairs).await;
        assert_eq!(chunks.chunks.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_hybrid_runs_one_chunk_per_worker() {
        let pairs = pairs();
        let (runner, _, chunks) = build_runner(false);

        runner.run(Strategy::Hybrid(4), &pairs).await;
        // 6 pairs split into chunks of 2
        assert_eq!(chunks.chunks.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failed_chunks_yield_empty_lists() {
        let pairs = pairs();
        for strategy in [Strategy::ProcessPool, Strategy::Hybrid(2)] {
            let (runner, calls, _) = build_runner(true);
            let (results, _) = runner.run(strategy, &pairs).await;

            assert_eq!(results.len(), pairs.len());
            assert!(results.iter().all(Vec::is_empty));
            assert_eq!(calls.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_harness_writes_report_and_chart() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("output_EU.txt");
        let chart_path = dir.path().join("plots").join("performance_metrics_EU.png");
        let priority = vec![Route::new("Berlin", "Paris"), Route::new("Berlin", "London")];

        let (runner, _, _) = build_runner(false);
        let harness = BenchmarkHarness::new(runner, ReportWriter::new(&report_path), priority, &chart_path);

        let metrics = harness.run_all(&pairs(), &[2]).await.unwrap();

        let labels: Vec<&str> = metrics.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Sequential", "AsyncPool", "ProcessPool", "ParallelMap", "Hybrid-2"]);
        for m in &metrics {
            assert_eq!(m.total, 12);
            assert_eq!(m.unique, 6);
            assert_eq!(m.overlap, 6);
            assert_eq!(m.coverage, 1.0);
            assert_eq!(m.quality, 1.0);
        }

        let report = std::fs::read_to_string(&report_path).unwrap();
        assert!(report.starts_with("Priority Pairs: [('Berlin', 'Paris'), ('Berlin', 'London')]\n"));
        assert!(report.contains("\n=== ParallelMap Metrics ===\n"));
        assert!(report.contains("Sequential Execution Time: "));
        assert!(report.contains("Number of threads: 2\nPriority Pairs: "));
        assert!(report.contains("Hybrid Execution Time (Process + Task): "));
        assert!(report.ends_with(
            "Chart legend: Sequential=#1f77b4, AsyncPool=#ff7f0e, ProcessPool=#2ca02c, ParallelMap=#d62728, Hybrid-2=#9467bd\n"
        ));
        assert!(chart_path.exists());
    }
}
