// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use flightfarm::application::usecases::run_farm::build_tasks;
    use flightfarm::domain::models::route::Route;
    use flightfarm::domain::models::task::FlightTask;
    use flightfarm::queue::task_queue::{InMemoryTaskQueue, TaskQueue};
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn tasks() -> Vec<FlightTask> {
        let routes = Route::all_pairs(&["Jeddah", "Dubai", "Riyadh"]);
        build_tasks(&routes, &[0, 7, 14], NaiveDate::from_ymd_opt(2024, 5, 3).unwrap())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_each_task_is_consumed_exactly_once() {
        let queue: Arc<dyn TaskQueue> = Arc::new(InMemoryTaskQueue::new());
        let all = tasks();
        for task in all.clone() {
            queue.enqueue(task).await.unwrap();
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let queue = queue.clone();
                let seen = seen.clone();
                tokio::spawn(async move {
                    while let Some(task) = queue.dequeue().await.unwrap() {
                        tokio::task::yield_now().await;
                        seen.lock().push(task.clone());
                        queue.complete(&task).await.unwrap();
                    }
                })
            })
            .collect();

        queue.join().await;
        for consumer in consumers {
            consumer.await.unwrap();
        }

        let seen = seen.lock();
        assert_eq!(seen.len(), all.len());
        let unique: HashSet<&FlightTask> = seen.iter().collect();
        assert_eq!(unique.len(), all.len());
        assert!(queue.is_empty());
    }
}
