// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::task::FlightTask;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Notify;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 确认次数多于出队次数
    #[error("Task completed more times than it was queued: {0}")]
    UnbalancedComplete(String),
}

/// 任务队列特质
///
/// 语义：`enqueue` 放入任务，`dequeue` 取出下一个（队列为空返回 None），
/// `complete` 确认一个已取出的任务处理完毕，`join` 等待所有放入的任务都被确认。
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// 入队任务
    async fn enqueue(&self, task: FlightTask) -> Result<(), QueueError>;

    /// 出队任务
    async fn dequeue(&self) -> Result<Option<FlightTask>, QueueError>;

    /// 完成任务
    async fn complete(&self, task: &FlightTask) -> Result<(), QueueError>;

    /// 等待全部任务完成
    async fn join(&self);

    /// 尚未出队的任务数
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default)]
struct QueueState {
    tasks: VecDeque<FlightTask>,
    /// 已入队但尚未确认的任务数
    unfinished: usize,
}

/// 内存 FIFO 任务队列
#[derive(Debug, Default)]
pub struct InMemoryTaskQueue {
    state: Mutex<QueueState>,
    all_done: Notify,
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已入队但尚未确认的任务数
    pub fn unfinished(&self) -> usize {
        self.state.lock().unfinished
    }
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, task: FlightTask) -> Result<(), QueueError> {
        let mut state = self.state.lock();
        state.tasks.push_back(task);
        state.unfinished += 1;
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<FlightTask>, QueueError> {
        Ok(self.state.lock().tasks.pop_front())
    }

    async fn complete(&self, task: &FlightTask) -> Result<(), QueueError> {
        let remaining = {
            let mut state = self.state.lock();
            if state.unfinished == 0 {
                return Err(QueueError::UnbalancedComplete(task.to_string()));
            }
            state.unfinished -= 1;
            state.unfinished
        };

        if remaining == 0 {
            self.all_done.notify_waiters();
        }
        Ok(())
    }

    async fn join(&self) {
        loop {
            // Register before checking so a concurrent notify is not lost
            let notified = self.all_done.notified();
            if self.state.lock().unfinished == 0 {
                return;
            }
            notified.await;
        }
    }

    fn len(&self) -> usize {
        self.state.lock().tasks.len()
    }
}

#[async_trait]
impl<T: TaskQueue + ?Sized> TaskQueue for Arc<T> {
    async fn enqueue(&self, task: FlightTask) -> Result<(), QueueError> {
        (**self).enqueue(task).await
    }

    async fn dequeue(&self) -> Result<Option<FlightTask>, QueueError> {
        (**self).dequeue().await
    }

    async fn complete(&self, task: &FlightTask) -> Result<(), QueueError> {
        (**self).complete(task).await
    }

    async fn join(&self) {
        (**self).join().await
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
