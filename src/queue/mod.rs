// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供农场运行使用的内存 FIFO 任务队列
pub mod task_queue;
