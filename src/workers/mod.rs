// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供抓取工作器和工作器管理功能
pub mod manager;
pub mod scrape_worker;
pub mod worker;

pub use worker::Worker;
