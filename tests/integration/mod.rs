// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 集成测试
///
/// 从任务队列到结果文件完整地跑一遍抓取农场，浏览器由脚本化的模拟站点代替
#[path = "../common/mod.rs"]
mod common;

pub mod farm_test;
