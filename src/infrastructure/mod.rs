// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - 指标（metrics）：指标名称与描述
/// - 存储（storage）：JSON/CSV 结果文件、运行汇总和基准测试输出
pub mod metrics;
pub mod storage;
