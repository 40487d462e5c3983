// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层单元测试
///
/// 测试结果文件、运行汇总和编号输出文件的写入
pub mod storage_test;
