// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 航线（route）：出发地与目的地
/// - 搜索日期（search_date）：按站点日期选择器格式呈现的出发日
/// - 航班记录（flight）：从单个结果行抽取出的完整记录
/// - 任务（task）：队列中的抓取单元及其结果汇总
pub mod flight;
pub mod route;
pub mod search_date;
pub mod task;
