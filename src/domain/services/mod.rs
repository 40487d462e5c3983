// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 选择器（selectors）：搜索页和结果页的元素定位器
/// - 表单服务（form_service）：填写并提交搜索表单
/// - 结果服务（results_service）：切换结果标签页并等待结果行
/// - 抽取服务（extraction_service）：逐字段回退地抽取航班记录
/// - 抓取服务（scrape_service）：单条航线单日的抓取编排与整体重试
pub mod extraction_service;
pub mod form_service;
pub mod results_service;
pub mod scrape_service;
pub mod selectors;
