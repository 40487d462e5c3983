// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：航线、日期、航班记录和任务
/// - 服务（services）：表单交互、结果等待、字段抽取和单次抓取编排
///
/// 领域层只依赖浏览器会话的抽象接口，不依赖具体的浏览器实现。
pub mod models;
pub mod services;
