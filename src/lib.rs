// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 抓取农场的运行用例
pub mod application;

/// 基准测试模块
///
/// 对比不同并发策略的耗时、重复率、覆盖率和质量
pub mod benchmark;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含航班相关实体和抓取流程服务
pub mod domain;

/// 引擎模块
///
/// 浏览器会话抽象及其 Chromium 实现
pub mod engines;

/// 基础设施模块
///
/// 结果文件存储和指标定义
pub mod infrastructure;

/// 队列模块
///
/// 实现任务队列
pub mod queue;

/// 工具模块
///
/// 提供日志、错误类型和重试策略
pub mod utils;

/// 工作器模块
///
/// 实现抓取工作器和工作器管理
pub mod workers;
