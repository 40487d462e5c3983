// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::LoggingSettings;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// 控制台日志输出目标
///
/// 基准测试的子进程通过 stdout 回传结果，因此它们的控制台日志必须写到 stderr。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

/// 初始化日志系统
///
/// 控制台输出一份，同时以追加方式写入日志文件（不轮转）。
/// 日志文件无法打开时仅保留控制台输出。
pub fn init_telemetry(settings: &LoggingSettings, console: ConsoleTarget) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.filter.clone().into());

    let console_layer = match console {
        ConsoleTarget::Stdout => tracing_subscriber::fmt::layer().boxed(),
        ConsoleTarget::Stderr => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&settings.file);

    let file_layer = match file {
        Ok(file) => Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)),
        ),
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", settings.file, e);
            None
        }
    };

    // try_init: tests and child processes may initialise more than once
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
