// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 2x2 柱状图
//!
//! 四个面板依次为执行时间、重复数、覆盖率、质量，每个面板顶部有对应指标颜色的标题条。
//! 每根柱子下方有策略色块，图底部的图例条按报告顺序排列全部策略色块；
//! 色块与策略名称的对应关系由 [`legend`] 给出并写入报告。

use std::path::Path;

use image::{ImageResult, Rgb, RgbImage};

use crate::benchmark::metrics::StrategyMetrics;

pub const CHART_WIDTH: u32 = 1400;
pub const CHART_HEIGHT: u32 = 1000;

const MARGIN: u32 = 40;
const LEGEND_HEIGHT: u32 = 60;
const SWATCH: u32 = 24;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);

pub const TIME_COLOR: Rgb<u8> = Rgb([70, 130, 180]);
pub const OVERLAP_COLOR: Rgb<u8> = Rgb([255, 165, 0]);
pub const COVERAGE_COLOR: Rgb<u8> = Rgb([0, 128, 0]);
pub const QUALITY_COLOR: Rgb<u8> = Rgb([128, 0, 128]);

/// 策略色块，按策略顺序循环使用
pub const STRATEGY_PALETTE: [Rgb<u8>; 10] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([127, 127, 127]),
    Rgb([188, 189, 34]),
    Rgb([23, 190, 207]),
];

pub fn strategy_color(index: usize) -> Rgb<u8> {
    STRATEGY_PALETTE[index % STRATEGY_PALETTE.len()]
}

/// 图例：策略名称及其色块颜色（`#rrggbb`）
pub fn legend(metrics: &[StrategyMetrics]) -> Vec<(String, String)> {
    metrics
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let Rgb([r, g, b]) = strategy_color(i);
            (m.label.clone(), format!("#{:02x}{:02x}{:02x}", r, g, b))
        })
        .collect()
}

/// 单行图例文本，追加到报告中
pub fn legend_line(metrics: &[StrategyMetrics]) -> String {
    let entries: Vec<String> = legend(metrics)
        .into_iter()
        .map(|(label, hex)| format!("{}={}", label, hex))
        .collect();
    format!("Chart legend: {}\n", entries.join(", "))
}

/// 绘制图表
pub fn render_chart(metrics: &[StrategyMetrics]) -> RgbImage {
    let mut img = RgbImage::from_pixel(CHART_WIDTH, CHART_HEIGHT, BACKGROUND);
    let panel_w = CHART_WIDTH / 2;
    let panel_h = (CHART_HEIGHT - LEGEND_HEIGHT) / 2;

    let panels: [(Vec<f64>, Rgb<u8>); 4] = [
        (metrics.iter().map(|m| m.time_secs).collect(), TIME_COLOR),
        (metrics.iter().map(|m| m.overlap as f64).collect(), OVERLAP_COLOR),
        (metrics.iter().map(|m| m.coverage).collect(), COVERAGE_COLOR),
        (metrics.iter().map(|m| m.quality).collect(), QUALITY_COLOR),
    ];

    for (i, (values, color)) in panels.iter().enumerate() {
        let x0 = (i as u32 % 2) * panel_w;
        let y0 = (i as u32 / 2) * panel_h;
        draw_panel(&mut img, x0, y0, panel_w, panel_h, values, *color);
    }

    draw_legend_strip(&mut img, metrics.len());
    img
}

/// 绘制并保存为 PNG，目录不存在时创建
pub fn save_chart(metrics: &[StrategyMetrics], path: &Path) -> ImageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    render_chart(metrics).save(path)
}

fn draw_panel(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, values: &[f64], color: Rgb<u8>) {
    let left = x0 + MARGIN;
    let right = x0 + w - MARGIN;
    let top = y0 + MARGIN;
    let baseline = y0 + h - MARGIN;

    // Title band in the metric colour
    fill_rect(img, left, y0 + 8, right - left, 12, color);
    fill_rect(img, left, baseline, right - left, 2, AXIS);
    fill_rect(img, left, top, 2, baseline - top, AXIS);

    if values.is_empty() {
        return;
    }

    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    let slot = (right - left) / values.len() as u32;
    let bar_w = (slot * 7 / 10).max(1);
    let usable = (baseline - top) as f64;

    for (i, value) in values.iter().enumerate() {
        let x = left + i as u32 * slot + (slot - bar_w) / 2;
        fill_rect(img, x, baseline + 6, bar_w, 10, strategy_color(i));
        if max <= 0.0 || *value <= 0.0 {
            continue;
        }
        let bar_h = ((value / max) * usable).round() as u32;
        fill_rect(img, x, baseline - bar_h, bar_w, bar_h, color);
    }
}

fn draw_legend_strip(img: &mut RgbImage, count: usize) {
    if count == 0 {
        return;
    }
    let top = CHART_HEIGHT - LEGEND_HEIGHT;
    fill_rect(img, MARGIN, top, CHART_WIDTH - 2 * MARGIN, 1, AXIS);

    let slot = (CHART_WIDTH - 2 * MARGIN) / count as u32;
    let y = top + (LEGEND_HEIGHT - SWATCH) / 2;
    for i in 0..count {
        let x = MARGIN + i as u32 * slot + slot.saturating_sub(SWATCH) / 2;
        fill_rect(img, x, y, SWATCH.min(slot), SWATCH, strategy_color(i));
    }
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}
