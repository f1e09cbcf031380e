//! Grouped bar chart of target vs achieved minutes per goal category.

use std::io::Cursor;

use anyhow::Context;
use base64::Engine;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};

use crate::config::ChartConfig;
use crate::progress::services::GoalProgress;

const MARGIN_LEFT: u32 = 48;
const MARGIN_RIGHT: u32 = 16;
const MARGIN_TOP: u32 = 16;
const MARGIN_BOTTOM: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarKind {
    Target,
    Achieved,
}

/// Pixel rectangle of one bar; `y` is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub kind: BarKind,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Drawable area inside the margins: (left, top, width, height).
fn plot_area(cfg: &ChartConfig) -> (u32, u32, u32, u32) {
    let width = cfg.width.saturating_sub(MARGIN_LEFT + MARGIN_RIGHT).max(1);
    let height = cfg.height.saturating_sub(MARGIN_TOP + MARGIN_BOTTOM).max(1);
    (MARGIN_LEFT, MARGIN_TOP, width, height)
}

/// Bar geometry, two bars per goal, scaled to the largest value.
pub fn layout(goals: &[GoalProgress], cfg: &ChartConfig) -> Vec<Bar> {
    if goals.is_empty() {
        return Vec::new();
    }
    let (left, top, width, height) = plot_area(cfg);
    let max = goals
        .iter()
        .flat_map(|g| [g.target_minutes, g.achieved_minutes])
        .fold(0.0_f64, f64::max);
    let scale = if max > 0.0 { height as f64 / max } else { 0.0 };

    let slot = width / goals.len() as u32;
    let ratio = cfg.bar_ratio.clamp(0.1, 1.0);
    let bar_width = ((slot as f32 * ratio) / 2.0).max(1.0) as u32;
    let pad = slot.saturating_sub(bar_width * 2) / 2;
    let baseline = top + height;

    let mut bars = Vec::with_capacity(goals.len() * 2);
    for (i, g) in goals.iter().enumerate() {
        let slot_x = left + slot * i as u32 + pad;
        for (offset, kind, value) in [
            (0, BarKind::Target, g.target_minutes),
            (bar_width, BarKind::Achieved, g.achieved_minutes),
        ] {
            let bar_height = ((value.max(0.0) * scale).round() as u32).min(height);
            bars.push(Bar {
                kind,
                x: slot_x + offset,
                y: baseline - bar_height,
                width: bar_width,
                height: bar_height,
            });
        }
    }
    bars
}

fn fill(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Render the chart as PNG bytes.
pub fn render_goal_chart(goals: &[GoalProgress], cfg: &ChartConfig) -> anyhow::Result<Vec<u8>> {
    let mut img: RgbImage = ImageBuffer::from_pixel(cfg.width, cfg.height, Rgb(cfg.background));

    for bar in layout(goals, cfg) {
        let color = match bar.kind {
            BarKind::Target => cfg.target_color,
            BarKind::Achieved => cfg.achieved_color,
        };
        fill(&mut img, bar.x, bar.y, bar.width, bar.height, Rgb(color));
    }

    let (left, top, width, height) = plot_area(cfg);
    let axis = Rgb(cfg.axis_color);
    fill(&mut img, left.saturating_sub(1), top, 1, height + 1, axis);
    fill(&mut img, left.saturating_sub(1), top + height, width + 1, 1, axis);

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .context("encode chart png")?;
    Ok(buf)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}
