//! Legend panel drawn next to (or below) the plot area.

use anyhow::{Result, anyhow};
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::types::LegendMode;
use super::util::{estimate_text_width_px, truncate_to_width};

// Layout constants shared by the estimator and the painter.
const FONT_PX: u32 = 14;
const TITLE_FONT_PX: u32 = 15;
const LINE_H: i32 = FONT_PX as i32 + 4;
const PAD: i32 = 8;
const MARKER_RADIUS: i32 = 4;
const MARKER_TO_TEXT: i32 = 12;
const TRAILING_GAP: i32 = 16;

fn item_width(label: &str) -> i32 {
    MARKER_TO_TEXT + MARKER_RADIUS + estimate_text_width_px(label, FONT_PX) as i32 + TRAILING_GAP
}

/// Greedy flow of labels into rows for the bottom band.
fn flow_rows<'a>(labels: &[&'a str], start_x: i32, total_w: i32) -> Vec<Vec<&'a str>> {
    let mut rows: Vec<Vec<&str>> = Vec::new();
    let mut cur: Vec<&str> = Vec::new();
    let mut x = start_x;
    for label in labels {
        let w = item_width(label);
        if x + w > total_w - PAD && !cur.is_empty() {
            rows.push(std::mem::take(&mut cur));
            x = start_x;
        }
        x += w;
        cur.push(label);
    }
    if !cur.is_empty() {
        rows.push(cur);
    }
    rows
}

/// Height in pixels the bottom legend band needs for `labels`.
pub fn estimate_bottom_legend_height_px(labels: &[String], start_x: i32, total_w: i32) -> i32 {
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let rows = flow_rows(&refs, start_x, total_w).len().max(1) as i32;
    PAD + TITLE_FONT_PX as i32 + 6 + rows * LINE_H + PAD
}

/// Draw the legend with its title (`Seri` / `Metrik`) into `area`.
pub fn draw_legend_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBColor)],
    title: &str,
    placement: LegendMode,
    axis_x_start_px: i32,
) -> Result<()> {
    area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (w_u32, _) = area.dim_in_pixel();
    let w = w_u32 as i32;

    let title_style = TextStyle::from((FontFamily::SansSerif, TITLE_FONT_PX))
        .pos(Pos::new(HPos::Left, VPos::Top));
    let label_style =
        TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    let start_x = match placement {
        LegendMode::Right => PAD,
        LegendMode::Bottom => axis_x_start_px,
    };
    area.draw(&Text::new(title, (start_x, PAD), title_style))
        .map_err(|e| anyhow!("{:?}", e))?;
    let first_row_y = PAD + TITLE_FONT_PX as i32 + 6 + LINE_H / 2;

    match placement {
        LegendMode::Right => {
            let text_x = start_x + MARKER_RADIUS * 2 + MARKER_TO_TEXT;
            let max_text_w = (w - text_x - PAD).max(40) as u32;
            for (i, (label, color)) in items.iter().enumerate() {
                let y = first_row_y + i as i32 * LINE_H;
                area.draw(&Circle::new(
                    (start_x + MARKER_RADIUS, y),
                    MARKER_RADIUS,
                    color.filled(),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
                let shown = truncate_to_width(label, FONT_PX, max_text_w);
                area.draw(&Text::new(shown, (text_x, y), label_style.clone()))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
        }
        LegendMode::Bottom => {
            let labels: Vec<&str> = items.iter().map(|(l, _)| l.as_str()).collect();
            let rows = flow_rows(&labels, start_x, w);
            let mut idx = 0usize;
            for (ri, row) in rows.iter().enumerate() {
                let y = first_row_y + ri as i32 * LINE_H;
                let mut x = start_x;
                for label in row {
                    let color = items[idx].1;
                    idx += 1;
                    area.draw(&Circle::new(
                        (x + MARKER_RADIUS, y),
                        MARKER_RADIUS,
                        color.filled(),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
                    area.draw(&Text::new(
                        label.to_string(),
                        (x + MARKER_RADIUS * 2 + MARKER_TO_TEXT / 2, y),
                        label_style.clone(),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
                    x += item_width(label);
                }
            }
        }
    }
    Ok(())
}
