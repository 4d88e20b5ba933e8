//! Render a [`LineChart`] to **SVG** or **PNG** with plotters.
//!
//! The `ab_glyph` text path does not discover OS fonts, so a TrueType file is
//! registered once as "sans-serif": `$TALKDATA_FONT` if set, otherwise the first
//! common system font found.

use super::format::{NumberFormat, format_tr};
use super::legend::{draw_legend_panel, estimate_bottom_legend_height_px};
use super::types::{AxisKind, LegendMode, LineChart};
use super::util::{estimate_text_width_px, from_hex, office_color, value_range};
use crate::calendar::format_date_tr;
use crate::models::CanonicalMonth;
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use log::debug;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::OnceLock;

const FONT_CANDIDATES: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT_STATE: OnceLock<Result<String, String>> = OnceLock::new();

fn register_sans_serif() -> Result<String, String> {
    let from_env = std::env::var("TALKDATA_FONT").ok();
    let candidates = from_env
        .iter()
        .map(String::as_str)
        .chain(FONT_CANDIDATES.iter().copied());
    for path in candidates {
        let Ok(bytes) = std::fs::read(path) else {
            continue;
        };
        // plotters keeps registered fonts for the life of the process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        let registered =
            plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes);
        if registered.is_ok() {
            debug!("registered chart font {}", path);
            return Ok(path.to_string());
        }
    }
    Err("no usable TrueType font found; set TALKDATA_FONT to a .ttf file".to_string())
}

/// Path of the font used for chart text, registering it on first use.
pub fn ensure_font() -> Result<String> {
    FONT_STATE
        .get_or_init(register_sans_serif)
        .clone()
        .map_err(|e| anyhow!(e))
}

/// Whether charts can be rendered on this machine.
pub fn font_available() -> bool {
    ensure_font().is_ok()
}

/// Render `chart` to `out_path`; `.svg` selects the SVG backend, anything else PNG.
pub fn plot_chart<P: AsRef<Path>>(
    chart: &LineChart,
    out_path: P,
    width: u32,
    height: u32,
    legend: LegendMode,
) -> Result<()> {
    if chart.series.iter().all(|s| s.points.is_empty()) {
        bail!("no data to plot");
    }
    ensure_font()?;
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, chart, legend)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, chart, legend)
    }
}

fn x_label(kind: AxisKind, x: f64) -> String {
    let r = x.round();
    if (x - r).abs() > 1e-6 {
        return String::new();
    }
    match kind {
        AxisKind::Ordinal => CanonicalMonth::from_position(r as u32)
            .map(|m| m.name().to_string())
            .unwrap_or_default(),
        AxisKind::Temporal => NaiveDate::from_num_days_from_ce_opt(r as i32)
            .map(format_date_tr)
            .unwrap_or_default(),
    }
}

fn draw_chart<DB>(root: DrawingArea<DB, Shift>, chart: &LineChart, legend: LegendMode) -> Result<()>
where
    DB: DrawingBackend,
{
    const MARGIN: i32 = 16;
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let orders: Vec<i64> = chart
        .series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.order))
        .collect();
    let (min_x, max_x) = match (orders.iter().min(), orders.iter().max()) {
        (Some(a), Some(b)) => (*a as f64, *b as f64),
        _ => bail!("no data to plot"),
    };
    // Half a step of air on both sides; a lone point gets one step.
    let (x0, x1) = if max_x > min_x {
        (min_x - 0.5, max_x + 0.5)
    } else {
        (min_x - 1.0, max_x + 1.0)
    };
    let (y0, y1) = value_range(
        chart
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.value)),
    )
    .ok_or_else(|| anyhow!("no numeric values to plot"))?;

    let y_format: NumberFormat = chart.y.format;
    let y_label_fmt = |v: &f64| format_tr(*v, y_format.decimals);
    let kind = chart.x.kind;
    let x_label_fmt = |x: &f64| x_label(kind, *x);
    let x_label_count = match kind {
        AxisKind::Ordinal => (max_x - min_x) as usize + 1,
        AxisKind::Temporal => ((max_x - min_x) as usize + 1).min(10),
    };

    let left_label_px = [y0, y1]
        .iter()
        .map(|v| estimate_text_width_px(&format_tr(*v, y_format.decimals), 12))
        .max()
        .unwrap_or(40)
        .saturating_add(18)
        .clamp(48, 140);
    let axis_x_start_px = MARGIN + left_label_px as i32;

    let legend_items: Vec<(String, RGBColor)> = chart
        .series
        .iter()
        .enumerate()
        .map(|(i, s)| (s.id.clone(), from_hex(&s.color).unwrap_or(office_color(i))))
        .collect();

    let (root_w, root_h) = root.dim_in_pixel();
    let (plot_area, legend_area) = match legend {
        LegendMode::Right => root.split_horizontally((80).percent_width()),
        LegendMode::Bottom => {
            let labels: Vec<String> = legend_items.iter().map(|(l, _)| l.clone()).collect();
            let h = estimate_bottom_legend_height_px(&labels, axis_x_start_px, root_w as i32)
                .max(40);
            root.split_vertically((root_h as i32 - h).max(40))
        }
    };

    let mut ctx = ChartBuilder::on(&plot_area)
        .margin(MARGIN as u32)
        .caption(chart.title.as_str(), (FontFamily::SansSerif, 20))
        .set_label_area_size(LabelAreaPosition::Left, left_label_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 48)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| anyhow!("{:?}", e))?;

    ctx.configure_mesh()
        .x_desc(chart.x.title.as_str())
        .y_desc(chart.y.title.as_str())
        .x_labels(x_label_count)
        .y_labels(10)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 15))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for (series, (_, color)) in chart.series.iter().zip(&legend_items) {
        let pts: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|p| (p.order as f64, p.value))
            .collect();
        let style = ShapeStyle {
            color: color.to_rgba(),
            filled: false,
            stroke_width: 2,
        };
        ctx.draw_series(LineSeries::new(pts.clone(), style))
            .map_err(|e| anyhow!("{:?}", e))?;
        ctx.draw_series(pts.iter().map(|(x, y)| Circle::new((*x, *y), 3, color.filled())))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    draw_legend_panel(
        &legend_area,
        &legend_items,
        &chart.color_title,
        legend,
        axis_x_start_px,
    )?;

    plot_area.present().map_err(|e| anyhow!("{:?}", e))?;
    legend_area.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
