use std::fmt;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;

use crate::classify::{IceSheet, Resolution};
use crate::diff::{DiffArray, DiffError};
use crate::results::{V1Results, V2Results};

const HIST_BINS: usize = 20;
// Above this many cells the colormap panel is drawn with a block stride so
// large local grids stay cheap to render.
const MAX_MAP_CELLS: usize = 160_000;

#[derive(Debug)]
pub enum PlotError {
    Diff(DiffError),
    MissingDataset {
        version: &'static str,
        resolution: Resolution,
        ice_sheet: IceSheet,
    },
    Render(String),
}

impl fmt::Display for PlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotError::Diff(e) => write!(f, "{}", e),
            PlotError::MissingDataset {
                version,
                resolution,
                ice_sheet,
            } => write!(
                f,
                "No {} {} {} dataset was loaded, cannot plot",
                version, resolution, ice_sheet
            ),
            PlotError::Render(e) => write!(f, "Failed to render figure: {}", e),
        }
    }
}

impl std::error::Error for PlotError {}

impl From<DiffError> for PlotError {
    fn from(err: DiffError) -> PlotError {
        PlotError::Diff(err)
    }
}

fn render_err<E: fmt::Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}

/// Renders the v2 - v1 difference figure for one ice sheet to a PNG file.
///
/// Layout is a 2x2 grid: top row global, bottom row local, each with a
/// 20-bin histogram of the differences on the left and a colormap panel of
/// the difference array (with its colorbar) on the right. The title
/// carries the ice sheet, the scenario label, and the median difference at
/// each resolution.
pub fn plot_diffs_for_ice_sheet(
    v1: &V1Results,
    v2: &V2Results,
    ice_sheet: IceSheet,
    scenario: &str,
    out_path: &Path,
) -> Result<(), PlotError> {
    let global_diff = diff_for(v1, v2, Resolution::Global, ice_sheet)?;
    let local_diff = diff_for(v1, v2, Resolution::Local, ice_sheet)?;

    let root = BitMapBackend::new(out_path, (1200, 780)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let title = "Difference between projected sea level contribution, v2 - v1";
    let subtitle = format!(
        "Ice sheet: {}, scenario: {} -- Med Global: {:.2} mm, Med Local: {:.2} mm",
        ice_sheet,
        scenario,
        global_diff.median(),
        local_diff.median()
    );

    let body = root
        .clone()
        .titled(title, ("sans-serif", 20))
        .map_err(render_err)?
        .titled(&subtitle, ("sans-serif", 16))
        .map_err(render_err)?;

    let rows = body.split_evenly((2, 1));
    let crimson = RGBColor(220, 20, 60);

    for (row, (caption, diff)) in rows
        .iter()
        .zip([("Global", &global_diff), ("Local", &local_diff)])
    {
        let row = row
            .clone()
            .titled(caption, ("sans-serif", 17).into_font().color(&crimson))
            .map_err(render_err)?;
        let cells = row.split_evenly((1, 2));

        draw_histogram(&cells[0], diff)?;
        draw_map(&cells[1], diff)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}

fn diff_for(
    v1: &V1Results,
    v2: &V2Results,
    resolution: Resolution,
    ice_sheet: IceSheet,
) -> Result<DiffArray, PlotError> {
    let v1_ds = v1
        .processed(resolution, ice_sheet)
        .ok_or(PlotError::MissingDataset {
            version: "v1",
            resolution,
            ice_sheet,
        })?;
    let v2_ds = v2
        .dataset(resolution, ice_sheet)
        .ok_or(PlotError::MissingDataset {
            version: "v2",
            resolution,
            ice_sheet,
        })?;

    Ok(DiffArray::between(v2_ds, v1_ds)?)
}

/// Finite min/max of the values, padded when degenerate so chart ranges
/// are never empty.
fn value_range(values: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }

    if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0)
    } else if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    diff: &DiffArray,
) -> Result<(), PlotError> {
    let (min, max) = value_range(&diff.values);
    let bin_width = (max - min) / HIST_BINS as f64;

    let mut counts = vec![0i32; HIST_BINS];
    for &v in diff.values.iter().filter(|v| !v.is_nan()) {
        let idx = (((v - min) / bin_width) as usize).min(HIST_BINS - 1);
        counts[idx] += 1;
    }
    let y_max = counts.iter().copied().max().unwrap_or(0).max(1);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(min..max, 0..(y_max + y_max / 10 + 1))
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Sea level change [mm]")
        .y_desc("Sample")
        // plain fixed-point labels, no scientific offset
        .x_label_formatter(&|v| format!("{:.2}", v))
        .y_label_formatter(&|v| format!("{}", v))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, &count)| {
            let x0 = min + bin_width * i as f64;
            let x1 = min + bin_width * (i + 1) as f64;
            Rectangle::new([(x0, 0), (x1, count)], BLUE.mix(0.6).filled())
        }))
        .map_err(render_err)?;

    Ok(())
}

fn draw_map<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    diff: &DiffArray,
) -> Result<(), PlotError> {
    let (width, _) = area.dim_in_pixel();
    let (map_area, bar_area) = area
        .clone()
        .split_horizontally((width as i32 - 110).max(60));

    let (rows, cols) = diff.extent();
    let (vmin, vmax) = value_range(&diff.values);

    let mut chart = ChartBuilder::on(&map_area)
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(0i32..cols as i32, 0i32..rows as i32)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(5)
        .y_labels(5)
        .x_label_formatter(&|v| format!("{}", v))
        .y_label_formatter(&|v| format!("{}", v))
        .draw()
        .map_err(render_err)?;

    // a zero-length dimension loads as an empty array; leave the panel blank
    if !diff.values.is_empty() {
        let step = block_stride(rows * cols);
        let mut blocks = Vec::new();
        for r in (0..rows).step_by(step) {
            for c in (0..cols).step_by(step) {
                let v = diff.values[r * cols + c];
                let r1 = (r + step).min(rows);
                let c1 = (c + step).min(cols);
                blocks.push(Rectangle::new(
                    [(c as i32, r as i32), (c1 as i32, r1 as i32)],
                    diff_color(v, vmin, vmax).filled(),
                ));
            }
        }
        chart.draw_series(blocks).map_err(render_err)?;
    }

    draw_colorbar(&bar_area, vmin, vmax)?;
    Ok(())
}

fn block_stride(cells: usize) -> usize {
    let mut step = 1;
    while cells / (step * step) > MAX_MAP_CELLS {
        step *= 2;
    }
    step
}

fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    vmin: f64,
    vmax: f64,
) -> Result<(), PlotError> {
    let (_, height) = area.dim_in_pixel();
    let top = 18i32;
    let bottom = height as i32 - 18;
    let steps = 64;

    for i in 0..steps {
        let t = i as f64 / steps as f64;
        // top of the bar is the maximum
        let v = vmax - t * (vmax - vmin);
        let y0 = top + ((bottom - top) as f64 * t) as i32;
        let y1 = top + ((bottom - top) as f64 * (i + 1) as f64 / steps as f64) as i32;
        area.draw(&Rectangle::new(
            [(8, y0), (26, y1)],
            diff_color(v, vmin, vmax).filled(),
        ))
        .map_err(render_err)?;
    }

    let label_style = ("sans-serif", 12).into_font();
    area.draw(&Text::new(
        format!("{:.2}", vmax),
        (30, top - 6),
        label_style.clone(),
    ))
    .map_err(render_err)?;
    area.draw(&Text::new(
        format!("{:.2}", vmin),
        (30, bottom - 6),
        label_style,
    ))
    .map_err(render_err)?;

    area.draw(&Text::new(
        "sea level change [mm]".to_string(),
        (78, top + 10),
        ("sans-serif", 13)
            .into_font()
            .transform(FontTransform::Rotate90),
    ))
    .map_err(render_err)?;

    Ok(())
}

/// Diverging blue-white-red ramp over [vmin, vmax]; NaN cells render grey.
fn diff_color(v: f64, vmin: f64, vmax: f64) -> RGBColor {
    if v.is_nan() {
        return RGBColor(200, 200, 200);
    }

    let span = (vmax - vmin).max(f64::EPSILON);
    let t = ((v - vmin) / span).clamp(0.0, 1.0);

    if t < 0.5 {
        let u = t * 2.0;
        RGBColor((255.0 * u) as u8, (255.0 * u) as u8, 255)
    } else {
        let u = (1.0 - t) * 2.0;
        RGBColor(255, (255.0 * u) as u8, (255.0 * u) as u8)
    }
}
