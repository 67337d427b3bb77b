//! Drawing of one comparison page.
//!
//! The page is a 2×2 grid with 3:1 width and height ratios:
//!
//! ```text
//! ┌──────────────────────┬────────┐
//! │ Trace                │ Poster.│
//! │                      │        │
//! ├──────────────────────┼────────┤
//! │ Autocorrelation      │        │
//! └──────────────────────┴────────┘
//! ```

use std::ops::Range;

use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::color::chain_colors;
use crate::compare::{ChainComparator, SHARED_HIST_BINS};
use crate::error::RenderError;
use crate::stats::HistogramResult;

const FONT: &str = "sans-serif";
const PAGE_TITLE_SIZE: u32 = 28;
const CAPTION_SIZE: u32 = 20;
const BAR_ALPHA: f64 = 0.45;

/// Title drawn at the top of the page for `name`.
pub fn page_title(name: &str) -> String {
    format!("Parameter: {name}")
}

/// Draw the trace, posterior and autocorrelation regions for `name`.
pub fn draw_page<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    cmp: &ChainComparator,
    name: &str,
) -> Result<(), RenderError> {
    let (trace_1, trace_2) = cmp.parameter_values(name)?;
    let (hist_1, hist_2) = cmp.shared_histograms(name, SHARED_HIST_BINS)?;
    let (acf_1, acf_2) = cmp.autocorrelations(name)?;
    let value_range = cmp.min_max(name)?;

    let area = root.titled(&page_title(name), (FONT, PAGE_TITLE_SIZE))?;
    let (width, height) = area.dim_in_pixel();
    let (top, bottom) = area.split_vertically((height * 3 / 4) as i32);
    let (trace_area, posterior_area) = top.split_horizontally((width * 3 / 4) as i32);
    let (acf_area, _) = bottom.split_horizontally((width * 3 / 4) as i32);

    let labels = cmp.labels();
    draw_trace(&trace_area, name, labels, (trace_1, trace_2), value_range)?;
    draw_posterior(&posterior_area, name, labels, (&hist_1, &hist_2))?;
    draw_autocorrelation(&acf_area, labels, (&acf_1, &acf_2))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

fn draw_trace<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    name: &str,
    labels: (&str, &str),
    traces: (&[f64], &[f64]),
    value_range: (f64, f64),
) -> Result<(), RenderError> {
    let steps = traces.0.len().max(traces.1.len()).max(2) - 1;
    let mut chart = ChartBuilder::on(area)
        .caption("Trace", (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..steps as f64, padded(value_range.0, value_range.1))?;

    chart
        .configure_mesh()
        .x_desc("Step")
        .y_desc(name)
        .draw()?;

    let (c1, c2) = chain_colors();
    for (values, label, color) in [(traces.0, labels.0, c1), (traces.1, labels.1, c2)] {
        chart
            .draw_series(LineSeries::new(indexed_points(values), color.stroke_width(1)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    draw_legend(&mut chart)
}

/// Overlaid translucent bars over the shared bins, counts on the vertical axis.
fn draw_posterior<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    name: &str,
    labels: (&str, &str),
    hists: (&HistogramResult, &HistogramResult),
) -> Result<(), RenderError> {
    let edges = &hists.0.edges;
    let x_range = padded(edges[0], edges[edges.len() - 1]);
    let max_count = hists
        .0
        .counts
        .iter()
        .chain(hists.1.counts.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);

    let mut chart = ChartBuilder::on(area)
        .caption("Posterior", (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0.0..max_count as f64 * 1.1)?;

    chart
        .configure_mesh()
        .x_labels(4)
        .x_desc(name)
        .y_desc("Posterior Density")
        .draw()?;

    let (c1, c2) = chain_colors();
    for (hist, label, color) in [(hists.0, labels.0, c1), (hists.1, labels.1, c2)] {
        let fill = color.mix(BAR_ALPHA).filled();
        chart
            .draw_series(
                hist.bins()
                    .map(move |(left, right, count)| {
                        Rectangle::new([(left, 0.0), (right, count as f64)], fill)
                    }),
            )?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], fill));
    }

    draw_legend(&mut chart)
}

fn draw_autocorrelation<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    labels: (&str, &str),
    acfs: (&[f64], &[f64]),
) -> Result<(), RenderError> {
    let lags = acfs.0.len().max(acfs.1.len()).max(2) - 1;
    let low = acfs
        .0
        .iter()
        .chain(acfs.1.iter())
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::min);

    let mut chart = ChartBuilder::on(area)
        .caption("Autocorrelation", (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..lags as f64, padded(low, 1.0))?;

    chart
        .configure_mesh()
        .x_desc("Lag [step]")
        .y_desc("Autocorrelation")
        .draw()?;

    let (c1, c2) = chain_colors();
    for (values, label, color) in [(acfs.0, labels.0, c1), (acfs.1, labels.1, c2)] {
        chart
            .draw_series(LineSeries::new(indexed_points(values), color.stroke_width(1)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    draw_legend(&mut chart)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
) -> Result<(), RenderError> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// `(index, value)` points, skipping non-finite values.
fn indexed_points(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
}

/// Axis range around `[lo, hi]` with a 5% margin; zero-width or
/// non-finite ranges get a unit-sized window.
pub(crate) fn padded(lo: f64, hi: f64) -> Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo - 0.5)..(hi + 0.5);
    }
    let margin = (hi - lo) * 0.05;
    (lo - margin)..(hi + margin)
}
