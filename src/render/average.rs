//! Drawing of the averaged autocorrelation page.

use plotters::coord::Shift;
use plotters::prelude::*;

use super::page::{draw_legend, padded};
use crate::average::AverageAutocorrelation;
use crate::color::chain_colors;
use crate::error::RenderError;

/// Title of the averaged autocorrelation page.
pub const AVERAGE_TITLE: &str = "Average Autocorrelation Comparison";

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 26;
const RANGE_ALPHA: f64 = 0.12;
const SIGMA_ALPHA: f64 = 0.3;

/// Mean line, ±1σ band and full min/max range of both chains on one chart.
pub fn draw_average_page<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    labels: (&str, &str),
    averages: (&AverageAutocorrelation, &AverageAutocorrelation),
) -> Result<(), RenderError> {
    let lags = averages.0.len().max(averages.1.len()).max(2) - 1;
    let low = averages
        .0
        .min
        .iter()
        .chain(averages.1.min.iter())
        .chain(averages.0.lower().iter())
        .chain(averages.1.lower().iter())
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::min);

    let mut chart = ChartBuilder::on(root)
        .caption(AVERAGE_TITLE, (FONT, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..lags as f64, padded(low, 1.0))?;

    chart
        .configure_mesh()
        .x_desc("Lag")
        .y_desc("Autocorrelation")
        .draw()?;

    let (c1, c2) = chain_colors();
    for (avg, label, color) in [(averages.0, labels.0, c1), (averages.1, labels.1, c2)] {
        let range = color.mix(RANGE_ALPHA).filled();
        chart
            .draw_series(std::iter::once(Polygon::new(band(&avg.min, &avg.max), range)))?
            .label(format!("{label} Full Range"))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], range));

        let sigma = color.mix(SIGMA_ALPHA).filled();
        chart
            .draw_series(std::iter::once(Polygon::new(
                band(&avg.lower(), &avg.upper()),
                sigma,
            )))?
            .label(format!("{label} ±1σ"))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], sigma));
    }

    // Mean lines go on top of both chains' bands.
    for (avg, label, color) in [(averages.0, labels.0, c1), (averages.1, labels.1, c2)] {
        chart
            .draw_series(LineSeries::new(
                avg.mean.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                color.stroke_width(2),
            ))?
            .label(format!("{label} Average"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    draw_legend(&mut chart)
}

/// Closed outline running along `upper` and back along `lower`.
fn band(lower: &[f64], upper: &[f64]) -> Vec<(f64, f64)> {
    let forward = upper.iter().enumerate().map(|(i, &v)| (i as f64, v));
    let back = lower.iter().enumerate().rev().map(|(i, &v)| (i as f64, v));
    forward.chain(back).filter(|(_, v)| v.is_finite()).collect()
}
