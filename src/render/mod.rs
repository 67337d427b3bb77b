//! Rendering: one raster page per parameter, collected into a PDF.

pub mod average;
pub mod document;
pub mod page;

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::compare::ChainComparator;
use crate::error::RenderError;
use document::PdfDocument;

/// Page raster size in pixels (10 × 8 inches at [`document::DPI`]).
pub const PAGE_SIZE: (u32, u32) = (1000, 800);

/// One rendered page as an 8-bit RGB raster.
pub struct RasterPage {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Comparison renderer
// ---------------------------------------------------------------------------

pub struct ComparisonRenderer {
    comparator: ChainComparator,
    page_size: (u32, u32),
}

impl ComparisonRenderer {
    pub fn new(comparator: ChainComparator) -> Self {
        Self {
            comparator,
            page_size: PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, width: u32, height: u32) -> Self {
        self.page_size = (width, height);
        self
    }

    /// Draw the trace / posterior / autocorrelation page for `name`.
    pub fn render_parameter(&self, name: &str) -> Result<RasterPage, RenderError> {
        self.rasterise(page::page_title(name), |root| {
            page::draw_page(root, &self.comparator, name)
        })
    }

    /// Draw the autocorrelation of both chains averaged over every parameter.
    pub fn render_average(&self) -> Result<RasterPage, RenderError> {
        let (avg_1, avg_2) = self.comparator.average_autocorrelations()?;
        self.rasterise(average::AVERAGE_TITLE.to_string(), |root| {
            average::draw_average_page(root, self.comparator.labels(), (&avg_1, &avg_2))
        })
    }

    /// Write the averaged autocorrelation page as a one-page PDF at `output`.
    pub fn write_average(&self, output: &Path) -> Result<(), RenderError> {
        let page = self.render_average()?;
        let mut doc = PdfDocument::new();
        doc.add_rgb_page(&page.rgb, page.width, page.height);
        doc.save(output)?;
        log::info!("Wrote {} to {}", page.title, output.display());
        Ok(())
    }

    fn rasterise<F>(&self, title: String, draw: F) -> Result<RasterPage, RenderError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> Result<(), RenderError>,
    {
        let (width, height) = self.page_size;
        let mut rgb = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            draw(&root)?;
            root.present()?;
        }
        Ok(RasterPage {
            title,
            width,
            height,
            rgb,
        })
    }

    /// Render every parameter of the first chain, in schema order, into one
    /// PDF at `output`. Returns the page titles in document order.
    ///
    /// Each raster is dropped as soon as it is committed to the document. The
    /// file is only written once every page has rendered.
    pub fn render_all(&self, output: &Path) -> Result<Vec<String>, RenderError> {
        let params = self.comparator.parameter_names();
        let progress = ProgressBar::new(params.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}") {
            progress.set_style(style);
        }

        let mut doc = PdfDocument::new();
        let mut titles = Vec::with_capacity(params.len());
        for param in params {
            log::info!("Plotting {param}");
            progress.set_message(param.clone());

            let page = self.render_parameter(param)?;
            doc.add_rgb_page(&page.rgb, page.width, page.height);
            titles.push(page.title);
            progress.inc(1);
        }
        progress.finish_and_clear();

        let pages = doc.page_count();
        doc.save(output)?;
        log::info!("Wrote {pages} pages to {}", output.display());
        Ok(titles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::table_with_steps;
    use crate::color::chain_colors;
    use crate::data::model::{Chain, Column};

    /// Whether the part of `page` between the given fractions of its width
    /// and height holds a pixel tinted by either chain colour.
    fn has_chain_tint(page: &RasterPage, x: (f64, f64), y: (f64, f64)) -> bool {
        let (c1, c2) = chain_colors();
        let tinted = |px: &[u8], c: RGBColor| {
            // Pure or alpha-blended over white: each channel moves toward
            // the chain colour by the same fraction.
            let target = [c.0, c.1, c.2];
            let fractions: Vec<f64> = (0..3)
                .filter(|&k| target[k] != 255)
                .map(|k| (255.0 - px[k] as f64) / (255.0 - target[k] as f64))
                .collect();
            let (lo, hi) = fractions
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &f| (lo.min(f), hi.max(f)));
            lo > 0.2 && hi <= 1.05 && hi - lo < 0.1
        };

        let (w, h) = (page.width as usize, page.height as usize);
        let cols = (w as f64 * x.0) as usize..(w as f64 * x.1) as usize;
        let rows = (h as f64 * y.0) as usize..(h as f64 * y.1) as usize;
        rows.clone().any(|r| {
            cols.clone().any(|c| {
                let i = (r * w + c) * 3;
                let px = &page.rgb[i..i + 3];
                tinted(px, c1) || tinted(px, c2)
            })
        })
    }

    fn small_renderer(first: Vec<Column>, second: Vec<Column>) -> ComparisonRenderer {
        let n1 = first.first().map_or(0, |c| c.values.len());
        let n2 = second.first().map_or(0, |c| c.values.len());
        let a = Chain::from_table("a", table_with_steps(n1, first), -1).unwrap();
        let b = Chain::from_table("b", table_with_steps(n2, second), -1).unwrap();
        ComparisonRenderer::new(ChainComparator::new(a, b)).with_page_size(400, 320)
    }

    #[test]
    fn test_render_parameter_draws_something() {
        let r = small_renderer(
            vec![Column::new("x", (0..50).map(|i| (i as f64 * 0.3).sin()).collect())],
            vec![Column::new("x", (0..50).map(|i| (i as f64 * 0.1).cos()).collect())],
        );
        let page = r.render_parameter("x").unwrap();
        assert_eq!(page.title, "Parameter: x");
        assert_eq!(page.rgb.len(), 400 * 320 * 3);
        // Background is white; plotted lines and bars are not.
        assert!(page.rgb.iter().any(|&b| b != 255));
    }

    #[test]
    fn test_each_region_holds_chain_series() {
        let r = small_renderer(
            vec![Column::new("x", (0..400).map(|i| i as f64).collect())],
            vec![Column::new("x", vec![5.0; 400])],
        )
        .with_page_size(800, 640);
        let page = r.render_parameter("x").unwrap();

        // Trace: top-left, below the page title.
        assert!(has_chain_tint(&page, (0.1, 0.7), (0.15, 0.7)));
        // Posterior: top-right.
        assert!(has_chain_tint(&page, (0.8, 1.0), (0.15, 0.7)));
        // Autocorrelation: bottom-left.
        assert!(has_chain_tint(&page, (0.1, 0.7), (0.82, 1.0)));
        // Bottom-right is left blank.
        assert!(!has_chain_tint(&page, (0.8, 1.0), (0.82, 1.0)));
    }

    #[test]
    fn test_average_page_is_written() {
        let r = small_renderer(
            vec![
                Column::new("a", (0..60).map(|i| 2.0 + (i as f64 * 0.3).sin()).collect()),
                Column::new("b", (0..60).map(|i| 1.0 + (i % 5) as f64).collect()),
            ],
            vec![
                Column::new("a", (0..60).map(|i| 2.0 + (i as f64 * 0.1).cos()).collect()),
                Column::new("b", (0..60).map(|i| 1.0 + (i % 2) as f64).collect()),
            ],
        );
        let page = r.render_average().unwrap();
        assert_eq!(page.title, "Average Autocorrelation Comparison");
        assert!(has_chain_tint(&page, (0.1, 0.9), (0.1, 0.9)));

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("avg.pdf");
        r.write_average(&out).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.windows(8).any(|w| w == b"/Count 1"));
    }

    #[test]
    fn test_render_all_follows_first_schema() {
        let r = small_renderer(
            vec![
                Column::new("a", (0..20).map(|i| i as f64).collect()),
                Column::new("b", (0..20).map(|i| (i * i) as f64).collect()),
            ],
            vec![
                Column::new("a", (0..20).map(|i| i as f64 + 1.0).collect()),
                Column::new("b", (0..20).map(|i| i as f64).collect()),
                Column::new("c", vec![0.0; 20]),
            ],
        );
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cmp.pdf");
        let titles = r.render_all(&out).unwrap();
        assert_eq!(titles, vec!["Parameter: a", "Parameter: b"]);
        assert!(out.exists());
    }

    #[test]
    fn test_failed_page_leaves_no_document() {
        let r = small_renderer(
            vec![Column::new("only_first", vec![1.0, 2.0, 3.0])],
            vec![Column::new("other", vec![1.0, 2.0, 3.0])],
        );
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cmp.pdf");
        assert!(matches!(r.render_all(&out), Err(RenderError::Chain(_))));
        assert!(!out.exists());
    }
}
