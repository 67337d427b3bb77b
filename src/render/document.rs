use std::path::Path;

use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};

/// Points per inch in PDF user space.
const PT_PER_INCH: f32 = 72.0;

/// Rasters are placed at this resolution.
pub const DPI: f32 = 100.0;

const IMAGE_NAME: Name<'static> = Name(b"Im0");

// ---------------------------------------------------------------------------
// Multi-page PDF of raster pages
// ---------------------------------------------------------------------------

/// An in-progress PDF document, one raster image per page.
///
/// Pages are compressed as they are committed, so the caller's RGB buffer
/// can be released right away. Nothing touches the disk until [`save`].
///
/// [`save`]: PdfDocument::save
pub struct PdfDocument {
    pdf: Pdf,
    alloc: Ref,
    catalog_id: Ref,
    page_tree_id: Ref,
    page_ids: Vec<Ref>,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    pub fn new() -> Self {
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        Self {
            pdf: Pdf::new(),
            alloc,
            catalog_id,
            page_tree_id,
            page_ids: Vec::new(),
        }
    }

    /// Append a page showing an 8-bit RGB raster of `width` × `height` pixels.
    pub fn add_rgb_page(&mut self, rgb: &[u8], width: u32, height: u32) {
        debug_assert_eq!(rgb.len(), width as usize * height as usize * 3);

        let page_id = self.alloc.bump();
        let content_id = self.alloc.bump();
        let image_id = self.alloc.bump();

        let page_w = width as f32 / DPI * PT_PER_INCH;
        let page_h = height as f32 / DPI * PT_PER_INCH;

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(rgb, 6);
        let mut image = self.pdf.image_xobject(image_id, &compressed);
        image.filter(Filter::FlateDecode);
        image.width(width as i32);
        image.height(height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        image.finish();

        let mut page = self.pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h));
        page.parent(self.page_tree_id);
        page.contents(content_id);
        page.resources().x_objects().pair(IMAGE_NAME, image_id);
        page.finish();

        let mut content = Content::new();
        content.save_state();
        content.transform([page_w, 0.0, 0.0, page_h, 0.0, 0.0]);
        content.x_object(IMAGE_NAME);
        content.restore_state();
        self.pdf.stream(content_id, &content.finish());

        self.page_ids.push(page_id);
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Write the page tree and catalog and return the file bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.pdf.catalog(self.catalog_id).pages(self.page_tree_id);
        self.pdf
            .pages(self.page_tree_id)
            .kids(self.page_ids.iter().copied())
            .count(self.page_ids.len() as i32);
        self.pdf.finish()
    }

    /// Finish the document and write it to `path`.
    pub fn save(self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.finish())
    }
}
