// src/report/pdf.rs
// =============================================================================
// Renders a report (a title plus lines of text) into a PDF document.
//
// Layout:
// - A4 portrait
// - Bold 16pt title at the top of the first page
// - One 12pt line per entry, starting a new page when we run out of room
//
// The service only knows about the Renderer trait, so tests (or another
// output format) can swap the PDF backend out.
// =============================================================================

use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const TITLE_FONT_SIZE: f32 = 16.0;
const TITLE_GAP_MM: f32 = 20.0;
const BODY_FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT_MM: f32 = 8.0;
const LAYER_NAME: &str = "Layer 1";

#[derive(Debug, thiserror::Error)]
#[error("failed to render PDF: {0}")]
pub struct RenderError(String);

// Turns a title and its lines into an opaque document payload
pub trait Renderer: Send + Sync {
    fn render(&self, title: &str, lines: &[String]) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl Renderer for PdfRenderer {
    fn render(&self, title: &str, lines: &[String]) -> Result<Vec<u8>, RenderError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            LAYER_NAME,
        );
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;

        let mut current = doc.get_page(page).get_layer(layer);
        // PDF coordinates start at the bottom-left corner
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM - TITLE_FONT_SIZE / 2.0;

        current.use_text(title, TITLE_FONT_SIZE, Mm(MARGIN_MM), Mm(y), &bold);
        y -= TITLE_GAP_MM;

        for line in lines {
            if y < MARGIN_MM {
                let (page, layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
                current = doc.get_page(page).get_layer(layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM - BODY_FONT_SIZE / 2.0;
            }

            current.use_text(line.as_str(), BODY_FONT_SIZE, Mm(MARGIN_MM), Mm(y), &regular);
            y -= LINE_HEIGHT_MM;
        }

        doc.save_to_bytes().map_err(pdf_error)
    }
}

fn pdf_error(e: printpdf::Error) -> RenderError {
    RenderError(format!("{:?}", e))
}
