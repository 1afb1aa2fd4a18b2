use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::application::ports::ReportWriterPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::event::DetectionEvent;

// Geometría A4 en milímetros (Mm envuelve f32 en printpdf). El cuerpo
// baja en pasos de LINE_STEP hasta un margen inferior de 20 mm; de ahí
// salen las capacidades.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 18.0;
const TITLE_Y: f32 = 277.0;
const LINE_STEP: f32 = 7.0;

/// Líneas que caben en la primera página (el título roba espacio) y en
/// las páginas siguientes.
pub(crate) const FIRST_PAGE_LINES: usize = 35;
pub(crate) const FULL_PAGE_LINES: usize = 37;

const FIRST_BODY_Y: f32 = 260.0;
const BODY_TOP_Y: f32 = 277.0;

const TITLE: &str = "Skateboard detection report";

/// Una línea por evento, campos en el orden fichero / fecha / conteo.
/// Un historial vacío produce una línea explícita de "sin datos" en vez
/// de un documento en blanco.
pub(crate) fn render_lines(events: &[DetectionEvent]) -> Vec<String> {
    if events.is_empty() {
        return vec!["No data.".to_string()];
    }
    events
        .iter()
        .map(|e| {
            format!(
                "File: {} | Date: {} | Count: {}",
                e.filename,
                e.timestamp_text(),
                e.target_count
            )
        })
        .collect()
}

/// Reparte las líneas en páginas según el presupuesto vertical.
pub(crate) fn paginate(lines: &[String]) -> Vec<&[String]> {
    let mut pages = Vec::new();
    let mut rest = lines;
    let mut capacity = FIRST_PAGE_LINES;
    while !rest.is_empty() {
        let take = capacity.min(rest.len());
        let (page, tail) = rest.split_at(take);
        pages.push(page);
        rest = tail;
        capacity = FULL_PAGE_LINES;
    }
    pages
}

/// Exportador de documento: PDF paginado con una línea por evento, en el
/// mismo orden (más reciente primero) que recibe del store.
pub struct PdfReportWriter;

impl ReportWriterPort for PdfReportWriter {
    fn write(&self, events: &[DetectionEvent], path: &Path) -> DomainResult<()> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "report");

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(export_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(export_err)?;

        let lines = render_lines(events);
        let pages = paginate(&lines);

        for (index, page_lines) in pages.iter().enumerate() {
            let (layer, mut y) = if index == 0 {
                let layer = doc.get_page(first_page).get_layer(first_layer);
                layer.use_text(TITLE, 16.0, Mm(MARGIN_LEFT), Mm(TITLE_Y), &bold);
                (layer, FIRST_BODY_Y)
            } else {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "report");
                (doc.get_page(page).get_layer(layer), BODY_TOP_Y)
            };

            for line in page_lines.iter() {
                layer.use_text(line.as_str(), 12.0, Mm(MARGIN_LEFT), Mm(y), &regular);
                y -= LINE_STEP;
            }
        }

        let file = File::create(path)
            .map_err(|e| DomainError::ExportFailure(format!("no se pudo crear {}: {e}", path.display())))?;
        doc.save(&mut BufWriter::new(file)).map_err(export_err)?;
        Ok(())
    }
}

fn export_err(e: printpdf::Error) -> DomainError {
    DomainError::ExportFailure(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn events(n: usize) -> Vec<DetectionEvent> {
        (0..n)
            .map(|i| DetectionEvent {
                id: (n - i) as i64,
                filename: format!("image_101530_{i:03}.jpg"),
                timestamp: NaiveDate::from_ymd_opt(2026, 8, 25)
                    .unwrap()
                    .and_hms_opt(10, 15, 30)
                    .unwrap(),
                target_count: i as u32,
            })
            .collect()
    }

    #[test]
    fn one_line_per_event_in_store_order() {
        let lines = render_lines(&events(3));
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "File: image_101530_000.jpg | Date: 2026-08-25 10:15:30 | Count: 0"
        );
    }

    #[test]
    fn empty_history_yields_an_explicit_no_data_line() {
        let lines = render_lines(&[]);
        assert_eq!(lines, vec!["No data.".to_string()]);
    }

    #[test]
    fn pagination_respects_the_vertical_budget() {
        let one_page = render_lines(&events(FIRST_PAGE_LINES));
        assert_eq!(paginate(&one_page).len(), 1);

        let two_pages = render_lines(&events(FIRST_PAGE_LINES + 1));
        let pages = paginate(&two_pages);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), FIRST_PAGE_LINES);
        assert_eq!(pages[1].len(), 1);

        let three_pages = render_lines(&events(FIRST_PAGE_LINES + FULL_PAGE_LINES + 5));
        let pages = paginate(&three_pages);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].len(), FULL_PAGE_LINES);
        assert_eq!(pages[2].len(), 5);
    }

    #[test]
    fn writes_a_non_empty_pdf_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        PdfReportWriter.write(&events(40), &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
