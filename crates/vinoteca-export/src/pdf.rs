//! # Document Renderer
//!
//! Projects one export snapshot into a paginated PDF report.
//!
//! ## Page Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Page Composition                                 │
//! │                                                                         │
//! │  ┌───────────────────────────────┐                                     │
//! │  │  <company> - Report           │ ← banner header (pages 2+)          │
//! │  │                               │                                     │
//! │  │  ... content flows down ...   │ ← PageComposer tracks the cursor;   │
//! │  │                               │   every write checks remaining      │
//! │  │                               │   room and breaks the page itself   │
//! │  │  Page N                       │ ← footer on every page              │
//! │  └───────────────────────────────┘                                     │
//! │                                                                         │
//! │  Fonts are the builtin Helvetica family. Its glyph set is limited,     │
//! │  which is why every string runs through the currency transform         │
//! │  before it is drawn (see the text module).                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two variants share the scaffolding: the *statistical* report (summary,
//! breakdowns, top five by price) and the *detailed* report (full table
//! with alternating row shading and a trailing summary block).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};
use tracing::info;

use vinoteca_core::{ReportDataset, RowOrder};
use vinoteca_db::Database;

use crate::error::{ExportError, ExportResult};
use crate::meta::ReportMeta;
use crate::text::{format_amount, sanitize_currency, truncate_ellipsis};

// =============================================================================
// Page Geometry
// =============================================================================

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_LEFT: f64 = 15.0;
const MARGIN_BOTTOM: f64 = 20.0;

/// Points to millimeters (1 pt = 1/72 inch).
const PT_TO_MM: f64 = 0.352_778;

/// Average Helvetica advance as a fraction of the font size. The builtin
/// fonts ship without metrics, so centering and right-alignment work from
/// this approximation; it is visibly close for report-sized strings.
const AVG_ADVANCE_EM: f64 = 0.52;

/// Column widths (mm) of the detailed table: ID, Name, Producer, Year,
/// Region, Price.
const DETAIL_COLUMNS: [f64; 6] = [15.0, 40.0, 35.0, 15.0, 25.0, 25.0];

const NO_DATA: &str = "No data available for report";

fn estimated_width(text: &str, size_pt: f64) -> f64 {
    text.chars().count() as f64 * size_pt * AVG_ADVANCE_EM * PT_TO_MM
}

#[inline]
fn mm(value: f64) -> Mm {
    Mm(value as _)
}

fn gray(level: f64) -> Color {
    Color::Rgb(Rgb::new(level as _, level as _, level as _, None))
}

// =============================================================================
// Fonts
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

struct CoreFonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

#[derive(Debug, Clone, Copy)]
enum CellAlign {
    Left,
    Center,
    Right,
}

// =============================================================================
// Page Composer
// =============================================================================

/// Cursor-based layout over a growing PDF document.
///
/// `y` is the baseline the next line will be drawn at, measured from the
/// page bottom; it only ever moves down until a page break resets it.
struct PageComposer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    fonts: CoreFonts,
    banner: String,
    y: f64,
    page_no: u32,
}

impl PageComposer {
    fn new(doc_title: &str, banner: String) -> ExportResult<Self> {
        let (doc, page, layer) = PdfDocument::new(
            doc_title,
            mm(PAGE_WIDTH_MM),
            mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );

        let fonts = CoreFonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| ExportError::Document(e.to_string()))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| ExportError::Document(e.to_string()))?,
            oblique: doc
                .add_builtin_font(BuiltinFont::HelveticaOblique)
                .map_err(|e| ExportError::Document(e.to_string()))?,
        };

        let layer = doc.get_page(page).get_layer(layer);
        let mut composer = PageComposer {
            doc,
            layer,
            fonts,
            banner,
            y: PAGE_HEIGHT_MM - 15.0,
            page_no: 1,
        };
        composer.draw_footer();
        Ok(composer)
    }

    fn font(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.fonts.regular,
            FontStyle::Bold => &self.fonts.bold,
            FontStyle::Oblique => &self.fonts.oblique,
        }
    }

    /// Footer on every page.
    fn draw_footer(&self) {
        let label = format!("Page {}", self.page_no);
        let x = (PAGE_WIDTH_MM - estimated_width(&label, 8.0)) / 2.0;
        self.layer
            .use_text(label, 8.0, mm(x), mm(10.0), &self.fonts.oblique);
    }

    /// Banner header on pages after the first.
    fn draw_header(&self) {
        let x = (PAGE_WIDTH_MM - estimated_width(&self.banner, 12.0)) / 2.0;
        self.layer.use_text(
            self.banner.clone(),
            12.0,
            mm(x),
            mm(PAGE_HEIGHT_MM - 12.0),
            &self.fonts.bold,
        );
    }

    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(mm(PAGE_WIDTH_MM), mm(PAGE_HEIGHT_MM), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_no += 1;
        self.draw_footer();
        self.draw_header();
        self.y = PAGE_HEIGHT_MM - 25.0;
    }

    /// Breaks the page unless `needed` millimeters still fit above the
    /// bottom margin.
    fn ensure_room(&mut self, needed: f64) {
        if self.y - needed < MARGIN_BOTTOM {
            self.new_page();
        }
    }

    fn spacer(&mut self, height: f64) {
        self.y -= height;
    }

    /// One left-aligned line of text; advances the cursor by `advance`.
    fn line(&mut self, text: &str, style: FontStyle, size: f64, advance: f64) {
        self.ensure_room(advance);
        let safe = sanitize_currency(text);
        self.layer.use_text(
            safe,
            size as _,
            mm(MARGIN_LEFT),
            mm(self.y - advance),
            self.font(style),
        );
        self.y -= advance;
    }

    /// One horizontally centered line of text.
    fn centered_line(&mut self, text: &str, style: FontStyle, size: f64, advance: f64) {
        self.ensure_room(advance);
        let safe = sanitize_currency(text);
        let x = ((PAGE_WIDTH_MM - estimated_width(&safe, size)) / 2.0).max(MARGIN_LEFT);
        self.layer
            .use_text(safe, size as _, mm(x), mm(self.y - advance), self.font(style));
        self.y -= advance;
    }

    /// Numbered section heading.
    fn section_title(&mut self, text: &str) {
        self.ensure_room(16.0);
        self.line(text, FontStyle::Bold, 16.0, 12.0);
        self.spacer(4.0);
    }

    /// One table row with optional background shading.
    ///
    /// `fill` is a gray level (1.0 = white); the text fill color is reset
    /// to black after the rectangle so the glyphs stay readable.
    fn table_row(
        &mut self,
        cells: &[(String, CellAlign)],
        widths: &[f64],
        style: FontStyle,
        size: f64,
        row_height: f64,
        fill: Option<f64>,
    ) {
        self.ensure_room(row_height);
        let top = self.y;
        let total_width: f64 = widths.iter().sum();

        if let Some(level) = fill {
            self.layer.set_fill_color(gray(level));
            let rect = Rect::new(
                mm(MARGIN_LEFT),
                mm(top - row_height),
                mm(MARGIN_LEFT + total_width),
                mm(top),
            )
            .with_mode(PaintMode::Fill);
            self.layer.add_rect(rect);
            self.layer.set_fill_color(gray(0.0));
        }

        let mut x = MARGIN_LEFT;
        for ((text, align), width) in cells.iter().zip(widths) {
            let safe = sanitize_currency(text);
            let text_width = estimated_width(&safe, size);
            let text_x = match align {
                CellAlign::Left => x + 2.0,
                CellAlign::Center => (x + (width - text_width) / 2.0).max(x + 1.0),
                CellAlign::Right => (x + width - text_width - 2.0).max(x + 1.0),
            };
            self.layer.use_text(
                safe,
                size as _,
                mm(text_x),
                mm(top - row_height + 2.5),
                self.font(style),
            );
            x += width;
        }

        self.y -= row_height;
    }

    fn finish(self) -> PdfDocumentReference {
        self.doc
    }
}

// =============================================================================
// Document Report
// =============================================================================

/// Which of the two report variants to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Summary, per-region and per-vintage breakdowns, top five by price.
    Statistical,
    /// Full bottle table with alternating shading and a summary block.
    Detailed,
}

/// Renders the export snapshot into a paginated PDF report.
pub struct DocumentReport {
    meta: ReportMeta,
    kind: ReportKind,
}

impl DocumentReport {
    pub fn new(meta: ReportMeta, kind: ReportKind) -> Self {
        DocumentReport { meta, kind }
    }

    /// Fetches one consistent snapshot and writes the report to `path`.
    ///
    /// Any failure propagates before the file is reported finished.
    pub async fn export(&self, db: &Database, path: &Path) -> ExportResult<PathBuf> {
        let dataset = db.bottles().export_dataset(RowOrder::NewestFirst).await?;
        let doc = self.render(&dataset, Local::now())?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        doc.save(&mut writer)
            .map_err(|e| ExportError::Document(e.to_string()))?;

        info!(path = %path.display(), kind = ?self.kind, rows = dataset.rows.len(), "Document export finished");
        Ok(path.to_path_buf())
    }

    /// Builds the document in memory. Pure over its inputs.
    pub fn render(
        &self,
        data: &ReportDataset,
        generated_at: DateTime<Local>,
    ) -> ExportResult<PdfDocumentReference> {
        let (title, subtitle) = match self.kind {
            ReportKind::Statistical => (
                "General Collection Statistics",
                "Statistical Report for Wine Collection",
            ),
            ReportKind::Detailed => (
                "Detailed Collection Information",
                "Complete Wine List with Detailed Information",
            ),
        };

        let mut page = PageComposer::new(
            &format!("{} - {title}", self.meta.company),
            format!("{} - Report", self.meta.company),
        )?;

        self.title_block(&mut page, title, subtitle, generated_at);

        match self.kind {
            ReportKind::Statistical => self.statistical_body(&mut page, data),
            ReportKind::Detailed => self.detailed_body(&mut page, data),
        }

        Ok(page.finish())
    }

    fn title_block(
        &self,
        page: &mut PageComposer,
        title: &str,
        subtitle: &str,
        generated_at: DateTime<Local>,
    ) {
        page.spacer(20.0);
        page.centered_line(&self.meta.company, FontStyle::Bold, 24.0, 16.0);
        page.spacer(8.0);
        page.centered_line(title, FontStyle::Bold, 18.0, 12.0);
        page.centered_line(subtitle, FontStyle::Oblique, 14.0, 9.0);
        page.spacer(6.0);
        page.centered_line(
            &format!("Generated: {}", generated_at.format("%d.%m.%Y %H:%M")),
            FontStyle::Regular,
            12.0,
            7.0,
        );
        page.centered_line(&self.meta.author_line(), FontStyle::Regular, 12.0, 7.0);
        page.spacer(15.0);
    }

    // =========================================================================
    // Statistical Variant
    // =========================================================================

    fn statistical_body(&self, page: &mut PageComposer, data: &ReportDataset) {
        if data.is_empty() {
            page.line(NO_DATA, FontStyle::Regular, 12.0, 8.0);
            return;
        }

        page.section_title("1. General Statistics");
        page.line(
            &format!("Total bottles in collection: {}", data.total_bottles()),
            FontStyle::Regular,
            12.0,
            8.0,
        );
        page.line(
            &format!(
                "Total collection value: {} RUB",
                format_amount(data.total_value())
            ),
            FontStyle::Regular,
            12.0,
            8.0,
        );
        page.line(
            &format!("Number of regions: {}", data.regions.len()),
            FontStyle::Regular,
            12.0,
            8.0,
        );
        page.spacer(8.0);

        page.section_title("2. Distribution by Regions");
        if data.regions.is_empty() {
            page.line("No region data available", FontStyle::Regular, 12.0, 8.0);
        }
        for stat in &data.regions {
            page.line(
                &format!("- {}: {} bottles", stat.region, stat.bottles),
                FontStyle::Regular,
                12.0,
                8.0,
            );
        }
        page.spacer(8.0);

        page.section_title("3. Distribution by Years");
        if data.vintages.is_empty() {
            page.line("No vintage data available", FontStyle::Regular, 12.0, 8.0);
        }
        // The dataset carries vintages newest-first; the breakdown reads
        // chronologically.
        let mut vintages = data.vintages.clone();
        vintages.sort_by_key(|stat| stat.vintage);
        for stat in &vintages {
            page.line(
                &format!("- {}: {} bottles", stat.vintage, stat.bottles),
                FontStyle::Regular,
                12.0,
                8.0,
            );
        }
        page.spacer(8.0);

        page.section_title("4. Top Wines by Value");
        for (i, wine) in data.top_by_price(5).iter().enumerate() {
            page.line(
                &format!(
                    "{}. {} - {} - {} RUB",
                    i + 1,
                    wine.name,
                    wine.producer,
                    format_amount(wine.price)
                ),
                FontStyle::Regular,
                12.0,
                8.0,
            );
        }
    }

    // =========================================================================
    // Detailed Variant
    // =========================================================================

    fn detailed_body(&self, page: &mut PageComposer, data: &ReportDataset) {
        page.section_title("1. Detailed Wine Information");

        if data.is_empty() {
            page.line(NO_DATA, FontStyle::Regular, 12.0, 10.0);
            return;
        }

        let headers = ["ID", "Name", "Producer", "Year", "Region", "Price"];
        page.table_row(
            &headers
                .iter()
                .map(|h| (h.to_string(), CellAlign::Center))
                .collect::<Vec<_>>(),
            &DETAIL_COLUMNS,
            FontStyle::Bold,
            10.0,
            10.0,
            Some(0.78),
        );

        let mut shaded = false;
        for record in &data.rows {
            shaded = !shaded;
            let fill = if shaded { 0.96 } else { 1.0 };

            let year = record
                .vintage
                .map(|y| y.to_string())
                .unwrap_or_else(|| "N/A".to_string());

            let cells = vec![
                (record.id.to_string(), CellAlign::Center),
                (truncate_ellipsis(&record.name, 30), CellAlign::Left),
                (truncate_ellipsis(&record.producer, 25), CellAlign::Left),
                (year, CellAlign::Center),
                (truncate_ellipsis(&record.region, 20), CellAlign::Left),
                (format!("{:.2}", record.price), CellAlign::Right),
            ];
            page.table_row(&cells, &DETAIL_COLUMNS, FontStyle::Regular, 9.0, 8.0, Some(fill));
        }

        page.spacer(10.0);

        page.section_title("2. Summary Information");
        page.line(
            &format!("Total number of bottles: {}", data.total_bottles()),
            FontStyle::Regular,
            12.0,
            8.0,
        );
        page.line(
            &format!(
                "Total collection value: {} RUB",
                format_amount(data.total_value())
            ),
            FontStyle::Regular,
            12.0,
            8.0,
        );
        page.line(
            &format!(
                "Average bottle price: {} RUB",
                format_amount(data.average_price())
            ),
            FontStyle::Regular,
            12.0,
            8.0,
        );
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vinoteca_core::BottleRecord;

    fn record(id: u64, name: &str, price: &str) -> BottleRecord {
        BottleRecord {
            id,
            name: name.to_string(),
            producer: "Antinori".to_string(),
            vintage: Some(2018),
            region: "Tuscany".to_string(),
            price: price.parse().expect("decimal literal"),
            purchased_on: None,
            shelf: String::new(),
            rack: String::new(),
            cellar: String::new(),
        }
    }

    fn dataset(rows: usize) -> ReportDataset {
        ReportDataset {
            rows: (0..rows)
                .map(|i| record(i as u64 + 1, &format!("Wine number {i}"), "1500.00"))
                .collect(),
            ..ReportDataset::default()
        }
    }

    fn timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 1, 12, 30, 0).unwrap()
    }

    fn assert_valid_pdf(doc: PdfDocumentReference) -> usize {
        let bytes = doc.save_to_bytes().expect("serialize");
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1_000);
        bytes.len()
    }

    #[test]
    fn statistical_report_renders() {
        let report = DocumentReport::new(ReportMeta::default(), ReportKind::Statistical);
        let doc = report.render(&dataset(3), timestamp()).expect("render");
        assert_valid_pdf(doc);
    }

    #[test]
    fn detailed_report_renders_and_paginates() {
        let report = DocumentReport::new(ReportMeta::default(), ReportKind::Detailed);

        let small = report.render(&dataset(3), timestamp()).expect("render");
        let small_len = assert_valid_pdf(small);

        // 120 rows cannot fit one A4 page; the composer must break pages
        // and keep producing a valid file.
        let large = report.render(&dataset(120), timestamp()).expect("render");
        let large_len = assert_valid_pdf(large);
        assert!(large_len > small_len);
    }

    #[test]
    fn zero_rows_produce_a_valid_no_data_document() {
        for kind in [ReportKind::Statistical, ReportKind::Detailed] {
            let report = DocumentReport::new(ReportMeta::default(), kind);
            let doc = report
                .render(&ReportDataset::default(), timestamp())
                .expect("render");
            assert_valid_pdf(doc);
        }
    }

    #[test]
    fn detailed_report_saves_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("detailed.pdf");

        let report = DocumentReport::new(ReportMeta::default(), ReportKind::Detailed);
        let doc = report.render(&dataset(10), timestamp()).expect("render");

        let file = File::create(&path).expect("create");
        let mut writer = BufWriter::new(file);
        doc.save(&mut writer).expect("save");
        drop(writer);

        let written = std::fs::metadata(&path).expect("file exists");
        assert!(written.len() > 1_000);
    }

    #[test]
    fn long_fields_fit_their_column_budgets() {
        let mut data = dataset(1);
        data.rows[0].name = "An exceptionally long wine name that would overflow".to_string();
        data.rows[0].producer = "A producer with a very long name".to_string();
        data.rows[0].region = "A never ending region name".to_string();

        let report = DocumentReport::new(ReportMeta::default(), ReportKind::Detailed);
        let doc = report.render(&data, timestamp()).expect("render");
        assert_valid_pdf(doc);
    }
}
