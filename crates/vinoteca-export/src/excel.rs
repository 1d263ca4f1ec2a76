//! # Spreadsheet Renderer
//!
//! Projects one export snapshot into a three-sheet XLSX workbook.
//!
//! ## Workbook Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Workbook Structure                               │
//! │                                                                         │
//! │  Sheet "Data"                                                          │
//! │   ├── banner: company / operator / generation timestamp                │
//! │   └── full row dump with typed column formats, autofilter,             │
//! │       frozen header row, fixed column widths                           │
//! │                                                                         │
//! │  Sheet "Analytics"                                                     │
//! │   ├── region summary table ──────────┐                                 │
//! │   ├── price-range summary table ──┐  │ chart ranges are captured       │
//! │   ├── six key indicators          │  │ while the tables are written    │
//! │   ├── narrative bullets           │  │                                 │
//! │   ├── column chart ◄──────────────┼──┘                                 │
//! │   └── pie chart ◄─────────────────┘                                    │
//! │                                                                         │
//! │  Sheet "Visualization"                                                 │
//! │   ├── five key metrics                                                 │
//! │   └── vintage table + line chart of average price by vintage           │
//! │                                                                         │
//! │  Chart ranges always come from the first/last data-row indices         │
//! │  recorded at write time. Nothing assumes a fixed offset, so a table    │
//! │  growing by a row can never point a chart at its own header.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{
    Chart, ChartDataLabel, ChartMarker, ChartMarkerType, ChartType, Color, DocProperties, Format,
    FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError,
};
use tracing::info;

use vinoteca_core::{ReportDataset, RowOrder};
use vinoteca_db::Database;

use crate::error::ExportResult;
use crate::meta::ReportMeta;
use crate::text::format_amount;

/// Column widths for the data sheet, one per dumped column.
const DATA_COLUMN_WIDTHS: [f64; 10] = [8.0, 25.0, 20.0, 10.0, 15.0, 12.0, 12.0, 8.0, 8.0, 15.0];

const NO_DATA: &str = "No data available";

// =============================================================================
// Cell Formats
// =============================================================================

/// The fixed set of cell formats shared by all three sheets.
struct SheetStyles {
    title: Format,
    subtitle: Format,
    header: Format,
    body: Format,
    number: Format,
    currency: Format,
    centered: Format,
}

impl SheetStyles {
    fn new() -> Self {
        SheetStyles {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_font_color(Color::White)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_background_color(Color::RGB(0x366092)),
            subtitle: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_font_color(Color::RGB(0x1F497D))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin)
                .set_background_color(Color::RGB(0xDCE6F1)),
            header: Format::new()
                .set_bold()
                .set_font_size(11)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x4472C4))
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            body: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::Top),
            number: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Right)
                .set_num_format("#,##0.00"),
            currency: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Right)
                .set_num_format("#,##0.00"),
            centered: Format::new()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
        }
    }
}

// =============================================================================
// Spreadsheet Report
// =============================================================================

/// Renders the export snapshot into an XLSX workbook.
pub struct SpreadsheetReport {
    meta: ReportMeta,
}

impl SpreadsheetReport {
    pub fn new(meta: ReportMeta) -> Self {
        SpreadsheetReport { meta }
    }

    /// Fetches one consistent snapshot and writes the workbook to `path`.
    ///
    /// Any failure - fetch, render or save - propagates as an error, so a
    /// completion signal can only ever follow a fully written file.
    pub async fn export(&self, db: &Database, path: &Path) -> ExportResult<PathBuf> {
        let dataset = db.bottles().export_dataset(RowOrder::VintageThenPrice).await?;
        let mut workbook = self.render(&dataset, Local::now())?;
        workbook.save(path)?;
        info!(path = %path.display(), rows = dataset.rows.len(), "Spreadsheet export finished");
        Ok(path.to_path_buf())
    }

    /// Builds the workbook in memory. Pure over its inputs, which is what
    /// the unit tests lean on.
    pub fn render(
        &self,
        data: &ReportDataset,
        generated_at: DateTime<Local>,
    ) -> Result<Workbook, XlsxError> {
        let styles = SheetStyles::new();
        let mut workbook = Workbook::new();

        let mut properties = DocProperties::new()
            .set_title(format!("{} collection report", self.meta.company))
            .set_comment(format!("Produced by version {}", self.meta.version));
        if let Some(operator) = &self.meta.operator {
            properties = properties.set_author(operator);
        }
        workbook.set_properties(&properties);

        let sheet = workbook.add_worksheet();
        sheet.set_name("Data")?;
        self.write_data_sheet(sheet, data, &styles, generated_at)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name("Analytics")?;
        self.write_analytics_sheet(sheet, data, &styles)?;

        let sheet = workbook.add_worksheet();
        sheet.set_name("Visualization")?;
        self.write_visualization_sheet(sheet, data, &styles)?;

        Ok(workbook)
    }

    // =========================================================================
    // Sheet 1: Data
    // =========================================================================

    fn write_data_sheet(
        &self,
        sheet: &mut Worksheet,
        data: &ReportDataset,
        styles: &SheetStyles,
        generated_at: DateTime<Local>,
    ) -> Result<(), XlsxError> {
        sheet.merge_range(
            0,
            0,
            0,
            9,
            &format!("{} - WINE COLLECTION INVENTORY", self.meta.company),
            &styles.title,
        )?;
        let operator_line = self
            .meta
            .operator
            .as_ref()
            .map(|name| format!("Operator: {name}"))
            .unwrap_or_default();
        sheet.merge_range(1, 0, 1, 9, &operator_line, &styles.subtitle)?;
        sheet.merge_range(
            2,
            0,
            2,
            9,
            &format!("Report generated: {}", generated_at.format("%d.%m.%Y %H:%M")),
            &styles.centered,
        )?;

        let headers = [
            "ID", "Name", "Producer", "Vintage", "Region", "Purchase price", "Purchase date",
            "Shelf", "Rack", "Cellar",
        ];
        for (col, header) in headers.iter().enumerate() {
            sheet.write_string_with_format(4, col as u16, *header, &styles.header)?;
        }

        if data.rows.is_empty() {
            sheet.write_string_with_format(5, 0, NO_DATA, &styles.body)?;
        } else {
            for (i, record) in data.rows.iter().enumerate() {
                let row = 5 + i as u32;
                sheet.write_number_with_format(row, 0, record.id as f64, &styles.number)?;
                sheet.write_string_with_format(row, 1, &record.name, &styles.body)?;
                sheet.write_string_with_format(row, 2, &record.producer, &styles.body)?;
                match record.vintage {
                    Some(year) => {
                        sheet.write_number_with_format(row, 3, year as f64, &styles.number)?
                    }
                    None => sheet.write_blank(row, 3, &styles.number)?,
                };
                sheet.write_string_with_format(row, 4, &record.region, &styles.body)?;
                sheet.write_number_with_format(
                    row,
                    5,
                    record.price.to_f64().unwrap_or(0.0),
                    &styles.currency,
                )?;
                match record.purchased_on {
                    Some(date) => sheet.write_string_with_format(
                        row,
                        6,
                        &date.format("%Y-%m-%d").to_string(),
                        &styles.centered,
                    )?,
                    None => sheet.write_blank(row, 6, &styles.body)?,
                };
                sheet.write_string_with_format(row, 7, &record.shelf, &styles.body)?;
                sheet.write_string_with_format(row, 8, &record.rack, &styles.body)?;
                sheet.write_string_with_format(row, 9, &record.cellar, &styles.body)?;
            }

            sheet.autofilter(4, 0, 4 + data.rows.len() as u32, 9)?;
        }

        sheet.set_freeze_panes(5, 0)?;

        for (col, width) in DATA_COLUMN_WIDTHS.iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }

        Ok(())
    }

    // =========================================================================
    // Sheet 2: Analytics
    // =========================================================================

    fn write_analytics_sheet(
        &self,
        sheet: &mut Worksheet,
        data: &ReportDataset,
        styles: &SheetStyles,
    ) -> Result<(), XlsxError> {
        sheet.merge_range(0, 0, 0, 6, "WINE COLLECTION ANALYTICS", &styles.title)?;
        sheet.merge_range(
            1,
            0,
            1,
            6,
            "Summary tables and key indicators",
            &styles.subtitle,
        )?;

        sheet.set_column_width(0, 20.0)?;
        sheet.set_column_width(1, 15.0)?;
        sheet.set_column_width(2, 15.0)?;
        sheet.set_column_width(3, 15.0)?;

        let mut row: u32 = 3;

        if data.rows.is_empty() {
            sheet.write_string_with_format(row, 0, NO_DATA, &styles.body)?;
            return Ok(());
        }

        // Region summary. The data-row span feeds the column chart below.
        let mut region_span: Option<(u32, u32)> = None;
        if !data.regions.is_empty() {
            sheet.write_string_with_format(row, 0, "REGION SUMMARY", &styles.header)?;
            row += 1;
            for (col, header) in ["Region", "Bottles", "Average price", "Total value"]
                .iter()
                .enumerate()
            {
                sheet.write_string_with_format(row, col as u16, *header, &styles.header)?;
            }
            row += 1;

            let first = row;
            for stat in &data.regions {
                sheet.write_string_with_format(row, 0, &stat.region, &styles.body)?;
                sheet.write_number_with_format(row, 1, stat.bottles as f64, &styles.number)?;
                sheet.write_number_with_format(
                    row,
                    2,
                    stat.avg_price.to_f64().unwrap_or(0.0),
                    &styles.currency,
                )?;
                sheet.write_number_with_format(
                    row,
                    3,
                    stat.total_value.to_f64().unwrap_or(0.0),
                    &styles.currency,
                )?;
                row += 1;
            }
            region_span = Some((first, row - 1));

            row += 2;
        }

        // Price-range summary, same captured-span treatment for the pie.
        let mut bucket_span: Option<(u32, u32)> = None;
        if !data.price_buckets.is_empty() {
            sheet.write_string_with_format(row, 0, "PRICE RANGE SUMMARY", &styles.header)?;
            row += 1;
            for (col, header) in ["Price range", "Bottles", "Total value"].iter().enumerate() {
                sheet.write_string_with_format(row, col as u16, *header, &styles.header)?;
            }
            row += 1;

            let first = row;
            for stat in &data.price_buckets {
                sheet.write_string_with_format(row, 0, stat.bucket.label(), &styles.body)?;
                sheet.write_number_with_format(row, 1, stat.bottles as f64, &styles.number)?;
                sheet.write_number_with_format(
                    row,
                    2,
                    stat.total_value.to_f64().unwrap_or(0.0),
                    &styles.currency,
                )?;
                row += 1;
            }
            bucket_span = Some((first, row - 1));

            row += 2;
        }

        // Computed indicators, derived from the same rows as the data sheet.
        sheet.write_string_with_format(row, 0, "KEY INDICATORS", &styles.header)?;
        row += 1;

        let indicators: [(&str, f64, &Format); 6] = [
            (
                "Total bottles:",
                data.total_bottles() as f64,
                &styles.number,
            ),
            (
                "Total collection value:",
                data.total_value().to_f64().unwrap_or(0.0),
                &styles.currency,
            ),
            (
                "Average bottle price:",
                data.average_price().to_f64().unwrap_or(0.0),
                &styles.currency,
            ),
            (
                "Most expensive bottle:",
                data.max_price().to_f64().unwrap_or(0.0),
                &styles.currency,
            ),
            (
                "Most affordable bottle:",
                data.min_price().to_f64().unwrap_or(0.0),
                &styles.currency,
            ),
            (
                "Price spread:",
                data.price_spread().to_f64().unwrap_or(0.0),
                &styles.currency,
            ),
        ];
        for (label, value, format) in indicators {
            sheet.write_string_with_format(row, 0, label, &styles.body)?;
            sheet.write_number_with_format(row, 1, value, format)?;
            row += 1;
        }

        row += 2;

        sheet.write_string_with_format(row, 0, "ANALYTICS SUMMARY", &styles.header)?;
        row += 1;
        for bullet in self.narrative_bullets(data) {
            sheet.merge_range(row, 0, row, 4, &bullet, &styles.body)?;
            row += 1;
        }

        // Column chart: bottle count by region.
        if let Some((first, last)) = region_span {
            let mut column_chart = Chart::new(ChartType::Column);
            column_chart
                .add_series()
                .set_name("Bottles")
                .set_categories(("Analytics", first, 0, last, 0))
                .set_values(("Analytics", first, 1, last, 1));
            column_chart.title().set_name("Bottles by region");
            column_chart.x_axis().set_name("Region");
            column_chart.y_axis().set_name("Bottles");
            column_chart.set_style(11);
            sheet.insert_chart(1, 5, &column_chart)?;
        }

        // Pie chart: share of total value per price range.
        if let Some((first, last)) = bucket_span {
            let mut pie_chart = Chart::new(ChartType::Pie);
            pie_chart
                .add_series()
                .set_name("Value share by price range")
                .set_categories(("Analytics", first, 0, last, 0))
                .set_values(("Analytics", first, 2, last, 2))
                .set_data_label(
                    ChartDataLabel::new()
                        .show_percentage()
                        .show_category_name(),
                );
            pie_chart.title().set_name("Value by price range");
            pie_chart.set_style(10);
            sheet.insert_chart(17, 5, &pie_chart)?;
        }

        Ok(())
    }

    fn narrative_bullets(&self, data: &ReportDataset) -> Vec<String> {
        let joined = |items: Vec<&str>| {
            if items.is_empty() {
                "no data".to_string()
            } else {
                items.join(", ")
            }
        };
        let top_regions = joined(
            data.regions
                .iter()
                .take(3)
                .map(|s| s.region.as_str())
                .collect(),
        );
        let top_buckets = joined(
            data.price_buckets
                .iter()
                .take(2)
                .map(|s| s.bucket.label())
                .collect(),
        );

        vec![
            format!(
                "* The collection holds {} bottles with a total value of {} RUB.",
                data.total_bottles(),
                format_amount(data.total_value())
            ),
            format!(
                "* The average bottle price is {} RUB.",
                format_amount(data.average_price())
            ),
            format!("* Most represented regions: {top_regions}."),
            format!("* Dominant price ranges: {top_buckets}."),
            format!(
                "* Prices range from {} to {} RUB.",
                format_amount(data.min_price()),
                format_amount(data.max_price())
            ),
            format!(
                "* The collection spans {} regions and {} producers.",
                data.distinct_regions(),
                data.distinct_producers()
            ),
        ]
    }

    // =========================================================================
    // Sheet 3: Visualization
    // =========================================================================

    fn write_visualization_sheet(
        &self,
        sheet: &mut Worksheet,
        data: &ReportDataset,
        styles: &SheetStyles,
    ) -> Result<(), XlsxError> {
        sheet.merge_range(0, 0, 0, 6, "COLLECTION DATA VISUALIZATION", &styles.title)?;
        sheet.merge_range(
            1,
            0,
            1,
            6,
            "Key figures and the vintage price trend",
            &styles.subtitle,
        )?;

        sheet.set_column_width(0, 25.0)?;
        sheet.set_column_width(1, 15.0)?;
        sheet.set_column_width(2, 8.0)?;

        if data.rows.is_empty() {
            sheet.write_string_with_format(3, 0, NO_DATA, &styles.body)?;
            return Ok(());
        }

        sheet.write_string_with_format(3, 0, "KEY METRICS", &styles.header)?;

        let metrics: [(&str, f64, &Format, &str); 5] = [
            (
                "Total bottles",
                data.total_bottles() as f64,
                &styles.number,
                "bottles",
            ),
            (
                "Total collection value",
                data.total_value().to_f64().unwrap_or(0.0),
                &styles.currency,
                "RUB",
            ),
            (
                "Average bottle price",
                data.average_price().to_f64().unwrap_or(0.0),
                &styles.currency,
                "RUB",
            ),
            (
                "Producers",
                data.distinct_producers() as f64,
                &styles.number,
                "",
            ),
            (
                "Regions",
                data.distinct_regions() as f64,
                &styles.number,
                "",
            ),
        ];
        let mut row: u32 = 4;
        for (label, value, format, unit) in metrics {
            sheet.write_string_with_format(row, 0, label, &styles.header)?;
            sheet.write_number_with_format(row, 1, value, format)?;
            sheet.write_string_with_format(row, 2, unit, &styles.body)?;
            row += 1;
        }

        row += 2;

        // Vintage table + line chart, only when any row carries a vintage.
        if !data.vintages.is_empty() {
            for (col, header) in ["Vintage", "Average price", "Bottles"].iter().enumerate() {
                sheet.write_string_with_format(row, col as u16, *header, &styles.header)?;
            }
            row += 1;

            let vintage_first = row;
            for stat in &data.vintages {
                sheet.write_number_with_format(row, 0, stat.vintage as f64, &styles.number)?;
                sheet.write_number_with_format(
                    row,
                    1,
                    stat.avg_price.to_f64().unwrap_or(0.0),
                    &styles.currency,
                )?;
                sheet.write_number_with_format(row, 2, stat.bottles as f64, &styles.number)?;
                row += 1;
            }
            let vintage_last = row - 1;

            let mut line_chart = Chart::new(ChartType::Line);
            line_chart
                .add_series()
                .set_name("Average price by vintage")
                .set_categories(("Visualization", vintage_first, 0, vintage_last, 0))
                .set_values(("Visualization", vintage_first, 1, vintage_last, 1))
                .set_marker(
                    ChartMarker::new()
                        .set_type(ChartMarkerType::Circle)
                        .set_size(6),
                );
            line_chart.title().set_name("Average price by vintage");
            line_chart.x_axis().set_name("Vintage");
            line_chart.y_axis().set_name("Average price");
            line_chart.set_style(10);
            sheet.insert_chart(1, 4, &line_chart)?;
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use vinoteca_core::{
        BottleRecord, PriceBucket, PriceBucketStat, RegionStat, VintageStat,
    };

    fn record(id: u64, vintage: Option<i32>, region: &str, price: &str) -> BottleRecord {
        BottleRecord {
            id,
            name: format!("wine-{id}"),
            producer: "Antinori".to_string(),
            vintage,
            region: region.to_string(),
            price: price.parse().expect("decimal literal"),
            purchased_on: None,
            shelf: "A1".to_string(),
            rack: String::new(),
            cellar: String::new(),
        }
    }

    fn dataset() -> ReportDataset {
        ReportDataset {
            rows: vec![
                record(1, Some(2018), "Tuscany", "1500.00"),
                record(2, Some(2015), "Tuscany", "500.00"),
                record(3, None, "Rioja", "12000.00"),
            ],
            regions: vec![
                RegionStat {
                    region: "Tuscany".to_string(),
                    bottles: 2,
                    avg_price: Decimal::new(1_000_00, 2),
                    total_value: Decimal::new(2_000_00, 2),
                },
                RegionStat {
                    region: "Rioja".to_string(),
                    bottles: 1,
                    avg_price: Decimal::new(12_000_00, 2),
                    total_value: Decimal::new(12_000_00, 2),
                },
            ],
            vintages: vec![
                VintageStat {
                    vintage: 2018,
                    bottles: 1,
                    avg_price: Decimal::new(1_500_00, 2),
                },
                VintageStat {
                    vintage: 2015,
                    bottles: 1,
                    avg_price: Decimal::new(500_00, 2),
                },
            ],
            price_buckets: vec![
                PriceBucketStat {
                    bucket: PriceBucket::Over10000,
                    bottles: 1,
                    total_value: Decimal::new(12_000_00, 2),
                },
                PriceBucketStat {
                    bucket: PriceBucket::From1000To5000,
                    bottles: 1,
                    total_value: Decimal::new(1_500_00, 2),
                },
                PriceBucketStat {
                    bucket: PriceBucket::Under1000,
                    bottles: 1,
                    total_value: Decimal::new(500_00, 2),
                },
            ],
            producers: Vec::new(),
        }
    }

    fn timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 8, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn renders_a_populated_workbook() {
        let report = SpreadsheetReport::new(ReportMeta::default());
        let mut workbook = report.render(&dataset(), timestamp()).expect("render");
        let bytes = workbook.save_to_buffer().expect("serialize");

        // XLSX is a ZIP container; a truncated file would not start with PK.
        assert!(bytes.len() > 2_000);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn renders_a_valid_workbook_for_zero_rows() {
        let report = SpreadsheetReport::new(ReportMeta::default());
        let mut workbook = report
            .render(&ReportDataset::default(), timestamp())
            .expect("render");
        let bytes = workbook.save_to_buffer().expect("serialize");

        assert!(bytes.len() > 1_000);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn analytics_copes_with_rows_that_have_no_region() {
        let mut data = dataset();
        for row in &mut data.rows {
            row.region = String::new();
        }
        // No region aggregates, so no region table and no column chart;
        // the bucket table and indicators still render.
        data.regions.clear();

        let report = SpreadsheetReport::new(ReportMeta::default());
        let mut workbook = report.render(&data, timestamp()).expect("render");
        let bytes = workbook.save_to_buffer().expect("serialize");
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn chart_ranges_track_table_growth() {
        let mut grown = dataset();
        for i in 0..8 {
            grown.regions.push(RegionStat {
                region: format!("Region {i}"),
                bottles: 1,
                avg_price: Decimal::new(750_00, 2),
                total_value: Decimal::new(750_00, 2),
            });
            grown.vintages.push(VintageStat {
                vintage: 1990 + i,
                bottles: 1,
                avg_price: Decimal::new(750_00, 2),
            });
        }

        let report = SpreadsheetReport::new(ReportMeta::default());
        let mut workbook = report.render(&grown, timestamp()).expect("render");
        let bytes = workbook.save_to_buffer().expect("serialize");
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn saves_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("collection.xlsx");

        let report = SpreadsheetReport::new(ReportMeta {
            operator: Some("M. Ivanov".to_string()),
            ..ReportMeta::default()
        });
        let mut workbook = report.render(&dataset(), timestamp()).expect("render");
        workbook.save(&path).expect("save");

        let written = std::fs::metadata(&path).expect("file exists");
        assert!(written.len() > 2_000);
    }

    #[test]
    fn narrative_mentions_top_regions_and_ranges() {
        let report = SpreadsheetReport::new(ReportMeta::default());
        let bullets = report.narrative_bullets(&dataset());

        assert_eq!(bullets.len(), 6);
        assert!(bullets[0].contains("3 bottles"));
        assert!(bullets[0].contains("14,000.00"));
        assert!(bullets[2].contains("Tuscany, Rioja"));
        assert!(bullets[3].contains("over 10000, 1000-5000"));
    }
}
