//! Paginated A4 monthly report.
//!
//! Layout happens first on plain page descriptions (positions in millimetres
//! from the top-left corner); [`emit`] then draws them with `printpdf`.

use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, Rect, Rgb};
use rust_decimal::Decimal;

use super::{RenderContext, RenderError};
use crate::services::reporting::dto::{CategoryTotal, MonthlyReport, VesselResult};
use crate::services::reporting::ledger;

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
/// Vessel rows drawn on each "Détails par Navire" page.
pub const DETAIL_ROWS_PER_PAGE: usize = 20;

const MARGIN: f32 = 10.0;
const ROW_HEIGHT: f32 = 9.0;
const STATS_ROW_HEIGHT: f32 = 8.0;
const CONTENT_BOTTOM: f32 = 275.0;
const DETAIL_HEADERS: [&str; 6] = ["Navire", "N° IMO", "Période", "Recettes", "Dépenses", "Résultat"];
const DETAIL_WIDTHS: [f32; 6] = [44.0, 24.0, 42.0, 27.0, 27.0, 26.0];
const STATS_WIDTHS: [f32; 3] = [95.0, 40.0, 55.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb8(pub u8, pub u8, pub u8);

pub const NAVY: Rgb8 = Rgb8(0x00, 0x33, 0x66);
pub const WHITE: Rgb8 = Rgb8(0xFF, 0xFF, 0xFF);
pub const BLACK: Rgb8 = Rgb8(0x00, 0x00, 0x00);
pub const STRIPE: Rgb8 = Rgb8(0xF5, 0xF5, 0xF5);
pub const TOTAL_FILL: Rgb8 = Rgb8(0xE6, 0xF2, 0xFF);
pub const FOOTER_GREY: Rgb8 = Rgb8(0x66, 0x66, 0x66);
pub const GREEN: Rgb8 = Rgb8(0x00, 0x80, 0x00);
pub const RED: Rgb8 = Rgb8(0xFF, 0x00, 0x00);

fn sign_color(value: Decimal) -> Rgb8 {
    if value < Decimal::ZERO {
        RED
    } else {
        GREEN
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: Rgb8,
    },
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb8,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    /// Every text drawn on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Fill { .. } => None,
        })
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }
}

struct Cell {
    text: String,
    bold: bool,
    color: Rgb8,
    width: f32,
}

impl Cell {
    fn new(text: impl Into<String>, width: f32) -> Self {
        Self {
            text: text.into(),
            bold: false,
            color: BLACK,
            width,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn colored(mut self, color: Rgb8) -> Self {
        self.color = color;
        self
    }
}

#[derive(Default)]
struct LayoutBuilder {
    pages: Vec<PageLayout>,
    cursor: f32,
}

impl LayoutBuilder {
    fn new_page(&mut self) {
        self.pages.push(PageLayout::default());
        self.cursor = 20.0;
    }

    fn page(&mut self) -> &mut PageLayout {
        if self.pages.is_empty() {
            self.new_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, bold: bool, color: Rgb8) {
        self.page().ops.push(DrawOp::Text {
            text: text.into(),
            x,
            y,
            size,
            bold,
            color,
        });
    }

    fn fill(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb8) {
        self.page().ops.push(DrawOp::Fill {
            x,
            y,
            width,
            height,
            color,
        });
    }

    /// Page title with a navy rule underneath.
    fn heading(&mut self, title: &str) {
        let y = self.cursor;
        self.text(title, MARGIN, y, 18.0, true, NAVY);
        self.fill(MARGIN, y + 4.0, PAGE_WIDTH - 2.0 * MARGIN, 0.5, NAVY);
        self.cursor = y + 14.0;
    }

    fn header_row(&mut self, headers: &[&str], widths: &[f32], height: f32) {
        let y = self.cursor;
        let mut x = MARGIN;
        for (header, width) in headers.iter().zip(widths) {
            self.fill(x, y, *width, height, NAVY);
            self.text(*header, x + 2.0, y + height - 3.0, 9.0, true, WHITE);
            x += width;
        }
        self.cursor = y + height;
    }

    fn row(&mut self, cells: Vec<Cell>, height: f32, fill: Rgb8, size: f32) {
        let y = self.cursor;
        let mut x = MARGIN;
        for cell in cells {
            self.fill(x, y, cell.width, height, fill);
            self.text(cell.text, x + 2.0, y + height - 3.0, size, cell.bold, cell.color);
            x += cell.width;
        }
        self.cursor = y + height;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor + height > CONTENT_BOTTOM {
            self.new_page();
        }
    }
}

fn stripe(index: usize) -> Rgb8 {
    if index % 2 == 0 {
        STRIPE
    } else {
        WHITE
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn stay_period(vessel: &VesselResult) -> String {
    let arrival = vessel.arrival_date.format("%d/%m/%Y").to_string();
    let departure = vessel
        .departure_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!("{arrival} - {departure}")
}

/// Lays out every page of the monthly report.
pub fn layout_monthly(report: &MonthlyReport, ctx: &RenderContext) -> Vec<PageLayout> {
    let mut b = LayoutBuilder::default();
    let totals = &report.totals;
    let month = totals.month.unwrap_or_default();

    // Summary page
    b.new_page();
    b.text(&ctx.company_name, MARGIN, 22.0, 18.0, true, NAVY);
    b.fill(MARGIN, 28.0, PAGE_WIDTH - 2.0 * MARGIN, 0.5, NAVY);
    b.text(
        format!("Rapport Mensuel - {}/{}", month, totals.year),
        60.0,
        42.0,
        16.0,
        true,
        BLACK,
    );
    b.cursor = 52.0;
    let amount_header = format!("Montant ({})", ctx.currency_code);
    b.header_row(
        &["Description", amount_header.as_str()],
        &[95.0, 95.0],
        10.0,
    );
    let summary = [
        ("Nombre de navires", totals.vessel_count.to_string(), BLACK),
        ("Total Recettes", ctx.amount(totals.total_revenue), BLACK),
        ("Total Dépenses", ctx.amount(totals.total_expense), BLACK),
        (
            "Résultat Net Navires",
            ctx.amount(totals.net_vessel_result),
            BLACK,
        ),
        (
            "Charges de Fonctionnement",
            ctx.amount(totals.operating_charges),
            BLACK,
        ),
        (
            "Résultat Global",
            ctx.amount(totals.global_result),
            sign_color(totals.global_result),
        ),
    ];
    let last = summary.len() - 1;
    for (idx, (label, value, color)) in summary.into_iter().enumerate() {
        let mut label_cell = Cell::new(label, 95.0);
        let mut value_cell = Cell::new(value, 95.0).colored(color);
        if idx == last {
            label_cell = label_cell.bold();
            value_cell = value_cell.bold();
        }
        b.row(vec![label_cell, value_cell], 10.0, stripe(idx), 11.0);
    }

    // Vessel details, a fixed number of rows per page
    let vessels: Vec<&VesselResult> = report.vessels.iter().map(|v| &v.result).collect();
    let chunks: Vec<&[&VesselResult]> = if vessels.is_empty() {
        vec![&vessels[..]]
    } else {
        vessels.chunks(DETAIL_ROWS_PER_PAGE).collect()
    };
    for (page_idx, chunk) in chunks.into_iter().enumerate() {
        b.new_page();
        b.heading(if page_idx == 0 {
            "Détails par Navire"
        } else {
            "Détails par Navire (suite)"
        });
        b.header_row(&DETAIL_HEADERS, &DETAIL_WIDTHS, ROW_HEIGHT);
        if chunk.is_empty() {
            b.row(
                vec![Cell::new("Aucun navire sur la période", DETAIL_WIDTHS.iter().sum())],
                ROW_HEIGHT,
                STRIPE,
                9.0,
            );
        }
        for (idx, vessel) in chunk.iter().enumerate() {
            let cells = vec![
                Cell::new(truncate(&vessel.name, 24), DETAIL_WIDTHS[0]),
                Cell::new(
                    vessel.imo_number.clone().unwrap_or_else(|| "N/A".into()),
                    DETAIL_WIDTHS[1],
                ),
                Cell::new(stay_period(vessel), DETAIL_WIDTHS[2]),
                Cell::new(ctx.amount(vessel.total_revenue), DETAIL_WIDTHS[3]),
                Cell::new(ctx.amount(vessel.total_expense), DETAIL_WIDTHS[4]),
                Cell::new(ctx.amount(vessel.net_result), DETAIL_WIDTHS[5])
                    .bold()
                    .colored(sign_color(vessel.net_result)),
            ];
            b.row(cells, ROW_HEIGHT, stripe(idx), 8.0);
        }
    }

    // Statistics
    b.new_page();
    b.heading("Statistiques");
    stats_table(
        &mut b,
        ctx,
        "Recettes par Type",
        "Type de Prestation",
        &report.statistics.revenues,
    );
    b.cursor += 10.0;
    stats_table(
        &mut b,
        ctx,
        "Dépenses par Type",
        "Type de Dépense",
        &report.statistics.expenses,
    );

    b.text(
        format!("Généré le {}", ctx.generated_on.format("%d/%m/%Y")),
        85.0,
        PAGE_HEIGHT - 12.0,
        8.0,
        false,
        FOOTER_GREY,
    );

    b.pages
}

fn stats_table(
    b: &mut LayoutBuilder,
    ctx: &RenderContext,
    title: &str,
    first_header: &str,
    rows: &[CategoryTotal],
) {
    b.ensure_space(3.0 * STATS_ROW_HEIGHT + 10.0);
    let y = b.cursor;
    b.text(title, MARGIN, y, 14.0, true, NAVY);
    b.cursor = y + 5.0;
    b.header_row(
        &[first_header, "Nombre d'opérations", "Montant Total"],
        &STATS_WIDTHS,
        STATS_ROW_HEIGHT,
    );

    for (idx, category) in rows.iter().enumerate() {
        b.ensure_space(STATS_ROW_HEIGHT);
        b.row(
            vec![
                Cell::new(truncate(&category.name, 50), STATS_WIDTHS[0]),
                Cell::new(category.operation_count.to_string(), STATS_WIDTHS[1]),
                Cell::new(ctx.amount(category.total), STATS_WIDTHS[2]),
            ],
            STATS_ROW_HEIGHT,
            stripe(idx),
            9.0,
        );
    }

    b.ensure_space(STATS_ROW_HEIGHT);
    let operations: u64 = rows.iter().map(|c| c.operation_count).sum();
    let total = ledger::sum(rows.iter().map(|c| c.total));
    b.row(
        vec![
            Cell::new("TOTAL", STATS_WIDTHS[0]).bold(),
            Cell::new(operations.to_string(), STATS_WIDTHS[1]).bold(),
            Cell::new(ctx.amount(total), STATS_WIDTHS[2]).bold(),
        ],
        STATS_ROW_HEIGHT,
        TOTAL_FILL,
        10.0,
    );
}

fn pdf_color(c: Rgb8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(c.0) / 255.0,
        f32::from(c.1) / 255.0,
        f32::from(c.2) / 255.0,
        None,
    ))
}

/// Draws laid-out pages into a PDF document.
pub fn emit(pages: &[PageLayout], title: &str) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| RenderError::Pdf(e.to_string()))?;

    for (idx, page) in pages.iter().enumerate() {
        let (page_ref, layer_ref) = if idx == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1")
        };
        let layer = doc.get_page(page_ref).get_layer(layer_ref);

        for op in &page.ops {
            match op {
                DrawOp::Fill {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => {
                    layer.set_fill_color(pdf_color(*color));
                    let rect = Rect::new(
                        Mm(*x),
                        Mm(PAGE_HEIGHT - y - height),
                        Mm(x + width),
                        Mm(PAGE_HEIGHT - y),
                    )
                    .with_mode(PaintMode::Fill);
                    layer.add_rect(rect);
                }
                DrawOp::Text {
                    text,
                    x,
                    y,
                    size,
                    bold: is_bold,
                    color,
                } => {
                    let font: &IndirectFontRef = if *is_bold { &bold } else { &regular };
                    layer.set_fill_color(pdf_color(*color));
                    layer.use_text(text.as_str(), *size, Mm(*x), Mm(PAGE_HEIGHT - y), font);
                }
            }
        }
    }

    doc.save_to_bytes()
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

/// Renders the monthly report as a PDF document.
pub fn render_monthly_pdf(
    report: &MonthlyReport,
    ctx: &RenderContext,
) -> Result<Vec<u8>, RenderError> {
    let pages = layout_monthly(report, ctx);
    let title = format!(
        "Rapport Mensuel {}/{}",
        report.totals.month.unwrap_or_default(),
        report.totals.year
    );
    emit(&pages, &title)
}
