//! Monthly income statement laid out with one column per vessel.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::collections::BTreeMap;

use super::currency::format_tonnage;
use super::{RenderContext, RenderError};
use crate::services::reporting::dto::{CategoryTotal, MonthlyReport, VesselDetail};
use crate::services::reporting::ledger;

pub const SHEET_NAME: &str = "Compte de Résultat";
pub(crate) const NAVY: u32 = 0x003366;
pub(crate) const LIGHT_BLUE: u32 = 0xE6F2FF;
pub(crate) const GREY: u32 = 0xCCCCCC;
pub(crate) const LABEL_GREY: u32 = 0xF5F5F5;
pub(crate) const GREEN: u32 = 0x008000;
pub(crate) const RED: u32 = 0xFF0000;
const AMOUNT_FORMAT: &str = "#,##0";

/// One category line of the statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTabRow {
    pub label: String,
    pub cells: Vec<Decimal>,
    pub total: Decimal,
}

/// Vessel-by-category matrix behind the statement sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub vessels: Vec<String>,
    pub clients: Vec<String>,
    pub products: Vec<String>,
    pub revenue_rows: Vec<CrossTabRow>,
    pub expense_rows: Vec<CrossTabRow>,
    pub revenue_totals: Vec<Decimal>,
    pub expense_totals: Vec<Decimal>,
    pub net_results: Vec<Decimal>,
    pub operating_charges: Decimal,
    pub global_result: Decimal,
}

impl CrossTab {
    pub fn from_report(report: &MonthlyReport) -> Self {
        let vessels = &report.vessels;
        Self {
            vessels: vessels.iter().map(|v| v.result.name.clone()).collect(),
            clients: vessels.iter().map(|v| joined_or_dash(&v.clients)).collect(),
            products: vessels.iter().map(products_cell).collect(),
            revenue_rows: category_rows(vessels, |v| &v.revenue_by_category),
            expense_rows: category_rows(vessels, |v| &v.expense_by_category),
            revenue_totals: vessels.iter().map(|v| v.result.total_revenue).collect(),
            expense_totals: vessels.iter().map(|v| v.result.total_expense).collect(),
            net_results: vessels.iter().map(|v| v.result.net_result).collect(),
            operating_charges: report.totals.operating_charges,
            global_result: report.totals.global_result,
        }
    }

    /// Columns: designation, one per vessel, total.
    pub fn column_count(&self) -> u16 {
        self.vessels.len() as u16 + 2
    }

    fn total_column(&self) -> u16 {
        self.column_count() - 1
    }
}

fn joined_or_dash(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

fn products_cell(vessel: &VesselDetail) -> String {
    if vessel.products.is_empty() {
        return "-".to_string();
    }
    vessel
        .products
        .iter()
        .map(|p| format!("{} ({})", p.name, format_tonnage(p.tonnage)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Category lines sorted by name, one cell per vessel.
fn category_rows<F>(vessels: &[VesselDetail], totals: F) -> Vec<CrossTabRow>
where
    F: Fn(&VesselDetail) -> &Vec<CategoryTotal>,
{
    let mut by_name: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();
    for (idx, vessel) in vessels.iter().enumerate() {
        for category in totals(vessel) {
            let cells = by_name
                .entry(category.name.clone())
                .or_insert_with(|| vec![Decimal::ZERO; vessels.len()]);
            cells[idx] += category.total;
        }
    }

    by_name
        .into_iter()
        .map(|(name, cells)| CrossTabRow {
            label: format!("  {name}"),
            total: ledger::sum(cells.iter().copied()),
            cells,
        })
        .collect()
}

pub(crate) fn number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

pub(crate) fn sign_color(value: Decimal) -> Color {
    if value < Decimal::ZERO {
        Color::RGB(RED)
    } else {
        Color::RGB(GREEN)
    }
}

struct Styles {
    title: Format,
    subtitle: Format,
    header: Format,
    row_label: Format,
    cell_text: Format,
    section: Format,
    amount: Format,
    amount_bold: Format,
    total_label: Format,
    total_amount: Format,
    result_label: Format,
    global_label: Format,
}

impl Styles {
    fn new() -> Self {
        let bordered = Format::new().set_border(FormatBorder::Thin);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_font_color(Color::RGB(NAVY))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            subtitle: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_align(FormatAlign::Center),
            header: bordered
                .clone()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(NAVY))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            row_label: bordered
                .clone()
                .set_italic()
                .set_background_color(Color::RGB(LABEL_GREY)),
            cell_text: bordered
                .clone()
                .set_font_size(9)
                .set_align(FormatAlign::Center)
                .set_text_wrap(),
            section: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_font_color(Color::RGB(NAVY))
                .set_background_color(Color::RGB(LIGHT_BLUE)),
            amount: bordered.clone().set_num_format(AMOUNT_FORMAT),
            amount_bold: bordered.clone().set_bold().set_num_format(AMOUNT_FORMAT),
            total_label: bordered
                .clone()
                .set_bold()
                .set_background_color(Color::RGB(GREY)),
            total_amount: bordered
                .clone()
                .set_bold()
                .set_num_format(AMOUNT_FORMAT)
                .set_background_color(Color::RGB(GREY)),
            result_label: bordered
                .clone()
                .set_bold()
                .set_font_size(12)
                .set_background_color(Color::RGB(LIGHT_BLUE)),
            global_label: bordered
                .set_bold()
                .set_font_size(14)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(NAVY)),
        }
    }

    fn result_amount(&self, value: Decimal, size: f64) -> Format {
        Format::new()
            .set_border(FormatBorder::Thin)
            .set_bold()
            .set_font_size(size)
            .set_num_format(AMOUNT_FORMAT)
            .set_font_color(sign_color(value))
            .set_background_color(Color::RGB(LIGHT_BLUE))
    }
}

/// Renders the monthly statement workbook.
pub fn render_monthly_xlsx(
    report: &MonthlyReport,
    ctx: &RenderContext,
) -> Result<Vec<u8>, RenderError> {
    let tab = CrossTab::from_report(report);
    let month = report.totals.month.unwrap_or_default();
    let year = report.totals.year;

    let mut workbook = Workbook::new();
    let mut properties = DocProperties::new()
        .set_company(&ctx.company_name)
        .set_title(&format!("Compte de résultat {month}/{year}"));
    if let Some(developer) = &ctx.developer {
        properties = properties.set_author(developer);
    }
    workbook.set_properties(&properties);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    write_statement(sheet, &tab, ctx, year, month)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_statement(
    sheet: &mut Worksheet,
    tab: &CrossTab,
    ctx: &RenderContext,
    year: i32,
    month: u32,
) -> Result<(), RenderError> {
    let styles = Styles::new();
    let last_col = tab.total_column();

    sheet.set_column_width(0, 35)?;
    for col in 1..=last_col {
        sheet.set_column_width(col, 20)?;
    }

    sheet.merge_range(0, 0, 0, last_col, &ctx.company_name, &styles.title)?;
    sheet.set_row_height(0, 30)?;
    sheet.merge_range(
        1,
        0,
        1,
        last_col,
        &format!("COMPTE DE RÉSULTAT {month}/{year}"),
        &styles.subtitle,
    )?;
    sheet.set_row_height(1, 25)?;

    sheet.write_string_with_format(3, 0, "DÉSIGNATION", &styles.header)?;
    for (idx, name) in tab.vessels.iter().enumerate() {
        sheet.write_string_with_format(3, idx as u16 + 1, name, &styles.header)?;
    }
    sheet.write_string_with_format(3, last_col, "TOTAL", &styles.header)?;
    sheet.set_row_height(3, 25)?;

    sheet.write_string_with_format(4, 0, "Clients:", &styles.row_label)?;
    for (idx, text) in tab.clients.iter().enumerate() {
        sheet.write_string_with_format(4, idx as u16 + 1, text, &styles.cell_text)?;
    }
    sheet.write_string_with_format(5, 0, "Produits:", &styles.row_label)?;
    for (idx, text) in tab.products.iter().enumerate() {
        sheet.write_string_with_format(5, idx as u16 + 1, text, &styles.cell_text)?;
    }

    let mut row: u32 = 6;
    row = write_section(
        sheet,
        &styles,
        row,
        last_col,
        ("RECETTES", "TOTAL RECETTES"),
        &tab.revenue_rows,
        &tab.revenue_totals,
    )?;
    row += 1;
    row = write_section(
        sheet,
        &styles,
        row,
        last_col,
        ("DÉPENSES", "TOTAL DÉPENSES"),
        &tab.expense_rows,
        &tab.expense_totals,
    )?;
    row += 1;

    sheet.write_string_with_format(row, 0, "RÉSULTAT NET PAR NAVIRE", &styles.result_label)?;
    for (idx, net) in tab.net_results.iter().enumerate() {
        sheet.write_number_with_format(
            row,
            idx as u16 + 1,
            number(*net),
            &styles.result_amount(*net, 11.0),
        )?;
    }
    let total_net = ledger::sum(tab.net_results.iter().copied());
    sheet.write_number_with_format(
        row,
        last_col,
        number(total_net),
        &styles.result_amount(total_net, 11.0),
    )?;
    row += 3;

    sheet.write_string_with_format(row, 0, "CHARGES DE FONCTIONNEMENT", &styles.total_label)?;
    sheet.write_number_with_format(
        row,
        last_col,
        number(tab.operating_charges),
        &styles.amount_bold,
    )?;
    row += 1;

    sheet.write_string_with_format(row, 0, "RÉSULTAT GLOBAL", &styles.global_label)?;
    sheet.write_number_with_format(
        row,
        last_col,
        number(tab.global_result),
        &styles.result_amount(tab.global_result, 14.0),
    )?;

    sheet.set_freeze_panes(4, 1)?;
    Ok(())
}

fn write_section(
    sheet: &mut Worksheet,
    styles: &Styles,
    mut row: u32,
    last_col: u16,
    (heading, total_label): (&str, &str),
    lines: &[CrossTabRow],
    totals: &[Decimal],
) -> Result<u32, RenderError> {
    sheet.write_string_with_format(row, 0, heading, &styles.section)?;
    row += 1;

    for line in lines {
        sheet.write_string_with_format(row, 0, &line.label, &styles.amount)?;
        for (idx, value) in line.cells.iter().enumerate() {
            sheet.write_number_with_format(row, idx as u16 + 1, number(*value), &styles.amount)?;
        }
        sheet.write_number_with_format(row, last_col, number(line.total), &styles.amount_bold)?;
        row += 1;
    }

    sheet.write_string_with_format(row, 0, total_label, &styles.total_label)?;
    for (idx, value) in totals.iter().enumerate() {
        sheet.write_number_with_format(
            row,
            idx as u16 + 1,
            number(*value),
            &styles.total_amount,
        )?;
    }
    sheet.write_number_with_format(
        row,
        last_col,
        number(ledger::sum(totals.iter().copied())),
        &styles.total_amount,
    )?;

    Ok(row + 1)
}
