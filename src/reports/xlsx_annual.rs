//! Six-sheet annual workbook.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Color, DocProperties, ExcelDateTime, Format, FormatAlign, Workbook, Worksheet};

use super::xlsx_monthly::{number, sign_color, LIGHT_BLUE, NAVY};
use super::{RenderContext, RenderError};
use crate::services::reporting::dto::{
    AnnualReport, AnnualVesselLine, CategoryTotal, ClientRanking, MonthlySummary, PeriodTotals,
    ProductRanking,
};

pub const SHEET_NAMES: [&str; 6] = [
    "Résumé Annuel",
    "Évolution Mensuelle",
    "Liste des Navires",
    "Statistiques",
    "Top Clients",
    "Top Produits",
];

const AMOUNT_FORMAT: &str = "#,##0";
const DATE_FORMAT: &str = "dd/mm/yyyy";

struct Styles {
    title: Format,
    italic: Format,
    header: Format,
    bold: Format,
    section: Format,
    amount: Format,
    date: Format,
    total_label: Format,
    total_amount: Format,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(16)
                .set_font_color(Color::RGB(NAVY))
                .set_align(FormatAlign::Center),
            italic: Format::new().set_italic().set_align(FormatAlign::Center),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(NAVY))
                .set_align(FormatAlign::Center),
            bold: Format::new().set_bold(),
            section: Format::new().set_bold().set_font_size(14),
            amount: Format::new()
                .set_num_format(AMOUNT_FORMAT)
                .set_align(FormatAlign::Right),
            date: Format::new().set_num_format(DATE_FORMAT),
            total_label: Format::new()
                .set_bold()
                .set_background_color(Color::RGB(LIGHT_BLUE)),
            total_amount: Format::new()
                .set_bold()
                .set_num_format(AMOUNT_FORMAT)
                .set_background_color(Color::RGB(LIGHT_BLUE)),
        }
    }

    fn signed(&self, value: Decimal) -> Format {
        self.amount.clone().set_font_color(sign_color(value))
    }
}

/// Renders the annual workbook.
pub fn render_annual_xlsx(
    report: &AnnualReport,
    ctx: &RenderContext,
) -> Result<Vec<u8>, RenderError> {
    let styles = Styles::new();
    let mut workbook = Workbook::new();

    let author = ctx.developer.clone().unwrap_or_else(|| ctx.company_name.clone());
    workbook.set_properties(
        &DocProperties::new()
            .set_author(&author)
            .set_company(&ctx.company_name)
            .set_title(&format!("Rapport annuel {}", report.year)),
    );

    let sheet = named_sheet(&mut workbook, 0)?;
    write_summary(sheet, &styles, report, ctx)?;

    let sheet = named_sheet(&mut workbook, 1)?;
    write_evolution(sheet, &styles, &report.evolution)?;

    let sheet = named_sheet(&mut workbook, 2)?;
    write_vessels(sheet, &styles, &report.vessels)?;

    let sheet = named_sheet(&mut workbook, 3)?;
    let stats = &report.statistics;
    let mut row = 2;
    sheet.merge_range(0, 0, 0, 3, "STATISTIQUES ANNUELLES", &styles.title)?;
    sheet.set_column_width(0, 35)?;
    sheet.set_column_width(1, 15)?;
    sheet.set_column_width(2, 20)?;
    for (heading, totals) in [
        ("RÉPARTITION DES RECETTES", &stats.revenues),
        ("RÉPARTITION DES DÉPENSES", &stats.expenses),
        ("RÉPARTITION DES CHARGES", &stats.charges),
    ] {
        row = write_breakdown(sheet, &styles, row, heading, totals)?;
    }

    let sheet = named_sheet(&mut workbook, 4)?;
    write_top_clients(sheet, &styles, &report.top_clients)?;

    let sheet = named_sheet(&mut workbook, 5)?;
    write_top_products(sheet, &styles, &report.top_products)?;

    Ok(workbook.save_to_buffer()?)
}

fn named_sheet(workbook: &mut Workbook, idx: usize) -> Result<&mut Worksheet, RenderError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAMES[idx])?;
    Ok(sheet)
}

fn write_headers(
    sheet: &mut Worksheet,
    styles: &Styles,
    row: u32,
    columns: &[(&str, f64)],
) -> Result<(), RenderError> {
    for (col, (header, width)) in columns.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *header, &styles.header)?;
        sheet.set_column_width(col as u16, *width)?;
    }
    Ok(())
}

fn write_period_amounts(
    sheet: &mut Worksheet,
    styles: &Styles,
    row: u32,
    first_col: u16,
    totals: &PeriodTotals,
) -> Result<(), RenderError> {
    sheet.write_number(row, first_col, totals.vessel_count as f64)?;
    let amounts = [
        totals.total_revenue,
        totals.total_expense,
        totals.net_vessel_result,
        totals.operating_charges,
    ];
    for (offset, value) in amounts.iter().enumerate() {
        sheet.write_number_with_format(
            row,
            first_col + 1 + offset as u16,
            number(*value),
            &styles.amount,
        )?;
    }
    sheet.write_number_with_format(
        row,
        first_col + 5,
        number(totals.global_result),
        &styles.signed(totals.global_result),
    )?;
    Ok(())
}

fn write_summary(
    sheet: &mut Worksheet,
    styles: &Styles,
    report: &AnnualReport,
    ctx: &RenderContext,
) -> Result<(), RenderError> {
    let totals = &report.totals;
    sheet.merge_range(
        0,
        0,
        0,
        6,
        &format!("RAPPORT ANNUEL {}", report.year),
        &styles.title,
    )?;
    sheet.merge_range(
        1,
        0,
        1,
        6,
        &format!(
            "Total: {} navires | Recettes: {} | Résultat: {}",
            totals.vessel_count,
            ctx.amount(totals.total_revenue),
            ctx.amount(totals.global_result)
        ),
        &styles.italic,
    )?;

    write_headers(
        sheet,
        styles,
        3,
        &[
            ("Mois", 15.0),
            ("Nombre Navires", 15.0),
            ("Recettes", 20.0),
            ("Dépenses", 20.0),
            ("Résultat Navires", 20.0),
            ("Charges", 20.0),
            ("Résultat Global", 20.0),
        ],
    )?;

    let mut row = 4;
    for month in &report.evolution {
        sheet.write_string(row, 0, &month.month_name)?;
        write_period_amounts(sheet, styles, row, 1, &month.totals)?;
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "TOTAL ANNUEL", &styles.total_label)?;
    sheet.write_number_with_format(row, 1, totals.vessel_count as f64, &styles.total_label)?;
    let amounts = [
        totals.total_revenue,
        totals.total_expense,
        totals.net_vessel_result,
        totals.operating_charges,
        totals.global_result,
    ];
    for (offset, value) in amounts.iter().enumerate() {
        sheet.write_number_with_format(
            row,
            2 + offset as u16,
            number(*value),
            &styles.total_amount,
        )?;
    }
    Ok(())
}

fn write_evolution(
    sheet: &mut Worksheet,
    styles: &Styles,
    evolution: &[MonthlySummary],
) -> Result<(), RenderError> {
    sheet.merge_range(0, 0, 0, 4, "ÉVOLUTION MENSUELLE", &styles.title)?;
    write_headers(
        sheet,
        styles,
        2,
        &[
            ("Mois", 15.0),
            ("Navires", 12.0),
            ("Recettes", 20.0),
            ("Dépenses", 20.0),
            ("Résultat", 20.0),
        ],
    )?;

    for (offset, month) in evolution.iter().enumerate() {
        let row = 3 + offset as u32;
        let totals = &month.totals;
        sheet.write_string(row, 0, &month.month_name)?;
        sheet.write_number(row, 1, totals.vessel_count as f64)?;
        sheet.write_number_with_format(row, 2, number(totals.total_revenue), &styles.amount)?;
        sheet.write_number_with_format(row, 3, number(totals.total_expense), &styles.amount)?;
        sheet.write_number_with_format(
            row,
            4,
            number(totals.global_result),
            &styles.signed(totals.global_result),
        )?;
    }
    Ok(())
}

fn write_vessels(
    sheet: &mut Worksheet,
    styles: &Styles,
    vessels: &[AnnualVesselLine],
) -> Result<(), RenderError> {
    sheet.merge_range(0, 0, 0, 5, "LISTE DES NAVIRES", &styles.title)?;
    write_headers(
        sheet,
        styles,
        2,
        &[
            ("Navire", 25.0),
            ("N° IMO", 15.0),
            ("Date Arrivée", 15.0),
            ("Recettes", 20.0),
            ("Dépenses", 20.0),
            ("Résultat", 20.0),
        ],
    )?;

    for (offset, line) in vessels.iter().enumerate() {
        let row = 3 + offset as u32;
        let vessel = &line.result;
        sheet.write_string(row, 0, &vessel.name)?;
        sheet.write_string(row, 1, vessel.imo_number.as_deref().unwrap_or("-"))?;
        let arrival = ExcelDateTime::from_ymd(
            vessel.arrival_date.year() as u16,
            vessel.arrival_date.month() as u8,
            vessel.arrival_date.day() as u8,
        )?;
        sheet.write_datetime_with_format(row, 2, &arrival, &styles.date)?;
        sheet.write_number_with_format(row, 3, number(vessel.total_revenue), &styles.amount)?;
        sheet.write_number_with_format(row, 4, number(vessel.total_expense), &styles.amount)?;
        sheet.write_number_with_format(
            row,
            5,
            number(vessel.net_result),
            &styles.signed(vessel.net_result),
        )?;
    }
    Ok(())
}

fn write_breakdown(
    sheet: &mut Worksheet,
    styles: &Styles,
    mut row: u32,
    heading: &str,
    totals: &[CategoryTotal],
) -> Result<u32, RenderError> {
    sheet.write_string_with_format(row, 0, heading, &styles.section)?;
    row += 1;
    sheet.write_string_with_format(row, 0, "Type", &styles.bold)?;
    sheet.write_string_with_format(row, 1, "Opérations", &styles.bold)?;
    sheet.write_string_with_format(row, 2, "Montant", &styles.bold)?;
    row += 1;

    for category in totals {
        sheet.write_string(row, 0, &category.name)?;
        sheet.write_number(row, 1, category.operation_count as f64)?;
        sheet.write_number_with_format(row, 2, number(category.total), &styles.amount)?;
        row += 1;
    }
    Ok(row + 1)
}

fn write_top_clients(
    sheet: &mut Worksheet,
    styles: &Styles,
    clients: &[ClientRanking],
) -> Result<(), RenderError> {
    sheet.merge_range(0, 0, 0, 5, "TOP 10 CLIENTS", &styles.title)?;
    write_headers(
        sheet,
        styles,
        2,
        &[
            ("Rang", 10.0),
            ("Client", 30.0),
            ("Code", 15.0),
            ("Nombre de navires", 20.0),
            ("Tonnage total", 20.0),
            ("Produits", 30.0),
        ],
    )?;

    for (offset, client) in clients.iter().enumerate() {
        let row = 3 + offset as u32;
        sheet.write_number(row, 0, client.rank as f64)?;
        sheet.write_string(row, 1, &client.name)?;
        sheet.write_string(row, 2, &client.code)?;
        sheet.write_number(row, 3, client.vessel_count as f64)?;
        sheet.write_number_with_format(row, 4, number(client.tonnage), &styles.amount)?;
        let products = if client.products.is_empty() {
            "-".to_string()
        } else {
            client.products.join(", ")
        };
        sheet.write_string(row, 5, &products)?;
    }
    Ok(())
}

fn write_top_products(
    sheet: &mut Worksheet,
    styles: &Styles,
    products: &[ProductRanking],
) -> Result<(), RenderError> {
    sheet.merge_range(0, 0, 0, 5, "TOP 10 PRODUITS", &styles.title)?;
    write_headers(
        sheet,
        styles,
        2,
        &[
            ("Rang", 10.0),
            ("Produit", 30.0),
            ("Code", 20.0),
            ("Nombre de navires", 20.0),
            ("Nombre de clients", 20.0),
            ("Tonnage total", 20.0),
        ],
    )?;

    for (offset, product) in products.iter().enumerate() {
        let row = 3 + offset as u32;
        sheet.write_number(row, 0, product.rank as f64)?;
        sheet.write_string(row, 1, &product.name)?;
        sheet.write_string(row, 2, &product.code)?;
        sheet.write_number(row, 3, product.vessel_count as f64)?;
        sheet.write_number(row, 4, product.client_count as f64)?;
        sheet.write_number_with_format(row, 5, number(product.tonnage), &styles.amount)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::testing::{context, march_snapshot};
    use crate::services::reporting::{rollup, Period};

    #[test]
    fn sheet_names_are_unique_and_short_enough() {
        let mut names: Vec<&str> = SHEET_NAMES.to_vec();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6);
        assert!(SHEET_NAMES.iter().all(|n| n.chars().count() <= 31));
    }

    #[test]
    fn renders_annual_workbook() {
        let mut snap = march_snapshot();
        snap.period = Some(Period::year(2024).unwrap());
        let report = rollup::annual_report(&snap, 10).unwrap();

        let bytes = render_annual_xlsx(&report, &context()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn renders_empty_year() {
        let snap = crate::services::reporting::snapshot::PeriodSnapshot::new(
            Period::year(2021).unwrap(),
        );
        let report = rollup::annual_report(&snap, 10).unwrap();
        assert_eq!(report.evolution.len(), 12);

        let bytes = render_annual_xlsx(&report, &context()).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
