//! Composite monthly and annual reports built from one period snapshot.

use tracing::error;

use super::dto::{AnnualReport, MonthlyReport, MonthlySummary, PeriodTotals};
use super::ledger;
use super::snapshot::PeriodSnapshot;
use crate::errors::ServiceError;

pub fn monthly_report(snapshot: &PeriodSnapshot) -> MonthlyReport {
    MonthlyReport {
        totals: snapshot.totals(),
        vessels: snapshot.vessel_details(),
        statistics: snapshot.category_breakdown(true),
    }
}

/// Assembles the annual composite, failing when the yearly totals disagree
/// with the sum of the monthly series.
pub fn annual_report(
    snapshot: &PeriodSnapshot,
    top_limit: usize,
) -> Result<AnnualReport, ServiceError> {
    let totals = snapshot.totals();
    let evolution = snapshot.monthly_series();
    check_series_matches(&totals, &evolution)?;

    Ok(AnnualReport {
        year: totals.year,
        summary: active_months(evolution.clone()),
        statistics: snapshot.category_breakdown(false),
        top_vessels: snapshot.top_vessels(top_limit),
        top_clients: snapshot.top_clients(top_limit),
        top_products: snapshot.top_products(top_limit),
        vessels: snapshot.annual_vessels(),
        evolution,
        totals,
    })
}

/// Keeps the months that had at least one vessel call.
pub fn active_months(series: Vec<MonthlySummary>) -> Vec<MonthlySummary> {
    series
        .into_iter()
        .filter(|m| m.totals.vessel_count > 0)
        .collect()
}

fn check_series_matches(
    totals: &PeriodTotals,
    series: &[MonthlySummary],
) -> Result<(), ServiceError> {
    let summed = PeriodTotals::from_sums(
        totals.year,
        None,
        series.iter().map(|m| m.totals.vessel_count).sum(),
        ledger::sum(series.iter().map(|m| m.totals.total_revenue)),
        ledger::sum(series.iter().map(|m| m.totals.total_expense)),
        ledger::sum(series.iter().map(|m| m.totals.operating_charges)),
    );

    if summed != *totals {
        error!(
            year = totals.year,
            expected = ?totals,
            summed = ?summed,
            "Annual totals diverge from monthly series"
        );
        return Err(ServiceError::InternalError(format!(
            "Annual totals for {} do not match the monthly series",
            totals.year
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reporting::period::Period;
    use crate::services::reporting::snapshot::fixtures::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn year_snapshot() -> PeriodSnapshot {
        let mut snap = PeriodSnapshot::new(Period::year(2024).unwrap());
        snap.vessels = vec![
            vessel(1, "MV Atlantic", date(2024, 3, 5)),
            vessel(2, "MV Gulf", date(2024, 3, 18)),
            vessel(3, "MV Niger", date(2024, 9, 1)),
        ];
        snap.revenues = vec![
            revenue(1, 1, 1, dec!(500000)),
            revenue(2, 2, 2, dec!(120000)),
            revenue(3, 3, 1, dec!(80000)),
        ];
        snap.expenses = vec![expense(1, 1, 1, dec!(200000)), expense(2, 3, 2, dec!(95000))];
        snap.charges = vec![
            charge(1, 1, 2024, 3, dec!(50000)),
            charge(2, 2, 2024, 5, dec!(10000)),
        ];
        snap
    }

    #[test]
    fn annual_report_is_consistent() {
        let report = annual_report(&year_snapshot(), 10).unwrap();

        assert_eq!(report.year, 2024);
        assert_eq!(report.evolution.len(), 12);
        assert_eq!(
            report.summary.iter().map(|m| m.totals.month).collect::<Vec<_>>(),
            vec![Some(3), Some(9)]
        );
        assert_eq!(report.totals.vessel_count, 3);
        assert_eq!(report.totals.total_revenue, dec!(700000));
        assert_eq!(report.totals.operating_charges, dec!(60000));
        assert_eq!(report.totals.global_result, dec!(345000));
        assert_eq!(report.top_vessels[0].vessel_id, 1);
        assert_eq!(report.top_vessels.last().unwrap().net_result, dec!(-15000));
        assert_eq!(report.vessels.len(), 3);
        assert_eq!(report.vessels[2].month_name, "Septembre");
    }

    #[test]
    fn top_limit_truncates_rankings() {
        let report = annual_report(&year_snapshot(), 2).unwrap();
        assert_eq!(report.top_vessels.len(), 2);
    }

    #[test]
    fn divergent_series_is_an_internal_error() {
        let snap = year_snapshot();
        let mut series = snap.monthly_series();
        series[0].totals.total_revenue += dec!(1);

        assert_matches!(
            check_series_matches(&snap.totals(), &series),
            Err(ServiceError::InternalError(_))
        );
    }

    #[test]
    fn monthly_report_carries_details_and_zero_filled_charges() {
        let mut snap = year_snapshot();
        snap.period = Some(Period::month(2024, 3).unwrap());
        snap.vessels.retain(|v| v.id != 3);
        snap.revenues.retain(|r| r.vessel_id != 3);
        snap.expenses.retain(|e| e.vessel_id != 3);
        snap.charges.retain(|c| c.month == 3);

        let report = monthly_report(&snap);
        assert_eq!(report.totals.month, Some(3));
        assert_eq!(report.totals.vessel_count, 2);
        assert_eq!(report.totals.net_vessel_result, dec!(420000));
        assert_eq!(report.totals.global_result, dec!(370000));
        assert_eq!(report.vessels.len(), 2);
        assert_eq!(report.vessels[0].result.name, "MV Atlantic");
    }
}
