use chrono::Datelike;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use super::dto::{
    AnnualVesselLine, CategoryBreakdown, CategoryTotal, ClientRanking, DetailLine,
    MonthlySummary, PeriodTotals, ProductRanking, ProductTonnage, VesselDetail, VesselResult,
};
use super::ledger::{self, fold_by_key, rank_desc, sorted_by_total, Accumulator, CategoryKey};
use super::period::{month_name, Period};
use crate::entities::{
    cargo_assignment, charge_category, client, expense, expense_category, operating_charge,
    product, revenue, revenue_category, vessel,
};

/// Rows of one reporting period, loaded together so every figure derived from
/// them comes from the same read.
///
/// `revenues`, `expenses` and `cargo` only belong to vessels in `vessels`;
/// `charges` only fall inside `period`.
#[derive(Debug, Clone, Default)]
pub struct PeriodSnapshot {
    pub period: Option<Period>,
    pub vessels: Vec<vessel::Model>,
    pub revenues: Vec<revenue::Model>,
    pub expenses: Vec<expense::Model>,
    pub charges: Vec<operating_charge::Model>,
    pub cargo: Vec<cargo_assignment::Model>,
    pub clients: BTreeMap<i32, client::Model>,
    pub products: BTreeMap<i32, product::Model>,
    pub revenue_categories: BTreeMap<i32, revenue_category::Model>,
    pub expense_categories: BTreeMap<i32, expense_category::Model>,
    pub charge_categories: BTreeMap<i32, charge_category::Model>,
}

impl PeriodSnapshot {
    pub fn new(period: Period) -> Self {
        Self {
            period: Some(period),
            ..Default::default()
        }
    }

    fn year_and_month(&self) -> (i32, Option<u32>) {
        self.period
            .map(|p| (p.year, p.month))
            .unwrap_or((0, None))
    }

    /// Per-vessel sub-aggregates, in arrival order.
    pub fn vessel_results(&self) -> Vec<VesselResult> {
        let revenue = fold_by_key(self.revenues.iter().map(|r| (r.vessel_id, r.amount)));
        let expense = fold_by_key(self.expenses.iter().map(|e| (e.vessel_id, e.amount)));
        let clients = self.distinct_per_vessel(|c| c.client_id);

        self.vessels
            .iter()
            .map(|v| {
                let total_revenue = revenue.get(&v.id).map_or(Decimal::ZERO, |a| a.total);
                let total_expense = expense.get(&v.id).map_or(Decimal::ZERO, |a| a.total);
                VesselResult {
                    vessel_id: v.id,
                    name: v.name.clone(),
                    imo_number: v.imo_number.clone(),
                    arrival_date: v.arrival_date,
                    departure_date: v.departure_date,
                    status: v.status,
                    client_count: clients.get(&v.id).map_or(0, |s| s.len() as u64),
                    total_revenue,
                    total_expense,
                    net_result: total_revenue - total_expense,
                }
            })
            .collect()
    }

    /// Totals for the whole snapshot period.
    pub fn totals(&self) -> PeriodTotals {
        let (year, month) = self.year_and_month();
        let results = self.vessel_results();
        PeriodTotals::from_sums(
            year,
            month,
            results.len() as u64,
            ledger::sum(results.iter().map(|r| r.total_revenue)),
            ledger::sum(results.iter().map(|r| r.total_expense)),
            ledger::sum(self.charges.iter().map(|c| c.amount)),
        )
    }

    /// Twelve month entries, January first, zero-filled where nothing happened.
    pub fn monthly_series(&self) -> Vec<MonthlySummary> {
        let (year, _) = self.year_and_month();
        let results = self.vessel_results();

        (1..=12u32)
            .map(|month| {
                let arrived: Vec<&VesselResult> = results
                    .iter()
                    .filter(|r| r.arrival_date.year() == year && r.arrival_date.month() == month)
                    .collect();
                let charges = ledger::sum(
                    self.charges
                        .iter()
                        .filter(|c| c.year == year && c.month == month as i32)
                        .map(|c| c.amount),
                );
                MonthlySummary {
                    month_name: month_name(month).to_string(),
                    totals: PeriodTotals::from_sums(
                        year,
                        Some(month),
                        arrived.len() as u64,
                        ledger::sum(arrived.iter().map(|r| r.total_revenue)),
                        ledger::sum(arrived.iter().map(|r| r.total_expense)),
                        charges,
                    ),
                }
            })
            .collect()
    }

    pub fn category_breakdown(&self, include_empty_charges: bool) -> CategoryBreakdown {
        CategoryBreakdown {
            revenues: revenue_category_totals(&self.revenues, &self.revenue_categories),
            expenses: expense_category_totals(&self.expenses, &self.expense_categories),
            charges: charge_category_totals(
                &self.charges,
                &self.charge_categories,
                include_empty_charges,
            ),
        }
    }

    /// Vessels by net result, best first. Negative results are kept.
    pub fn top_vessels(&self, limit: usize) -> Vec<VesselResult> {
        let mut results = self.vessel_results();
        results.sort_by(|a, b| {
            b.net_result
                .cmp(&a.net_result)
                .then_with(|| a.vessel_id.cmp(&b.vessel_id))
        });
        results.truncate(limit);
        results
    }

    /// Clients by number of vessel calls, then tonnage.
    pub fn top_clients(&self, limit: usize) -> Vec<ClientRanking> {
        #[derive(Default)]
        struct ClientTally {
            vessels: BTreeSet<i32>,
            tonnage: Decimal,
            products: BTreeSet<String>,
        }

        let tallies = self
            .cargo
            .iter()
            .fold(BTreeMap::<i32, ClientTally>::new(), |mut acc, c| {
                let tally = acc.entry(c.client_id).or_default();
                tally.vessels.insert(c.vessel_id);
                tally.tonnage += c.tonnage;
                if let Some(p) = self.products.get(&c.product_id) {
                    tally.products.insert(p.name.clone());
                }
                acc
            });

        let mut ranked: Vec<(i32, ClientTally)> = tallies.into_iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            rank_desc(
                (a.vessels.len(), a.tonnage, *a_id),
                (b.vessels.len(), b.tonnage, *b_id),
            )
        });

        ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, (client_id, tally))| {
                let client = self.clients.get(&client_id);
                ClientRanking {
                    rank: idx as u32 + 1,
                    client_id,
                    name: client.map(|c| c.name.clone()).unwrap_or_default(),
                    code: client.map(|c| c.code.clone()).unwrap_or_default(),
                    vessel_count: tally.vessels.len() as u64,
                    tonnage: tally.tonnage,
                    products: tally.products.into_iter().collect(),
                }
            })
            .collect()
    }

    /// Products by tonnage, then number of vessel calls.
    pub fn top_products(&self, limit: usize) -> Vec<ProductRanking> {
        #[derive(Default)]
        struct ProductTally {
            vessels: BTreeSet<i32>,
            clients: BTreeSet<i32>,
            tonnage: Decimal,
        }

        let tallies = self
            .cargo
            .iter()
            .fold(BTreeMap::<i32, ProductTally>::new(), |mut acc, c| {
                let tally = acc.entry(c.product_id).or_default();
                tally.vessels.insert(c.vessel_id);
                tally.clients.insert(c.client_id);
                tally.tonnage += c.tonnage;
                acc
            });

        let mut ranked: Vec<(i32, ProductTally)> = tallies.into_iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            rank_desc(
                (a.tonnage, a.vessels.len(), *a_id),
                (b.tonnage, b.vessels.len(), *b_id),
            )
        });

        ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, (product_id, tally))| {
                let product = self.products.get(&product_id);
                ProductRanking {
                    rank: idx as u32 + 1,
                    product_id,
                    name: product.map(|p| p.name.clone()).unwrap_or_default(),
                    code: product.map(|p| p.code.clone()).unwrap_or_default(),
                    vessel_count: tally.vessels.len() as u64,
                    client_count: tally.clients.len() as u64,
                    tonnage: tally.tonnage,
                }
            })
            .collect()
    }

    /// Per-vessel detail blocks of the monthly report.
    pub fn vessel_details(&self) -> Vec<VesselDetail> {
        self.vessel_results()
            .into_iter()
            .map(|result| {
                let id = result.vessel_id;
                let revenues: Vec<revenue::Model> = self
                    .revenues
                    .iter()
                    .filter(|r| r.vessel_id == id)
                    .cloned()
                    .collect();
                let expenses: Vec<expense::Model> = self
                    .expenses
                    .iter()
                    .filter(|e| e.vessel_id == id)
                    .cloned()
                    .collect();

                let mut revenue_lines: Vec<DetailLine> = revenues
                    .iter()
                    .map(|r| {
                        let category = self.revenue_categories.get(&r.category_id);
                        DetailLine {
                            category_id: r.category_id,
                            category: category_name(category.map(|c| c.name.as_str()), r.category_id),
                            label: category.map(|c| c.category_group.clone()),
                            amount: r.amount,
                            date: r.revenue_date,
                        }
                    })
                    .collect();
                revenue_lines.sort_by_key(|l| l.date);

                let mut expense_lines: Vec<DetailLine> = expenses
                    .iter()
                    .map(|e| {
                        let category = self.expense_categories.get(&e.category_id);
                        DetailLine {
                            category_id: e.category_id,
                            category: category_name(category.map(|c| c.name.as_str()), e.category_id),
                            label: category.map(|c| c.code.clone()),
                            amount: e.amount,
                            date: e.expense_date,
                        }
                    })
                    .collect();
                expense_lines.sort_by_key(|l| l.date);

                VesselDetail {
                    clients: self.client_names(id),
                    products: self.product_tonnages(id),
                    revenue_by_category: revenue_category_totals(
                        &revenues,
                        &self.revenue_categories,
                    ),
                    expense_by_category: expense_category_totals(
                        &expenses,
                        &self.expense_categories,
                    ),
                    revenues: revenue_lines,
                    expenses: expense_lines,
                    result,
                }
            })
            .collect()
    }

    /// Full vessel listing of the annual report, in arrival order.
    pub fn annual_vessels(&self) -> Vec<AnnualVesselLine> {
        self.vessel_results()
            .into_iter()
            .map(|result| {
                let month = result.arrival_date.month();
                AnnualVesselLine {
                    month,
                    month_name: month_name(month).to_string(),
                    clients: self.client_names(result.vessel_id),
                    products: self
                        .product_tonnages(result.vessel_id)
                        .into_iter()
                        .map(|p| p.name)
                        .collect(),
                    result,
                }
            })
            .collect()
    }

    fn distinct_per_vessel<F>(&self, key: F) -> BTreeMap<i32, BTreeSet<i32>>
    where
        F: Fn(&cargo_assignment::Model) -> i32,
    {
        self.cargo.iter().fold(BTreeMap::new(), |mut acc, c| {
            acc.entry(c.vessel_id)
                .or_insert_with(BTreeSet::new)
                .insert(key(c));
            acc
        })
    }

    fn client_names(&self, vessel_id: i32) -> Vec<String> {
        self.cargo
            .iter()
            .filter(|c| c.vessel_id == vessel_id)
            .filter_map(|c| self.clients.get(&c.client_id))
            .map(|c| c.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn product_tonnages(&self, vessel_id: i32) -> Vec<ProductTonnage> {
        self.cargo
            .iter()
            .filter(|c| c.vessel_id == vessel_id)
            .filter_map(|c| self.products.get(&c.product_id).map(|p| (p.name.clone(), c.tonnage)))
            .fold(BTreeMap::<String, Decimal>::new(), |mut acc, (name, tonnage)| {
                *acc.entry(name).or_insert(Decimal::ZERO) += tonnage;
                acc
            })
            .into_iter()
            .map(|(name, tonnage)| ProductTonnage { name, tonnage })
            .collect()
    }
}

fn category_name(name: Option<&str>, id: i32) -> String {
    name.map(str::to_string)
        .unwrap_or_else(|| format!("Catégorie {id}"))
}

fn category_total(
    key: CategoryKey,
    acc: Accumulator,
    name: Option<&str>,
    code: Option<String>,
    group: Option<String>,
) -> CategoryTotal {
    CategoryTotal {
        category_id: key.0,
        name: category_name(name, key.0),
        code,
        group,
        operation_count: acc.count,
        total: acc.total,
    }
}

/// Revenue rows grouped per category, largest total first.
pub fn revenue_category_totals(
    rows: &[revenue::Model],
    categories: &BTreeMap<i32, revenue_category::Model>,
) -> Vec<CategoryTotal> {
    let groups = fold_by_key(rows.iter().map(|r| (CategoryKey(r.category_id), r.amount)));
    sorted_by_total(groups)
        .into_iter()
        .map(|(key, acc)| {
            let category = categories.get(&key.0);
            category_total(
                key,
                acc,
                category.map(|c| c.name.as_str()),
                None,
                category.map(|c| c.category_group.clone()),
            )
        })
        .collect()
}

/// Expense rows grouped per category, largest total first.
pub fn expense_category_totals(
    rows: &[expense::Model],
    categories: &BTreeMap<i32, expense_category::Model>,
) -> Vec<CategoryTotal> {
    let groups = fold_by_key(rows.iter().map(|e| (CategoryKey(e.category_id), e.amount)));
    sorted_by_total(groups)
        .into_iter()
        .map(|(key, acc)| {
            let category = categories.get(&key.0);
            category_total(
                key,
                acc,
                category.map(|c| c.name.as_str()),
                category.map(|c| c.code.clone()),
                None,
            )
        })
        .collect()
}

/// Charge rows grouped per category; with `include_empty` every known category
/// appears, zero when it has no charge.
pub fn charge_category_totals(
    rows: &[operating_charge::Model],
    categories: &BTreeMap<i32, charge_category::Model>,
    include_empty: bool,
) -> Vec<CategoryTotal> {
    let mut groups = fold_by_key(rows.iter().map(|c| (CategoryKey(c.category_id), c.amount)));
    if include_empty {
        for id in categories.keys() {
            groups.entry(CategoryKey(*id)).or_default();
        }
    }
    sorted_by_total(groups)
        .into_iter()
        .map(|(key, acc)| {
            let category = categories.get(&key.0);
            category_total(
                key,
                acc,
                category.map(|c| c.name.as_str()),
                category.map(|c| c.code.clone()),
                None,
            )
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::entities::VesselStatus;
    use chrono::{NaiveDate, Utc};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn vessel(id: i32, name: &str, arrival: NaiveDate) -> vessel::Model {
        vessel::Model {
            id,
            name: name.to_string(),
            imo_number: Some(format!("IMO{id:07}")),
            arrival_date: arrival,
            departure_date: None,
            status: VesselStatus::InProgress,
            total_tonnage: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn revenue(id: i32, vessel_id: i32, category_id: i32, amount: Decimal) -> revenue::Model {
        revenue::Model {
            id,
            vessel_id,
            category_id,
            amount,
            revenue_date: date(2024, 3, 10),
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn expense(id: i32, vessel_id: i32, category_id: i32, amount: Decimal) -> expense::Model {
        expense::Model {
            id,
            vessel_id,
            category_id,
            amount,
            expense_date: date(2024, 3, 12),
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn charge(
        id: i32,
        category_id: i32,
        year: i32,
        month: i32,
        amount: Decimal,
    ) -> operating_charge::Model {
        operating_charge::Model {
            id,
            category_id,
            amount,
            month,
            year,
            description: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn cargo(
        id: i32,
        vessel_id: i32,
        client_id: i32,
        product_id: i32,
        tonnage: Decimal,
    ) -> cargo_assignment::Model {
        cargo_assignment::Model {
            id,
            vessel_id,
            client_id,
            product_id,
            tonnage,
            loading_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn client(id: i32, name: &str) -> client::Model {
        client::Model {
            id,
            name: name.to_string(),
            code: name.to_uppercase(),
            email: None,
            phone: None,
            address: None,
            created_at: Utc::now(),
        }
    }

    pub fn product(id: i32, name: &str) -> product::Model {
        product::Model {
            id,
            name: name.to_string(),
            code: name.to_uppercase(),
            description: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use rust_decimal_macros::dec;

    fn march_2024() -> PeriodSnapshot {
        let mut snap = PeriodSnapshot::new(Period::month(2024, 3).unwrap());
        snap.vessels = vec![vessel(1, "MV Atlantic", date(2024, 3, 5))];
        snap.revenues = vec![revenue(1, 1, 1, dec!(500000))];
        snap.expenses = vec![expense(1, 1, 1, dec!(200000))];
        snap.charges = vec![charge(1, 1, 2024, 3, dec!(50000))];
        snap
    }

    #[test]
    fn month_totals_match_worked_example() {
        let totals = march_2024().totals();

        assert_eq!(totals.vessel_count, 1);
        assert_eq!(totals.total_revenue, dec!(500000));
        assert_eq!(totals.total_expense, dec!(200000));
        assert_eq!(totals.net_vessel_result, dec!(300000));
        assert_eq!(totals.operating_charges, dec!(50000));
        assert_eq!(totals.global_result, dec!(250000));
    }

    #[test]
    fn vessel_without_rows_has_zero_totals() {
        let mut snap = march_2024();
        snap.vessels.push(vessel(2, "MV Empty", date(2024, 3, 20)));

        let results = snap.vessel_results();
        let empty = results.iter().find(|r| r.vessel_id == 2).unwrap();
        assert_eq!(empty.total_revenue, Decimal::ZERO);
        assert_eq!(empty.total_expense, Decimal::ZERO);
        assert_eq!(empty.net_result, Decimal::ZERO);
    }

    #[test]
    fn series_has_twelve_months_and_sums_to_year() {
        let mut snap = PeriodSnapshot::new(Period::year(2024).unwrap());
        snap.vessels = vec![
            vessel(1, "A", date(2024, 1, 3)),
            vessel(2, "B", date(2024, 1, 28)),
            vessel(3, "C", date(2024, 7, 14)),
        ];
        snap.revenues = vec![
            revenue(1, 1, 1, dec!(1000.50)),
            revenue(2, 2, 2, dec!(250)),
            revenue(3, 3, 1, dec!(9000)),
        ];
        snap.expenses = vec![expense(1, 3, 1, dec!(400.25))];
        snap.charges = vec![
            charge(1, 1, 2024, 2, dec!(300)),
            charge(2, 2, 2024, 7, dec!(100)),
        ];

        let series = snap.monthly_series();
        assert_eq!(series.len(), 12);
        assert_eq!(
            series.iter().map(|m| m.totals.month.unwrap()).collect::<Vec<_>>(),
            (1..=12).collect::<Vec<u32>>()
        );
        assert_eq!(series[0].totals.vessel_count, 2);
        assert_eq!(series[1].totals.vessel_count, 0);
        assert_eq!(series[1].totals.global_result, dec!(-300));
        assert_eq!(series[6].month_name, "Juillet");

        let year = snap.totals();
        assert_eq!(
            ledger::sum(series.iter().map(|m| m.totals.total_revenue)),
            year.total_revenue
        );
        assert_eq!(
            ledger::sum(series.iter().map(|m| m.totals.operating_charges)),
            year.operating_charges
        );
        assert_eq!(
            year.global_result,
            year.net_vessel_result - year.operating_charges
        );
    }

    #[test]
    fn top_vessels_keep_negative_results_in_order() {
        let mut snap = PeriodSnapshot::new(Period::year(2024).unwrap());
        snap.vessels = (1..=4)
            .map(|id| vessel(id, &format!("V{id}"), date(2024, 2, id as u32)))
            .collect();
        snap.revenues = vec![
            revenue(1, 1, 1, dec!(150000000)),
            revenue(2, 2, 1, dec!(170000000)),
            revenue(3, 3, 1, dec!(140000000)),
        ];
        snap.expenses = vec![expense(1, 4, 1, dec!(20000000))];

        let nets: Vec<Decimal> = snap.top_vessels(10).iter().map(|v| v.net_result).collect();
        assert_eq!(
            nets,
            vec![
                dec!(170000000),
                dec!(150000000),
                dec!(140000000),
                dec!(-20000000)
            ]
        );
        assert_eq!(snap.top_vessels(2).len(), 2);
    }

    #[test]
    fn client_and_product_rankings_use_secondary_keys() {
        let mut snap = PeriodSnapshot::new(Period::year(2024).unwrap());
        snap.vessels = vec![
            vessel(1, "A", date(2024, 1, 1)),
            vessel(2, "B", date(2024, 2, 1)),
        ];
        snap.clients = [client(1, "Sogeco"), client(2, "Cotonou Bulk"), client(3, "Delta")]
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        snap.products = [product(1, "Clinker"), product(2, "Riz")]
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        snap.cargo = vec![
            cargo(1, 1, 1, 1, dec!(1000)),
            cargo(2, 2, 1, 2, dec!(500)),
            cargo(3, 1, 2, 2, dec!(9000)),
            cargo(4, 2, 3, 2, dec!(9000)),
        ];

        let clients = snap.top_clients(10);
        assert_eq!(
            clients.iter().map(|c| c.client_id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(clients[0].vessel_count, 2);
        assert_eq!(clients[0].products, vec!["Clinker", "Riz"]);
        assert_eq!(clients[0].rank, 1);

        let products = snap.top_products(10);
        assert_eq!(products[0].name, "Riz");
        assert_eq!(products[0].tonnage, dec!(18500));
        assert_eq!(products[0].client_count, 3);
        assert_eq!(products[1].vessel_count, 1);
    }

    #[test]
    fn month_charge_breakdown_lists_every_category() {
        let mut snap = march_2024();
        snap.charge_categories = [(1, "Salaires", "SALAIRES"), (2, "Loyer", "LOYER")]
            .into_iter()
            .map(|(id, name, code)| {
                (
                    id,
                    charge_category::Model {
                        id,
                        name: name.into(),
                        code: code.into(),
                    },
                )
            })
            .collect();

        let charges = snap.category_breakdown(true).charges;
        assert_eq!(charges.len(), 2);
        assert_eq!(charges[0].name, "Salaires");
        assert_eq!(charges[1].total, Decimal::ZERO);
        assert_eq!(charges[1].code.as_deref(), Some("LOYER"));

        assert_eq!(snap.category_breakdown(false).charges.len(), 1);
    }

    #[test]
    fn vessel_details_group_lines_per_category() {
        let mut snap = march_2024();
        snap.revenues.push(revenue(2, 1, 1, dec!(25000)));
        snap.revenues.push(revenue(3, 1, 2, dec!(90000)));
        snap.clients.insert(1, client(1, "Sogeco"));
        snap.products.insert(1, product(1, "Clinker"));
        snap.cargo = vec![cargo(1, 1, 1, 1, dec!(3000)), cargo(2, 1, 1, 1, dec!(2000))];

        let details = snap.vessel_details();
        assert_eq!(details.len(), 1);
        let detail = &details[0];
        assert_eq!(detail.clients, vec!["Sogeco"]);
        assert_eq!(detail.products[0].tonnage, dec!(5000));
        assert_eq!(detail.revenue_by_category[0].total, dec!(525000));
        assert_eq!(detail.revenue_by_category[0].operation_count, 2);
        assert_eq!(detail.revenues.len(), 3);
        assert_eq!(detail.result.client_count, 1);
    }
}
