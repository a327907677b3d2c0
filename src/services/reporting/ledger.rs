//! Decimal accumulation over transaction rows.
//!
//! Everything here is pure: callers hand in already-loaded rows and get typed
//! totals back, so the grouping rules can be tested without a database.

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Identifier of a revenue, expense or charge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CategoryKey(pub i32);

/// Running count and sum for one group of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accumulator {
    pub count: u64,
    pub total: Decimal,
}

impl Accumulator {
    pub fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.total += amount;
    }
}

/// Groups `(key, amount)` pairs, summing amounts per key.
pub fn fold_by_key<K, I>(entries: I) -> BTreeMap<K, Accumulator>
where
    K: Ord,
    I: IntoIterator<Item = (K, Decimal)>,
{
    entries
        .into_iter()
        .fold(BTreeMap::new(), |mut groups, (key, amount)| {
            groups.entry(key).or_insert_with(Accumulator::default).add(amount);
            groups
        })
}

/// Sums every amount, yielding zero for an empty sequence.
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc + amount)
}

/// Groups ordered by total descending; equal totals keep ascending key order.
pub fn sorted_by_total<K: Ord>(groups: BTreeMap<K, Accumulator>) -> Vec<(K, Accumulator)> {
    let mut sorted: Vec<(K, Accumulator)> = groups.into_iter().collect();
    // Stable sort over key-ordered input
    sorted.sort_by(|a, b| b.1.total.cmp(&a.1.total));
    sorted
}

/// Descending comparison on a primary then secondary key, ascending id last.
pub fn rank_desc<P, S>(a: (P, S, i32), b: (P, S, i32)) -> Ordering
where
    P: Ord,
    S: Ord,
{
    b.0.cmp(&a.0)
        .then_with(|| b.1.cmp(&a.1))
        .then_with(|| a.2.cmp(&b.2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn fold_groups_and_counts() {
        let groups = fold_by_key(vec![
            (CategoryKey(2), dec!(100)),
            (CategoryKey(1), dec!(40.5)),
            (CategoryKey(2), dec!(0.25)),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[&CategoryKey(2)],
            Accumulator {
                count: 2,
                total: dec!(100.25)
            }
        );
        assert_eq!(groups[&CategoryKey(1)].total, dec!(40.5));
    }

    #[test]
    fn empty_sum_is_zero() {
        assert_eq!(sum(Vec::<Decimal>::new()), Decimal::ZERO);
    }

    #[test]
    fn equal_totals_fall_back_to_key_order() {
        let groups = fold_by_key(vec![
            (CategoryKey(5), dec!(10)),
            (CategoryKey(3), dec!(10)),
            (CategoryKey(9), dec!(25)),
        ]);

        let keys: Vec<i32> = sorted_by_total(groups).into_iter().map(|(k, _)| k.0).collect();
        assert_eq!(keys, vec![9, 3, 5]);
    }

    #[test]
    fn rank_desc_uses_secondary_then_id() {
        let mut rows = vec![(2, 10, 7), (2, 30, 4), (5, 0, 9), (2, 30, 1)];
        rows.sort_by(|a, b| rank_desc(*a, *b));
        assert_eq!(rows, vec![(5, 0, 9), (2, 30, 1), (2, 30, 4), (2, 10, 7)]);
    }

    #[test]
    fn many_small_amounts_do_not_drift() {
        let total = sum(std::iter::repeat(dec!(0.1)).take(10_000));
        assert_eq!(total, dec!(1000.0));
    }

    proptest! {
        #[test]
        fn grouped_totals_add_up_to_overall_sum(
            rows in proptest::collection::vec((0i32..6, -1_000_000i64..1_000_000i64), 0..200)
        ) {
            let entries: Vec<(CategoryKey, Decimal)> = rows
                .iter()
                .map(|(k, cents)| (CategoryKey(*k), Decimal::new(*cents, 2)))
                .collect();
            let overall = sum(entries.iter().map(|(_, a)| *a));
            let groups = fold_by_key(entries.clone());

            let regrouped = sum(groups.values().map(|acc| acc.total));
            let count: u64 = groups.values().map(|acc| acc.count).sum();

            prop_assert_eq!(regrouped, overall);
            prop_assert_eq!(count as usize, entries.len());
        }

        #[test]
        fn sorted_groups_are_non_increasing(
            rows in proptest::collection::vec((0i32..20, 0i64..1_000), 0..100)
        ) {
            let groups = fold_by_key(rows.iter().map(|(k, v)| (CategoryKey(*k), Decimal::from(*v))));
            let sorted = sorted_by_total(groups);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].1.total >= pair[1].1.total);
                if pair[0].1.total == pair[1].1.total {
                    prop_assert!(pair[0].0 < pair[1].0);
                }
            }
        }
    }
}
