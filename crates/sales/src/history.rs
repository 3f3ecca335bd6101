//! Sales history views: period filters, totals and search.

use chrono::{DateTime, Datelike, Days, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use ticketpos_core::{DomainError, DomainResult, Money};

use crate::sale::Sale;

/// Reporting window relative to a reference instant (`now`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesPeriod {
    /// Same calendar date as `now`.
    Today,
    /// The last seven days, up to `now`.
    Week,
    /// From the first instant of `now`'s month, up to `now`.
    Month,
}

impl SalesPeriod {
    pub const ALL: [SalesPeriod; 3] = [SalesPeriod::Today, SalesPeriod::Week, SalesPeriod::Month];

    /// Earliest instant included in the window.
    pub fn start(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            SalesPeriod::Today => Utc.from_utc_datetime(&now.date_naive().and_time(NaiveTime::MIN)),
            SalesPeriod::Week => now - Duration::days(7),
            SalesPeriod::Month => {
                let first = now.date_naive() - Days::new(u64::from(now.day0()));
                Utc.from_utc_datetime(&first.and_time(NaiveTime::MIN))
            }
        }
    }

    pub fn contains(self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            SalesPeriod::Today => created_at.date_naive() == now.date_naive(),
            SalesPeriod::Week | SalesPeriod::Month => {
                created_at >= self.start(now) && created_at <= now
            }
        }
    }
}

/// Count and total of a set of sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub count: usize,
    pub total: Money,
}

/// Sales that fall into `period`, in their original order.
pub fn filter_period(sales: &[Sale], period: SalesPeriod, now: DateTime<Utc>) -> Vec<&Sale> {
    sales
        .iter()
        .filter(|s| period.contains(s.created_at, now))
        .collect()
}

/// Count and exact total; `AmountOverflow` if the total does not fit.
pub fn summarize<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> DomainResult<SalesSummary> {
    sales
        .into_iter()
        .try_fold(SalesSummary::default(), |acc, sale| {
            let total = acc
                .total
                .checked_add(sale.total)
                .ok_or_else(DomainError::amount_overflow)?;
            Ok(SalesSummary {
                count: acc.count + 1,
                total,
            })
        })
}

/// Sales whose id, or any sold product name, contains `query` (case-insensitive).
///
/// A blank query keeps everything.
pub fn search<'a>(sales: impl IntoIterator<Item = &'a Sale>, query: &str) -> Vec<&'a Sale> {
    let needle = query.trim().to_lowercase();
    sales
        .into_iter()
        .filter(|sale| {
            needle.is_empty()
                || sale.id.to_string().to_lowercase().contains(&needle)
                || sale
                    .items
                    .iter()
                    .any(|item| item.name.to_lowercase().contains(&needle))
        })
        .collect()
}

/// The `limit` most recent sales, newest first.
pub fn recent<'a>(sales: impl IntoIterator<Item = &'a Sale>, limit: usize) -> Vec<&'a Sale> {
    let mut sorted: Vec<&Sale> = sales.into_iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sale::{PaymentMethod, SaleId, SaleItem, SaleStatus};
    use ticketpos_core::BusinessId;
    use ticketpos_products::ProductId;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn sale(created_at: DateTime<Utc>, lines: &[(&str, u64, u64)]) -> Sale {
        let items: Vec<SaleItem> = lines
            .iter()
            .enumerate()
            .map(|(i, (name, quantity, price))| SaleItem {
                product_id: ProductId::new(i.to_string()),
                name: name.to_string(),
                quantity: *quantity,
                price: Money::from_cents(*price),
            })
            .collect();
        let total = Money::try_sum(items.iter().map(|i| i.subtotal().unwrap())).unwrap();
        Sale {
            id: SaleId::new(),
            business_id: BusinessId::new(),
            items,
            total,
            payment_method: PaymentMethod::Cash,
            status: SaleStatus::Completed,
            created_at,
        }
    }

    fn history(now: DateTime<Utc>) -> Vec<Sale> {
        vec![
            sale(now - Duration::hours(1), &[("Café Americano", 2, 250), ("Café Latte", 1, 350)]),
            sale(now - Duration::days(1), &[("Croissant", 3, 200), ("Sandwich de Jamón y Queso", 1, 450)]),
            sale(now - Duration::days(7), &[("Jugo de Naranja", 2, 300)]),
        ]
    }

    #[test]
    fn today_matches_calendar_date() {
        let now = at("2026-03-18T15:00:00Z");
        let sales = vec![
            sale(at("2026-03-18T00:00:00Z"), &[("A", 1, 100)]),
            sale(at("2026-03-18T23:59:59Z"), &[("B", 1, 100)]),
            sale(at("2026-03-17T23:59:59Z"), &[("C", 1, 100)]),
        ];
        let today = filter_period(&sales, SalesPeriod::Today, now);
        assert_eq!(today.len(), 2);
    }

    #[test]
    fn week_is_seven_days_back_inclusive() {
        let now = at("2026-03-18T15:00:00Z");
        assert!(SalesPeriod::Week.contains(at("2026-03-11T15:00:00Z"), now));
        assert!(!SalesPeriod::Week.contains(at("2026-03-11T14:59:59Z"), now));
        assert!(!SalesPeriod::Week.contains(at("2026-03-18T15:00:01Z"), now));
    }

    #[test]
    fn month_starts_on_the_first() {
        let now = at("2026-03-18T15:00:00Z");
        assert_eq!(SalesPeriod::Month.start(now), at("2026-03-01T00:00:00Z"));
        assert!(SalesPeriod::Month.contains(at("2026-03-01T00:00:00Z"), now));
        assert!(!SalesPeriod::Month.contains(at("2026-02-28T23:59:59Z"), now));
    }

    #[test]
    fn summaries_per_period() {
        // Early in the month, so the week reaches back into February.
        let now = at("2026-03-04T15:00:00Z");
        let sales = history(now);

        let today = summarize(filter_period(&sales, SalesPeriod::Today, now)).unwrap();
        assert_eq!(today, SalesSummary { count: 1, total: Money::from_cents(850) });

        let week = summarize(filter_period(&sales, SalesPeriod::Week, now)).unwrap();
        assert_eq!(week, SalesSummary { count: 3, total: Money::from_cents(2_500) });

        let month = summarize(filter_period(&sales, SalesPeriod::Month, now)).unwrap();
        assert_eq!(month, SalesSummary { count: 2, total: Money::from_cents(1_900) });
    }

    #[test]
    fn summary_reports_overflowing_total() {
        let now = at("2026-03-18T15:00:00Z");
        let sales = vec![
            sale(now, &[("A", 1, u64::MAX)]),
            sale(now, &[("B", 1, 1)]),
        ];
        assert_eq!(summarize(&sales), Err(DomainError::AmountOverflow));
        assert_eq!(
            summarize(&sales[..1]).unwrap(),
            SalesSummary { count: 1, total: Money::from_cents(u64::MAX) }
        );
    }

    #[test]
    fn search_matches_product_names_and_ids() {
        let now = at("2026-03-18T15:00:00Z");
        let sales = history(now);

        let hits = search(&sales, "latte");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, sales[0].id);

        let by_id = search(&sales, &sales[2].short_id().to_uppercase());
        assert!(by_id.iter().any(|s| s.id == sales[2].id));

        assert_eq!(search(&sales, "  ").len(), 3);
        assert!(search(&sales, "pizza").is_empty());
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let now = at("2026-03-18T15:00:00Z");
        let mut sales = history(now);
        sales.reverse();

        let latest = recent(&sales, 2);
        assert_eq!(latest.len(), 2);
        assert!(latest[0].created_at > latest[1].created_at);
        assert_eq!(latest[0].created_at, now - Duration::hours(1));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a past sale from today is also in this week and this month.
            #[test]
            fn today_is_within_week_and_month(
                secs_into_day in 0i64..86_400,
                back in 0i64..86_400,
                day in 1u32..28
            ) {
                let now = at(&format!("2026-05-{day:02}T00:00:00Z")) + Duration::seconds(secs_into_day);
                let created = now - Duration::seconds(back);
                if SalesPeriod::Today.contains(created, now) {
                    prop_assert!(SalesPeriod::Week.contains(created, now));
                    prop_assert!(SalesPeriod::Month.contains(created, now));
                }
            }

            /// Property: the summary total is the sum of the filtered sale totals.
            #[test]
            fn summary_total_is_additive(
                offsets in prop::collection::vec((0i64..60 * 24 * 40, 1u64..10_000), 0..30)
            ) {
                let now = at("2026-03-18T15:00:00Z");
                let sales: Vec<Sale> = offsets
                    .iter()
                    .map(|(mins, cents)| sale(now - Duration::minutes(*mins), &[("X", 1, *cents)]))
                    .collect();

                for period in SalesPeriod::ALL {
                    let filtered = filter_period(&sales, period, now);
                    let expected: u64 = filtered.iter().map(|s| s.total.cents()).sum();
                    let summary = summarize(filtered.iter().copied()).unwrap();
                    prop_assert_eq!(summary.count, filtered.len());
                    prop_assert_eq!(summary.total.cents(), expected);
                }
            }
        }
    }
}
