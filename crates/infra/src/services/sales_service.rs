use chrono::{DateTime, Utc};

use ticketpos_core::BusinessId;
use ticketpos_sales::{Sale, SalesPeriod, SalesSummary, filter_period, recent, search, summarize};

use crate::error::ServiceError;
use crate::services::sales_repository::SalesRepository;

/// Sales history use cases for one business.
#[derive(Debug, Clone)]
pub struct SalesService<R> {
    repository: R,
    business_id: BusinessId,
}

impl<R> SalesService<R>
where
    R: SalesRepository,
{
    pub fn new(repository: R, business_id: BusinessId) -> Self {
        Self {
            repository,
            business_id,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Full history, newest first.
    pub async fn history(&self) -> Result<Vec<Sale>, ServiceError> {
        self.repository.list_sales(self.business_id).await
    }

    /// Sales within `period` relative to `now`, newest first.
    pub async fn in_period(
        &self,
        period: SalesPeriod,
        now: DateTime<Utc>,
    ) -> Result<Vec<Sale>, ServiceError> {
        let sales = self.history().await?;
        Ok(filter_period(&sales, period, now).into_iter().cloned().collect())
    }

    pub async fn summary(
        &self,
        period: SalesPeriod,
        now: DateTime<Utc>,
    ) -> Result<SalesSummary, ServiceError> {
        let sales = self.history().await?;
        Ok(summarize(filter_period(&sales, period, now))?)
    }

    /// History entries matching `query` by id or product name, optionally
    /// restricted to a period.
    pub async fn search(
        &self,
        query: &str,
        period: Option<SalesPeriod>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Sale>, ServiceError> {
        let sales = self.history().await?;
        let scoped: Vec<&Sale> = match period {
            Some(period) => filter_period(&sales, period, now),
            None => sales.iter().collect(),
        };
        Ok(search(scoped, query).into_iter().cloned().collect())
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<Sale>, ServiceError> {
        let sales = self.history().await?;
        Ok(recent(&sales, limit).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sales_repository::InMemorySalesRepository;
    use chrono::Duration;
    use ticketpos_core::Money;
    use ticketpos_products::ProductId;
    use ticketpos_sales::{NewSale, PaymentMethod, SaleItem};

    fn line(name: &str, quantity: u64, cents: u64) -> SaleItem {
        SaleItem {
            product_id: ProductId::new(name),
            name: name.to_string(),
            quantity,
            price: Money::from_cents(cents),
        }
    }

    async fn seeded(now: DateTime<Utc>) -> SalesService<InMemorySalesRepository> {
        let business_id = BusinessId::new();
        let repo = InMemorySalesRepository::new();
        let fixtures = [
            (Duration::hours(1), vec![line("Café Latte", 2, 350)]),
            (Duration::days(2), vec![line("Croissant", 3, 200)]),
            (Duration::days(20), vec![line("Jugo de Naranja", 1, 300)]),
        ];
        for (age, items) in fixtures {
            let total = Money::try_sum(items.iter().map(|i| i.subtotal().unwrap())).unwrap();
            repo.record_sale(NewSale {
                items,
                total,
                created_at: now - age,
                business_id,
                payment_method: PaymentMethod::Cash,
            })
            .await
            .unwrap();
        }
        SalesService::new(repo, business_id)
    }

    #[tokio::test]
    async fn summaries_by_period() {
        let now = DateTime::parse_from_rfc3339("2026-03-25T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let svc = seeded(now).await;

        let today = svc.summary(SalesPeriod::Today, now).await.unwrap();
        assert_eq!(today, SalesSummary { count: 1, total: Money::from_cents(700) });

        let week = svc.summary(SalesPeriod::Week, now).await.unwrap();
        assert_eq!(week, SalesSummary { count: 2, total: Money::from_cents(1_300) });

        let month = svc.summary(SalesPeriod::Month, now).await.unwrap();
        assert_eq!(month, SalesSummary { count: 3, total: Money::from_cents(1_600) });
    }

    #[tokio::test]
    async fn search_within_period() {
        let now = Utc::now();
        let svc = seeded(now).await;

        assert_eq!(svc.search("croissant", None, now).await.unwrap().len(), 1);
        assert!(svc
            .search("croissant", Some(SalesPeriod::Today), now)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(svc.search("", Some(SalesPeriod::Week), now).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn history_and_recent_are_newest_first() {
        let now = Utc::now();
        let svc = seeded(now).await;

        let history = svc.history().await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].items[0].name, "Café Latte");

        let latest = svc.recent(1).await.unwrap();
        assert_eq!(latest[0].id, history[0].id);
    }
}
