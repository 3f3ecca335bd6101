//! Ticket finalization: turn the in-progress ticket into a persisted sale.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use ticketpos_core::{BusinessId, DomainError, DomainResult, Money};
use ticketpos_sales::{NewSale, PaymentMethod, Sale};
use ticketpos_ticket::TicketStore;

use crate::error::ServiceError;
use crate::services::SalesRepository;
use crate::settings::TaxSettings;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cannot finalize an empty ticket")]
    EmptyTicket,

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Persisting the sale failed; the ticket was left untouched.
    #[error("failed to record sale: {0}")]
    Record(#[source] ServiceError),
}

/// Totals shown next to the ticket before it is finalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
    /// Units across all lines.
    pub item_count: u128,
    /// Distinct products.
    pub line_count: usize,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl TicketSummary {
    /// Exact figures for `ticket`; `AmountOverflow` if any of them does not fit.
    pub fn compute(ticket: &TicketStore, tax: &TaxSettings) -> DomainResult<Self> {
        let subtotal = ticket.total_amount()?;
        let tax_amount = tax.tax_for(subtotal)?;
        let total = subtotal
            .checked_add(tax_amount)
            .ok_or_else(DomainError::amount_overflow)?;

        Ok(Self {
            item_count: ticket.total_items(),
            line_count: ticket.len(),
            subtotal,
            tax: tax_amount,
            total,
        })
    }

    /// The total as shown to the customer, e.g. `$8.50`.
    pub fn display_total(&self, currency_symbol: &str) -> String {
        self.total.format_with(currency_symbol)
    }
}

/// Finalizes tickets for one business against a [`SalesRepository`].
#[derive(Debug, Clone)]
pub struct CheckoutService<R> {
    repository: R,
    business_id: BusinessId,
}

impl<R> CheckoutService<R>
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

    /// Record the ticket as a cash sale.
    pub async fn finalize(&self, ticket: &mut TicketStore) -> Result<Sale, CheckoutError> {
        self.finalize_with(ticket, PaymentMethod::default()).await
    }

    /// Record the ticket as a sale and clear it.
    ///
    /// The ticket is cleared only once the repository has accepted the sale;
    /// on any error it keeps its entries so the operator can retry.
    pub async fn finalize_with(
        &self,
        ticket: &mut TicketStore,
        payment_method: PaymentMethod,
    ) -> Result<Sale, CheckoutError> {
        if ticket.is_empty() {
            tracing::warn!(business_id = %self.business_id, "refusing to finalize an empty ticket");
            return Err(CheckoutError::EmptyTicket);
        }

        let payload = NewSale::from_ticket(ticket, self.business_id, Utc::now())?
            .with_payment_method(payment_method);

        match self.repository.record_sale(payload).await {
            Ok(sale) => {
                ticket.clear_ticket();
                tracing::info!(
                    business_id = %self.business_id,
                    sale_id = %sale.id,
                    total = %sale.total,
                    items = sale.item_count(),
                    "sale finalized"
                );
                Ok(sale)
            }
            Err(e) => {
                tracing::warn!(
                    business_id = %self.business_id,
                    error = %e,
                    "sale could not be recorded; ticket kept"
                );
                Err(CheckoutError::Record(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemorySalesRepository;
    use crate::settings::TaxRate;
    use ticketpos_products::{Product, ProductId};
    use ticketpos_sales::SaleId;

    struct FailingRepository;

    #[async_trait::async_trait]
    impl SalesRepository for FailingRepository {
        async fn record_sale(&self, _sale: NewSale) -> Result<Sale, ServiceError> {
            Err(ServiceError::backend("connection reset"))
        }

        async fn list_sales(&self, _business_id: BusinessId) -> Result<Vec<Sale>, ServiceError> {
            Ok(Vec::new())
        }

        async fn get_sale(
            &self,
            _business_id: BusinessId,
            _sale_id: SaleId,
        ) -> Result<Option<Sale>, ServiceError> {
            Ok(None)
        }
    }

    fn product(id: &str, name: &str, cents: u64) -> Product {
        Product::new(
            ProductId::new(id),
            BusinessId::new(),
            name,
            Money::from_cents(cents),
            100,
            Utc::now(),
        )
    }

    fn ticket() -> TicketStore {
        let mut ticket = TicketStore::new();
        ticket.add_item_with_quantity(&product("1", "Café Americano", 250), 2);
        ticket.add_item(&product("2", "Café Latte", 350));
        ticket
    }

    #[tokio::test]
    async fn finalize_records_sale_and_clears_ticket() {
        let business_id = BusinessId::new();
        let checkout = CheckoutService::new(InMemorySalesRepository::new(), business_id);
        let mut ticket = ticket();

        let sale = checkout.finalize(&mut ticket).await.unwrap();
        assert_eq!(sale.total, Money::from_cents(850));
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.business_id, business_id);
        assert_eq!(sale.payment_method, PaymentMethod::Cash);
        assert!(ticket.is_empty());

        let stored = checkout.repository().list_sales(business_id).await.unwrap();
        assert_eq!(stored, vec![sale]);
    }

    #[tokio::test]
    async fn finalize_with_payment_method() {
        let checkout = CheckoutService::new(InMemorySalesRepository::new(), BusinessId::new());
        let mut ticket = ticket();
        let sale = checkout
            .finalize_with(&mut ticket, PaymentMethod::Transfer)
            .await
            .unwrap();
        assert_eq!(sale.payment_method, PaymentMethod::Transfer);
    }

    #[tokio::test]
    async fn empty_ticket_is_refused() {
        let checkout = CheckoutService::new(InMemorySalesRepository::new(), BusinessId::new());
        let mut ticket = TicketStore::new();
        let err = checkout.finalize(&mut ticket).await.unwrap_err();
        assert_eq!(err, CheckoutError::EmptyTicket);
    }

    #[tokio::test]
    async fn failed_record_keeps_ticket() {
        let checkout = CheckoutService::new(FailingRepository, BusinessId::new());
        let mut ticket = ticket();
        let before = ticket.clone();

        let err = checkout.finalize(&mut ticket).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Record(ServiceError::Backend(_))));
        assert_eq!(ticket, before);
        assert_eq!(ticket.total_amount().unwrap(), Money::from_cents(850));
    }

    #[test]
    fn summary_with_and_without_tax() {
        let ticket = ticket();

        let summary = TicketSummary::compute(&ticket, &TaxSettings::default()).unwrap();
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.line_count, 2);
        assert_eq!(summary.subtotal, Money::from_cents(850));
        assert_eq!(summary.tax, Money::ZERO);
        assert_eq!(summary.total, Money::from_cents(850));

        let tax = TaxSettings {
            enabled: true,
            rate: TaxRate::from_basis_points(1_000),
        };
        let summary = TicketSummary::compute(&ticket, &tax).unwrap();
        assert_eq!(summary.tax, Money::from_cents(85));
        assert_eq!(summary.total, Money::from_cents(935));
        assert_eq!(summary.display_total("€"), "€9.35");
    }

    #[test]
    fn summary_reports_overflow() {
        let mut ticket = TicketStore::new();
        ticket.add_item(&product("1", "Lingote", u64::MAX - 10));
        let tax = TaxSettings {
            enabled: true,
            rate: TaxRate::from_basis_points(1_000),
        };

        assert!(TicketSummary::compute(&ticket, &TaxSettings::default()).is_ok());
        assert_eq!(
            TicketSummary::compute(&ticket, &tax),
            Err(DomainError::AmountOverflow)
        );
    }

    #[tokio::test]
    async fn overflowing_ticket_is_not_recorded() {
        let checkout = CheckoutService::new(InMemorySalesRepository::new(), BusinessId::new());
        let mut ticket = TicketStore::new();
        ticket.add_item_with_quantity(&product("1", "Lingote", 5_000_000_000), 4_000_000_000);

        let err = checkout.finalize(&mut ticket).await.unwrap_err();
        assert_eq!(err, CheckoutError::Domain(DomainError::AmountOverflow));
        assert_eq!(ticket.len(), 1);
    }

    #[test]
    fn empty_ticket_summary_is_zero() {
        let summary = TicketSummary::compute(&TicketStore::new(), &TaxSettings::default()).unwrap();
        assert_eq!(summary, TicketSummary::default());
    }
}
