//! Point-of-sale session: the ticket being built at one register.

use ticketpos_core::{BusinessId, DomainResult, Money};
use ticketpos_products::{LOW_STOCK_THRESHOLD, Product, ProductId};
use ticketpos_sales::{PaymentMethod, Sale};
use ticketpos_ticket::TicketStore;

use crate::checkout::{CheckoutError, CheckoutService, TicketSummary};
use crate::config::{DEFAULT_CURRENCY_SYMBOL, PosConfig};
use crate::error::ServiceError;
use crate::services::{ProductCatalog, SalesRepository};
use crate::settings::TaxSettings;

/// Owns the current ticket and applies the register's stock affordances on
/// top of the permissive [`TicketStore`].
///
/// Refusals are reported as `false` and logged; they never touch the ticket.
#[derive(Debug)]
pub struct PosSession<C, R> {
    business_id: BusinessId,
    currency_symbol: String,
    low_stock_threshold: u32,
    catalog: C,
    checkout: CheckoutService<R>,
    ticket: TicketStore,
}

impl<C, R> PosSession<C, R>
where
    C: ProductCatalog,
    R: SalesRepository,
{
    pub fn new(business_id: BusinessId, catalog: C, repository: R) -> Self {
        Self {
            business_id,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            catalog,
            checkout: CheckoutService::new(repository, business_id),
            ticket: TicketStore::new(),
        }
    }

    /// Session for the configured business, currency and low-stock threshold.
    pub fn from_config(config: &PosConfig, catalog: C, repository: R) -> Self {
        Self {
            currency_symbol: config.currency_symbol.clone(),
            low_stock_threshold: config.low_stock_threshold,
            ..Self::new(config.business_id, catalog, repository)
        }
    }

    pub fn business_id(&self) -> BusinessId {
        self.business_id
    }

    /// Render an amount with the session's currency symbol.
    pub fn format_amount(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }

    /// Whether the catalog card for `product` carries the low-stock badge.
    pub fn shows_low_stock_badge(&self, product: &Product) -> bool {
        product.shows_low_stock_badge(self.low_stock_threshold)
    }

    pub fn ticket(&self) -> &TicketStore {
        &self.ticket
    }

    /// Add one unit of `product`. Out-of-stock products are refused.
    pub fn add_to_ticket(&mut self, product: &Product) -> bool {
        if !product.can_add_to_ticket() {
            tracing::warn!(product_id = %product.id, "product is out of stock; not added");
            return false;
        }
        self.ticket.add_item(product);
        tracing::debug!(
            product_id = %product.id,
            quantity = self.ticket.quantity_of(&product.id),
            "ticket item added"
        );
        true
    }

    /// Look a product up in the catalog and add one unit of it.
    pub async fn add_product_by_id(&mut self, product_id: &ProductId) -> Result<bool, ServiceError> {
        let product = self
            .catalog
            .get_product(self.business_id, product_id)
            .await?
            .ok_or_else(|| ServiceError::ProductNotFound(product_id.clone()))?;
        Ok(self.add_to_ticket(&product))
    }

    /// One more unit of a line, refused once the line reaches the stock of
    /// its product snapshot or when the product is not on the ticket.
    pub fn increment(&mut self, product_id: &ProductId) -> bool {
        let Some(entry) = self.ticket.get(product_id) else {
            return false;
        };
        if entry.at_stock_limit() {
            tracing::warn!(
                product_id = %product_id,
                quantity = entry.quantity(),
                "stock limit reached; quantity unchanged"
            );
            return false;
        }

        let Ok(next) = i64::try_from(entry.quantity() + 1) else {
            return false;
        };
        self.ticket.update_quantity(product_id, next);
        tracing::debug!(product_id = %product_id, quantity = next, "ticket quantity increased");
        true
    }

    /// One less unit of a line; the line is removed when it reaches zero.
    pub fn decrement(&mut self, product_id: &ProductId) {
        let current = self.ticket.quantity_of(product_id);
        if current == 0 {
            return;
        }
        let Ok(next) = i64::try_from(current - 1) else {
            return;
        };
        self.ticket.update_quantity(product_id, next);
        tracing::debug!(product_id = %product_id, quantity = next, "ticket quantity decreased");
    }

    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        self.ticket.update_quantity(product_id, quantity);
        tracing::debug!(product_id = %product_id, quantity, "ticket quantity set");
    }

    pub fn remove(&mut self, product_id: &ProductId) {
        self.ticket.remove_item(product_id);
        tracing::debug!(product_id = %product_id, "ticket item removed");
    }

    pub fn clear(&mut self) {
        self.ticket.clear_ticket();
        tracing::debug!(business_id = %self.business_id, "ticket cleared");
    }

    pub fn summary(&self, tax: &TaxSettings) -> DomainResult<TicketSummary> {
        TicketSummary::compute(&self.ticket, tax)
    }

    /// Ticket total (tax included) formatted for the register display.
    pub fn display_total(&self, tax: &TaxSettings) -> DomainResult<String> {
        Ok(self.summary(tax)?.display_total(&self.currency_symbol))
    }

    /// Finalize the current ticket; see [`CheckoutService::finalize_with`].
    pub async fn finalize(&mut self, payment_method: PaymentMethod) -> Result<Sale, CheckoutError> {
        self.checkout
            .finalize_with(&mut self.ticket, payment_method)
            .await
    }
}
