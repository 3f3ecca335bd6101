use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ticketpos_core::{BusinessId, DomainError, DomainResult, Entity, Money};
use ticketpos_products::ProductId;
use ticketpos_ticket::TicketStore;

/// Sale identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(pub Uuid);

impl SaleId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SaleId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for SaleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// How the customer paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

/// Sale status lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    #[default]
    Completed,
    Pending,
    Cancelled,
}

/// Sold line: product, quantity, unit price at the time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: ProductId,
    /// Product name snapshot, kept for history search and receipts.
    pub name: String,
    pub quantity: u64,
    /// Unit price in smallest currency unit.
    pub price: Money,
}

impl SaleItem {
    pub fn subtotal(&self) -> DomainResult<Money> {
        self.price
            .checked_times(self.quantity)
            .ok_or_else(DomainError::amount_overflow)
    }
}

/// Checkout payload: what gets sent to the backend to persist a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub items: Vec<SaleItem>,
    pub total: Money,
    pub created_at: DateTime<Utc>,
    pub business_id: BusinessId,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl NewSale {
    /// Snapshot the ticket into a sale payload.
    ///
    /// The ticket itself is only read; clearing it is the caller's decision
    /// once the sale has been stored.
    pub fn from_ticket(
        ticket: &TicketStore,
        business_id: BusinessId,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if ticket.is_empty() {
            return Err(DomainError::validation("cannot finalize an empty ticket"));
        }

        let items = ticket
            .entries()
            .iter()
            .map(|e| SaleItem {
                product_id: e.product_id().clone(),
                name: e.product().name.clone(),
                quantity: e.quantity(),
                price: e.product().price,
            })
            .collect();

        Ok(Self {
            items,
            total: ticket.total_amount()?,
            created_at,
            business_id,
            payment_method: PaymentMethod::default(),
        })
    }

    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Persisted form of this payload under `id`.
    pub fn into_sale(self, id: SaleId) -> Sale {
        Sale {
            id,
            business_id: self.business_id,
            items: self.items,
            total: self.total,
            payment_method: self.payment_method,
            status: SaleStatus::Completed,
            created_at: self.created_at,
        }
    }
}

/// A finalized, persisted sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub business_id: BusinessId,
    pub items: Vec<SaleItem>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Sale {
    /// Number of units sold across all lines.
    pub fn item_count(&self) -> u128 {
        self.items.iter().map(|i| u128::from(i.quantity)).sum()
    }

    /// Last five characters of the id, as shown on receipts and history rows.
    pub fn short_id(&self) -> String {
        let id = self.id.to_string();
        id[id.len().saturating_sub(5)..].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ticketpos_products::Product;

    fn test_business_id() -> BusinessId {
        BusinessId::new()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn product(id: &str, name: &str, price_cents: u64) -> Product {
        Product::new(
            ProductId::new(id),
            test_business_id(),
            name,
            Money::from_cents(price_cents),
            100,
            test_time(),
        )
    }

    #[test]
    fn from_ticket_copies_lines_and_total() {
        let mut ticket = TicketStore::new();
        ticket.add_item_with_quantity(&product("1", "Café Americano", 250), 2);
        ticket.add_item(&product("2", "Café Latte", 350));

        let business_id = test_business_id();
        let sale = NewSale::from_ticket(&ticket, business_id, test_time()).unwrap();

        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].name, "Café Americano");
        assert_eq!(sale.items[0].quantity, 2);
        assert_eq!(sale.items[0].price, Money::from_cents(250));
        assert_eq!(sale.total, Money::from_cents(850));
        assert_eq!(sale.business_id, business_id);
        assert_eq!(sale.payment_method, PaymentMethod::Cash);

        // The ticket is only read.
        assert_eq!(ticket.total_items(), 3);
    }

    #[test]
    fn from_ticket_rejects_empty_ticket() {
        let err = NewSale::from_ticket(&TicketStore::new(), test_business_id(), test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn from_ticket_rejects_overflowing_total() {
        let mut ticket = TicketStore::new();
        ticket.add_item_with_quantity(&product("1", "Lingote", 5_000_000_000), 4_000_000_000);
        let err = NewSale::from_ticket(&ticket, test_business_id(), test_time()).unwrap_err();
        assert_eq!(err, DomainError::AmountOverflow);
    }

    #[test]
    fn payload_has_backend_shape() {
        let mut ticket = TicketStore::new();
        ticket.add_item_with_quantity(&product("P1", "Croissant", 200), 3);
        let sale = NewSale::from_ticket(&ticket, test_business_id(), test_time()).unwrap();

        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["total"], 600);
        assert_eq!(json["items"][0]["product_id"], "P1");
        assert_eq!(json["items"][0]["quantity"], 3);
        assert_eq!(json["items"][0]["price"], 200);
        assert!(json["created_at"].is_string());
        assert!(json["business_id"].is_string());
        assert_eq!(json["payment_method"], "cash");
    }

    #[test]
    fn into_sale_is_completed() {
        let mut ticket = TicketStore::new();
        ticket.add_item(&product("P1", "Croissant", 200));
        let new = NewSale::from_ticket(&ticket, test_business_id(), test_time())
            .unwrap()
            .with_payment_method(PaymentMethod::Card);

        let id = SaleId::new();
        let sale = new.clone().into_sale(id);
        assert_eq!(sale.id, id);
        assert_eq!(sale.status, SaleStatus::Completed);
        assert_eq!(sale.payment_method, PaymentMethod::Card);
        assert_eq!(sale.items, new.items);
        assert_eq!(sale.item_count(), 1);
        assert_eq!(sale.short_id().len(), 5);
        assert!(sale.id.to_string().ends_with(&sale.short_id()));
    }
}
