use serde::{Deserialize, Serialize};

use ticketpos_core::{DomainError, DomainResult, Money};
use ticketpos_products::{Product, ProductId};

/// Largest quantity a line can hold: the largest value `update_quantity`
/// accepts. Merges that would go past it stop at it.
pub const MAX_QUANTITY: u64 = i64::MAX as u64;

/// One ticket line: a product snapshot and how many units of it.
///
/// The quantity is always positive; a line that would drop to zero is removed
/// from the ticket instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketEntry {
    product: Product,
    quantity: u64,
}

impl TicketEntry {
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Unit price × quantity, or `AmountOverflow` when it does not fit.
    pub fn subtotal(&self) -> DomainResult<Money> {
        self.product
            .price
            .checked_times(self.quantity)
            .ok_or_else(DomainError::amount_overflow)
    }

    /// True once the line holds as many units as the snapshot had in stock.
    ///
    /// Informational only: the store never refuses quantities on this basis.
    pub fn at_stock_limit(&self) -> bool {
        self.quantity >= u64::from(self.product.stock)
    }
}

/// The in-progress ticket of a single sale.
///
/// Entries are unique per product id and kept in insertion order. Every
/// operation is total: unknown ids and non-positive quantities degrade to
/// no-ops or removals, never errors. `total_items` and `total_amount` are
/// computed from the entries on each call and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStore {
    entries: Vec<TicketEntry>,
}

impl TicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TicketEntry] {
        &self.entries
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&TicketEntry> {
        self.entries.iter().find(|e| e.product_id() == product_id)
    }

    /// Quantity of `product_id` on the ticket (0 when absent).
    pub fn quantity_of(&self, product_id: &ProductId) -> u64 {
        self.get(product_id).map(TicketEntry::quantity).unwrap_or(0)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add one unit of `product`.
    pub fn add_item(&mut self, product: &Product) {
        self.add_item_with_quantity(product, 1);
    }

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// When the product is already on the ticket its original snapshot is
    /// kept and only the quantity grows. A zero quantity is ignored. Line
    /// quantities are capped at [`MAX_QUANTITY`].
    pub fn add_item_with_quantity(&mut self, product: &Product, quantity: u64) {
        if quantity == 0 {
            return;
        }
        let quantity = quantity.min(MAX_QUANTITY);

        match self.position(&product.id) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.quantity = entry.quantity.saturating_add(quantity).min(MAX_QUANTITY);
            }
            None => self.entries.push(TicketEntry {
                product: product.clone(),
                quantity,
            }),
        }
    }

    /// Drop the line for `product_id`, if any.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.entries.retain(|e| e.product_id() != product_id);
    }

    /// Set the quantity of an existing line.
    ///
    /// `quantity <= 0` removes the line. Ids not on the ticket are ignored,
    /// whatever the quantity.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        let quantity = match u64::try_from(quantity) {
            Ok(q) if q > 0 => q,
            _ => {
                self.remove_item(product_id);
                return;
            }
        };

        if let Some(idx) = self.position(product_id) {
            self.entries[idx].quantity = quantity;
        }
    }

    pub fn clear_ticket(&mut self) {
        self.entries.clear();
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u128 {
        self.entries.iter().map(|e| u128::from(e.quantity)).sum()
    }

    /// Sum of line subtotals, exact to the cent.
    ///
    /// Fails with `AmountOverflow` instead of returning a clamped total.
    pub fn total_amount(&self) -> DomainResult<Money> {
        self.entries.iter().try_fold(Money::ZERO, |acc, entry| {
            acc.checked_add(entry.subtotal()?)
                .ok_or_else(DomainError::amount_overflow)
        })
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id() == product_id)
    }
}
