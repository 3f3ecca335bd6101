use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ticketpos_core::{BusinessId, DomainError, DomainResult, Entity, Money};

/// Stock level at or below which a product is flagged as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Product identifier.
///
/// Opaque string assigned by the hosted backend; the domain never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh identifier for records created locally (UUIDv7 text).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Direction of a stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockOperation {
    Increment,
    Decrement,
}

/// Catalog record for a sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub business_id: BusinessId,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in smallest currency unit.
    pub price: Money,
    pub cost: Option<Money>,
    pub stock: u32,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Product {
    /// Minimal product with only the fields the ticket cares about.
    pub fn new(
        id: ProductId,
        business_id: BusinessId,
        name: impl Into<String>,
        price: Money,
        stock: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            business_id,
            name: name.into(),
            description: None,
            price,
            cost: None,
            stock,
            sku: None,
            barcode: None,
            image_url: None,
            category_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }

    /// Stock at or below `threshold` (out-of-stock products included).
    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.stock <= threshold
    }

    /// Whether the catalog card shows the "low stock" badge.
    ///
    /// Out-of-stock products get their own overlay instead.
    pub fn shows_low_stock_badge(&self, threshold: u32) -> bool {
        !self.is_out_of_stock() && self.is_low_stock(threshold)
    }

    pub fn can_add_to_ticket(&self) -> bool {
        !self.is_out_of_stock()
    }

    /// Apply a partial update, re-validating touched fields.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(Some(url)) = &patch.image_url {
            validate_image_url(url)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(sku) = patch.sku {
            self.sku = sku;
        }
        if let Some(barcode) = patch.barcode {
            self.barcode = barcode;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }

        self.updated_at = now;
        Ok(())
    }

    /// Move stock up or down by `amount`.
    ///
    /// Stock never goes negative: a decrement larger than the current stock is
    /// rejected and leaves the product untouched.
    pub fn adjust_stock(
        &mut self,
        operation: StockOperation,
        amount: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        let next = match operation {
            StockOperation::Increment => self
                .stock
                .checked_add(amount)
                .ok_or_else(|| DomainError::invariant("stock overflow"))?,
            StockOperation::Decrement => self
                .stock
                .checked_sub(amount)
                .ok_or_else(|| DomainError::insufficient_stock(&self.name, self.stock, amount))?,
        };

        self.stock = next;
        self.updated_at = now;
        Ok(())
    }
}

/// Data required to create a product (the backend assigns id and timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub cost: Option<Money>,
    pub stock: u32,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub image_url: Option<String>,
    pub category_id: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        if let Some(url) = &self.image_url {
            validate_image_url(url)?;
        }
        Ok(())
    }

    /// Validate and materialize the record for `business_id`.
    pub fn into_product(
        self,
        id: ProductId,
        business_id: BusinessId,
        now: DateTime<Utc>,
    ) -> DomainResult<Product> {
        self.validate()?;

        Ok(Product {
            id,
            business_id,
            name: self.name.trim().to_string(),
            description: self.description,
            price: self.price,
            cost: self.cost,
            stock: self.stock,
            sku: self.sku,
            barcode: self.barcode,
            image_url: self.image_url,
            category_id: self.category_id,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a product.
///
/// `None` leaves a field untouched; for nullable fields `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Money>,
    pub cost: Option<Option<Money>>,
    pub stock: Option<u32>,
    pub sku: Option<Option<String>>,
    pub barcode: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub category_id: Option<Option<String>>,
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().chars().count() < 2 {
        return Err(DomainError::validation(
            "name must be at least 2 characters",
        ));
    }
    Ok(())
}

fn validate_image_url(url: &str) -> DomainResult<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err(DomainError::validation(format!(
            "image_url must be a valid URL: {url}"
        ))),
    }
}
