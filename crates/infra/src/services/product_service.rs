use ticketpos_core::BusinessId;
use ticketpos_products::{
    NewProduct, Product, ProductId, ProductPatch, StockOperation, low_stock, search,
};

use crate::error::ServiceError;
use crate::services::catalog::ProductCatalog;

/// Catalog use cases for one business.
#[derive(Debug, Clone)]
pub struct ProductService<C> {
    catalog: C,
    business_id: BusinessId,
    low_stock_threshold: u32,
}

impl<C> ProductService<C>
where
    C: ProductCatalog,
{
    pub fn new(catalog: C, business_id: BusinessId, low_stock_threshold: u32) -> Self {
        Self {
            catalog,
            business_id,
            low_stock_threshold,
        }
    }

    pub fn business_id(&self) -> BusinessId {
        self.business_id
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.catalog.list_products(self.business_id).await
    }

    pub async fn get(&self, product_id: &ProductId) -> Result<Product, ServiceError> {
        self.catalog
            .get_product(self.business_id, product_id)
            .await?
            .ok_or_else(|| ServiceError::ProductNotFound(product_id.clone()))
    }

    /// Catalog entries whose name matches `query`, ordered by name.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, ServiceError> {
        let products = self.list().await?;
        Ok(search(&products, query).into_iter().cloned().collect())
    }

    /// Products at or below the configured low-stock threshold.
    pub async fn low_stock(&self) -> Result<Vec<Product>, ServiceError> {
        let products = self.list().await?;
        Ok(low_stock(&products, self.low_stock_threshold)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn create(&self, product: NewProduct) -> Result<Product, ServiceError> {
        let created = self.catalog.create_product(self.business_id, product).await?;
        tracing::info!(
            business_id = %self.business_id,
            product_id = %created.id,
            name = %created.name,
            "product created"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        product_id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ServiceError> {
        let updated = self
            .catalog
            .update_product(self.business_id, product_id, patch)
            .await?;
        tracing::info!(business_id = %self.business_id, product_id = %product_id, "product updated");
        Ok(updated)
    }

    pub async fn delete(&self, product_id: &ProductId) -> Result<(), ServiceError> {
        self.catalog.delete_product(self.business_id, product_id).await?;
        tracing::info!(business_id = %self.business_id, product_id = %product_id, "product deleted");
        Ok(())
    }

    pub async fn adjust_stock(
        &self,
        product_id: &ProductId,
        operation: StockOperation,
        amount: u32,
    ) -> Result<Product, ServiceError> {
        let product = self
            .catalog
            .adjust_stock(self.business_id, product_id, operation, amount)
            .await?;
        tracing::info!(
            business_id = %self.business_id,
            product_id = %product_id,
            ?operation,
            amount,
            stock = product.stock,
            "stock adjusted"
        );
        if product.is_low_stock(self.low_stock_threshold) {
            tracing::warn!(product_id = %product_id, stock = product.stock, "product is low on stock");
        }
        Ok(product)
    }
}
