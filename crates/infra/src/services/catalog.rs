use std::sync::Arc;

use chrono::Utc;

use ticketpos_core::{BusinessId, DomainError};
use ticketpos_products::{NewProduct, Product, ProductId, ProductPatch, StockOperation, sort_by_name};

use crate::error::ServiceError;
use crate::store::{BusinessStore, InMemoryBusinessStore};

/// Product catalog port (CRUD over the backend's `products` table).
///
/// All calls are scoped to a business.
#[async_trait::async_trait]
pub trait ProductCatalog: Send + Sync {
    /// All products of the business, ordered by name.
    async fn list_products(&self, business_id: BusinessId) -> Result<Vec<Product>, ServiceError>;

    async fn get_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ServiceError>;

    /// Validate and store a new product; the backend assigns id and timestamps.
    async fn create_product(
        &self,
        business_id: BusinessId,
        product: NewProduct,
    ) -> Result<Product, ServiceError>;

    async fn update_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ServiceError>;

    async fn delete_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
    ) -> Result<(), ServiceError>;

    async fn adjust_stock(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
        operation: StockOperation,
        amount: u32,
    ) -> Result<Product, ServiceError>;
}

#[async_trait::async_trait]
impl<C> ProductCatalog for Arc<C>
where
    C: ProductCatalog + ?Sized,
{
    async fn list_products(&self, business_id: BusinessId) -> Result<Vec<Product>, ServiceError> {
        (**self).list_products(business_id).await
    }

    async fn get_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ServiceError> {
        (**self).get_product(business_id, product_id).await
    }

    async fn create_product(
        &self,
        business_id: BusinessId,
        product: NewProduct,
    ) -> Result<Product, ServiceError> {
        (**self).create_product(business_id, product).await
    }

    async fn update_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ServiceError> {
        (**self).update_product(business_id, product_id, patch).await
    }

    async fn delete_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
    ) -> Result<(), ServiceError> {
        (**self).delete_product(business_id, product_id).await
    }

    async fn adjust_stock(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
        operation: StockOperation,
        amount: u32,
    ) -> Result<Product, ServiceError> {
        (**self).adjust_stock(business_id, product_id, operation, amount).await
    }
}

/// In-memory catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog<S = InMemoryBusinessStore<ProductId, Product>> {
    store: S,
}

impl InMemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> InMemoryProductCatalog<S>
where
    S: BusinessStore<ProductId, Product>,
{
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Insert a fully formed record as-is (seeding fixtures).
    pub fn seed(&self, product: Product) -> Result<(), ServiceError> {
        self.store
            .upsert(product.business_id, product.id.clone(), product)
    }

    fn load(&self, business_id: BusinessId, product_id: &ProductId) -> Result<Product, ServiceError> {
        let product = self
            .store
            .get(business_id, product_id)?
            .ok_or_else(|| ServiceError::ProductNotFound(product_id.clone()))?;

        if product.business_id != business_id {
            return Err(ServiceError::BusinessIsolation(format!(
                "product {product_id} belongs to another business"
            )));
        }
        Ok(product)
    }
}

#[async_trait::async_trait]
impl<S> ProductCatalog for InMemoryProductCatalog<S>
where
    S: BusinessStore<ProductId, Product>,
{
    async fn list_products(&self, business_id: BusinessId) -> Result<Vec<Product>, ServiceError> {
        let mut products = self.store.list(business_id)?;
        sort_by_name(&mut products);
        Ok(products)
    }

    async fn get_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
    ) -> Result<Option<Product>, ServiceError> {
        match self.load(business_id, product_id) {
            Ok(product) => Ok(Some(product)),
            Err(ServiceError::ProductNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_product(
        &self,
        business_id: BusinessId,
        product: NewProduct,
    ) -> Result<Product, ServiceError> {
        let id = ProductId::generate();
        if self.store.get(business_id, &id)?.is_some() {
            return Err(DomainError::conflict(format!("product {id} already exists")).into());
        }

        let product = product.into_product(id, business_id, Utc::now())?;
        self.store
            .upsert(business_id, product.id.clone(), product.clone())?;
        Ok(product)
    }

    async fn update_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ServiceError> {
        let mut product = self.load(business_id, product_id)?;
        product.apply_patch(patch, Utc::now())?;
        self.store
            .upsert(business_id, product_id.clone(), product.clone())?;
        Ok(product)
    }

    async fn delete_product(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
    ) -> Result<(), ServiceError> {
        self.store
            .remove(business_id, product_id)?
            .map(|_| ())
            .ok_or_else(|| ServiceError::ProductNotFound(product_id.clone()))
    }

    async fn adjust_stock(
        &self,
        business_id: BusinessId,
        product_id: &ProductId,
        operation: StockOperation,
        amount: u32,
    ) -> Result<Product, ServiceError> {
        let mut product = self.load(business_id, product_id)?;
        product.adjust_stock(operation, amount, Utc::now())?;
        self.store
            .upsert(business_id, product_id.clone(), product.clone())?;
        Ok(product)
    }
}
