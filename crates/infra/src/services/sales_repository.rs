use std::sync::{Arc, RwLock};

use ticketpos_core::BusinessId;
use ticketpos_sales::{NewSale, Sale, SaleId};

use crate::error::ServiceError;

/// Sales persistence port (the backend's `sales` table).
#[async_trait::async_trait]
pub trait SalesRepository: Send + Sync {
    /// Persist a finalized sale and return the stored record.
    async fn record_sale(&self, sale: NewSale) -> Result<Sale, ServiceError>;

    /// All sales of a business, newest first.
    async fn list_sales(&self, business_id: BusinessId) -> Result<Vec<Sale>, ServiceError>;

    async fn get_sale(
        &self,
        business_id: BusinessId,
        sale_id: SaleId,
    ) -> Result<Option<Sale>, ServiceError>;
}

#[async_trait::async_trait]
impl<R> SalesRepository for Arc<R>
where
    R: SalesRepository + ?Sized,
{
    async fn record_sale(&self, sale: NewSale) -> Result<Sale, ServiceError> {
        (**self).record_sale(sale).await
    }

    async fn list_sales(&self, business_id: BusinessId) -> Result<Vec<Sale>, ServiceError> {
        (**self).list_sales(business_id).await
    }

    async fn get_sale(
        &self,
        business_id: BusinessId,
        sale_id: SaleId,
    ) -> Result<Option<Sale>, ServiceError> {
        (**self).get_sale(business_id, sale_id).await
    }
}

/// Append-only in-memory sales log.
#[derive(Debug, Default)]
pub struct InMemorySalesRepository {
    sales: RwLock<Vec<Sale>>,
}

impl InMemorySalesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an already persisted sale as-is (seeding fixtures).
    pub fn seed(&self, sale: Sale) -> Result<(), ServiceError> {
        let mut sales = self
            .sales
            .write()
            .map_err(|_| ServiceError::backend("sales log lock poisoned"))?;
        sales.push(sale);
        Ok(())
    }
}

#[async_trait::async_trait]
impl SalesRepository for InMemorySalesRepository {
    async fn record_sale(&self, sale: NewSale) -> Result<Sale, ServiceError> {
        let sale = sale.into_sale(SaleId::new());
        self.seed(sale.clone())?;
        Ok(sale)
    }

    async fn list_sales(&self, business_id: BusinessId) -> Result<Vec<Sale>, ServiceError> {
        let sales = self
            .sales
            .read()
            .map_err(|_| ServiceError::backend("sales log lock poisoned"))?;

        let mut out: Vec<Sale> = sales
            .iter()
            .filter(|s| s.business_id == business_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn get_sale(
        &self,
        business_id: BusinessId,
        sale_id: SaleId,
    ) -> Result<Option<Sale>, ServiceError> {
        let sales = self
            .sales
            .read()
            .map_err(|_| ServiceError::backend("sales log lock poisoned"))?;

        Ok(sales
            .iter()
            .find(|s| s.id == sale_id && s.business_id == business_id)
            .cloned())
    }
}
