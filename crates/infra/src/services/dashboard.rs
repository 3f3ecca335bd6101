use chrono::{DateTime, Utc};
use serde::Serialize;

use ticketpos_core::DomainResult;
use ticketpos_products::{Product, low_stock};
use ticketpos_sales::{Sale, SalesPeriod, SalesSummary, filter_period, recent, summarize};

use crate::error::ServiceError;
use crate::services::catalog::ProductCatalog;
use crate::services::product_service::ProductService;
use crate::services::sales_repository::SalesRepository;
use crate::services::sales_service::SalesService;

/// Number of today's sales shown on the dashboard.
pub const RECENT_SALES_LIMIT: usize = 5;

/// Home screen figures for one business at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub today: SalesSummary,
    pub week: SalesSummary,
    pub month: SalesSummary,
    pub product_count: usize,
    pub low_stock: Vec<Product>,
    /// Today's most recent sales, newest first.
    pub recent_sales: Vec<Sale>,
}

impl DashboardSummary {
    /// Build the dashboard from already loaded data.
    pub fn compute(
        products: &[Product],
        sales: &[Sale],
        low_stock_threshold: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let today = filter_period(sales, SalesPeriod::Today, now);
        let recent_sales = recent(today.iter().copied(), RECENT_SALES_LIMIT)
            .into_iter()
            .cloned()
            .collect();

        Ok(Self {
            today: summarize(today)?,
            week: summarize(filter_period(sales, SalesPeriod::Week, now))?,
            month: summarize(filter_period(sales, SalesPeriod::Month, now))?,
            product_count: products.len(),
            low_stock: low_stock(products, low_stock_threshold)
                .into_iter()
                .cloned()
                .collect(),
            recent_sales,
        })
    }

    /// Load catalog and history through the services and compute the dashboard.
    pub async fn load<C, R>(
        products: &ProductService<C>,
        sales: &SalesService<R>,
        low_stock_threshold: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, ServiceError>
    where
        C: ProductCatalog,
        R: SalesRepository,
    {
        let catalog = products.list().await?;
        let history = sales.history().await?;
        Ok(Self::compute(&catalog, &history, low_stock_threshold, now)?)
    }
}
