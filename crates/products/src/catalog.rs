//! Catalog browsing helpers (search, ordering, stock alerts).

use crate::product::Product;

/// Products whose name contains `query`, case-insensitively.
///
/// A blank query matches everything.
pub fn search<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Order products by name (case-insensitive), ties broken by id.
pub fn sort_by_name(products: &mut [Product]) {
    products.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Products at or below `threshold` units of stock.
pub fn low_stock(products: &[Product], threshold: u32) -> Vec<&Product> {
    products
        .iter()
        .filter(|p| p.is_low_stock(threshold))
        .collect()
}
