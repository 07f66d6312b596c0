use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use anyhow::Context as _;
use tracing::{error, info, warn};

use campus_domain::id::{ProductId, UserId, next_sequence_id};
use campus_domain::product::ProductStatus;

use crate::domain::repository::{CollectionStore, ProductRepository};
use crate::domain::types::{Product, SearchQuery};
use crate::error::MarketError;
use crate::infra::record::ProductRecord;

/// In-memory listing collection backed by a whole-collection store.
pub struct Catalog<S> {
    store: S,
    /// Ids of records the store kept but could not read.
    reserved: BTreeSet<String>,
    products: Mutex<BTreeMap<ProductId, Product>>,
}

/// Newest first; equal timestamps fall back to the higher sequence id.
fn newest_first(products: &mut [Product]) {
    products.sort_by_key(|p| {
        (
            Reverse(p.created_at),
            Reverse(p.id.as_str().parse::<u64>().unwrap_or(0)),
            Reverse(p.id.clone()),
        )
    });
}

impl<S: CollectionStore<ProductRecord>> Catalog<S> {
    /// Load every listing from `store`. An unreadable collection is logged and
    /// treated as empty; the store keeps the original out of harm's way.
    pub fn open(store: S) -> Self {
        let products = match store.load() {
            Ok(records) => records
                .into_values()
                .map(|record| {
                    let product = Product::from(record);
                    (product.id.clone(), product)
                })
                .collect(),
            Err(e) => {
                error!(error = ?e, "failed to load products, starting with an empty catalog");
                BTreeMap::new()
            }
        };
        info!(count = products.len(), "catalog loaded");
        let reserved = store.reserved_keys().unwrap_or_else(|e| {
            error!(error = ?e, "failed to read reserved product ids");
            BTreeSet::new()
        });
        if !reserved.is_empty() {
            warn!(count = reserved.len(), "unreadable products kept on disk");
        }
        Self {
            store,
            reserved,
            products: Mutex::new(products),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<ProductId, Product>>, MarketError> {
        self.products
            .lock()
            .map_err(|_| MarketError::poisoned("catalog"))
    }

    fn flush(&self, products: &BTreeMap<ProductId, Product>) -> Result<(), MarketError> {
        let records: BTreeMap<String, ProductRecord> = products
            .iter()
            .map(|(id, product)| (id.to_string(), ProductRecord::from(product)))
            .collect();
        self.store.flush(&records).context("flush products")?;
        Ok(())
    }

    /// Apply `change` to the listing at `id` and flush; restores the previous
    /// value when the flush fails. `Ok(None)` for an unknown id.
    fn update<T>(
        &self,
        id: &ProductId,
        change: impl FnOnce(&mut Product) -> Result<T, MarketError>,
    ) -> Result<Option<T>, MarketError> {
        let mut products = self.lock()?;
        let Some(product) = products.get_mut(id) else {
            return Ok(None);
        };
        let before = product.clone();
        let out = change(product)?;
        if *product == before {
            return Ok(Some(out));
        }
        if let Err(e) = self.flush(&products) {
            products.insert(id.clone(), before);
            return Err(e);
        }
        Ok(Some(out))
    }

    /// Move an on-sale listing to `target`.
    fn close_sale(
        &self,
        id: &ProductId,
        target: ProductStatus,
        action: &'static str,
    ) -> Result<bool, MarketError> {
        let changed = self.update(id, |product| {
            if product.status != ProductStatus::OnSale {
                return Err(MarketError::InvalidTransition {
                    from: product.status,
                    action,
                });
            }
            product.status = target;
            Ok(())
        })?;
        if changed.is_some() {
            info!(product_id = %id, status = %target, "listing closed");
        }
        Ok(changed.is_some())
    }
}

impl<S: CollectionStore<ProductRecord>> ProductRepository for Catalog<S> {
    fn next_id(&self) -> Result<ProductId, MarketError> {
        let products = self.lock()?;
        Ok(ProductId::from(next_sequence_id(
            products
                .keys()
                .map(ProductId::as_str)
                .chain(self.reserved.iter().map(String::as_str)),
        )))
    }

    fn add(&self, product: Product) -> Result<bool, MarketError> {
        let mut products = self.lock()?;
        if products.contains_key(&product.id) || self.reserved.contains(product.id.as_str()) {
            return Ok(false);
        }
        let id = product.id.clone();
        products.insert(id.clone(), product);
        if let Err(e) = self.flush(&products) {
            products.remove(&id);
            return Err(e);
        }
        Ok(true)
    }

    fn get(&self, id: &ProductId) -> Result<Option<Product>, MarketError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn get_by_status(&self, status: ProductStatus) -> Result<Vec<Product>, MarketError> {
        let products = self.lock()?;
        Ok(products
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    fn list_by_seller(&self, seller_id: &UserId) -> Result<Vec<Product>, MarketError> {
        let products = self.lock()?;
        Ok(products
            .values()
            .filter(|p| &p.seller_id == seller_id)
            .cloned()
            .collect())
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, MarketError> {
        let mut results: Vec<Product> = {
            let products = self.lock()?;
            products
                .values()
                .filter(|p| query.matches(p))
                .cloned()
                .collect()
        };
        newest_first(&mut results);
        Ok(results)
    }

    fn approve(&self, id: &ProductId) -> Result<bool, MarketError> {
        let approved = self.update(id, |product| {
            if product.status.is_terminal() {
                return Err(MarketError::InvalidTransition {
                    from: product.status,
                    action: "approve",
                });
            }
            product.status = ProductStatus::OnSale;
            Ok(())
        })?;
        if approved.is_some() {
            info!(product_id = %id, "listing approved");
        }
        Ok(approved.is_some())
    }

    fn mark_sold(&self, id: &ProductId) -> Result<bool, MarketError> {
        self.close_sale(id, ProductStatus::Sold, "mark as sold")
    }

    fn remove(&self, id: &ProductId) -> Result<bool, MarketError> {
        self.close_sale(id, ProductStatus::Removed, "remove")
    }

    fn record_view(&self, id: &ProductId) -> Result<Option<Product>, MarketError> {
        self.update(id, |product| {
            product.view_count = product.view_count.saturating_add(1);
            Ok(product.clone())
        })
    }
}
