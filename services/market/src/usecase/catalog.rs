use tracing::{info, warn};

use campus_domain::id::{ProductId, UserId};
use campus_domain::product::{
    DEFAULT_CONDITION, ORIGINAL_PRICE_RATIO, ProductCategory, ProductStatus,
};
use campus_domain::time::Timestamp;

use crate::domain::repository::{ProductRepository, UserRepository};
use crate::domain::types::{Product, ProductView, SearchQuery};
use crate::domain::validate::validate_listing;
use crate::error::MarketError;

/// Bound on id collisions tolerated while publishing.
const PUBLISH_ATTEMPTS: usize = 8;

pub struct PublishInput {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: ProductCategory,
    pub seller_id: UserId,
    pub campus: String,
    /// Empty falls back to the default condition.
    pub condition: String,
    /// `None` derives it from the price.
    pub original_price: Option<f64>,
    pub images: Vec<String>,
}

/// Listing workflows on top of the catalog, with seller enrichment.
pub struct CatalogService<P: ProductRepository, U: UserRepository> {
    products: P,
    users: U,
}

impl<P: ProductRepository, U: UserRepository> CatalogService<P, U> {
    pub fn new(products: P, users: U) -> Self {
        Self { products, users }
    }

    pub fn products(&self) -> &P {
        &self.products
    }

    /// Join a listing with its seller. A dangling seller id gets placeholders.
    fn enrich(&self, product: Product) -> Result<ProductView, MarketError> {
        let seller = self.users.find_by_id(&product.seller_id)?;
        if seller.is_none() {
            warn!(product_id = %product.id, seller_id = %product.seller_id, "listing refers to unknown seller");
        }
        Ok(ProductView::new(product, seller.as_ref()))
    }

    fn enrich_all(&self, products: Vec<Product>) -> Result<Vec<ProductView>, MarketError> {
        products.into_iter().map(|p| self.enrich(p)).collect()
    }

    // ── Publish ──────────────────────────────────────────────────────────────

    /// Create a listing awaiting moderation.
    pub fn publish(&self, input: PublishInput) -> Result<Product, MarketError> {
        validate_listing(&input.title, &input.description, input.price)?;

        let condition = if input.condition.is_empty() {
            DEFAULT_CONDITION.to_owned()
        } else {
            input.condition
        };
        let original_price = input
            .original_price
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(input.price * ORIGINAL_PRICE_RATIO);

        let mut product = Product {
            id: self.products.next_id()?,
            title: input.title,
            description: input.description,
            price: input.price,
            original_price,
            category: input.category,
            seller_id: input.seller_id,
            campus: input.campus,
            condition,
            status: ProductStatus::Pending,
            created_at: Timestamp::now(),
            images: input.images,
            view_count: 0,
            like_count: 0,
        };

        for _ in 0..PUBLISH_ATTEMPTS {
            if self.products.add(product.clone())? {
                info!(product_id = %product.id, seller_id = %product.seller_id, "listing published");
                return Ok(product);
            }
            product.id = self.products.next_id()?;
        }
        Err(MarketError::Internal(anyhow::anyhow!(
            "no free listing id after {PUBLISH_ATTEMPTS} attempts"
        )))
    }

    // ── Browse ───────────────────────────────────────────────────────────────

    /// On-sale listings matching `query`, newest first.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<ProductView>, MarketError> {
        self.enrich_all(self.products.search(query)?)
    }

    /// The moderation queue.
    pub fn get_pending(&self) -> Result<Vec<ProductView>, MarketError> {
        self.enrich_all(self.products.get_by_status(ProductStatus::Pending)?)
    }

    /// Every listing of one seller, whatever its status.
    pub fn get_by_seller(&self, seller_id: &UserId) -> Result<Vec<ProductView>, MarketError> {
        self.enrich_all(self.products.list_by_seller(seller_id)?)
    }

    /// Read a listing without counting a view.
    pub fn get(&self, id: &ProductId) -> Result<Option<ProductView>, MarketError> {
        self.products.get(id)?.map(|p| self.enrich(p)).transpose()
    }

    /// Read a listing and count the view.
    pub fn view(&self, id: &ProductId) -> Result<Option<ProductView>, MarketError> {
        self.products
            .record_view(id)?
            .map(|p| self.enrich(p))
            .transpose()
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    pub fn approve(&self, id: &ProductId) -> Result<bool, MarketError> {
        self.products.approve(id)
    }

    pub fn mark_sold(&self, id: &ProductId) -> Result<bool, MarketError> {
        self.products.mark_sold(id)
    }

    pub fn remove(&self, id: &ProductId) -> Result<bool, MarketError> {
        self.products.remove(id)
    }
}
