use campus_domain::id::{ProductId, SessionToken, UserId};
use campus_domain::product::{ProductCategory, ProductStatus};
use campus_domain::time::Timestamp;
use campus_domain::user::{Role, UserStatus};

/// Registered account owned by the user directory.
///
/// `password` is compared literally and stored as-is; see DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub email: String,
    pub campus: String,
    pub role: Role,
    pub credit_score: u32,
    pub status: UserStatus,
    /// Absent on some hand-written legacy records.
    pub registered_at: Option<Timestamp>,
}

/// Input for creating an account. Validation happens before this is built.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub campus: String,
    pub role: Role,
}

/// A listing in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: f64,
    /// Informational only; never used in filtering.
    pub original_price: f64,
    pub category: ProductCategory,
    /// Weak reference: the user may not exist.
    pub seller_id: UserId,
    pub campus: String,
    pub condition: String,
    pub status: ProductStatus,
    pub created_at: Timestamp,
    /// Opaque image references.
    pub images: Vec<String>,
    pub view_count: u64,
    pub like_count: u64,
}

/// Browse/search filter. Every field left at its default matches everything
/// that is on sale.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring of the title OR the description.
    pub keyword: String,
    pub category: Option<ProductCategory>,
    /// Exact match when non-empty.
    pub campus: String,
    /// Excludes listings priced strictly above this.
    pub max_price: Option<f64>,
}

impl SearchQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Whether `product` belongs in the result set.
    pub fn matches(&self, product: &Product) -> bool {
        if !product.status.is_visible() {
            return false;
        }
        if !self.keyword.is_empty() {
            let needle = self.keyword.to_lowercase();
            let in_title = product.title.to_lowercase().contains(&needle);
            if !in_title && !product.description.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }
        if !self.campus.is_empty() && product.campus != self.campus {
            return false;
        }
        if let Some(max_price) = self.max_price {
            if product.price > max_price {
                return false;
            }
        }
        true
    }
}

/// Seller display name used when the listing points at a missing user.
pub const UNKNOWN_SELLER_NAME: &str = "未知用户";

/// Seller role label used when the listing points at a missing user.
pub const UNKNOWN_SELLER_TYPE: &str = "用户";

/// Listing joined with denormalized seller attributes. Computed on read,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub product: Product,
    pub seller_name: String,
    pub seller_credit: u32,
    pub seller_type: String,
}

impl ProductView {
    pub fn new(product: Product, seller: Option<&User>) -> Self {
        match seller {
            Some(user) => Self {
                product,
                seller_name: user.username.clone(),
                seller_credit: user.credit_score,
                seller_type: user.role.label().to_owned(),
            },
            None => Self {
                product,
                seller_name: UNKNOWN_SELLER_NAME.to_owned(),
                seller_credit: campus_domain::user::DEFAULT_CREDIT_SCORE,
                seller_type: UNKNOWN_SELLER_TYPE.to_owned(),
            },
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SessionToken,
    pub user: User,
}
