//! Persisted record layouts.
//!
//! Field names and enum spellings match the existing `users.json` /
//! `products.json` documents. Optional fields fall back to the values older
//! documents assumed when they were written.

use serde::{Deserialize, Serialize};

use campus_domain::id::{ProductId, UserId};
use campus_domain::product::{
    DEFAULT_CONDITION, ORIGINAL_PRICE_RATIO, ProductCategory, ProductStatus,
};
use campus_domain::time::Timestamp;
use campus_domain::user::{DEFAULT_CREDIT_SCORE, Role, UserStatus};

use crate::domain::types::{Product, User};

fn default_credit_score() -> u32 {
    DEFAULT_CREDIT_SCORE
}

fn default_condition() -> String {
    DEFAULT_CONDITION.to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub campus: String,
    #[serde(default = "default_credit_score")]
    pub credit_score: u32,
    #[serde(default)]
    pub user_type: Role,
    #[serde(default)]
    pub registration_date: Option<Timestamp>,
    #[serde(default)]
    pub status: UserStatus,
}

impl From<&User> for UserRecord {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            username: user.username.clone(),
            password: user.password.clone(),
            email: user.email.clone(),
            campus: user.campus.clone(),
            credit_score: user.credit_score,
            user_type: user.role,
            registration_date: user.registered_at,
            status: user.status,
        }
    }
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: UserId(record.user_id),
            username: record.username,
            password: record.password,
            email: record.email,
            campus: record.campus,
            role: record.user_type,
            credit_score: record.credit_score,
            status: record.status,
            registered_at: record.registration_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    pub category: ProductCategory,
    pub seller_id: String,
    pub campus: String,
    #[serde(default = "default_condition")]
    pub condition: String,
    pub status: ProductStatus,
    /// Missing in some older documents; those listings sort last.
    #[serde(default)]
    pub create_time: Timestamp,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub like_count: u64,
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            original_price: Some(product.original_price),
            category: product.category,
            seller_id: product.seller_id.to_string(),
            campus: product.campus.clone(),
            condition: product.condition.clone(),
            status: product.status,
            create_time: product.created_at,
            images: product.images.clone(),
            view_count: product.view_count,
            like_count: product.like_count,
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: ProductId(record.product_id),
            title: record.title,
            description: record.description,
            price: record.price,
            original_price: record
                .original_price
                .unwrap_or(record.price * ORIGINAL_PRICE_RATIO),
            category: record.category,
            seller_id: UserId(record.seller_id),
            campus: record.campus,
            condition: record.condition,
            status: record.status,
            created_at: record.create_time,
            images: record.images,
            view_count: record.view_count,
            like_count: record.like_count,
        }
    }
}
