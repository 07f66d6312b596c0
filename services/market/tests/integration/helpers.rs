use std::collections::BTreeMap;

use campus_domain::id::ProductId;
use campus_domain::product::ProductCategory;
use campus_domain::user::{Role, UserStatus};

use campus_market::config::DEFAULT_SESSION_IDLE_TTL;
use campus_market::domain::types::{Product, User};
use campus_market::infra::record::{ProductRecord, UserRecord};
use campus_market::infra::store::MemoryStore;
use campus_market::state::AppState;
use campus_market::usecase::auth::RegisterInput;
use campus_market::usecase::catalog::PublishInput;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const PASSWORD: &str = "abc123";

// ── State builders ───────────────────────────────────────────────────────────

fn admin_record() -> UserRecord {
    UserRecord {
        user_id: "1".into(),
        username: ADMIN_USERNAME.into(),
        password: ADMIN_PASSWORD.into(),
        email: "admin@campus.com".into(),
        campus: "主校区".into(),
        credit_score: 100,
        user_type: Role::Admin,
        registration_date: Some("2024-01-01 10:00:00".parse().unwrap()),
        status: UserStatus::Active,
    }
}

/// In-memory state whose directory already holds one admin (id "1").
pub fn state_with_admin() -> AppState {
    let mut users = BTreeMap::new();
    users.insert("1".to_owned(), admin_record());
    AppState::from_stores(
        Box::new(MemoryStore::with_records(users)),
        Box::new(MemoryStore::<ProductRecord>::new()),
        None,
        DEFAULT_SESSION_IDLE_TTL,
    )
}

// ── Domain shortcuts ─────────────────────────────────────────────────────────

/// Register `username` with the shared test password.
pub fn register(state: &AppState, username: &str) -> User {
    state
        .auth
        .register(RegisterInput {
            username: username.into(),
            password: PASSWORD.into(),
            email: format!("{username}@campus.com"),
            campus: "东校区".into(),
        })
        .unwrap()
}

pub fn listing(seller: &User, title: &str, description: &str, price: f64) -> PublishInput {
    PublishInput {
        title: title.into(),
        description: description.into(),
        price,
        category: ProductCategory::Electronics,
        seller_id: seller.id.clone(),
        campus: seller.campus.clone(),
        condition: String::new(),
        original_price: None,
        images: Vec::new(),
    }
}

/// Publish and approve in one step.
pub fn on_sale(state: &AppState, input: PublishInput) -> Product {
    let product = state.catalog.publish(input).unwrap();
    assert!(state.catalog.approve(&product.id).unwrap());
    product
}

pub fn titles(views: &[campus_market::domain::types::ProductView]) -> Vec<&str> {
    views.iter().map(|v| v.product.title.as_str()).collect()
}

pub fn pid(id: &str) -> ProductId {
    ProductId::from(id)
}
