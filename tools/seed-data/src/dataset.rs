//! Demo accounts and listings for a fresh data directory.

use std::collections::BTreeMap;

use anyhow::Context as _;

use campus_domain::id::{ProductId, UserId};
use campus_domain::product::{ProductCategory, ProductStatus};
use campus_domain::time::Timestamp;
use campus_domain::user::{Role, UserStatus};
use campus_market::domain::types::{Product, User};
use campus_market::infra::record::{ProductRecord, UserRecord};

struct SeedUser {
    username: &'static str,
    password: &'static str,
    campus: &'static str,
    role: Role,
    credit_score: u32,
    registered: &'static str,
}

const USERS: [SeedUser; 3] = [
    SeedUser {
        username: "admin",
        password: "admin123",
        campus: "主校区",
        role: Role::Admin,
        credit_score: 100,
        registered: "2024-01-01 10:00:00",
    },
    SeedUser {
        username: "student",
        password: "student123",
        campus: "东校区",
        role: Role::Student,
        credit_score: 95,
        registered: "2024-01-02 14:30:00",
    },
    SeedUser {
        username: "teacher",
        password: "teacher123",
        campus: "西校区",
        role: Role::Teacher,
        credit_score: 98,
        registered: "2024-01-03 09:15:00",
    },
];

struct SeedProduct {
    title: &'static str,
    description: &'static str,
    price: f64,
    original_price: f64,
    category: ProductCategory,
    /// Index into `USERS`.
    seller: usize,
    condition: &'static str,
    status: ProductStatus,
    created: &'static str,
    views: u64,
    likes: u64,
}

const PRODUCTS: [SeedProduct; 5] = [
    SeedProduct {
        title: "二手运动鞋",
        description: "九成新运动鞋，仅穿几次，舒适透气，适合跑步和日常穿搭。鞋底几乎没有磨损，保持得很好。",
        price: 120.0,
        original_price: 150.0,
        category: ProductCategory::Clothing,
        seller: 1,
        condition: "九成新",
        status: ProductStatus::OnSale,
        created: "2024-01-10 15:20:00",
        views: 25,
        likes: 3,
    },
    SeedProduct {
        title: "Python编程书籍",
        description: "Python编程入门到实践，几乎全新，无笔记无划痕，适合初学者学习使用。",
        price: 45.0,
        original_price: 69.0,
        category: ProductCategory::Books,
        seller: 2,
        condition: "全新",
        status: ProductStatus::OnSale,
        created: "2024-01-11 10:45:00",
        views: 18,
        likes: 2,
    },
    SeedProduct {
        title: "无线蓝牙耳机",
        description: "音质良好，续航时间长，几乎全新，包装配件齐全。因换新耳机而出售。",
        price: 180.0,
        original_price: 299.0,
        category: ProductCategory::Electronics,
        seller: 1,
        condition: "九成新",
        status: ProductStatus::OnSale,
        created: "2024-01-12 16:30:00",
        views: 32,
        likes: 5,
    },
    SeedProduct {
        title: "高等数学教材",
        description: "大学高等数学教材，包含习题解答，适合大一学生使用。",
        price: 30.0,
        original_price: 50.0,
        category: ProductCategory::Books,
        seller: 2,
        condition: "七成新",
        status: ProductStatus::OnSale,
        created: "2024-01-13 09:20:00",
        views: 15,
        likes: 1,
    },
    SeedProduct {
        title: "待审核的商品测试",
        description: "这是一个测试待审核状态的商品，应该在管理后台中显示为待审核状态。",
        price: 99.0,
        original_price: 120.0,
        category: ProductCategory::Other,
        seller: 1,
        condition: "七成新",
        status: ProductStatus::Pending,
        created: "2024-01-13 14:20:00",
        views: 0,
        likes: 0,
    },
];

fn timestamp(raw: &str) -> anyhow::Result<Timestamp> {
    raw.parse()
        .with_context(|| format!("bad seed timestamp {raw:?}"))
}

/// Ids are 1-based positions.
fn user_id(index: usize) -> UserId {
    UserId::from((index + 1) as u64)
}

pub fn users() -> anyhow::Result<Vec<User>> {
    USERS
        .iter()
        .enumerate()
        .map(|(i, u)| {
            Ok(User {
                id: user_id(i),
                username: u.username.to_owned(),
                password: u.password.to_owned(),
                email: format!("{}@campus.com", u.username),
                campus: u.campus.to_owned(),
                role: u.role,
                credit_score: u.credit_score,
                status: UserStatus::Active,
                registered_at: Some(timestamp(u.registered)?),
            })
        })
        .collect()
}

pub fn products() -> anyhow::Result<Vec<Product>> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, p)| {
            Ok(Product {
                id: ProductId::from((i + 1) as u64),
                title: p.title.to_owned(),
                description: p.description.to_owned(),
                price: p.price,
                original_price: p.original_price,
                category: p.category,
                seller_id: user_id(p.seller),
                campus: USERS[p.seller].campus.to_owned(),
                condition: p.condition.to_owned(),
                status: p.status,
                created_at: timestamp(p.created)?,
                images: Vec::new(),
                view_count: p.views,
                like_count: p.likes,
            })
        })
        .collect()
}

pub fn user_records() -> anyhow::Result<BTreeMap<String, UserRecord>> {
    Ok(users()?
        .iter()
        .map(|u| (u.id.to_string(), UserRecord::from(u)))
        .collect())
}

pub fn product_records() -> anyhow::Result<BTreeMap<String, ProductRecord>> {
    Ok(products()?
        .iter()
        .map(|p| (p.id.to_string(), ProductRecord::from(p)))
        .collect())
}
