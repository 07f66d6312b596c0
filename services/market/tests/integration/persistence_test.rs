use std::fs;
use std::path::Path;

use campus_domain::product::ProductStatus;
use campus_domain::user::Role;

use campus_market::domain::repository::{ProductRepository, UserRepository};
use campus_market::domain::types::{SearchQuery, UNKNOWN_SELLER_NAME};
use campus_market::config::MarketConfig;
use campus_market::error::MarketError;
use campus_market::state::AppState;
use campus_testing::fixture::Fixture;

use crate::helpers::{PASSWORD, listing, pid, register, titles};

fn open(data_dir: &Path) -> AppState {
    AppState::open(&MarketConfig::at(data_dir))
}

#[test]
fn should_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let product_id = {
        let state = open(dir.path());
        let alice = register(&state, "alice");
        state
            .catalog
            .publish(listing(&alice, "电饭煲", "3升", 120.0))
            .unwrap()
            .id
    };

    let state = open(dir.path());
    let session = state.auth.login("alice", PASSWORD).unwrap();
    let pending = state.catalog.get_pending().unwrap();
    assert_eq!(titles(&pending), vec!["电饭煲"]);
    assert_eq!(pending[0].product.seller_id, session.user.id);

    // Sessions are not persisted.
    let fresh = open(dir.path());
    assert!(!fresh.auth.is_logged_in(&session.token));
    assert!(fresh.catalog.approve(&product_id).unwrap());
}

#[test]
fn should_write_pretty_utf8_documents() {
    let dir = tempfile::tempdir().unwrap();
    let state = open(dir.path());
    let alice = register(&state, "alice");
    state
        .catalog
        .publish(listing(&alice, "自行车", "九成新", 200.0))
        .unwrap();

    let products = fs::read_to_string(dir.path().join("products.json")).unwrap();
    assert!(products.contains("\"status\": \"待审核\""));
    assert!(products.contains("\"category\": \"电子数码\""));
    assert!(products.contains("\"title\": \"自行车\""));
    let doc: serde_json::Value = serde_json::from_str(&products).unwrap();
    assert_eq!(doc["1"]["product_id"], "1");
    assert_eq!(doc["1"]["original_price"], 240.0);

    let users = fs::read_to_string(dir.path().join("users.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&users).unwrap();
    assert_eq!(doc["1"]["user_type"], "student");
    assert_eq!(doc["1"]["status"], "active");
    assert_eq!(doc["1"]["campus"], "东校区");
}

fn legacy_state(dir: &tempfile::TempDir) -> AppState {
    Fixture::copy_to("legacy/users.json", &dir.path().join("users.json"));
    Fixture::copy_to("legacy/products.json", &dir.path().join("products.json"));
    open(dir.path())
}

#[test]
fn should_fill_defaults_when_loading_legacy_files() {
    let dir = tempfile::tempdir().unwrap();
    let state = legacy_state(&dir);

    let old = state.auth.login("oldtimer", "old123").unwrap().user;
    assert_eq!(old.credit_score, 100);
    assert_eq!(old.role, Role::Student);
    assert!(matches!(
        state.auth.login("dormant", "sleep123"),
        Err(MarketError::InvalidCredentials)
    ));
    assert_eq!(state.auth.users().count().unwrap(), 3);

    let lamp = state.catalog.get(&pid("1")).unwrap().unwrap();
    assert_eq!(lamp.product.condition, "九成新");
    assert!((lamp.product.original_price - 60.0).abs() < 1e-9);
    assert!(lamp.product.images.is_empty());
    assert_eq!(lamp.seller_name, "oldtimer");
}

#[test]
fn should_skip_broken_records_and_keep_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let state = legacy_state(&dir);

    assert!(state.catalog.get(&pid("3")).unwrap().is_none());
    let on_sale = state.catalog.search(&SearchQuery::default()).unwrap();
    assert_eq!(titles(&on_sale), vec!["线性代数", "旧台灯"]);
    assert_eq!(on_sale[0].seller_name, UNKNOWN_SELLER_NAME);
    assert_eq!(on_sale[0].product.images, vec!["uploads/2.jpg".to_owned()]);

    let pending = state.catalog.products().get_by_status(ProductStatus::Pending).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(state.catalog.products().next_id().unwrap(), pid("5"));
}

#[test]
fn should_keep_corrupt_document_when_starting_empty() {
    let dir = tempfile::tempdir().unwrap();
    let original = r#"{ "1": { "user_id": "1", "username": "admin" }, }"#;
    fs::write(dir.path().join("users.json"), original).unwrap();
    let state = open(dir.path());
    assert_eq!(state.auth.users().count().unwrap(), 0);

    register(&state, "alice");
    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("users.json")).unwrap())
            .unwrap();
    assert_eq!(doc["1"]["username"], "alice");

    let aside: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("users.json.corrupt-"))
        })
        .collect();
    assert_eq!(aside.len(), 1);
    assert_eq!(fs::read_to_string(&aside[0]).unwrap(), original);
}

#[test]
fn should_preserve_unreadable_records_across_writes() {
    let dir = tempfile::tempdir().unwrap();
    Fixture::copy_to("legacy/users.json", &dir.path().join("users.json"));
    Fixture::copy_to("legacy/products.json", &dir.path().join("products.json"));
    let state = open(dir.path());

    register(&state, "alice");
    state.catalog.approve(&pid("4")).unwrap();

    let products: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("products.json")).unwrap())
            .unwrap();
    assert_eq!(products["3"]["product_id"], "3");
    assert!(products["3"].get("title").is_none());
    assert_eq!(products["4"]["status"], "在售");
}
