use axum::{
    Router,
    routing::{get, post},
};

use campus_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    auth::{login, logout, me, register},
    health::{healthz, readyz},
    meta::get_meta,
    product::{
        approve_product, get_product, mark_sold, pending_products, publish_product,
        remove_product, search_products, seller_products,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/meta", get(get_meta))
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        // Products
        .route("/products", get(search_products).post(publish_product))
        .route("/products/pending", get(pending_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}/approve", post(approve_product))
        .route("/products/{id}/sold", post(mark_sold))
        .route("/products/{id}/remove", post(remove_product))
        // Sellers
        .route("/sellers/{id}/products", get(seller_products))
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
