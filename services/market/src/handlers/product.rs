use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use campus_core::session::{OptionalSession, SessionHeader};
use campus_domain::id::{ProductId, SessionToken, UserId};
use campus_domain::product::{ProductCategory, ProductStatus};
use campus_domain::time::Timestamp;

use crate::domain::types::{ProductView, SearchQuery, User};
use crate::error::{MarketError, ValidationError};
use crate::state::AppState;
use crate::usecase::catalog::PublishInput;

// ── Response types ───────────────────────────────────────────────────────────

/// Listing as served over HTTP: persisted fields plus seller attributes.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub original_price: f64,
    pub category: ProductCategory,
    pub seller_id: String,
    pub campus: String,
    pub condition: String,
    pub status: ProductStatus,
    pub create_time: Timestamp,
    pub images: Vec<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub seller_name: String,
    pub seller_credit: u32,
    pub seller_type: String,
}

impl From<ProductView> for ProductResponse {
    fn from(view: ProductView) -> Self {
        let p = view.product;
        Self {
            product_id: p.id.0,
            title: p.title,
            description: p.description,
            price: p.price,
            original_price: p.original_price,
            category: p.category,
            seller_id: p.seller_id.0,
            campus: p.campus,
            condition: p.condition,
            status: p.status,
            create_time: p.created_at,
            images: p.images,
            view_count: p.view_count,
            like_count: p.like_count,
            seller_name: view.seller_name,
            seller_credit: view.seller_credit,
            seller_type: view.seller_type,
        }
    }
}

fn respond(views: Vec<ProductView>) -> Json<Vec<ProductResponse>> {
    Json(views.into_iter().map(ProductResponse::from).collect())
}

/// Seller of the listing, or an admin.
fn may_manage(user: &User, view: &ProductView) -> bool {
    user.id == view.product.seller_id || user.role.can_moderate()
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub campus: Option<String>,
    pub max_price: Option<f64>,
}

impl From<SearchParams> for SearchQuery {
    fn from(params: SearchParams) -> Self {
        Self {
            keyword: params.keyword.unwrap_or_default(),
            // Unknown categories do not filter.
            category: params.category.and_then(|c| c.parse().ok()),
            campus: params.campus.unwrap_or_default(),
            max_price: params.max_price,
        }
    }
}

// ── GET /products ────────────────────────────────────────────────────────────

pub async fn search_products(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Vec<ProductResponse>>, MarketError> {
    let params: SearchParams = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| MarketError::InvalidQuery(e.to_string()))?
        .unwrap_or_default();
    let views = state.catalog.search(&params.into())?;
    Ok(respond(views))
}

// ── POST /products ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Symbolic key (`"books"`) or display label (`"图书资料"`).
    pub category: String,
    /// Defaults to the seller's campus.
    #[serde(default)]
    pub campus: String,
    #[serde(default)]
    pub condition: String,
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
}

pub async fn publish_product(
    SessionHeader(token): SessionHeader,
    State(state): State<AppState>,
    Json(body): Json<PublishRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), MarketError> {
    let seller = state.auth.require_user(&token)?;
    let category: ProductCategory = body
        .category
        .parse()
        .map_err(|_| ValidationError::UnknownCategory)?;
    let campus = if body.campus.is_empty() {
        seller.campus.clone()
    } else {
        body.campus
    };

    let product = state.catalog.publish(PublishInput {
        title: body.title,
        description: body.description,
        price: body.price,
        category,
        seller_id: seller.id.clone(),
        campus,
        condition: body.condition,
        original_price: body.original_price,
        images: body.images,
    })?;
    let view = ProductView::new(product, Some(&seller));
    Ok((StatusCode::CREATED, Json(view.into())))
}

// ── GET /products/pending ────────────────────────────────────────────────────

pub async fn pending_products(
    SessionHeader(token): SessionHeader,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, MarketError> {
    state.auth.require_admin(&token)?;
    Ok(respond(state.catalog.get_pending()?))
}

// ── GET /products/{id} ───────────────────────────────────────────────────────

/// Counts a view. Listings that are not on sale are only shown to their
/// seller and to admins; everyone else gets 404.
pub async fn get_product(
    OptionalSession(token): OptionalSession,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, MarketError> {
    let id = ProductId(id);
    let current = state
        .catalog
        .get(&id)?
        .ok_or(MarketError::ProductNotFound)?;

    if !current.product.status.is_visible() {
        let viewer = match token {
            Some(token) => state.auth.current_user(&token)?,
            None => None,
        };
        if !viewer.is_some_and(|u| may_manage(&u, &current)) {
            return Err(MarketError::ProductNotFound);
        }
    }

    let view = state
        .catalog
        .view(&id)?
        .ok_or(MarketError::ProductNotFound)?;
    Ok(Json(view.into()))
}

// ── POST /products/{id}/approve ──────────────────────────────────────────────

pub async fn approve_product(
    SessionHeader(token): SessionHeader,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, MarketError> {
    state.auth.require_admin(&token)?;
    if state.catalog.approve(&ProductId(id))? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MarketError::ProductNotFound)
    }
}

// ── POST /products/{id}/sold, /products/{id}/remove ──────────────────────────

/// Resolve the caller and the listing, and check that the caller may close it.
fn authorize_close(
    state: &AppState,
    token: &SessionToken,
    id: &ProductId,
) -> Result<(), MarketError> {
    let user = state.auth.require_user(token)?;
    let view = state
        .catalog
        .get(id)?
        .ok_or(MarketError::ProductNotFound)?;
    if !may_manage(&user, &view) {
        return Err(MarketError::Forbidden);
    }
    Ok(())
}

pub async fn mark_sold(
    SessionHeader(token): SessionHeader,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, MarketError> {
    let id = ProductId(id);
    authorize_close(&state, &token, &id)?;
    if state.catalog.mark_sold(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MarketError::ProductNotFound)
    }
}

pub async fn remove_product(
    SessionHeader(token): SessionHeader,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, MarketError> {
    let id = ProductId(id);
    authorize_close(&state, &token, &id)?;
    if state.catalog.remove(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(MarketError::ProductNotFound)
    }
}

// ── GET /sellers/{id}/products ───────────────────────────────────────────────

pub async fn seller_products(
    State(state): State<AppState>,
    Path(seller_id): Path<String>,
) -> Result<Json<Vec<ProductResponse>>, MarketError> {
    Ok(respond(state.catalog.get_by_seller(&UserId(seller_id))?))
}
