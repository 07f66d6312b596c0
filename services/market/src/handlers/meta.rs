use axum::Json;
use serde::Serialize;

use campus_domain::product::{
    KNOWN_CAMPUSES, ProductCategory, ProductStatus, SUGGESTED_CONDITIONS,
};
use campus_domain::user::Role;

#[derive(Serialize)]
pub struct Choice {
    pub key: &'static str,
    pub label: &'static str,
}

/// Fixed vocabularies that front ends render as pickers.
#[derive(Serialize)]
pub struct MetaResponse {
    pub categories: Vec<Choice>,
    pub statuses: Vec<Choice>,
    pub roles: Vec<Choice>,
    pub conditions: &'static [&'static str],
    pub campuses: &'static [&'static str],
}

// ── GET /meta ────────────────────────────────────────────────────────────────

pub async fn get_meta() -> Json<MetaResponse> {
    Json(MetaResponse {
        categories: ProductCategory::ALL
            .iter()
            .map(|c| Choice {
                key: c.key(),
                label: c.label(),
            })
            .collect(),
        statuses: ProductStatus::ALL
            .iter()
            .map(|s| Choice {
                key: s.key(),
                label: s.label(),
            })
            .collect(),
        roles: Role::ALL
            .iter()
            .map(|r| Choice {
                key: r.key(),
                label: r.label(),
            })
            .collect(),
        conditions: &SUGGESTED_CONDITIONS,
        campuses: &KNOWN_CAMPUSES,
    })
}
