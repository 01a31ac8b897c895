use axum::{
    extract::Query,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::session::SessionRecord,
    services::pod::{self as pod_service, PodLocations},
    validation::auth::validate_gtin,
};

/// The query parameters for resolving Pod locations.
#[derive(Deserialize)]
pub struct PodQuery {
    #[serde(default)]
    pub gtin: Option<String>,
}

/// Resolves where the caller's product-ownership credentials live in their Pod.
#[axum::debug_handler]
pub async fn locations(
    Extension(session): Extension<SessionRecord>,
    Query(query): Query<PodQuery>,
) -> Result<Json<PodLocations>> {
    if let Some(gtin) = query.gtin.as_deref() {
        validate_gtin(gtin)?;
    }

    let locations = pod_service::locate(&session.subject_id, query.gtin.as_deref())?;

    Ok(Json(locations))
}
