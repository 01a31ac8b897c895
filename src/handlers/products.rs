use axum::{Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::{
    error::Result,
    models::{
        credential::{OwnershipCredential, ProductInput},
        session::SessionRecord,
    },
    services::pod,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    pub credential_url: String,
    pub credential: OwnershipCredential,
}

/// Issues a product ownership credential for the caller, addressed inside their Pod.
#[axum::debug_handler]
pub async fn credential(
    Extension(session): Extension<SessionRecord>,
    Json(input): Json<ProductInput>,
) -> Result<Json<CredentialResponse>> {
    input.validate()?;

    let locations = pod::locate(&session.subject_id, None)?;
    let credential_url = pod::credential_url(&locations.products_container, &input.gtin);

    let credential =
        OwnershipCredential::issue(&input, &session.subject_id, &credential_url, Utc::now());

    tracing::info!("🏷️  Issued ownership credential for GTIN {}", input.gtin);

    Ok(Json(CredentialResponse {
        credential_url,
        credential,
    }))
}
