use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::validation::auth::validate_gtin;

/// Tabulas vocabulary.
pub const TABULAS_NS: &str = "https://tabulas.eu/vocab#";
/// GS1 web vocabulary.
pub const GS1_NS: &str = "https://gs1.org/voc/";
/// Schema.org vocabulary.
pub const SCHEMA_NS: &str = "https://schema.org/";

/// Identifier of the credential issuer.
pub const ISSUER_ID: &str = "did:web:tabulas.eu";
/// Display name of the credential issuer.
pub const ISSUER_NAME: &str = "Tabulas";

/// Base of GS1 Digital Link product URIs.
const GS1_DIGITAL_LINK_BASE: &str = "https://id.gs1.org/01/";

/// Fields a client must supply to claim a product, in the order they are reported.
pub const REQUIRED_PRODUCT_FIELDS: [&str; 5] =
    ["gtin", "name", "manufacturerId", "manufacturerName", "dppUrl"];

/// Input data for creating a product ownership credential.
///
/// Missing fields deserialize as empty strings so that [`ProductInput::validate`]
/// can report them together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductInput {
    /// GTIN-8/12/13/14.
    pub gtin: String,
    /// Product name.
    pub name: String,
    /// Manufacturer DID or other identifier.
    pub manufacturer_id: String,
    /// Manufacturer display name.
    pub manufacturer_name: String,
    /// URL of the Digital Product Passport record.
    pub dpp_url: String,
}

impl ProductInput {
    /// Checks that every field is present and that the GTIN is well formed.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            &self.gtin,
            &self.name,
            &self.manufacturer_id,
            &self.manufacturer_name,
            &self.dpp_url,
        ];

        if fields.iter().any(|value| value.trim().is_empty()) {
            return Err(AppError::MissingFields(REQUIRED_PRODUCT_FIELDS.to_vec()));
        }

        validate_gtin(&self.gtin)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialContext {
    #[serde(rename = "@vocab")]
    pub vocab: String,
    pub tabulas: String,
    pub gs1: String,
    pub schema: String,
}

impl Default for CredentialContext {
    fn default() -> Self {
        Self {
            vocab: SCHEMA_NS.to_string(),
            tabulas: TABULAS_NS.to_string(),
            gs1: GS1_NS.to_string(),
            schema: SCHEMA_NS.to_string(),
        }
    }
}

/// A JSON-LD node reference with a display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedNode {
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedProduct {
    #[serde(rename = "@type")]
    pub kind: String,
    /// GS1 Digital Link URI of the product.
    #[serde(rename = "@id")]
    pub id: String,
    pub gtin: String,
    pub name: String,
    pub manufacturer: NamedNode,
}

/// Product ownership credential as stored in the owner's Pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipCredential {
    #[serde(rename = "@context")]
    pub context: CredentialContext,
    #[serde(rename = "@type")]
    pub kind: String,
    /// URL of the credential resource.
    #[serde(rename = "@id")]
    pub id: String,
    pub product: OwnedProduct,
    pub owner: NamedNode,
    /// ISO 8601, millisecond precision, UTC.
    pub issued_at: String,
    pub issued_by: NamedNode,
    pub dpp_source: String,
}

impl OwnershipCredential {
    /// Builds the credential for `input`, owned by `owner_web_id` and stored at
    /// `credential_url`. `input` must already be validated.
    pub fn issue(
        input: &ProductInput,
        owner_web_id: &str,
        credential_url: &str,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            context: CredentialContext::default(),
            kind: "OwnershipCredential".to_string(),
            id: credential_url.to_string(),
            product: OwnedProduct {
                kind: "Product".to_string(),
                id: gs1_digital_link(&input.gtin),
                gtin: input.gtin.clone(),
                name: input.name.clone(),
                manufacturer: NamedNode {
                    kind: "Organization".to_string(),
                    id: input.manufacturer_id.clone(),
                    name: Some(input.manufacturer_name.clone()),
                },
            },
            owner: NamedNode {
                kind: "Person".to_string(),
                id: owner_web_id.to_string(),
                name: None,
            },
            issued_at: issued_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            issued_by: NamedNode {
                kind: "Organization".to_string(),
                id: ISSUER_ID.to_string(),
                name: Some(ISSUER_NAME.to_string()),
            },
            dpp_source: input.dpp_url.clone(),
        }
    }
}

/// GS1 Digital Link URI for a GTIN, left-padded to 14 digits.
pub fn gs1_digital_link(gtin: &str) -> String {
    format!("{}{:0>14}", GS1_DIGITAL_LINK_BASE, gtin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    const WEB_ID: &str = "https://pod.example/alice/profile/card#me";
    const CREDENTIAL_URL: &str = "https://pod.example/alice/products/5400141072853";

    fn input() -> ProductInput {
        ProductInput {
            gtin: "5400141072853".to_string(),
            name: "Espresso Machine".to_string(),
            manufacturer_id: "did:web:maker.example".to_string(),
            manufacturer_name: "Maker".to_string(),
            dpp_url: "https://tabulas.eu/dpp/5400141072853".to_string(),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn any_blank_field_reports_all_required() {
        let mut missing_name = input();
        missing_name.name = "  ".to_string();

        match missing_name.validate() {
            Err(AppError::MissingFields(fields)) => assert_eq!(fields, REQUIRED_PRODUCT_FIELDS),
            other => panic!("unexpected: {:?}", other),
        }

        assert!(matches!(ProductInput::default().validate(), Err(AppError::MissingFields(_))));
    }

    #[test]
    fn malformed_gtin_is_rejected() {
        let mut bad = input();
        bad.gtin = "540014107285X".to_string();
        assert!(matches!(bad.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_json_fields_deserialize_blank() {
        let parsed: ProductInput = serde_json::from_value(json!({ "gtin": "12345678" })).unwrap();
        assert_eq!(parsed.gtin, "12345678");
        assert!(parsed.dpp_url.is_empty());
    }

    #[test]
    fn digital_link_pads_to_fourteen_digits() {
        assert_eq!(gs1_digital_link("5400141072853"), "https://id.gs1.org/01/05400141072853");
        assert_eq!(gs1_digital_link("05012345678900"), "https://id.gs1.org/01/05012345678900");
    }

    #[test]
    fn credential_document_shape() {
        let issued_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let credential = OwnershipCredential::issue(&input(), WEB_ID, CREDENTIAL_URL, issued_at);

        assert_eq!(
            serde_json::to_value(&credential).unwrap(),
            json!({
                "@context": {
                    "@vocab": "https://schema.org/",
                    "tabulas": "https://tabulas.eu/vocab#",
                    "gs1": "https://gs1.org/voc/",
                    "schema": "https://schema.org/"
                },
                "@type": "OwnershipCredential",
                "@id": CREDENTIAL_URL,
                "product": {
                    "@type": "Product",
                    "@id": "https://id.gs1.org/01/05400141072853",
                    "gtin": "5400141072853",
                    "name": "Espresso Machine",
                    "manufacturer": {
                        "@type": "Organization",
                        "@id": "did:web:maker.example",
                        "name": "Maker"
                    }
                },
                "owner": { "@type": "Person", "@id": WEB_ID },
                "issuedAt": "2025-01-02T03:04:05.000Z",
                "issuedBy": {
                    "@type": "Organization",
                    "@id": "did:web:tabulas.eu",
                    "name": "Tabulas"
                },
                "dppSource": "https://tabulas.eu/dpp/5400141072853"
            })
        );
    }

    #[test]
    fn credential_survives_sonic_roundtrip() {
        let credential = OwnershipCredential::issue(&input(), WEB_ID, CREDENTIAL_URL, Utc::now());
        let text = sonic_rs::to_string(&credential).unwrap();
        let parsed: OwnershipCredential = sonic_rs::from_str(&text).unwrap();
        assert_eq!(parsed, credential);
    }
}
