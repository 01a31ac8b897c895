use http::Uri;
use serde::Serialize;

use crate::error::{AppError, Result};

/// Container, relative to the Pod root, holding one resource per ownership credential.
pub const PRODUCTS_CONTAINER: &str = "products/";

/// Where a subject's credentials live in their Pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodLocations {
    pub web_id: String,
    pub pod_root: String,
    pub products_container: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_url: Option<String>,
}

/// Derives the Pod root from a WebID.
///
/// `https://pod.example/alice/profile/card#me` becomes `https://pod.example/alice/`.
/// Only a trailing `profile/<document>` pair is stripped; query and fragment are dropped.
/// The returned root always ends with `/`.
pub fn pod_root(web_id: &str) -> Result<String> {
    let uri: Uri = web_id
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid WebID: {}", web_id)))?;

    let scheme = uri
        .scheme_str()
        .ok_or_else(|| AppError::Validation("WebID must be an absolute URL".to_string()))?;
    let authority = uri
        .authority()
        .ok_or_else(|| AppError::Validation("WebID must have a host".to_string()))?;

    let mut segments: Vec<&str> = uri.path().split('/').filter(|s| !s.is_empty()).collect();
    let len = segments.len();
    if len >= 2 && segments[len - 2] == "profile" {
        segments.truncate(len - 2);
    }

    let mut root = format!("{}://{}/", scheme, authority);
    for segment in segments {
        root.push_str(segment);
        root.push('/');
    }

    Ok(root)
}

/// URL of the products container under `pod_root`.
pub fn products_container(pod_root: &str) -> String {
    format!("{}{}", pod_root, PRODUCTS_CONTAINER)
}

/// URL of the credential for `gtin` inside `container`.
pub fn credential_url(container: &str, gtin: &str) -> String {
    format!("{}{}", container, gtin)
}

/// Resolves every location for `web_id`, plus the credential URL when a GTIN is given.
pub fn locate(web_id: &str, gtin: Option<&str>) -> Result<PodLocations> {
    let pod_root = pod_root(web_id)?;
    let products_container = products_container(&pod_root);
    let credential_url = gtin.map(|gtin| credential_url(&products_container, gtin));

    Ok(PodLocations {
        web_id: web_id.to_string(),
        pod_root,
        products_container,
        credential_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_profile_card() {
        assert_eq!(
            pod_root("https://pod.example/alice/profile/card#me").unwrap(),
            "https://pod.example/alice/"
        );
        assert_eq!(
            pod_root("http://localhost:3000/warddem/profile/card#me").unwrap(),
            "http://localhost:3000/warddem/"
        );
    }

    #[test]
    fn host_level_pod() {
        assert_eq!(
            pod_root("https://alice.pod.example/profile/card#me").unwrap(),
            "https://alice.pod.example/"
        );
    }

    #[test]
    fn keeps_paths_without_profile_document() {
        assert_eq!(
            pod_root("https://pod.example/alice/me").unwrap(),
            "https://pod.example/alice/me/"
        );
        assert_eq!(
            pod_root("https://pod.example/profile").unwrap(),
            "https://pod.example/profile/"
        );
    }

    #[test]
    fn drops_query() {
        assert_eq!(
            pod_root("https://pod.example/bob/profile/card?x=1").unwrap(),
            "https://pod.example/bob/"
        );
    }

    #[test]
    fn rejects_relative_webid() {
        assert!(matches!(pod_root("/alice/profile/card"), Err(AppError::Validation(_))));
        assert!(matches!(pod_root("not a url"), Err(AppError::Validation(_))));
    }

    #[test]
    fn locate_builds_all_urls() {
        let locations = locate("https://pod.example/alice/profile/card#me", Some("05012345678900")).unwrap();

        assert_eq!(locations.pod_root, "https://pod.example/alice/");
        assert_eq!(locations.products_container, "https://pod.example/alice/products/");
        assert_eq!(
            locations.credential_url.as_deref(),
            Some("https://pod.example/alice/products/05012345678900")
        );
    }

    #[test]
    fn locate_without_gtin() {
        let locations = locate("https://pod.example/alice/profile/card#me", None).unwrap();
        assert!(locations.credential_url.is_none());
    }
}
