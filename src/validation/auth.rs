use crate::error::{AppError, Result};

/// Longest WebID accepted into a session.
const MAX_WEB_ID_LEN: usize = 2048;

/// Validates the WebID handed over by the login callback.
///
/// # Arguments
///
/// * `web_id` - The WebID to validate. `None` or blank means it was missing.
///
/// # Returns
///
/// The trimmed WebID.
pub fn validate_web_id(web_id: Option<&str>) -> Result<String> {
    let web_id = web_id.map(str::trim).unwrap_or_default();

    if web_id.is_empty() {
        return Err(AppError::Validation(
            "Missing webId in callback data".to_string(),
        ));
    }

    if web_id.len() > MAX_WEB_ID_LEN {
        return Err(AppError::Validation(format!(
            "webId must be at most {} characters",
            MAX_WEB_ID_LEN
        )));
    }

    if !(web_id.starts_with("https://") || web_id.starts_with("http://")) {
        return Err(AppError::Validation(
            "webId must be an http(s) URL".to_string(),
        ));
    }

    Ok(web_id.to_string())
}

/// Validates a GTIN (GTIN-8, GTIN-12, GTIN-13 or GTIN-14).
///
/// # Arguments
///
/// * `gtin` - The GTIN to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the GTIN is valid.
pub fn validate_gtin(gtin: &str) -> Result<()> {
    if !matches!(gtin.len(), 8 | 12 | 13 | 14) {
        return Err(AppError::Validation(
            "GTIN must be 8, 12, 13 or 14 digits long".to_string(),
        ));
    }

    if !gtin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(
            "GTIN can only contain digits".to_string(),
        ));
    }

    Ok(())
}
