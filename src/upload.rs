use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

pub const MAX_SCREENSHOT_BYTES: usize = 5 * 1024 * 1024;

const PRODUCT_IMAGE_TYPES: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];
const SCREENSHOT_TYPES: &[&str] = &["jpg", "jpeg", "png", "gif"];

#[derive(Debug)]
pub struct StoredFile {
    pub file_name: String,
    /// Public path under the static prefix, persisted on the owning row.
    pub url_path: String,
}

/// Decode a `data:image/...;base64,` URI and store it under
/// `<upload_dir>/products/`. Filenames combine a timestamp with a random
/// token so concurrent uploads cannot collide.
pub async fn save_product_image(config: &AppConfig, data_uri: &str) -> AppResult<StoredFile> {
    let (ext, payload) = parse_data_uri(data_uri)?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|_| AppError::BadRequest("Invalid image data".to_string()))?;

    let file_name = format!("product_{}_{}.{}", Utc::now().timestamp(), file_token(), ext);
    write_file(&config.upload_dir.join("products"), &file_name, &bytes).await?;

    Ok(StoredFile {
        url_path: public_path(config, "products", &file_name),
        file_name,
    })
}

/// Store an uploaded proof-of-payment image under `<upload_dir>/payments/`.
pub async fn save_payment_screenshot(
    config: &AppConfig,
    original_name: &str,
    bytes: &[u8],
) -> AppResult<StoredFile> {
    let ext = screenshot_extension(original_name)?;
    if bytes.len() > MAX_SCREENSHOT_BYTES {
        return Err(AppError::BadRequest(
            "File size exceeds 5MB limit".to_string(),
        ));
    }

    let file_name = format!("payment_{}_{}.{}", Utc::now().timestamp(), file_token(), ext);
    write_file(&config.upload_dir.join("payments"), &file_name, bytes).await?;

    Ok(StoredFile {
        url_path: public_path(config, "payments", &file_name),
        file_name,
    })
}

fn parse_data_uri(data_uri: &str) -> AppResult<(&str, &str)> {
    let invalid = || AppError::BadRequest("Invalid image format".to_string());

    let rest = data_uri.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (subtype, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;
    if !PRODUCT_IMAGE_TYPES.contains(&subtype) {
        return Err(invalid());
    }
    Ok((subtype, payload))
}

fn screenshot_extension(file_name: &str) -> AppResult<String> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !SCREENSHOT_TYPES.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(
            "Invalid file type. Only JPG, PNG, GIF allowed".to_string(),
        ));
    }
    Ok(ext)
}

fn file_token() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn public_path(config: &AppConfig, subdir: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}",
        config.upload_url_prefix.trim_end_matches('/'),
        subdir,
        file_name
    )
}

async fn write_file(dir: &Path, file_name: &str, bytes: &[u8]) -> AppResult<()> {
    fs::create_dir_all(dir).await.map_err(anyhow::Error::from)?;
    fs::write(dir.join(file_name), bytes)
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_uris_with_allowed_types() {
        let (ext, payload) = parse_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(ext, "png");
        assert_eq!(payload, "aGVsbG8=");

        assert!(parse_data_uri("data:image/webp;base64,AA==").is_ok());
        assert!(parse_data_uri("data:image/svg+xml;base64,AA==").is_err());
        assert!(parse_data_uri("data:text/plain;base64,AA==").is_err());
        assert!(parse_data_uri("just-base64-noise").is_err());
    }

    #[test]
    fn screenshot_extension_is_case_insensitive() {
        assert_eq!(screenshot_extension("shot.PNG").unwrap(), "png");
        assert_eq!(screenshot_extension("receipt.jpeg").unwrap(), "jpeg");
        assert!(screenshot_extension("archive.pdf").is_err());
        assert!(screenshot_extension("no_extension").is_err());
    }

    #[test]
    fn file_tokens_are_short_and_distinct() {
        let a = file_token();
        let b = file_token();
        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
    }
}
