use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// Uniform response wrapper. Every endpoint answers with a `success` flag,
/// a human-readable `message`, the payload under `data` and a server
/// timestamp, so clients can branch on `success` without reading the HTTP
/// status code.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: now_stamp(),
        }
    }
}

/// Envelope timestamps are second-resolution UTC, `YYYY-MM-DD HH:MM:SS`.
pub fn now_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_carries_flag_and_data() {
        let resp = ApiResponse::success("Created", serde_json::json!({ "id": 7 }));
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["success"], serde_json::json!(true));
        assert_eq!(value["message"], serde_json::json!("Created"));
        assert_eq!(value["data"]["id"], serde_json::json!(7));
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn timestamp_is_second_resolution() {
        let stamp = now_stamp();
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[13..14], ":");
    }
}
