mod common;

use axum::extract::State;

use shoe_store_api::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_database_connectivity() -> anyhow::Result<()> {
    let Some(state) = common::try_state().await? else {
        return Ok(());
    };

    let response = health_check(State(state)).await.expect("database reachable");

    // The payload fields are private to the handler; assert on the wire shape.
    let body = serde_json::to_value(&response.0)?;
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["message"], serde_json::json!("API is operational"));
    assert_eq!(body["data"]["status"], serde_json::json!("OK"));
    assert_eq!(body["data"]["database"], serde_json::json!("Connected"));

    // Envelope timestamps are `YYYY-MM-DD HH:MM:SS`.
    let stamp = body["timestamp"].as_str().expect("timestamp is a string");
    assert_eq!(stamp.len(), 19);
    assert_eq!(&stamp[10..11], " ");

    Ok(())
}
