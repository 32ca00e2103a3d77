use axum::Json;
use serde_json::json;
use serde_json::Value;

pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello world" }))
}
