use axum::response::Json;
use serde_json::{Value, json};

pub async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Monthlify API!" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
