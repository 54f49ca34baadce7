use axum::{
    response::{IntoResponse, Redirect},
    Json,
};
use serde_json::{json, Value};

use crate::error::LOGIN_ENTRY_POINT;

pub async fn root() -> impl IntoResponse {
    Redirect::to(LOGIN_ENTRY_POINT)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
