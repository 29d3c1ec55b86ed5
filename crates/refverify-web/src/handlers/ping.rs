use axum::Json;

use crate::models::PingResponse;

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { message: "pong" })
}
