use serde::Serialize;
use chrono::{DateTime, Utc};

#[derive(Serialize)]
pub struct PingResponse {
    pub message: String,
    pub time: DateTime<Utc>,
}
