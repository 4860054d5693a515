use serde::{Deserialize, Serialize};

/// The only principal this service knows about.
pub const ADMIN_SUBJECT: &str = "admin";

/// JWT claims carried by admin tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
