use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "bodega")]
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub role: String,
    /// Seconds until the token expires.
    pub expires_in: usize,
}

impl LoginResponse {
    pub fn new(access_token: String, role: Role, expires_in: usize) -> Self {
        Self {
            access_token,
            role: role.to_string(),
            expires_in,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: u8, // role id
    pub exp: usize,
    pub jti: String,
}
