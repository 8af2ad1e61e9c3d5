use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

use crate::{model::role::Role, models::Claims};

fn now() -> usize {
    usize::try_from(Utc::now().timestamp()).unwrap_or_default()
}

pub fn generate_access_token(
    username: &str,
    role: Role,
    secret: &str,
    ttl: usize,
) -> Result<String, Error> {
    let claims = Claims {
        sub: username.to_string(),
        role: role.id(),
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = generate_access_token("bodega", Role::Operator, "secret", 60).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "bodega");
        assert_eq!(Role::from_id(claims.role), Some(Role::Operator));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token("bodega", Role::Admin, "secret", 60).unwrap();
        assert!(verify_token(&token, "another").is_err());
    }
}
