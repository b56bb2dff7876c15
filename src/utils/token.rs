use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

pub fn create_token(
    user_id: &str,
    secret: &[u8],
    expires_in_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    if user_id.is_empty() {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidSubject.into());
    }

    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::minutes(expires_in_minutes)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

pub fn decode_token<T: Into<String>>(
    token: T,
    secret: &[u8],
) -> Result<String, crate::error::HttpError> {
    let decoded = decode::<TokenClaims>(
        &token.into(),
        &DecodingKey::from_secret(secret),
        &Validation::new(jsonwebtoken::Algorithm::HS256),
    );

    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(_) => Err(crate::error::HttpError::unauthorized(
            crate::error::ErrorMessage::InvalidToken.to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_decode_roundtrip() {
        let secret = b"jwt-test-secret";
        let user_id = uuid::Uuid::new_v4().to_string();

        let token = create_token(&user_id, secret, 60).unwrap();
        let sub = decode_token(token, secret).unwrap();

        assert_eq!(sub, user_id);
    }

    #[test]
    fn decode_rejects_wrong_secret() {
        let token = create_token("some-user", b"secret-a", 60).unwrap();
        assert!(decode_token(token, b"secret-b").is_err());
    }
}
