use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::model::{Claims, LoginResponse, User};
use crate::service::{WordMapError, WordMapService};

impl WordMapService {
    /// Exchange an access code for a signed token and the public profile.
    pub fn login(&self, access_code: &str) -> Result<LoginResponse, WordMapError> {
        let user = self
            .find_user_by_access_code(access_code.trim())?
            .ok_or(WordMapError::InvalidCredentials)?;

        let token = self.issue_token(&user)?;
        tracing::info!(user_id = %user.id, is_admin = user.is_admin, "login");

        Ok(LoginResponse {
            token,
            user: user.public_profile(),
        })
    }

    /// Sign a token carrying the user's id and admin flag.
    pub fn issue_token(&self, user: &User) -> Result<String, WordMapError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.clone(),
            is_admin: user.is_admin,
            iat: now,
            exp: now + self.config.token_ttl,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| WordMapError::Internal(format!("JWT encode failed: {}", e)))
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, WordMapError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| WordMapError::Unauthenticated(format!("invalid token: {}", e)))
    }
}
