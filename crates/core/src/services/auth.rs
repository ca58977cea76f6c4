//! Bearer token verification.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use quill_common::{
    AppError, AppResult,
    config::{AuthConfig, JwtAlgorithm},
};
use serde::{Deserialize, Serialize};

/// Display name used when the token carries none.
pub const ANONYMOUS_DISPLAY_NAME: &str = "Anonymous User";

/// A verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable subject identifier issued by the provider.
    pub subject: String,
    pub name: String,
    pub email: String,
}

/// Turns a bearer credential into an [`Identity`].
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify `token`, failing with [`AppError::Unauthorized`] when it is invalid.
    async fn verify(&self, token: &str) -> AppResult<Identity>;
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl Claims {
    fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim)
            && !name.is_empty()
        {
            return name.to_string();
        }

        let full = format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() {
            ANONYMOUS_DISPLAY_NAME.to_string()
        } else {
            full.to_string()
        }
    }

    fn into_identity(self) -> Identity {
        Identity {
            name: self.display_name(),
            email: self.email.unwrap_or_default(),
            subject: self.sub,
        }
    }
}

/// Verifies JWTs signed with a shared secret (HS256) or an RSA key (RS256).
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    /// Build a provider from the `auth` configuration section.
    pub fn from_config(config: &AuthConfig) -> AppResult<Self> {
        let (key, algorithm) = match config.algorithm {
            JwtAlgorithm::Hs256 => {
                let secret = config.jwt_secret.as_deref().ok_or_else(|| {
                    AppError::Config("auth.jwt_secret is required for HS256".to_string())
                })?;
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            JwtAlgorithm::Rs256 => {
                let pem = config.jwt_public_key.as_deref().ok_or_else(|| {
                    AppError::Config("auth.jwt_public_key is required for RS256".to_string())
                })?;
                let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AppError::Config(format!("Invalid auth.jwt_public_key: {e}")))?;
                (key, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &config.audience {
            validation.set_audience(&[audience]);
        } else {
            validation.validate_aud = false;
        }

        Ok(Self { key, validation })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, token: &str) -> AppResult<Identity> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized
        })?;

        Ok(data.claims.into_identity())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn hs256_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: Some(SECRET.to_string()),
            issuer: Some("https://issuer.test".to_string()),
            ..AuthConfig::default()
        }
    }

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn test_verify_valid_token() {
        let provider = JwtIdentityProvider::from_config(&hs256_config()).unwrap();
        let token = sign(
            &json!({
                "sub": "abc",
                "iss": "https://issuer.test",
                "exp": exp(),
                "first_name": "Ada",
                "last_name": "Lovelace",
                "email": "ada@example.com",
            }),
            SECRET,
        );

        let identity = provider.verify(&token).await.unwrap();

        assert_eq!(identity.subject, "abc");
        assert_eq!(identity.name, "Ada Lovelace");
        assert_eq!(identity.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_missing_names_fall_back_to_anonymous() {
        let provider = JwtIdentityProvider::from_config(&hs256_config()).unwrap();
        let token = sign(
            &json!({ "sub": "abc", "iss": "https://issuer.test", "exp": exp() }),
            SECRET,
        );

        let identity = provider.verify(&token).await.unwrap();
        assert_eq!(identity.name, ANONYMOUS_DISPLAY_NAME);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_unauthorized() {
        let provider = JwtIdentityProvider::from_config(&hs256_config()).unwrap();
        let token = sign(
            &json!({ "sub": "abc", "iss": "https://issuer.test", "exp": exp() }),
            "other-secret",
        );

        let result = provider.verify(&token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_wrong_issuer_is_unauthorized() {
        let provider = JwtIdentityProvider::from_config(&hs256_config()).unwrap();
        let token = sign(
            &json!({ "sub": "abc", "iss": "https://evil.test", "exp": exp() }),
            SECRET,
        );

        assert!(provider.verify(&token).await.is_err());
    }

    #[test]
    fn test_missing_secret_is_config_error() {
        let result = JwtIdentityProvider::from_config(&AuthConfig::default());
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
