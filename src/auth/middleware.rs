//! Authentication middleware and token handling.

use axum::{
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::warn;
use std::sync::Arc;

use super::{AuthConfig, AuthError, Claims};

/// Name of the query parameter carrying the credential on WebSocket
/// handshakes (browsers cannot set headers there).
const TOKEN_QUERY_PARAM: &str = "access_token";

/// Extract a Bearer token from an Authorization header value.
fn bearer_token_from_header(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }

    let token = parts.next().ok_or(AuthError::InvalidAuthHeader)?;
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    if parts.next().is_some() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Authentication state shared across handlers.
#[derive(Clone)]
pub struct AuthState {
    config: Arc<AuthConfig>,
    decoding_key: Option<DecodingKey>,
    encoding_key: Option<EncodingKey>,
}

impl AuthState {
    /// Create new auth state from config.
    /// Resolves `env:VAR_NAME` syntax in jwt_secret at construction time.
    pub fn new(mut config: AuthConfig) -> Self {
        if let Ok(Some(resolved)) = config.resolve_jwt_secret() {
            config.jwt_secret = Some(resolved);
        }

        let decoding_key = config
            .jwt_secret
            .as_ref()
            .map(|s| DecodingKey::from_secret(s.as_bytes()));
        let encoding_key = config
            .jwt_secret
            .as_ref()
            .map(|s| EncodingKey::from_secret(s.as_bytes()));

        Self {
            config: Arc::new(config),
            decoding_key,
            encoding_key,
        }
    }

    /// Get allowed CORS origins from config.
    pub fn allowed_origins(&self) -> &[String] {
        &self.config.allowed_origins
    }

    /// Validate a JWT and extract the caller identity.
    ///
    /// Pure claims check against the pre-shared key, expected issuer and
    /// audience. No network or storage access.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = self
            .decoding_key
            .as_ref()
            .ok_or_else(|| AuthError::Internal("no JWT secret configured".to_string()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_issuer(&[&self.config.issuer]);
        match &self.config.audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(token, decoding_key, &validation).map_err(|e| {
            warn!("JWT validation failed: {:?}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Issue a signed JWT for an authenticated user.
    pub fn issue_token(
        &self,
        user_id: &str,
        display_name: &str,
        email: &str,
    ) -> Result<String, AuthError> {
        let encoding_key = self
            .encoding_key
            .as_ref()
            .ok_or_else(|| AuthError::Internal("no JWT secret configured".to_string()))?;

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            name: display_name.to_string(),
            iss: Some(self.config.issuer.clone()),
            aud: self.config.audience.clone(),
            exp: now + self.config.token_ttl_secs,
            iat: Some(now),
            email: Some(email.to_string()),
        };

        encode(&Header::default(), &claims, encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User claims.
    pub claims: Claims,
}

impl CurrentUser {
    /// Get the user ID.
    pub fn id(&self) -> &str {
        &self.claims.sub
    }

    /// Get display name.
    pub fn display_name(&self) -> &str {
        self.claims.display_name()
    }
}

/// Extract authentication from request.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

/// Authentication middleware.
///
/// Validates JWT tokens and injects `CurrentUser` into request extensions.
/// Supports two auth methods in priority order:
/// 1. Authorization: Bearer <token> header
/// 2. `access_token` query parameter (for WebSocket handshakes)
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let query_token = req.uri().query().and_then(|q| {
        q.split('&').find_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next()?;
            if key == TOKEN_QUERY_PARAM {
                urlencoding::decode(value).ok().map(|s| s.into_owned())
            } else {
                None
            }
        })
    });

    let claims = if let Some(header) = auth_header {
        let token = bearer_token_from_header(header)?;
        auth.verify_token(token)?
    } else if let Some(ref token) = query_token {
        auth.verify_token(token)?
    } else {
        return Err(AuthError::MissingCredentials);
    };

    let user = CurrentUser { claims };
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth_state() -> AuthState {
        let config = AuthConfig {
            jwt_secret: Some("test-secret-for-unit-tests-minimum-32-chars-long".to_string()),
            ..AuthConfig::default()
        };
        AuthState::new(config)
    }

    #[test]
    fn test_bearer_token_from_header_valid() {
        assert_eq!(
            bearer_token_from_header("Bearer abc.def.ghi").unwrap(),
            "abc.def.ghi"
        );
        assert_eq!(
            bearer_token_from_header("bearer   token123").unwrap(),
            "token123"
        );
    }

    #[test]
    fn test_bearer_token_from_header_invalid() {
        let cases = [
            "",
            "Bearer",
            "Bearer ",
            "Token something",
            "Bearer token extra",
        ];

        for case in cases {
            assert!(
                bearer_token_from_header(case).is_err(),
                "{case} should fail"
            );
        }
    }

    #[test]
    fn test_issue_and_verify_token() {
        let auth = test_auth_state();
        let token = auth
            .issue_token("usr_1", "Alice", "alice@example.com")
            .unwrap();

        let claims = auth.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "usr_1");
        assert_eq!(claims.display_name(), "Alice");
        assert_eq!(claims.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let auth = test_auth_state();
        assert!(matches!(
            auth.verify_token("not.a.jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let config = AuthConfig {
            jwt_secret: Some("test-secret-for-unit-tests-minimum-32-chars-long".to_string()),
            token_ttl_secs: -3600,
            ..AuthConfig::default()
        };
        let auth = AuthState::new(config);

        let token = auth.issue_token("usr_1", "Alice", "a@example.com").unwrap();
        assert!(matches!(
            auth.verify_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_issuer() {
        let issuing = AuthState::new(AuthConfig {
            jwt_secret: Some("test-secret-for-unit-tests-minimum-32-chars-long".to_string()),
            issuer: "someone-else".to_string(),
            ..AuthConfig::default()
        });
        let verifying = test_auth_state();

        let token = issuing
            .issue_token("usr_1", "Alice", "a@example.com")
            .unwrap();
        assert!(verifying.verify_token(&token).is_err());
    }
}
