//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Default token lifetime: 24 hours.
const DEFAULT_TOKEN_TTL_SECS: i64 = 60 * 60 * 24;

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT secret for HS256. REQUIRED; supports `env:VAR_NAME` indirection.
    pub jwt_secret: Option<String>,

    /// Issuer written into issued tokens and required on validation.
    pub issuer: String,

    /// Audience written into issued tokens. Validated when set.
    pub audience: Option<String>,

    /// Lifetime of issued tokens in seconds.
    pub token_ttl_secs: i64,

    /// Allowed CORS origins. If empty, cross-origin requests are denied.
    pub allowed_origins: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // No default JWT secret - must be explicitly configured
            jwt_secret: None,
            issuer: "campus-connect".to_string(),
            audience: None,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
            ],
        }
    }
}

impl AuthConfig {
    /// Resolve the JWT secret, expanding `env:VAR_NAME` syntax.
    /// Returns the resolved secret or None if not configured.
    pub fn resolve_jwt_secret(&self) -> Result<Option<String>, ConfigValidationError> {
        match &self.jwt_secret {
            None => Ok(None),
            Some(value) => {
                if let Some(var_name) = value.strip_prefix("env:") {
                    match std::env::var(var_name) {
                        Ok(secret) if !secret.is_empty() => Ok(Some(secret)),
                        Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
                        Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
                    }
                } else {
                    Ok(Some(value.clone()))
                }
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let secret = self.resolve_jwt_secret()?;

        match secret {
            None => Err(ConfigValidationError::MissingJwtSecret),
            // Minimum secret length for HS256
            Some(ref secret) if secret.len() < 32 => Err(ConfigValidationError::JwtSecretTooShort),
            Some(_) => Ok(()),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("auth.jwt_secret is required")]
    MissingJwtSecret,

    #[error("auth.jwt_secret must be at least 32 characters")]
    JwtSecretTooShort,

    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("environment variable is empty: {0}")]
    EnvVarEmpty(String),
}
