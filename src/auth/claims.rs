//! JWT claims.

use serde::{Deserialize, Serialize};

/// JWT claims structure.
///
/// `sub` carries the user ID and `name` the display name, both captured at
/// login time. A connection keeps the identity it was opened with even if
/// the account is renamed later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,

    /// User's display name.
    pub name: String,

    /// Issuer.
    #[serde(default)]
    pub iss: Option<String>,

    /// Audience.
    #[serde(default)]
    pub aud: Option<String>,

    /// Expiration time (as Unix timestamp).
    pub exp: i64,

    /// Issued at (as Unix timestamp).
    #[serde(default)]
    pub iat: Option<i64>,

    /// User's email.
    #[serde(default)]
    pub email: Option<String>,
}

impl Claims {
    /// Get the display name for the user, falling back to the subject.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.sub
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let claims = Claims {
            sub: "usr_123".to_string(),
            name: String::new(),
            iss: None,
            aud: None,
            exp: 0,
            iat: None,
            email: None,
        };
        assert_eq!(claims.display_name(), "usr_123");

        let named = Claims {
            name: "Alice".to_string(),
            ..claims
        };
        assert_eq!(named.display_name(), "Alice");
    }
}
