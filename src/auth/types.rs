//! Authentication domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Avatar used when the identity provider supplies none.
pub const DEFAULT_AVATAR: &str = "default.jpg";

/// Which identity path created a user: local credentials or a federated
/// provider. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Local,
    Federated,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Federated => "federated",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Local => Self::Federated,
            Self::Federated => Self::Local,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "local" => Some(Self::Local),
            "federated" => Some(Self::Federated),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credential material, tagged by provenance. Local users carry a password
/// hash and no external id; federated users the reverse. The variant makes
/// that structural rather than a pair of nullable columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Local { password_hash: String },
    Federated { external_id: String },
}

impl Credential {
    pub fn provenance(&self) -> Provenance {
        match self {
            Self::Local { .. } => Provenance::Local,
            Self::Federated { .. } => Provenance::Federated,
        }
    }
}

/// A registered user. At most one user may exist per (email, provenance)
/// pair; the store enforces this with a unique constraint.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
    pub credential: Credential,
}

impl User {
    pub fn provenance(&self) -> Provenance {
        self.credential.provenance()
    }
}

/// Registration request body. Fields default to empty strings so the input
/// guard can report every missing field instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub confirm_password: String,
}

/// Local login request body.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Verified identity attributes obtained from the federated provider in
/// exchange for an authorization code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentity {
    pub external_id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_roundtrip() {
        assert_eq!(Provenance::parse("local"), Some(Provenance::Local));
        assert_eq!(Provenance::parse("federated"), Some(Provenance::Federated));
        assert_eq!(Provenance::parse("google"), None);
        assert_eq!(Provenance::Local.opposite(), Provenance::Federated);
        assert_eq!(Provenance::Federated.opposite(), Provenance::Local);
    }

    #[test]
    fn test_credential_provenance() {
        let local = Credential::Local {
            password_hash: "$2b$10$abc".into(),
        };
        let federated = Credential::Federated {
            external_id: "g-123".into(),
        };
        assert_eq!(local.provenance(), Provenance::Local);
        assert_eq!(federated.provenance(), Provenance::Federated);
    }

    #[test]
    fn test_register_request_missing_fields_default_empty() {
        let req: RegisterRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert_eq!(req.email, "a@b.c");
        assert!(req.name.is_empty());
        assert!(req.password.is_empty());
        assert!(req.confirm_password.is_empty());
    }
}
