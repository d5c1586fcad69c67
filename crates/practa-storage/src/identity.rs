//! Identity source used to compute storage namespaces

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendered prefix of anonymous user ids
pub const ANONYMOUS_PREFIX: &str = "anon-";

/// Who the stored data belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserId {
    /// Authenticated subject identifier
    Authenticated {
        /// Subject as issued by the identity provider
        subject: String,
    },
    /// Signed-out user, identified by a stable per-device id
    Anonymous {
        /// Stable device identifier
        device_id: String,
    },
}

impl UserId {
    /// Authenticated user
    #[inline]
    #[must_use]
    pub fn authenticated(subject: impl Into<String>) -> Self {
        Self::Authenticated {
            subject: subject.into(),
        }
    }

    /// Anonymous user on a given device
    #[inline]
    #[must_use]
    pub fn anonymous(device_id: impl Into<String>) -> Self {
        Self::Anonymous {
            device_id: device_id.into(),
        }
    }

    /// Check if this is a device-scoped anonymous user
    #[inline]
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous { .. })
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated { subject } => f.write_str(subject),
            Self::Anonymous { device_id } => write!(f, "{ANONYMOUS_PREFIX}{device_id}"),
        }
    }
}

/// Supplies the current user; consulted each time a storage handle is scoped
pub trait IdentitySource: Send + Sync {
    /// Current user
    fn current_user(&self) -> UserId;
}

/// Fixed identity
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user: UserId,
}

impl StaticIdentity {
    /// Always report `user`
    #[inline]
    #[must_use]
    pub fn new(user: UserId) -> Self {
        Self { user }
    }
}

impl IdentitySource for StaticIdentity {
    fn current_user(&self) -> UserId {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_renders_with_prefix() {
        assert_eq!(UserId::anonymous("abc123").to_string(), "anon-abc123");
        assert_eq!(UserId::authenticated("user_42").to_string(), "user_42");
    }

    #[test]
    fn static_identity_is_stable() {
        let identity = StaticIdentity::new(UserId::anonymous("d"));
        assert_eq!(identity.current_user(), identity.current_user());
        assert!(identity.current_user().is_anonymous());
    }
}
