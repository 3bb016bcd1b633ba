use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::ids::AdminId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub id: AdminId,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// Authentication state for one admin client. Created anonymous at startup,
/// established on login, cleared on logout or when the API answers 401.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
    admin: Option<AdminProfile>,
    initialized: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session restored from a previously stored token, not yet verified.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            admin: None,
            initialized: false,
        }
    }

    pub fn establish(&mut self, token: impl Into<String>, admin: AdminProfile) {
        self.token = Some(token.into());
        self.admin = Some(admin);
        self.initialized = true;
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.admin = None;
        self.initialized = true;
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn admin(&self) -> Option<&AdminProfile> {
        self.admin.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.admin.is_some()
    }
}

/// Shared handle given explicitly to whatever needs the session.
pub type SessionHandle = Arc<RwLock<Session>>;

pub fn shared(session: Session) -> SessionHandle {
    Arc::new(RwLock::new(session))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> AdminProfile {
        AdminProfile {
            id: AdminId::from("a1"),
            email: "me@site.dev".into(),
            name: "Me".into(),
            avatar_url: None,
        }
    }

    #[test]
    fn lifecycle() {
        let mut session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(!session.is_initialized());

        session.establish("tok", admin());
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok"));

        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.is_initialized());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn stored_token_alone_is_not_authenticated() {
        let session = Session::with_token("tok");
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), Some("tok"));
    }
}
