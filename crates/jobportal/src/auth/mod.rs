//! Explicit session handling for the hosted identity collaborator.
//!
//! The portal never verifies credentials itself: sign-in is delegated to the
//! identity gateway, and the resulting [`AuthSession`] is the object every
//! gated operation receives. The in-memory [`SessionStore`] is created at
//! application start, refreshed on sign-in/out events, and torn down with the
//! process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::BackendClient;

/// Identifier wrapper for portal users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// A resolved sign-in: the session object passed to every gated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: String,
    pub token: String,
    pub signed_in_at: DateTime<Utc>,
}

/// Credentials forwarded verbatim to the identity collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("missing or revoked session token")]
    Unauthenticated,
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Identity backing for sign-in, selected by configuration.
///
/// `Stub` stands in for the hosted provider in environments without a
/// backend; it accepts any well-formed credentials and derives a stable user
/// id from the email address.
pub enum IdentityGateway {
    Remote(Arc<BackendClient>),
    Stub,
}

impl IdentityGateway {
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(UserId, String), AuthError> {
        let email = credentials.email.trim().to_ascii_lowercase();
        if email.is_empty() || !email.contains('@') || credentials.password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        match self {
            IdentityGateway::Remote(client) => {
                let user = client
                    .sign_in(credentials)
                    .await
                    .map_err(|err| AuthError::ProviderUnavailable(err.to_string()))?;
                Ok((UserId(user.id), user.email))
            }
            IdentityGateway::Stub => Ok((UserId(email.clone()), email)),
        }
    }
}

/// In-memory bearer-token registry for live sessions.
#[derive(Default, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, AuthSession>>>,
}

impl SessionStore {
    pub fn issue(&self, user_id: UserId, email: String, now: DateTime<Utc>) -> AuthSession {
        let session = AuthSession {
            user_id,
            email,
            token: Uuid::new_v4().to_string(),
            signed_in_at: now,
        };
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(session.token.clone(), session.clone());
        session
    }

    pub fn resolve(&self, token: &str) -> Option<AuthSession> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        guard.get(token).cloned()
    }

    /// Tears the session down; returns false when the token was already gone.
    pub fn revoke(&self, token: &str) -> bool {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn issued_sessions_resolve_until_revoked() {
        let store = SessionStore::default();
        let session = store.issue(
            UserId("candidate@example.com".into()),
            "candidate@example.com".into(),
            now(),
        );

        let resolved = store.resolve(&session.token).expect("session resolves");
        assert_eq!(resolved.user_id, session.user_id);

        assert!(store.revoke(&session.token));
        assert!(store.resolve(&session.token).is_none());
        assert!(!store.revoke(&session.token));
    }

    #[tokio::test]
    async fn stub_gateway_rejects_malformed_credentials() {
        let gateway = IdentityGateway::Stub;
        let err = gateway
            .sign_in(&Credentials {
                email: "not-an-email".into(),
                password: "secret".into(),
            })
            .await
            .expect_err("email without @ is rejected");
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn stub_gateway_derives_a_stable_user_id() {
        let gateway = IdentityGateway::Stub;
        let (first, _) = gateway
            .sign_in(&Credentials {
                email: "Candidate@Example.com".into(),
                password: "secret".into(),
            })
            .await
            .expect("sign-in succeeds");
        let (second, email) = gateway
            .sign_in(&Credentials {
                email: "candidate@example.com ".into(),
                password: "other".into(),
            })
            .await
            .expect("sign-in succeeds");
        assert_eq!(first, second);
        assert_eq!(email, "candidate@example.com");
    }
}
