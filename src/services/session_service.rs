//! Session and identity gate
//!
//! Subscribes to authentication state changes, resolves the signed-in
//! identity to its stored profile and derives the authorization role once,
//! publishing it as an [`AuthorizationContext`] for every protected view.
//! Unauthenticated or under-privileged sessions are redirected to the login
//! view; ambiguous outcomes (missing profile, fetch failure) fail closed.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{
    backend::{Backend, Identity},
    constants::collections,
    models::{Role, UserProfile},
};

/// Navigation targets the gate can redirect to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

/// Seam to the embedding UI's router
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Role required to remain on the protected view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any authenticated user with a profile
    SignedIn,
    /// Admin-only views
    Admin,
}

/// Authorization derived once per session and threaded to protected views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationContext {
    pub user_id: String,
    pub role: Role,
    /// First name for greeting headers
    pub display_name: Option<String>,
}

/// State a protected view renders from.
///
/// `Checking` must render a loading indicator, never protected content;
/// this is what prevents a flash of unauthorized content while profile
/// resolution is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Checking,
    SignedOut,
    Authorized(AuthorizationContext),
}

impl SessionState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }
}

/// Session gate bound to one protected view
pub struct SessionGate;

impl SessionGate {
    /// Start the gate task. The returned handle publishes [`SessionState`]
    /// transitions on a watch channel, starting from `Checking`.
    pub fn spawn(
        backend: Backend,
        requirement: RoleRequirement,
        navigator: Arc<dyn Navigator>,
    ) -> SessionGateHandle {
        let (tx, rx) = watch::channel(SessionState::Checking);

        let task = tokio::spawn(async move {
            let mut auth_events = backend.auth().subscribe();

            loop {
                let identity = auth_events.borrow_and_update().clone();
                let state = Self::resolve(&backend, requirement, identity, &tx).await;

                if matches!(state, SessionState::SignedOut) {
                    navigator.navigate(Route::Login);
                }
                tx.send_replace(state);

                if auth_events.changed().await.is_err() {
                    break;
                }
            }
        });

        SessionGateHandle { states: rx, task }
    }

    /// Resolve one authentication event to a session state. Any failure to
    /// produce an authorized profile collapses to `SignedOut`.
    async fn resolve(
        backend: &Backend,
        requirement: RoleRequirement,
        identity: Option<Identity>,
        tx: &watch::Sender<SessionState>,
    ) -> SessionState {
        let Some(identity) = identity else {
            return SessionState::SignedOut;
        };

        // Profile fetch in flight: keep the view on its loading state.
        tx.send_replace(SessionState::Checking);

        let profile: UserProfile = match backend.store().read(collections::USERS, &identity.uid).await
        {
            Ok(Some(doc)) => match doc.into_model() {
                Ok(profile) => profile,
                Err(e) => {
                    tracing::warn!(uid = %identity.uid, error = %e, "Malformed profile; failing closed");
                    return SessionState::SignedOut;
                }
            },
            Ok(None) => {
                tracing::warn!(uid = %identity.uid, "No profile for identity; failing closed");
                return SessionState::SignedOut;
            }
            Err(e) => {
                tracing::warn!(uid = %identity.uid, error = %e, "Profile fetch failed; failing closed");
                return SessionState::SignedOut;
            }
        };

        if requirement == RoleRequirement::Admin && !profile.is_admin() {
            return SessionState::SignedOut;
        }

        SessionState::Authorized(AuthorizationContext {
            user_id: identity.uid,
            role: profile.role,
            display_name: (!profile.first_name.is_empty()).then(|| profile.first_name.clone()),
        })
    }
}

/// Handle to a running session gate
pub struct SessionGateHandle {
    states: watch::Receiver<SessionState>,
    task: JoinHandle<()>,
}

impl SessionGateHandle {
    /// Watch channel of session state transitions
    pub fn states(&self) -> watch::Receiver<SessionState> {
        self.states.clone()
    }

    /// Snapshot of the current state
    pub fn current(&self) -> SessionState {
        self.states.borrow().clone()
    }

    /// Tear the gate down, unsubscribing from authentication events. A torn
    /// down gate never updates session state again, so an unmounted view
    /// cannot be written to by a late resolution.
    pub fn shutdown(self) {
        self.task.abort();
    }
}
