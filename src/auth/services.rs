use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::dto::{AuthState, User};
use crate::storage::{KeyValueStore, USER_KEY};

/// Holds the current user and mirrors it to the key-value store.
///
/// There is no credential check: any non-empty email/password pair signs in.
pub struct IdentityStore {
    kv: Arc<dyn KeyValueStore>,
    state: watch::Sender<AuthState>,
}

/// Login identifiers are stable per email so two accounts never share one.
pub(crate) fn login_user_id(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("mailto:{normalized}").as_bytes()).to_string()
}

/// Display name for a login: the email's local part, or the whole email
/// when that part is empty.
fn local_part(email: &str) -> &str {
    match email.split('@').next() {
        Some(local) if !local.is_empty() => local,
        _ => email,
    }
}

impl IdentityStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { kv, state }
    }

    /// Restores the persisted user. Malformed data counts as signed out.
    pub fn restore(&self) {
        let next = match self.kv.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    debug!(user_id = %user.id, "restored persisted user");
                    AuthState::signed_in(user)
                }
                Err(e) => {
                    warn!(error = %e, "discarding malformed persisted user");
                    AuthState::signed_out()
                }
            },
            Ok(None) => AuthState::signed_out(),
            Err(e) => {
                warn!(error = %e, "failed to read persisted user");
                AuthState::signed_out()
            }
        };
        self.state.send_replace(next);
    }

    pub fn login(&self, email: &str, password: &str) -> bool {
        self.begin();
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return self.fail("Email and password are required");
        }
        let user = User {
            id: login_user_id(email),
            name: local_part(email).to_string(),
            email: email.to_string(),
        };
        info!(user_id = %user.id, "user logged in");
        self.sign_in(user);
        true
    }

    pub fn signup(&self, name: &str, email: &str, password: &str) -> bool {
        self.begin();
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return self.fail("Name, email, and password are required");
        }
        let user = User {
            id: Uuid::now_v7().to_string(),
            name: name.to_string(),
            email: email.to_string(),
        };
        info!(user_id = %user.id, "user signed up");
        self.sign_in(user);
        true
    }

    pub fn logout(&self) {
        if let Err(e) = self.kv.remove(USER_KEY) {
            warn!(error = %e, "failed to remove persisted user");
        }
        if let Some(user) = self.user() {
            info!(user_id = %user.id, "user logged out");
        }
        self.state.send_replace(AuthState::signed_out());
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.borrow().user.as_ref().map(|u| u.id.clone())
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });
    }

    fn fail(&self, msg: &str) -> bool {
        warn!(reason = msg, "authentication rejected");
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(msg.to_string());
        });
        false
    }

    fn sign_in(&self, user: User) {
        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.kv.set(USER_KEY, &json) {
                    warn!(error = %e, "failed to persist user");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize user"),
        }
        self.state.send_replace(AuthState::signed_in(user));
    }
}
