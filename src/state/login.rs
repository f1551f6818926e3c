/// Login form: the admin pastes the access token issued by the service.
use tracing::error;

use super::session::{Credential, SessionStore};

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub token: String,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&mut self, token: String) {
        self.token = token;
        self.error = None;
    }

    /// Store the entered token in the session slot.
    /// Returns true when the admin view may be entered.
    pub fn submit(&mut self, store: &dyn SessionStore) -> bool {
        let token = self.token.trim();
        if token.is_empty() {
            self.error = Some("Please enter an access token".to_string());
            return false;
        }

        match store.set(&Credential::new(token)) {
            Ok(()) => {
                self.token.clear();
                self.error = None;
                true
            }
            Err(e) => {
                error!("Error saving session credential: {e}");
                self.error = Some("Could not save the session".to_string());
                false
            }
        }
    }
}
