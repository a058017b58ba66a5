//! The acting user, passed explicitly to every operation that needs one

use crate::error::{MarketError, Result};
use crate::models::{Profile, Role, User};

/// Signed-in actor and their stored role
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<()> {
        if !self.is_admin() {
            return Err(MarketError::forbidden(format!(
                "user {} is not an admin",
                self.user.id
            )));
        }
        Ok(())
    }

    /// Session for the account a stored profile describes
    pub fn from_profile(profile: Profile) -> Self {
        Self {
            user: User::from(profile),
        }
    }
}

/// Decides the role of a new account. Consulted once, when its profile is created.
#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    admin_emails: Vec<String>,
}

impl RolePolicy {
    pub fn new(admin_emails: &[String]) -> Self {
        Self {
            admin_emails: admin_emails.iter().map(|e| e.trim().to_lowercase()).collect(),
        }
    }

    pub fn role_for(&self, email: &str) -> Role {
        let email = email.trim().to_lowercase();
        if self.admin_emails.iter().any(|admin| *admin == email) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Display name for an account without a profile: the email's local part
pub fn fallback_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
