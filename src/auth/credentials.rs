use tracing::debug;

use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::model::role::Role;

/// Decides who may open a session and with which role.
pub trait CredentialStore: Send + Sync {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role>;
}

struct Account {
    username: String,
    password_hash: String,
    role: Role,
}

/// Accounts configured through the environment, checked against argon2 hashes.
pub struct ConfiguredCredentials {
    accounts: Vec<Account>,
    /// Verified against when no account matches, so unknown usernames cost
    /// the same argon2 work as wrong passwords.
    decoy_hash: Option<String>,
}

impl ConfiguredCredentials {
    pub fn new(accounts: impl IntoIterator<Item = (String, String, Role)>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|(username, password_hash, role)| Account {
                    username,
                    password_hash,
                    role,
                })
                .collect(),
            decoy_hash: hash_password("decoy-password").ok(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new([
            (
                config.admin_username.clone(),
                config.admin_password_hash.clone(),
                Role::Admin,
            ),
            (
                config.operator_username.clone(),
                config.operator_password_hash.clone(),
                Role::Operator,
            ),
        ])
    }
}

impl CredentialStore for ConfiguredCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        let mut candidates = self
            .accounts
            .iter()
            .filter(|account| account.username == username)
            .peekable();

        if candidates.peek().is_none() {
            if let Some(decoy) = &self.decoy_hash {
                let _ = verify_password(password, decoy);
            }
            debug!("Unknown username");
            return None;
        }

        candidates
            .find(|account| match verify_password(password, &account.password_hash) {
                Ok(()) => true,
                Err(e) => {
                    debug!(error = %e, role = %account.role, "Password rejected");
                    false
                }
            })
            .map(|account| account.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    #[test]
    fn authenticates_each_configured_role() {
        let store = ConfiguredCredentials::new([
            ("admin".to_string(), hash_password("a-pass").unwrap(), Role::Admin),
            ("bodega".to_string(), hash_password("o-pass").unwrap(), Role::Operator),
        ]);

        assert_eq!(store.authenticate("admin", "a-pass"), Some(Role::Admin));
        assert_eq!(store.authenticate("bodega", "o-pass"), Some(Role::Operator));
        assert_eq!(store.authenticate("bodega", "a-pass"), None);
        assert_eq!(store.authenticate("nobody", "o-pass"), None);
    }

    #[test]
    fn unknown_username_still_runs_a_verification() {
        let store = ConfiguredCredentials::new([(
            "admin".to_string(),
            hash_password("a-pass").unwrap(),
            Role::Admin,
        )]);

        let decoy = store.decoy_hash.as_deref().unwrap();
        assert!(decoy.starts_with("$argon2"));
        assert!(verify_password("a-pass", decoy).is_err());
        assert_eq!(store.authenticate("ghost", "a-pass"), None);
        assert_eq!(store.authenticate("ghost", "decoy-password"), None);
    }
}
