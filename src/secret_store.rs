//! OS secret store lookup for provider credentials.

use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Looks up a stored secret by service name and account.
pub trait SecretStore: Send + Sync {
    /// Return the secret, or `None` on any failure.
    fn lookup(&self, service: &str, account: Option<&str>) -> Option<String>;
}

/// Secret store backed by the macOS `security` command-line tool.
#[derive(Debug, Clone)]
pub struct KeychainStore {
    program: PathBuf,
}

impl KeychainStore {
    /// Use a different executable in place of `security`.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::with_program("security")
    }
}

impl SecretStore for KeychainStore {
    fn lookup(&self, service: &str, account: Option<&str>) -> Option<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(["find-generic-password", "-s", service]);
        if let Some(account) = account {
            cmd.args(["-a", account]);
        }
        cmd.arg("-w").stdin(Stdio::null()).stderr(Stdio::null());

        let secret = cmd
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if secret.is_none() {
            tracing::debug!(service, "no keychain entry found");
        }
        secret
    }
}

/// A secret store that never has anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSecretStore;

impl SecretStore for NoSecretStore {
    fn lookup(&self, _service: &str, _account: Option<&str>) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_treated_as_absent() {
        let store = KeychainStore::with_program("/nonexistent/bin/security");
        assert_eq!(store.lookup("story-train-openrouter", Some("someone")), None);
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_treated_as_absent() {
        let store = KeychainStore::with_program("false");
        assert_eq!(store.lookup("story-train-openrouter", None), None);
    }

    #[cfg(unix)]
    #[test]
    fn program_output_is_trimmed() {
        // `echo` prints its arguments, which stands in for the stored password.
        let store = KeychainStore::with_program("echo");
        assert_eq!(
            store.lookup("svc", Some("me")).as_deref(),
            Some("find-generic-password -s svc -a me -w")
        );
    }

    #[test]
    fn no_store_is_empty() {
        assert_eq!(NoSecretStore.lookup("anything", None), None);
    }
}
