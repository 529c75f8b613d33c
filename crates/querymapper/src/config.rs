//! Named-key configuration resolved from the process environment.

use std::collections::HashMap;

/// Immutable snapshot of configuration keys.
///
/// Connection parameters are looked up by name (`MYSQL_DSN`,
/// `SQLITE_DSN`, ...) against this snapshot, never against the live
/// environment, so a builder's configuration is fixed at construction.
#[derive(Clone, Debug, Default)]
pub struct Config {
    vars: HashMap<String, String>,
}

impl Config {
    /// Capture the process environment, overlaying any `.env` file first.
    ///
    /// A missing `.env` file is fine; only the process environment is
    /// required.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let config: Config = [("SQLITE_DSN", "sqlite::memory:")].into_iter().collect();
        assert_eq!(config.get("SQLITE_DSN"), Some("sqlite::memory:"));
        assert_eq!(config.get("MYSQL_DSN"), None);
    }
}
