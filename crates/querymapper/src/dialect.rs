//! Backend dialects and their bootstrap differences.
//!
//! The four dialects share every rendering and execution rule; they differ
//! only in which driver must be loadable, which configuration keys name
//! their connection parameters, and whether a statement runs right after
//! connecting.

use crate::config::Config;
use crate::driver::ConnectParams;
use crate::error::{MapperError, MapperResult};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    PostgreSql,
    Sqlite,
    Mssql,
}

impl Dialect {
    /// Name of the backend driver that must be loadable.
    pub fn driver_name(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::PostgreSql => "postgresql",
            Dialect::Sqlite => "sqlite",
            Dialect::Mssql => "mssql",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Dialect::MySql => "MySQL",
            Dialect::PostgreSql => "PostgreSQL",
            Dialect::Sqlite => "SQLite",
            Dialect::Mssql => "MSSQL",
        }
    }

    /// Configuration key naming the DSN.
    pub fn dsn_key(self) -> &'static str {
        match self {
            Dialect::MySql => "MYSQL_DSN",
            Dialect::PostgreSql => "POSTGRESQL_DSN",
            Dialect::Sqlite => "SQLITE_DSN",
            Dialect::Mssql => "MSSQL_DSN",
        }
    }

    /// Configuration key naming the user, for dialects that authenticate.
    pub fn user_key(self) -> Option<&'static str> {
        match self {
            Dialect::MySql => Some("MYSQL_USER"),
            Dialect::PostgreSql => Some("POSTGRESQL_USER"),
            Dialect::Sqlite => None,
            Dialect::Mssql => Some("MSSQL_USER"),
        }
    }

    /// Configuration key naming the password, for dialects that authenticate.
    pub fn password_key(self) -> Option<&'static str> {
        match self {
            Dialect::MySql => Some("MYSQL_PASSWORD"),
            Dialect::PostgreSql => Some("POSTGRESQL_PASSWORD"),
            Dialect::Sqlite => None,
            Dialect::Mssql => Some("MSSQL_PASSWORD"),
        }
    }

    /// Statement issued once right after connecting, if any.
    pub fn session_setup(self) -> Option<&'static str> {
        match self {
            Dialect::MySql => Some("SET NAMES UTF8"),
            _ => None,
        }
    }

    /// Resolve connection parameters from named configuration keys.
    ///
    /// Fails with [`MapperError::ConfigurationMissing`] before any
    /// connection attempt when a required key is absent. SQLite takes a DSN
    /// only; user and password stay empty.
    pub fn connect_params(self, config: &Config) -> MapperResult<ConnectParams> {
        let lookup = |key: &'static str| {
            config
                .get(key)
                .map(str::to_string)
                .ok_or(MapperError::ConfigurationMissing {
                    dialect: self.label(),
                    key,
                })
        };

        let dsn = lookup(self.dsn_key())?;
        let user = match self.user_key() {
            Some(key) => lookup(key)?,
            None => String::new(),
        };
        let password = match self.password_key() {
            Some(key) => lookup(key)?,
            None => String::new(),
        };
        Ok(ConnectParams {
            dsn,
            user,
            password,
        })
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapperError;

    fn full_config() -> Config {
        [
            ("MYSQL_DSN", "mysql:host=localhost;dbname=app"),
            ("MYSQL_USER", "app"),
            ("MYSQL_PASSWORD", "secret"),
            ("SQLITE_DSN", "sqlite::memory:"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_credentialed_params() {
        let params = Dialect::MySql.connect_params(&full_config()).unwrap();
        assert_eq!(params.dsn, "mysql:host=localhost;dbname=app");
        assert_eq!(params.user, "app");
        assert_eq!(params.password, "secret");
    }

    #[test]
    fn test_sqlite_is_dsn_only() {
        let params = Dialect::Sqlite.connect_params(&full_config()).unwrap();
        assert_eq!(params.dsn, "sqlite::memory:");
        assert!(params.user.is_empty());
        assert!(params.password.is_empty());
    }

    #[test]
    fn test_missing_key_names_the_key() {
        let config: Config = [("POSTGRESQL_DSN", "postgres://localhost/app")]
            .into_iter()
            .collect();
        let error = Dialect::PostgreSql.connect_params(&config).unwrap_err();
        match error {
            MapperError::ConfigurationMissing { dialect, key } => {
                assert_eq!(dialect, "PostgreSQL");
                assert_eq!(key, "POSTGRESQL_USER");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_session_setup() {
        assert_eq!(Dialect::MySql.session_setup(), Some("SET NAMES UTF8"));
        assert_eq!(Dialect::PostgreSql.session_setup(), None);
        assert_eq!(Dialect::Sqlite.session_setup(), None);
        assert_eq!(Dialect::Mssql.session_setup(), None);
    }
}
