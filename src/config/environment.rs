//! Deployment environment, used to pick the configuration overlay file.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    /// Variable read by [`Environment::from_env`].
    pub const ENV_VAR: &'static str = "CATALOG_APP_ENV";

    const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Test,
        Environment::Staging,
        Environment::Production,
    ];

    /// Reads `CATALOG_APP_ENV`. Unset or unknown values mean development.
    pub fn from_env() -> Self {
        std::env::var(Self::ENV_VAR)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    fn short_alias(&self) -> Option<&'static str> {
        match self {
            Environment::Development => Some("dev"),
            Environment::Staging => Some("stage"),
            Environment::Production => Some("prod"),
            Environment::Test => None,
        }
    }

    /// Name of the overlay file layered over `default.toml`.
    pub fn overlay_file(&self) -> String {
        format!("{}.toml", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    /// Case-insensitive; accepts the full name or its short alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|env| env.as_str() == wanted || env.short_alias() == Some(wanted.as_str()))
            .ok_or_else(|| {
                ConfigError::EnvVarError(format!(
                    "Invalid environment '{}'. Valid values are: development, test, staging, production",
                    s
                ))
            })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        let cases = [
            ("development", Environment::Development),
            ("DEV", Environment::Development),
            ("test", Environment::Test),
            ("Staging", Environment::Staging),
            ("stage", Environment::Staging),
            (" production ", Environment::Production),
            ("prod", Environment::Production),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<Environment>().unwrap(), expected, "{}", input);
        }
        assert!("qa".parse::<Environment>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for env in Environment::ALL {
            assert_eq!(env.to_string().parse::<Environment>().unwrap(), env);
        }
    }

    #[test]
    fn test_overlay_file() {
        assert_eq!(Environment::Production.overlay_file(), "production.toml");
        assert_eq!(Environment::default().overlay_file(), "development.toml");
    }

    #[test]
    fn test_from_env() {
        use crate::config::loader::test_support::{ENV_LOCK, EnvGuard};

        let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::clean();
        assert_eq!(Environment::from_env(), Environment::Development);

        env.set(Environment::ENV_VAR, "prod");
        assert_eq!(Environment::from_env(), Environment::Production);

        env.set(Environment::ENV_VAR, "moon");
        assert_eq!(Environment::from_env(), Environment::Development);
    }
}
