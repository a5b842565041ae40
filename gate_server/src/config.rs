//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;

/// Longest accepted credential lifetime (10 years)
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus exporter address, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Security configuration
    pub security: SecurityConfig,
    /// Credential lifetimes and cookie flags
    pub tokens: TokenConfig,
}

/// Security-related configuration
#[derive(Clone)]
pub struct SecurityConfig {
    /// Access credential signing secret (required)
    pub access_secret: String,
    /// Renewal credential signing secret (required)
    pub refresh_secret: String,
    /// Password hashing pepper (required)
    pub password_pepper: String,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig").finish_non_exhaustive()
    }
}

/// Credential configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Access credential lifetime in seconds
    pub access_ttl_secs: i64,
    /// Renewal credential lifetime in seconds
    pub refresh_ttl_secs: i64,
    /// Add the `Secure` attribute to credential cookies
    pub secure_cookies: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_ttl_secs: token_gate::auth::ACCESS_TOKEN_LIFETIME_SECS,
            refresh_ttl_secs: token_gate::auth::REFRESH_TOKEN_LIFETIME_SECS,
            secure_cookies: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `metrics_bind_override` - Optional metrics address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            bind_override,
            metrics_bind_override,
        )
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(
        lookup: F,
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match bind_override {
            Some(addr) => addr,
            None => parse_opt(&lookup, "SERVER_BIND")?.unwrap_or_else(default_bind),
        };

        let metrics_bind = match metrics_bind_override {
            Some(addr) => Some(addr),
            None => parse_opt(&lookup, "METRICS_BIND")?,
        };

        // Security configuration (REQUIRED)
        let access_secret =
            lookup("JWT_SECRET_KEY").ok_or_else(|| ConfigError::MissingRequired {
                var: "JWT_SECRET_KEY".to_string(),
                hint: "Generate with: openssl rand -hex 32".to_string(),
            })?;

        let refresh_secret =
            lookup("JWT_REFRESH_SECRET_KEY").ok_or_else(|| ConfigError::MissingRequired {
                var: "JWT_REFRESH_SECRET_KEY".to_string(),
                hint: "Generate with: openssl rand -hex 32".to_string(),
            })?;

        let password_pepper =
            lookup("PASSWORD_PEPPER").ok_or_else(|| ConfigError::MissingRequired {
                var: "PASSWORD_PEPPER".to_string(),
                hint: "Generate with: openssl rand -hex 16".to_string(),
            })?;

        let defaults = TokenConfig::default();
        let tokens = TokenConfig {
            access_ttl_secs: parse_or(
                &lookup,
                "ACCESS_TOKEN_TTL_SECS",
                defaults.access_ttl_secs,
            )?,
            refresh_ttl_secs: parse_or(
                &lookup,
                "REFRESH_TOKEN_TTL_SECS",
                defaults.refresh_ttl_secs,
            )?,
            secure_cookies: parse_or(&lookup, "COOKIE_SECURE", defaults.secure_cookies)?,
        };

        let config = ServerConfig {
            bind,
            metrics_bind,
            security: SecurityConfig {
                access_secret,
                refresh_secret,
                password_pepper,
            },
            tokens,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.access_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_SECRET_KEY".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if self.security.refresh_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_SECRET_KEY".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        // Equal secrets would let an access credential verify as a renewal credential
        if self.security.access_secret == self.security.refresh_secret {
            return Err(ConfigError::Invalid {
                var: "JWT_REFRESH_SECRET_KEY".to_string(),
                reason: "Must differ from JWT_SECRET_KEY".to_string(),
            });
        }

        if self.security.password_pepper.len() < 16 {
            return Err(ConfigError::Invalid {
                var: "PASSWORD_PEPPER".to_string(),
                reason: "Must be at least 16 characters (64-bit security)".to_string(),
            });
        }

        if self.tokens.access_ttl_secs <= 0 {
            return Err(ConfigError::Invalid {
                var: "ACCESS_TOKEN_TTL_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.tokens.refresh_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid {
                var: "REFRESH_TOKEN_TTL_SECS".to_string(),
                reason: format!("Must be at most {MAX_TOKEN_TTL_SECS}"),
            });
        }

        if self.tokens.refresh_ttl_secs <= self.tokens.access_ttl_secs {
            return Err(ConfigError::Invalid {
                var: "REFRESH_TOKEN_TTL_SECS".to_string(),
                reason: format!(
                    "Must be greater than access token TTL ({})",
                    self.tokens.access_ttl_secs
                ),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

/// Parse an optional variable, rejecting values that are set but malformed
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    Ok(parse_opt(lookup, key)?.unwrap_or(default))
}

fn parse_opt<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: key.to_string(),
                reason: format!("Cannot parse '{raw}'"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("JWT_SECRET_KEY", "access_secret_for_testing_only_0123456789"),
            ("JWT_REFRESH_SECRET_KEY", "renewal_secret_for_testing_only_0123456789"),
            ("PASSWORD_PEPPER", "test_pepper_for_testing_only"),
        ]
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "JWT_SECRET_KEY".to_string(),
            hint: "Use openssl".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("JWT_SECRET_KEY"));
        assert!(msg.contains("Use openssl"));
    }

    #[test]
    fn test_defaults_applied() {
        let config = ServerConfig::from_lookup(vars(&required()), None, None).unwrap();
        assert_eq!(config.bind, "127.0.0.1:8000".parse().unwrap());
        assert_eq!(config.metrics_bind, None);
        assert_eq!(config.tokens.access_ttl_secs, 600);
        assert_eq!(config.tokens.refresh_ttl_secs, 86_400);
        assert!(!config.tokens.secure_cookies);
    }

    #[test]
    fn test_overrides_win() {
        let mut pairs = required();
        pairs.push(("SERVER_BIND", "0.0.0.0:9000"));
        let bind: SocketAddr = "127.0.0.1:7000".parse().unwrap();

        let config = ServerConfig::from_lookup(vars(&pairs), Some(bind), None).unwrap();
        assert_eq!(config.bind, bind);
    }

    #[test]
    fn test_missing_secret() {
        let err = ServerConfig::from_lookup(
            vars(&[("PASSWORD_PEPPER", "test_pepper_for_testing_only")]),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { ref var, .. } if var == "JWT_SECRET_KEY"
        ));
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let secret = "same_secret_for_both_kinds_0123456789";
        let err = ServerConfig::from_lookup(
            vars(&[
                ("JWT_SECRET_KEY", secret),
                ("JWT_REFRESH_SECRET_KEY", secret),
                ("PASSWORD_PEPPER", "test_pepper_for_testing_only"),
            ]),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { ref var, .. } if var == "JWT_REFRESH_SECRET_KEY"
        ));
    }

    #[test]
    fn test_refresh_ttl_must_exceed_access_ttl() {
        let mut pairs = required();
        pairs.push(("ACCESS_TOKEN_TTL_SECS", "600"));
        pairs.push(("REFRESH_TOKEN_TTL_SECS", "300"));

        let err = ServerConfig::from_lookup(vars(&pairs), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_ttl_above_cap_rejected() {
        let mut pairs = required();
        pairs.push(("ACCESS_TOKEN_TTL_SECS", "10000000000000"));
        pairs.push(("REFRESH_TOKEN_TTL_SECS", "20000000000000"));

        let err = ServerConfig::from_lookup(vars(&pairs), None, None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { ref var, .. } if var == "REFRESH_TOKEN_TTL_SECS"
        ));
    }

    #[test]
    fn test_ttl_cap_is_inclusive() {
        let cap = MAX_TOKEN_TTL_SECS.to_string();
        let above = (MAX_TOKEN_TTL_SECS + 1).to_string();

        let mut pairs: Vec<(&str, &str)> = required();
        pairs.push(("REFRESH_TOKEN_TTL_SECS", &cap));
        let config = ServerConfig::from_lookup(vars(&pairs), None, None).unwrap();
        assert_eq!(config.tokens.refresh_ttl_secs, MAX_TOKEN_TTL_SECS);

        pairs.pop();
        pairs.push(("REFRESH_TOKEN_TTL_SECS", &above));
        assert!(ServerConfig::from_lookup(vars(&pairs), None, None).is_err());
    }

    #[test]
    fn test_malformed_value_rejected() {
        let mut pairs = required();
        pairs.push(("COOKIE_SECURE", "maybe"));

        let err = ServerConfig::from_lookup(vars(&pairs), None, None).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "COOKIE_SECURE"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = ServerConfig::from_lookup(vars(&required()), None, None).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("access_secret_for_testing_only"));
    }
}
