use anyhow::{Context, Result};

const DEFAULT_AUDIENCE: &str = "authenticated";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub auth: AuthConfig,
}

/// Identity-provider settings used to verify bearer tokens
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub provider_url: Option<String>,
    pub jwks_url: Option<String>,
    pub audience: String,
    pub jwt_secret: Option<String>,
    pub service_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let auth = AuthConfig {
            provider_url: optional_var("AUTH_PROVIDER_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            jwks_url: optional_var("AUTH_JWKS_URL"),
            audience: optional_var("AUTH_AUDIENCE").unwrap_or_else(|| DEFAULT_AUDIENCE.to_string()),
            jwt_secret: optional_var("AUTH_JWT_SECRET"),
            service_key: optional_var("AUTH_SERVICE_KEY"),
        };

        if auth.jwt_secret.is_none() && auth.jwks_url().is_none() {
            anyhow::bail!("Either AUTH_JWT_SECRET, AUTH_JWKS_URL or AUTH_PROVIDER_URL must be set");
        }

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: match optional_var("DATABASE_MAX_CONNECTIONS") {
                Some(value) => value
                    .parse()
                    .context("DATABASE_MAX_CONNECTIONS must be a number")?,
                None => DEFAULT_MAX_CONNECTIONS,
            },
            auth,
        })
    }
}

impl AuthConfig {
    /// Explicit JWKS location, or the provider's well-known path
    pub fn jwks_url(&self) -> Option<String> {
        self.jwks_url.clone().or_else(|| {
            self.provider_url
                .as_ref()
                .map(|base| format!("{}/auth/v1/.well-known/jwks.json", base))
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_config(provider_url: Option<&str>, jwks_url: Option<&str>) -> AuthConfig {
        AuthConfig {
            provider_url: provider_url.map(String::from),
            jwks_url: jwks_url.map(String::from),
            audience: DEFAULT_AUDIENCE.to_string(),
            jwt_secret: None,
            service_key: None,
        }
    }

    #[test]
    fn test_jwks_url_derived_from_provider() {
        let config = auth_config(Some("https://project.example.co"), None);
        assert_eq!(
            config.jwks_url().as_deref(),
            Some("https://project.example.co/auth/v1/.well-known/jwks.json")
        );
    }

    #[test]
    fn test_explicit_jwks_url_wins() {
        let config = auth_config(Some("https://project.example.co"), Some("https://keys.example.co"));
        assert_eq!(config.jwks_url().as_deref(), Some("https://keys.example.co"));
        assert!(auth_config(None, None).jwks_url().is_none());
    }
}
