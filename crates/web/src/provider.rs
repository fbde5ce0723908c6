use crate::config::AuthConfig;

/// Admin client for the identity provider, used to remove provider-side
/// accounts alongside local ones
#[derive(Clone)]
pub struct ProviderAdmin {
    client: reqwest::Client,
    base_url: Option<String>,
    service_key: Option<String>,
}

impl ProviderAdmin {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.provider_url.clone(),
            service_key: config.service_key.clone(),
        }
    }

    /// A client that never calls out
    pub fn disabled() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: None,
            service_key: None,
        }
    }

    fn delete_url(&self, external_id: &str) -> Option<String> {
        let base = self.base_url.as_deref()?;
        self.service_key.as_ref()?;
        Some(format!("{}/auth/v1/admin/users/{}", base, external_id))
    }

    /// Delete the provider account for `external_id`. Failures are logged and
    /// otherwise ignored so the local deletion still goes ahead.
    pub async fn delete_account(&self, external_id: &str) {
        let (Some(url), Some(key)) = (self.delete_url(external_id), self.service_key.as_deref())
        else {
            tracing::debug!("Provider admin access not configured, skipping account deletion");
            return;
        };

        let result = self
            .client
            .delete(&url)
            .bearer_auth(key)
            .header("apikey", key)
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => tracing::info!(%external_id, "Deleted identity provider account"),
            Err(e) => tracing::error!(%external_id, "Failed to delete identity provider account: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider_url: Option<&str>, service_key: Option<&str>) -> AuthConfig {
        AuthConfig {
            provider_url: provider_url.map(String::from),
            jwks_url: None,
            audience: "authenticated".to_string(),
            jwt_secret: Some("secret".to_string()),
            service_key: service_key.map(String::from),
        }
    }

    #[test]
    fn test_delete_url_requires_provider_and_key() {
        let admin = ProviderAdmin::from_config(&config(Some("https://auth.example.co"), Some("key")));
        assert_eq!(
            admin.delete_url("abc").as_deref(),
            Some("https://auth.example.co/auth/v1/admin/users/abc")
        );

        assert!(ProviderAdmin::from_config(&config(Some("https://auth.example.co"), None))
            .delete_url("abc")
            .is_none());
        assert!(ProviderAdmin::from_config(&config(None, Some("key")))
            .delete_url("abc")
            .is_none());
        assert!(ProviderAdmin::disabled().delete_url("abc").is_none());
    }
}
