use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{
    Algorithm, DecodingKey, Validation, decode, decode_header, errors::ErrorKind, jwk::JwkSet,
};
use serde::{Deserialize, Serialize};
use storage::{Database, error::StorageError, models::User, services::identity};
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::error::WebError;

const JWKS_LIFESPAN: Duration = Duration::from_secs(600);
const JWKS_ALGORITHMS: &[Algorithm] = &[Algorithm::ES256, Algorithm::RS256];

/// The local user behind the request's bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Claims read from a verified token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Option<String>,
    pub email: Option<String>,
    pub exp: u64,
}

#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    MalformedHeader,
    Expired,
    MissingSubject,
    InvalidToken(String),
    KeysUnavailable(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Authentication credentials were not provided."),
            Self::MalformedHeader => write!(
                f,
                "Invalid Authorization header format. Expected 'Bearer <token>'."
            ),
            Self::Expired => write!(f, "Token has expired."),
            Self::MissingSubject => write!(f, "Invalid token: User ID ('sub') not found."),
            Self::InvalidToken(reason) => write!(f, "Invalid token: {}", reason),
            Self::KeysUnavailable(_) => write!(f, "Could not authenticate token."),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(error: AuthError) -> Self {
        Self::Unauthorized(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::InvalidToken(error.to_string()),
        }
    }
}

enum KeySource {
    Secret(DecodingKey),
    Jwks(JwksCache),
}

/// Verifies identity-provider tokens against a shared secret or the
/// provider's published keys
pub struct TokenVerifier {
    source: KeySource,
    audience: String,
}

impl TokenVerifier {
    pub fn from_config(config: &AuthConfig) -> anyhow::Result<Self> {
        if let Some(secret) = &config.jwt_secret {
            return Ok(Self::from_secret(secret.as_bytes(), &config.audience));
        }

        let jwks_url = config
            .jwks_url()
            .ok_or_else(|| anyhow::anyhow!("No JWKS location configured"))?;

        Ok(Self {
            source: KeySource::Jwks(JwksCache::new(jwks_url)),
            audience: config.audience.clone(),
        })
    }

    pub fn from_secret(secret: &[u8], audience: &str) -> Self {
        Self {
            source: KeySource::Secret(DecodingKey::from_secret(secret)),
            audience: audience.to_string(),
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;

        let (key, algorithm) = match &self.source {
            KeySource::Secret(key) => (key.clone(), Algorithm::HS256),
            KeySource::Jwks(cache) => {
                if !JWKS_ALGORITHMS.contains(&header.alg) {
                    return Err(AuthError::InvalidToken(format!(
                        "unsupported algorithm {:?}",
                        header.alg
                    )));
                }
                let kid = header
                    .kid
                    .as_deref()
                    .ok_or_else(|| AuthError::InvalidToken("missing key id".to_string()))?;
                (cache.key_for(kid).await?, header.alg)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[&self.audience]);

        let claims = decode::<Claims>(token, &key, &validation)?.claims;

        match claims.sub.as_deref() {
            Some(sub) if !sub.is_empty() => Ok(claims),
            _ => Err(AuthError::MissingSubject),
        }
    }
}

/// Provider key set, refreshed after `JWKS_LIFESPAN` or on an unknown key id
struct JwksCache {
    url: String,
    client: reqwest::Client,
    cached: RwLock<Option<(Instant, JwkSet)>>,
}

impl JwksCache {
    fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
            cached: RwLock::new(None),
        }
    }

    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cached = self.cached.read().await;
            if let Some((fetched_at, keys)) = cached.as_ref()
                && fetched_at.elapsed() < JWKS_LIFESPAN
                && let Some(jwk) = keys.find(kid)
            {
                return Ok(DecodingKey::from_jwk(jwk)?);
            }
        }

        let keys = self.fetch().await?;
        let key = keys
            .find(kid)
            .map(DecodingKey::from_jwk)
            .transpose()?
            .ok_or_else(|| AuthError::InvalidToken("unknown signing key".to_string()));

        *self.cached.write().await = Some((Instant::now(), keys));
        key
    }

    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!("Refreshing signing keys from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeysUnavailable(e.to_string()))?;

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeysUnavailable(e.to_string()))
    }
}

/// Shared state for the authentication layer
#[derive(Clone)]
pub struct AuthState {
    pub db: Database,
    pub verifier: Arc<TokenVerifier>,
}

/// Extracts the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// A subject that still has no account after provisioning is an auth
/// failure, not a missing resource.
fn account_error(error: StorageError) -> WebError {
    match error {
        StorageError::NotFound => {
            AuthError::InvalidToken("no account for subject".to_string()).into()
        }
        other => other.into(),
    }
}

/// Resolves the bearer token to a local user and stores it on the request.
/// Any failure is a 401; the request never continues anonymously.
pub async fn require_auth(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(request.headers()).inspect_err(|e| {
        tracing::warn!("Rejected request without usable credentials: {}", e);
    })?;

    let claims = auth.verifier.verify(token).await.inspect_err(|e| match e {
        AuthError::KeysUnavailable(cause) => tracing::error!("Signing keys unavailable: {}", cause),
        other => tracing::warn!("Rejected bearer token: {}", other),
    })?;

    let Some(subject) = claims.sub.as_deref() else {
        return Err(AuthError::MissingSubject.into());
    };
    let user = identity::resolve_user(auth.db.pool(), subject, claims.email.as_deref())
        .await
        .map_err(account_error)?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
    };
    use http_body_util::BodyExt;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    const SECRET: &[u8] = b"test-secret";
    const AUDIENCE: &str = "authenticated";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: Option<&'a str>,
        email: Option<&'a str>,
        aud: &'a str,
        exp: u64,
    }

    fn now() -> u64 {
        jsonwebtoken::get_current_timestamp()
    }

    fn token(sub: Option<&str>, aud: &str, exp: u64) -> String {
        let claims = TestClaims {
            sub,
            email: Some("lifter@example.com"),
            aud,
            exp,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::from_secret(SECRET, AUDIENCE)
    }

    #[tokio::test]
    async fn test_valid_token_yields_claims() {
        let claims = verifier()
            .verify(&token(Some("user-1"), AUDIENCE, now() + 3600))
            .await
            .unwrap();

        assert_eq!(claims.sub.as_deref(), Some("user-1"));
        assert_eq!(claims.email.as_deref(), Some("lifter@example.com"));
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let result = verifier()
            .verify(&token(Some("user-1"), AUDIENCE, now() - 3600))
            .await;

        assert!(matches!(result, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn test_wrong_audience_is_rejected() {
        let result = verifier()
            .verify(&token(Some("user-1"), "someone-else", now() + 3600))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_wrong_secret_is_rejected() {
        let other = TokenVerifier::from_secret(b"another-secret", AUDIENCE);
        let result = other
            .verify(&token(Some("user-1"), AUDIENCE, now() + 3600))
            .await;

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_token_without_subject_is_rejected() {
        let result = verifier().verify(&token(None, AUDIENCE, now() + 3600)).await;
        assert!(matches!(result, Err(AuthError::MissingSubject)));
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let result = verifier().verify("not-a-jwt").await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_unprovisioned_subject_is_unauthorized() {
        let error = account_error(StorageError::NotFound);
        assert!(matches!(error, WebError::Unauthorized(_)));

        let error = account_error(StorageError::PermissionDenied);
        assert!(matches!(error, WebError::Storage(StorageError::PermissionDenied)));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Err(AuthError::MissingCredentials)));

        headers.insert(header::AUTHORIZATION, "Bearer abc.def".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def");

        headers.insert(header::AUTHORIZATION, "bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), "abc");

        headers.insert(header::AUTHORIZATION, "Bearer".parse().unwrap());
        assert!(matches!(bearer_token(&headers), Err(AuthError::MalformedHeader)));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());
        assert!(matches!(bearer_token(&headers), Err(AuthError::MalformedHeader)));
    }

    fn protected_app() -> Router {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let state = AuthState {
            db: Database::from_pool(pool),
            verifier: Arc::new(verifier()),
        };

        Router::new()
            .route("/", get(|| async { "ok" }))
            .route_layer(middleware::from_fn_with_state(state, require_auth))
    }

    async fn error_message(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["error"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let response = protected_app()
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            error_message(response).await,
            "Authentication credentials were not provided."
        );
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let request = HttpRequest::builder()
            .uri("/")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", token(Some("user-1"), AUDIENCE, now() - 3600)),
            )
            .body(Body::empty())
            .unwrap();

        let response = protected_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_message(response).await, "Token has expired.");
    }
}
