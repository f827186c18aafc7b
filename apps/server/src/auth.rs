//! Identity resolution.
//!
//! The server acts as an OAuth2/OIDC *resource server*: an external IdP
//! performs interactive login, while this server validates bearer tokens on
//! incoming requests to learn who is searching. Search never requires a
//! token; a resolved principal only widens visibility to the caller's own
//! private documents.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use docsearch_plan::Identity;
use jsonwebtoken::jwk::{AlgorithmParameters, JwkSet};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, TokenData, Validation};
use serde::Deserialize;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::Config;

/// Caller identified by a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Owner id matched against the descriptor's owner field.
    pub subject: String,
}

impl Principal {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity::user(self.subject.clone())
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid bearer token: {0}")]
    InvalidToken(String),

    #[error("Authentication misconfigured: {0}")]
    Misconfigured(String),

    #[error("Authentication upstream error: {0}")]
    Upstream(String),
}

/// Capability yielding the optional caller identity for a request.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// `Ok(None)` means anonymous. Errors are never fatal to a search.
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Principal>, AuthError>;
}

/// Resolve the identity for a search, downgrading any failure to anonymous.
pub async fn resolve_identity(resolver: &dyn IdentityResolver, headers: &HeaderMap) -> Identity {
    match resolver.resolve(headers).await {
        Ok(Some(principal)) => principal.identity(),
        Ok(None) => Identity::Anonymous,
        Err(err) => {
            tracing::warn!(error = %err, "Identity resolution failed; continuing as anonymous");
            crate::metrics::IDENTITY_DEGRADED_TOTAL.inc();
            Identity::Anonymous
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    jwks_uri: String,
}

#[derive(Debug, Default)]
struct KeyCache {
    jwks_uri: Option<String>,
    keys: Option<(JwkSet, Instant)>,
}

/// Validates RS256 bearer tokens against the issuer's JWKS.
#[derive(Clone)]
pub struct AuthManager {
    config: Arc<Config>,
    http: reqwest::Client,
    cache: Arc<RwLock<KeyCache>>,
}

impl AuthManager {
    pub fn new(config: Arc<Config>) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.auth.oidc.http_timeout_seconds))
            .build()
            .map_err(|e| AuthError::Misconfigured(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http,
            cache: Arc::new(RwLock::new(KeyCache::default())),
        })
    }

    pub fn enabled(&self) -> bool {
        self.config.auth.enabled
    }

    /// `None` when auth is disabled or no `Authorization` header is present.
    pub async fn authenticate_headers(
        &self,
        headers: &HeaderMap,
    ) -> Result<Option<Principal>, AuthError> {
        if !self.enabled() {
            return Ok(None);
        }
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(None);
        };

        let token = value
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or_else(|| {
                AuthError::InvalidToken("Authorization header must be 'Bearer <token>'".to_string())
            })?;

        let oidc = &self.config.auth.oidc;
        let (Some(issuer), Some(audience)) = (&oidc.issuer_url, &oidc.audience) else {
            return Err(AuthError::Misconfigured(
                "auth.oidc.issuer_url and auth.oidc.audience must be set".to_string(),
            ));
        };

        let claims = self.validate(token, issuer, audience).await?.claims;
        self.principal_from_claims(&claims).map(Some)
    }

    fn principal_from_claims(&self, claims: &serde_json::Value) -> Result<Principal, AuthError> {
        let claim = self.config.auth.oidc.subject_claim.as_str();
        claims
            .get(claim)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(Principal::new)
            .ok_or_else(|| AuthError::InvalidToken(format!("Token has no '{claim}' claim")))
    }

    async fn validate(
        &self,
        token: &str,
        issuer: &str,
        audience: &str,
    ) -> Result<TokenData<serde_json::Value>, AuthError> {
        let header = decode_header(token)
            .map_err(|e| AuthError::InvalidToken(format!("Failed to decode JWT header: {e}")))?;
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidToken(format!(
                "Unsupported JWT alg '{:?}' (only RS256 is supported)",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("JWT header missing 'kid'".to_string()))?;

        let keys = self.keys().await?;
        let jwk = keys
            .find(&kid)
            .ok_or_else(|| AuthError::InvalidToken(format!("No matching JWK for kid '{kid}'")))?;
        let AlgorithmParameters::RSA(rsa) = &jwk.algorithm else {
            return Err(AuthError::InvalidToken(
                "Unsupported JWK type (only RSA keys are supported)".to_string(),
            ));
        };
        let key = DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| AuthError::InvalidToken(format!("Failed to build RSA decoding key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.leeway = 60;

        decode::<serde_json::Value>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Cached JWKS, refetched once older than `jwks_cache_ttl_seconds`.
    async fn keys(&self) -> Result<JwkSet, AuthError> {
        let ttl = Duration::from_secs(self.config.auth.oidc.jwks_cache_ttl_seconds);
        if let Some((keys, fetched_at)) = &self.cache.read().await.keys {
            if fetched_at.elapsed() <= ttl {
                return Ok(keys.clone());
            }
        }

        let uri = self.jwks_uri().await?;
        let keys: JwkSet = self.fetch_json(&uri, "JWKS").await?;
        self.cache.write().await.keys = Some((keys.clone(), Instant::now()));
        Ok(keys)
    }

    /// Configured `jwks_url`, else the issuer's discovery document.
    async fn jwks_uri(&self) -> Result<String, AuthError> {
        let oidc = &self.config.auth.oidc;
        if let Some(uri) = &oidc.jwks_url {
            return Ok(uri.clone());
        }
        if let Some(uri) = self.cache.read().await.jwks_uri.clone() {
            return Ok(uri);
        }

        let issuer = oidc.issuer_url.as_deref().ok_or_else(|| {
            AuthError::Misconfigured("auth.oidc.issuer_url is not set".to_string())
        })?;
        let url = format!(
            "{}/.well-known/openid-configuration",
            issuer.trim_end_matches('/')
        );
        let discovery: DiscoveryDocument = self.fetch_json(&url, "OIDC discovery").await?;
        self.cache.write().await.jwks_uri = Some(discovery.jwks_uri.clone());
        Ok(discovery.jwks_uri)
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        what: &str,
    ) -> Result<T, AuthError> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::Upstream(format!("{what} fetch failed: {e}")))?;
        if !res.status().is_success() {
            return Err(AuthError::Upstream(format!(
                "{what} returned HTTP {}",
                res.status()
            )));
        }
        res.json()
            .await
            .map_err(|e| AuthError::Upstream(format!("{what} JSON parse failed: {e}")))
    }
}

#[async_trait]
impl IdentityResolver for AuthManager {
    async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Principal>, AuthError> {
        self.authenticate_headers(headers).await
    }
}

fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
