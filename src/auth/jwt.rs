use std::time::Duration;

use anyhow::Context;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::config::JwtConfig;

/// Signing and verification keys for bearer tokens.
///
/// Built once at start-up from [`JwtConfig`] and shared read-only behind an
/// `Arc`. Changing the secret invalidates every token issued with the old one.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl JwtKeys {
    pub fn from_config(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl: Duration::from_secs((config.ttl_minutes.max(0) as u64) * 60),
        }
    }

    fn sign_at(&self, account_id: i64, now: OffsetDateTime) -> anyhow::Result<String> {
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(account_id, "jwt signed");
        Ok(token)
    }

    /// Issues a token for `account_id` expiring one TTL from now.
    pub fn issue(&self, account_id: i64) -> anyhow::Result<String> {
        self.sign_at(account_id, OffsetDateTime::now_utc())
    }

    /// Checks signature, issuer, audience and expiry and returns the bound account ID.
    ///
    /// Whether that account still exists is left to the caller.
    pub fn validate(&self, token: &str) -> anyhow::Result<i64> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        let account_id = data
            .claims
            .sub
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .context("malformed subject claim")?;
        debug!(account_id, "jwt verified");
        Ok(account_id)
    }
}
