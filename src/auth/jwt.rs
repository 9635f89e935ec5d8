use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{
    auth::claims::{Claims, Identity},
    config::JwtConfig,
};

/// Lifetime of a session token, counted from issuance.
pub const SESSION_TTL: Duration = Duration::hours(24);

/// Signing and verification keys for session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
}

impl SessionKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        }
    }

    pub fn issue(&self, identity: &Identity) -> anyhow::Result<String> {
        self.issue_at(identity, OffsetDateTime::now_utc())
    }

    pub fn issue_at(&self, identity: &Identity, now: OffsetDateTime) -> anyhow::Result<String> {
        let exp = now + SESSION_TTL;
        let claims = Claims {
            sub: identity.id,
            username: identity.username.clone(),
            iat: now.unix_timestamp().max(0) as usize,
            exp: exp.unix_timestamp().max(0) as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = identity.id, "session token signed");
        Ok(token)
    }

    /// Malformed, expired, foreign and tampered tokens all resolve to `None`.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = data.claims.sub, "session token verified");
                Some(data.claims.into())
            }
            Err(e) => {
                debug!(error = %e, "session token rejected");
                None
            }
        }
    }
}
