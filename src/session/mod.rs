//! Per-request technician identity.
//!
//! Login issues a signed token carrying the technician's routing attributes;
//! [`RequireLogin`] verifies it in front of every protected route and stores
//! the resulting [`SessionContext`] in the request extensions. The context is
//! never modified after login.

mod guard;

pub use self::guard::RequireLogin;

use crate::{error::AuthError, models::technicians::Technician};
use actix_web::{
    cookie::{time, Cookie, SameSite},
    dev::Payload,
    http::header::{HeaderMap, AUTHORIZATION},
    FromRequest, HttpMessage, HttpRequest,
};
use anyhow::Context;
use blake2::{digest::Mac, Blake2b512, Blake2bMac512, Digest};
use chrono::{DateTime, Utc};
use futures_util::future::{ready, Ready};
use serde::{Deserialize, Serialize};

pub const SESSION_COOKIE: &str = "login_token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub technician_id: i32,
    pub technician_name: String,
    #[serde(default)]
    pub technician_expertise: Option<String>,
    #[serde(default)]
    pub technician_location: Option<String>,
}

impl From<&Technician> for SessionContext {
    fn from(technician: &Technician) -> Self {
        Self {
            technician_id: technician.id,
            technician_name: technician.name.clone(),
            technician_expertise: Some(technician.expertise.clone()),
            technician_location: Some(technician.location.clone()),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<SessionContext>()
                .cloned()
                .ok_or(AuthError::NotAuthenticated),
        )
    }
}

#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    context: SessionContext,
    issued_at: i64,
}

/// Signs and verifies session tokens of the form `<payload_hex>.<mac_hex>`,
/// where the payload is the JSON encoded context plus its issue time and the
/// MAC is keyed BLAKE2b.
#[derive(Clone)]
pub struct SessionKeys {
    mac: Blake2bMac512,
    max_age_secs: i64,
}

impl SessionKeys {
    pub fn new(secret: &[u8], max_age_secs: i64) -> anyhow::Result<Self> {
        // BLAKE2b keys are capped at 64 bytes; derive one from the secret.
        let key = Blake2b512::digest(secret);
        let mac = <Blake2bMac512 as Mac>::new_from_slice(&key).context("session key")?;
        Ok(Self { mac, max_age_secs })
    }

    pub fn max_age_secs(&self) -> i64 {
        self.max_age_secs
    }

    pub fn issue(&self, context: &SessionContext, now: DateTime<Utc>) -> anyhow::Result<String> {
        let claims = Claims {
            context: context.clone(),
            issued_at: now.timestamp(),
        };
        let payload = serde_json::to_vec(&claims).context("session encoding")?;
        let mut mac = self.mac.clone();
        mac.update(&payload);
        let tag = mac.finalize().into_bytes();
        Ok(format!("{}.{}", hex::encode(&payload), hex::encode(tag)))
    }

    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<SessionContext, AuthError> {
        let (payload_hex, tag_hex) = token.split_once('.').ok_or(AuthError::NotAuthenticated)?;
        let payload = hex::decode(payload_hex).map_err(|_| AuthError::NotAuthenticated)?;
        let tag = hex::decode(tag_hex).map_err(|_| AuthError::NotAuthenticated)?;

        let mut mac = self.mac.clone();
        mac.update(&payload);
        mac.verify_slice(&tag)
            .map_err(|_| AuthError::NotAuthenticated)?;

        let claims: Claims =
            serde_json::from_slice(&payload).map_err(|_| AuthError::NotAuthenticated)?;
        let age = now.timestamp() - claims.issued_at;
        if age < 0 || age > self.max_age_secs {
            return Err(AuthError::Expired);
        }
        Ok(claims.context)
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}
