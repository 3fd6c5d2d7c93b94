//! HS256 bearer-token verification.
//!
//! Tokens carry the user id, role, and display name as claims; whatever the
//! token asserts is what the rest of the system acts on. Every rejection
//! maps to `Unauthorized` so callers cannot distinguish a bad signature
//! from an expired or malformed token.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use domains::{Actor, DomainError, IdentityProvider, Result, Role};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a UUID string.
    pub sub: String,
    /// Role spelling: "user", "moderator", or "admin".
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

pub struct JwtIdentityProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Mints a token for `actor`, valid for `ttl`. Used by the seed tool and
    /// by tests; the login service is the normal issuer.
    pub fn issue(
        &self,
        actor: &Actor,
        ttl: Duration,
    ) -> std::result::Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: actor.id.to_string(),
            role: actor.role.to_string(),
            name: actor.name.clone(),
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn authenticate(&self, bearer_token: &str) -> Result<Actor> {
        let data = decode::<Claims>(bearer_token, &self.decoding, &self.validation)
            .map_err(|err| {
                debug!(error = %err, "token rejected");
                DomainError::Unauthorized("Unauthorized".to_string())
            })?;

        let id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| DomainError::Unauthorized("Unauthorized".to_string()))?;
        let role: Role = data
            .claims
            .role
            .parse()
            .map_err(|_| DomainError::Unauthorized("Unauthorized".to_string()))?;

        let mut actor = Actor::new(id, role);
        if let Some(name) = data.claims.name {
            actor = actor.with_name(name);
        }
        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "quartermaster-test-secret";

    #[test]
    fn issued_token_round_trips() {
        let provider = JwtIdentityProvider::new(SECRET);
        let actor = Actor::new(Uuid::new_v4(), Role::Admin).with_name("Captain Ahab".into());

        let token = provider.issue(&actor, Duration::hours(1)).unwrap();
        let resolved = provider.authenticate(&token).unwrap();

        assert_eq!(resolved, actor);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let provider = JwtIdentityProvider::new(SECRET);
        let actor = Actor::new(Uuid::new_v4(), Role::User);

        // Well past the default validation leeway.
        let token = provider.issue(&actor, Duration::hours(-2)).unwrap();
        let err = provider.authenticate(&token).unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[test]
    fn foreign_secret_is_unauthorized() {
        let ours = JwtIdentityProvider::new(SECRET);
        let theirs = JwtIdentityProvider::new("some-other-secret");
        let actor = Actor::new(Uuid::new_v4(), Role::User);

        let token = theirs.issue(&actor, Duration::hours(1)).unwrap();
        assert!(matches!(
            ours.authenticate(&token),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn garbage_is_unauthorized() {
        let provider = JwtIdentityProvider::new(SECRET);
        assert!(matches!(
            provider.authenticate("not-a-jwt"),
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[test]
    fn unknown_role_claim_is_unauthorized() {
        let provider = JwtIdentityProvider::new(SECRET);
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: "captain".to_string(),
            name: None,
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            provider.authenticate(&token),
            Err(DomainError::Unauthorized(_))
        ));
    }
}
