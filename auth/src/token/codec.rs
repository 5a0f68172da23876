use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Encodes and decodes signed, time-bounded identity tokens.
///
/// Holds the HS256 signing secret for the lifetime of the process. Expiry is
/// checked strictly: no clock-skew leeway is granted, a token is invalid the
/// second its `exp` passes.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    validity: Duration,
}

impl TokenCodec {
    /// Create a codec from a signing secret and a token validity window.
    ///
    /// # Arguments
    /// * `secret` - HMAC secret, should be at least 32 bytes for HS256
    /// * `validity_hours` - Hours until an issued token expires
    pub fn new(secret: &[u8], validity_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            validity: Duration::hours(validity_hours),
        }
    }

    /// Issue a token for an ordinary subject.
    ///
    /// The token carries no authorities claim; authorities for end users are
    /// derived by a store lookup when the token is validated.
    ///
    /// # Errors
    /// * `EmptySubject` - Subject is empty
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.sign(subject, None)
    }

    /// Issue a token for a trusted service identity with embedded authorities.
    ///
    /// Only the reserved service subject should receive such tokens; the
    /// authentication filter trusts the embedded claim without a store lookup.
    ///
    /// # Errors
    /// * `EmptySubject` - Subject is empty
    /// * `EncodingFailed` - Signing failed
    pub fn issue_with_authorities(
        &self,
        subject: &str,
        authorities: Vec<String>,
    ) -> Result<String, TokenError> {
        self.sign(subject, Some(authorities))
    }

    fn sign(&self, subject: &str, authorities: Option<Vec<String>>) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
            authorities,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token's signature and expiry and return its claims.
    ///
    /// # Errors
    /// * `Expired` - Current time is past the `exp` claim
    /// * `InvalidSignature` - Signature does not match the secret
    /// * `Malformed` - Token is not a structurally valid JWT, or its subject
    ///   is empty
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Strict expiry: no tolerance for clock skew between services.
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        if token_data.claims.sub.is_empty() {
            return Err(TokenError::Malformed("empty subject".to_string()));
        }

        Ok(token_data.claims)
    }
}
