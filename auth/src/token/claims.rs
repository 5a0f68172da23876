use serde::Deserialize;
use serde::Serialize;

/// Decoded content of an identity token.
///
/// Invariants (enforced by [`TokenCodec`](crate::token::TokenCodec) at issue
/// time): `sub` is non-empty and `exp > iat`.
///
/// The `authorities` claim is only present on tokens issued for a trusted
/// service identity. Tokens for ordinary users never embed authorities;
/// those are resolved by a store lookup at validation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username or a reserved service identity)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Authorities granted to a service identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorities: Option<Vec<String>>,
}

impl Claims {
    /// Authorities as a slice, empty when the claim is absent.
    pub fn authorities(&self) -> &[String] {
        self.authorities.as_deref().unwrap_or_default()
    }
}
