//! Static admin key check.
//!
//! Admin routes are gated by one pre-shared secret sent in the
//! [`ADMIN_KEY_HEADER`] header. There are no sessions, no expiry and no
//! rotation: a key is valid until the server is reconfigured.
//!
//! Comparison uses `subtle::ConstantTimeEq` so response timing does not
//! reveal how much of a guessed key was right.

use subtle::ConstantTimeEq;

/// Request header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "x-admin-api-key";

/// The configured admin secret.
#[derive(Clone)]
pub struct AdminKey(String);

impl AdminKey {
    /// Wrap a configured secret. Returns `None` for an empty value, which is
    /// treated the same as no configuration at all.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    /// Byte-for-byte comparison against the raw header bytes.
    ///
    /// Header values are not required to be ASCII, so the check works on
    /// bytes rather than `&str`. An empty presented key never matches.
    #[must_use]
    pub fn matches(&self, presented: &[u8]) -> bool {
        if presented.is_empty() {
            return false;
        }
        self.0.as_bytes().ct_eq(presented).into()
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminKey([redacted])")
    }
}
