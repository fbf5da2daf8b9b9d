//! Shared-secret access guard for mutating routes.

use std::fmt;

use secrecy::{ExposeSecret as _, SecretString};

use crate::Result;
use crate::error::Error;

/// Gates order placement (and the other authenticated routes) behind a
/// caller-presented `x-api-key` shared secret.
///
/// When no secret is configured the guard is **open**: every caller is
/// authorized. That is a deliberate operator choice inherited from the
/// original deployment model (single tenant behind a private listener),
/// not a safe default — production deployments are expected to set
/// `SHEETS_SECRET`. `GET /config` reports `auth_required` so the state
/// is auditable.
#[derive(Clone, Default)]
pub struct AccessGuard {
    secret: Option<SecretString>,
}

impl AccessGuard {
    #[must_use]
    pub const fn new(secret: Option<SecretString>) -> Self {
        Self { secret }
    }

    /// A guard that authorizes everyone.
    #[must_use]
    pub const fn open() -> Self {
        Self { secret: None }
    }

    /// True when callers must present the shared secret.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        self.secret.is_some()
    }

    /// Checks a caller-presented header value against the shared secret.
    pub fn authorize(&self, presented: Option<&str>) -> Result<()> {
        let Some(secret) = &self.secret else {
            return Ok(());
        };
        match presented {
            Some(value) if constant_time_eq(value.as_bytes(), secret.expose_secret().as_bytes()) => {
                Ok(())
            }
            Some(_) => Err(Error::unauthorized("x-api-key mismatch")),
            None => Err(Error::unauthorized("missing x-api-key header")),
        }
    }
}

impl fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessGuard")
            .field("requires_auth", &self.requires_auth())
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    fn guarded() -> AccessGuard {
        AccessGuard::new(Some(SecretString::from("s3cr3t".to_owned())))
    }

    #[test]
    fn open_guard_authorizes_everyone() {
        let guard = AccessGuard::open();
        assert!(!guard.requires_auth());
        guard.authorize(None).expect("open guard must pass");
        guard.authorize(Some("anything")).expect("open guard must pass");
    }

    #[test]
    fn matching_secret_is_authorized() {
        guarded().authorize(Some("s3cr3t")).expect("must pass");
    }

    #[test]
    fn missing_header_is_unauthorized() {
        let err = guarded().authorize(None).expect_err("must fail");
        assert_eq!(err.kind(), Kind::Unauthorized);
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        for wrong in ["nope", "s3cr3t ", "S3CR3T", ""] {
            let err = guarded().authorize(Some(wrong)).expect_err("must fail");
            assert_eq!(err.kind(), Kind::Unauthorized);
        }
    }
}
