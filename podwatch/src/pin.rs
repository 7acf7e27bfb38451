use std::fmt;

use crate::error::PodcastError;
use crate::validate;

/// bcrypt work factor for PIN hashes. Slow enough to resist offline
/// guessing at interactive rates if the store ever leaks.
pub const PIN_HASH_COST: u32 = 12;

/// Per-resource authorization gate for mutating requests.
///
/// Stateless per call. Checks run in a fixed order: PIN format, then
/// resource existence, then the admin secret or the stored bcrypt hash.
/// No hash comparison happens until the format rules pass, and a failed
/// check is never retried.
#[derive(Clone)]
pub struct PinGuard {
    admin_pin: Option<String>,
}

impl PinGuard {
    pub fn new(admin_pin: Option<String>) -> Self {
        PinGuard { admin_pin }
    }

    /// Establish the stored hash for a new podcast. The plaintext is
    /// format-checked, hashed once and dropped.
    pub fn establish(&self, pin: Option<&str>) -> Result<String, PodcastError> {
        let pin = validate::pin_format(pin)?;
        bcrypt::hash(pin, PIN_HASH_COST).map_err(|err| PodcastError::Internal(err.to_string()))
    }

    /// Decide whether a mutating request may proceed.
    ///
    /// `stored_hash` is `None` when the target resource does not exist;
    /// that is reported only after the candidate's format passes, so a
    /// malformed PIN cannot probe for resource existence.
    pub fn authorize(&self, candidate: Option<&str>, stored_hash: Option<&str>) -> Result<(), PodcastError> {
        let pin = validate::pin_format(candidate)?;
        let hash = stored_hash.ok_or(PodcastError::NotFound)?;
        if self.admin_pin.as_deref() == Some(pin) {
            return Ok(());
        }
        match bcrypt::verify(pin, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PodcastError::InvalidPin),
            Err(err) => Err(PodcastError::Internal(err.to_string())),
        }
    }
}

impl fmt::Debug for PinGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the admin secret
        f.debug_struct("PinGuard").field("admin_pin", &self.admin_pin.as_ref().map(|_| "<set>")).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{PIN_DIGITS, PIN_LENGTH, PIN_REQUIRED};

    #[test]
    fn establish_then_authorize_round_trip() {
        let guard = PinGuard::new(None);
        let hash = guard.establish(Some("4821")).unwrap();
        assert_ne!(hash, "4821");
        assert!(hash.starts_with("$2"));
        assert!(guard.authorize(Some("4821"), Some(&hash)).is_ok());
        assert_eq!(guard.authorize(Some("0000"), Some(&hash)), Err(PodcastError::InvalidPin));
    }

    #[test]
    fn admin_pin_authorizes_any_podcast() {
        let guard = PinGuard::new(Some("9999".into()));
        let hash = guard.establish(Some("4821")).unwrap();
        assert!(guard.authorize(Some("9999"), Some(&hash)).is_ok());
        assert_eq!(guard.authorize(Some("0000"), Some(&hash)), Err(PodcastError::InvalidPin));
    }

    #[test]
    fn format_errors_precede_existence_and_match() {
        let guard = PinGuard::new(Some("9999".into()));
        // malformed candidates are rejected even when the resource is missing
        assert_eq!(guard.authorize(None, None), Err(PodcastError::validation(PIN_REQUIRED)));
        assert_eq!(guard.authorize(Some("12"), None), Err(PodcastError::validation(PIN_LENGTH)));
        assert_eq!(guard.authorize(Some("12a4"), None), Err(PodcastError::validation(PIN_DIGITS)));
        // well-formed candidate against a missing resource reports 404
        assert_eq!(guard.authorize(Some("1234"), None), Err(PodcastError::NotFound));
    }

    #[test]
    fn establish_rejects_malformed_pins() {
        let guard = PinGuard::new(None);
        assert_eq!(guard.establish(None), Err(PodcastError::validation(PIN_REQUIRED)));
        assert_eq!(guard.establish(Some("481")), Err(PodcastError::validation(PIN_LENGTH)));
        assert_eq!(guard.establish(Some("48a1")), Err(PodcastError::validation(PIN_DIGITS)));
    }
}
