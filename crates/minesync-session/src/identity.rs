//! Local identity and the persisted preferences around it.
//!
//! The session only needs a name and a color, once, at connect time.
//! Where they come from is somebody else's problem: the [`IdentityStore`]
//! trait is the seam, and [`resolve_identity`] applies the lookup order.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::SessionError;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Display name and cursor color of the local participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredIdentity")]
pub struct Identity {
    name: String,
    color: String,
}

/// Unchecked on-disk form; loading goes through [`Identity::new`].
#[derive(Deserialize)]
struct StoredIdentity {
    name: String,
    color: String,
}

impl TryFrom<StoredIdentity> for Identity {
    type Error = SessionError;

    fn try_from(stored: StoredIdentity) -> Result<Self, SessionError> {
        Self::new(stored.name, stored.color)
    }
}

impl Identity {
    /// Validates and builds an identity.
    ///
    /// The name may contain spaces (the server takes everything between the
    /// command and the last token), but not line breaks. The color is the
    /// last token of `register`, so it must not contain whitespace.
    ///
    /// # Errors
    /// [`SessionError::InvalidIdentity`] for an empty name, an empty color or
    /// whitespace where it would break the frame.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Result<Self, SessionError> {
        let name = name.into().trim().to_owned();
        let color = color.into().trim().to_owned();

        if name.is_empty() {
            return Err(SessionError::InvalidIdentity("name is empty".into()));
        }
        if name.contains(['\n', '\r']) {
            return Err(SessionError::InvalidIdentity("name spans several lines".into()));
        }
        if color.is_empty() {
            return Err(SessionError::InvalidIdentity("color is empty".into()));
        }
        if color.contains(char::is_whitespace) {
            return Err(SessionError::InvalidIdentity(format!("color {color:?} contains whitespace")));
        }

        Ok(Self { name, color })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

/// Everything the client persists between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub identity: Option<Identity>,
    /// Explosion sound volume, `0.0..=1.0`.
    pub audio_volume: f32,
}

impl Preferences {
    pub const DEFAULT_VOLUME: f32 = 0.5;

    /// The stored volume clamped into range; NaN falls back to the default.
    pub fn volume(&self) -> f32 {
        if self.audio_volume.is_nan() {
            Self::DEFAULT_VOLUME
        } else {
            self.audio_volume.clamp(0.0, 1.0)
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            identity: None,
            audio_volume: Self::DEFAULT_VOLUME,
        }
    }
}

// ---------------------------------------------------------------------------
// IdentityStore
// ---------------------------------------------------------------------------

/// Where the local identity is kept between runs.
pub trait IdentityStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn load_identity(&self) -> Result<Option<Identity>, Self::Error>;

    fn save_identity(&mut self, identity: &Identity) -> Result<(), Self::Error>;

    /// Forgets the identity so the next start asks for a new one.
    fn clear_identity(&mut self) -> Result<(), Self::Error>;
}

/// In-memory preferences are a store of their own.
impl IdentityStore for Preferences {
    type Error = Infallible;

    fn load_identity(&self) -> Result<Option<Identity>, Infallible> {
        Ok(self.identity.clone())
    }

    fn save_identity(&mut self, identity: &Identity) -> Result<(), Infallible> {
        self.identity = Some(identity.clone());
        Ok(())
    }

    fn clear_identity(&mut self) -> Result<(), Infallible> {
        self.identity = None;
        Ok(())
    }
}

/// Picks the identity to connect with.
///
/// A freshly `provided` identity wins and is written back to the store;
/// otherwise the stored one is used.
///
/// # Errors
/// - [`SessionError::IdentityMissing`] if neither exists
/// - [`SessionError::Store`] if the store fails
pub fn resolve_identity<S>(store: &mut S, provided: Option<Identity>) -> Result<Identity, SessionError>
where
    S: IdentityStore + ?Sized,
{
    if let Some(identity) = provided {
        store
            .save_identity(&identity)
            .map_err(|e| SessionError::Store(e.to_string()))?;
        info!(name = %identity.name, color = %identity.color, "identity registered");
        return Ok(identity);
    }

    let stored = store
        .load_identity()
        .map_err(|e| SessionError::Store(e.to_string()))?;
    match stored {
        Some(identity) => {
            debug!(name = %identity.name, "using stored identity");
            Ok(identity)
        }
        None => Err(SessionError::IdentityMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_trims_and_validates() {
        let id = Identity::new("  Mary Ann ", "#ff00ff").unwrap();
        assert_eq!(id.name(), "Mary Ann");
        assert_eq!(id.color(), "#ff00ff");

        assert!(Identity::new("", "#fff").is_err());
        assert!(Identity::new("   ", "#fff").is_err());
        assert!(Identity::new("Bob", "").is_err());
        assert!(Identity::new("Bob", "#ff 00").is_err());
        assert!(Identity::new("Bo\nb", "#fff").is_err());
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.volume(), 0.5);
        prefs.audio_volume = 3.0;
        assert_eq!(prefs.volume(), 1.0);
        prefs.audio_volume = -1.0;
        assert_eq!(prefs.volume(), 0.0);
        prefs.audio_volume = f32::NAN;
        assert_eq!(prefs.volume(), Preferences::DEFAULT_VOLUME);
    }

    #[test]
    fn test_resolve_prefers_provided_and_saves_it() {
        let mut prefs = Preferences::default();
        let alice = Identity::new("Alice", "#00ff00").unwrap();

        let resolved = resolve_identity(&mut prefs, Some(alice.clone())).unwrap();
        assert_eq!(resolved, alice);
        assert_eq!(prefs.identity, Some(alice.clone()));

        let again = resolve_identity(&mut prefs, None).unwrap();
        assert_eq!(again, alice);
    }

    #[test]
    fn test_resolve_without_identity_fails() {
        let mut prefs = Preferences::default();
        assert!(matches!(
            resolve_identity(&mut prefs, None),
            Err(SessionError::IdentityMissing)
        ));
    }

    #[test]
    fn test_clear_identity() {
        let mut prefs = Preferences {
            identity: Some(Identity::new("Alice", "#0f0").unwrap()),
            audio_volume: 0.8,
        };
        prefs.clear_identity().unwrap();
        assert_eq!(prefs.identity, None);
        assert_eq!(prefs.audio_volume, 0.8);
    }
}
