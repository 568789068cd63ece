//! Cached-state collaborator interface.
//!
//! An external state cache (out of scope for this workspace) can
//! implement [`StateLookup`] to let the mention resolver upgrade its
//! output with guild-local data. Every lookup is best-effort: a cache
//! miss is an expected outcome, never an error the caller propagates.

use thiserror::Error;

use crate::channel::Channel;
use crate::guild::{Member, Role};

/// Lookup failures reported by a state cache.
#[derive(Debug, Error)]
pub enum StateError {
    /// The requested resource is not in the cache.
    #[error("not found in state cache")]
    NotFound,
}

/// Read-only view over a cached copy of gateway state.
///
/// Implementations return owned values so callers are not tied to the
/// cache's internal locking.
pub trait StateLookup: Send + Sync {
    /// Look up a channel by id.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NotFound`] on a cache miss.
    fn channel(&self, channel_id: &str) -> Result<Channel, StateError>;

    /// Look up a guild member.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NotFound`] on a cache miss.
    fn member(&self, guild_id: &str, user_id: &str) -> Result<Member, StateError>;

    /// Look up a guild role.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NotFound`] on a cache miss.
    fn role(&self, guild_id: &str, role_id: &str) -> Result<Role, StateError>;
}
