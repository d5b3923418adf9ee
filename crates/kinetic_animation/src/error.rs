//! Animation error types

use thiserror::Error;

/// Errors surfaced by the animation system
///
/// All of these are programmer errors: nothing here is transient and no
/// operation retries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The animation already belongs to an animator
    #[error("Animation {id} is already owned by an animator")]
    AlreadyOwned { id: u64 },

    /// No lerper is registered for the requested type
    #[error("Cannot lerp type `{type_name}`: no lerper registered")]
    UnsupportedType { type_name: &'static str },

    /// An animation window must satisfy `start <= end` with finite bounds
    #[error("Invalid animation window: start {start}, end {end}")]
    InvalidWindow { start: f32, end: f32 },
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
