//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid ring configuration (e.g. zero virtual nodes per node).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Invalid node label (e.g. empty string).
    #[error("invalid node: {0}")]
    InvalidNode(String),
    /// Node is already a member of the ring.
    #[error("duplicate node: {0}")]
    DuplicateNode(String),
    /// Lookup attempted on a ring with no nodes.
    #[error("ring has no nodes")]
    EmptyRing,
}
