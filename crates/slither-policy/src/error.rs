//! Error types for the policy layer.

/// Errors that can occur while setting up a policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// No policy is registered under this name.
    #[error("unknown policy `{0}` (expected cyclic, random or greedy)")]
    UnknownPolicy(String),
}
