/// Convenience result type used across layercomp.
pub type CompositorResult<T> = Result<T, CompositorError>;

/// Top-level error taxonomy.
///
/// Only the capability layer and configuration loading produce these. The
/// compositing engine and the output finalizer absorb them and degrade to
/// blank or missing output instead of propagating.
#[derive(thiserror::Error, Debug)]
pub enum CompositorError {
    /// The layer description could not be read at all.
    #[error("description error: {0}")]
    Description(String),

    /// A source or external asset could not be resolved or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Invalid or unreadable compositor configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A finished image could not be written.
    #[error("persist error: {0}")]
    Persist(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompositorError {
    /// Build a [`CompositorError::Description`] value.
    pub fn description(msg: impl Into<String>) -> Self {
        Self::Description(msg.into())
    }

    /// Build a [`CompositorError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CompositorError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`CompositorError::Persist`] value.
    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
