use std::path::PathBuf;

/// Errors that can occur while turning a glTF document into meshes.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A primitive lacks a semantic attribute the vertex layout requires.
    #[error("primitive is missing the \"{0}\" attribute")]
    MissingAttribute(String),

    /// Out-of-range references, inconsistent counts, or data this loader
    /// does not support.
    #[error("malformed glTF asset: {0}")]
    MalformedAsset(String),

    #[error("could not read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub(crate) fn malformed(message: impl Into<String>) -> LoadError {
        LoadError::MalformedAsset(message.into())
    }
}
