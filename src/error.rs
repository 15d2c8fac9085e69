use std::path::PathBuf;

/// Errors that end a refresh cycle.
///
/// All of these are terminal for the cycle that raised them: the previous
/// valid render stays on screen and the message names the offending
/// field, scheme or path.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Dataset could not be read from disk
    #[error("failed to read dataset {path:?}: {source}")]
    Fetch {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Dataset is not a valid GeoJSON feature collection
    #[error("failed to parse dataset {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Requested field is absent from every feature
    #[error("field {0:?} is not present on any feature")]
    MissingField(String),
    /// Requested field carries no numeric values, so no domain exists
    #[error("field {0:?} has no numeric values to compute a domain from")]
    EmptyDomain(String),
    /// Scheme name does not resolve against the palette catalog
    #[error("unknown color scheme {0:?}")]
    UnknownScheme(String),
}
