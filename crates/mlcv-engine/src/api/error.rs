use thiserror::Error;

use super::types::EmitterId;

/// Errors surfaced by editor operations.
///
/// Boundary values, removal while nothing is selected and exporting an empty
/// visualization are not errors; they resolve to no-ops.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The emitter is not (or no longer) part of the visualization.
    #[error("emitter {0} is not in the visualization")]
    UnknownEmitter(EmitterId),
    /// An export document could not be serialized or parsed.
    #[error("export document: {0}")]
    Document(#[from] serde_json::Error),
    /// Imported text is neither a wrapped module nor a bare JSON object.
    #[error("export document must be a JSON object, optionally prefixed by `export default`")]
    MissingPreamble,
}
