//! Error types for terrain generation

use thiserror::Error;

/// Errors that can occur during tessellation, meshing or queries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A cell of the tessellation cannot be turned into a closed polygon
    #[error("malformed cell {cell}: {reason}")]
    MalformedCell {
        /// Site index of the offending cell
        cell: usize,
        /// What was wrong with its boundary
        reason: String,
    },
    /// An edge references neither a left nor a right site
    #[error("malformed edge {0}: no adjacent site")]
    MalformedEdge(usize),
    /// Requested cell ID does not exist
    #[error("cell not found: {0}")]
    CellNotFound(usize),
    /// Generation failed for a reason outside the input data
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type alias for terrain operations
pub type Result<T> = std::result::Result<T, TerrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TerrainError::MalformedCell {
            cell: 3,
            reason: "only 2 boundary vertices".to_string(),
        };
        assert_eq!(err.to_string(), "malformed cell 3: only 2 boundary vertices");
        assert_eq!(TerrainError::CellNotFound(7).to_string(), "cell not found: 7");
    }
}
