//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::CommandError;

/// Map command errors to a string for CLI output.
/// Keeps the binary thin; extend with stable categories if needed.
pub fn map_error(e: &CommandError) -> String {
    e.to_string()
}
