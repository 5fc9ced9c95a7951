//! Batch engine: identifier parsing, the continue-on-failure fold, and
//! the coverage invariant shared by every batch subcommand.

use crate::error::{ClientError, ItemFailure};
use crate::types::ItemError;
use std::io::Write;

/// Split every argument on commas and flatten, discarding empty
/// fragments. Order is preserved across arguments; duplicates are kept.
pub fn comma_args(args: &[String]) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(','))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Apply `op` to every item, reporting each failure on `err` and
/// continuing with the rest. Returns the number of failed items.
///
/// This is the one implementation of the per-item failure discipline:
/// rendering and saving both go through it.
pub fn fold_degraded<T>(
    items: &[T],
    err: &mut dyn Write,
    mut op: impl FnMut(&T) -> Result<(), ItemFailure>,
) -> usize {
    let mut failures = 0;
    for item in items {
        if let Err(e) = op(item) {
            let _ = writeln!(err, "ERROR: {}", e);
            failures += 1;
        }
    }
    failures
}

/// Write the service's per-item errors as `<id>: <msg>` lines and
/// return how many there were.
pub fn report_item_errors(errors: &[ItemError], err: &mut dyn Write) -> usize {
    for e in errors {
        let _ = writeln!(err, "{}: {}", e.id, e.msg);
    }
    errors.len()
}

/// Check that every requested identifier is accounted for by either a
/// resolved payload or an item error. A name that appears in neither is
/// a protocol violation on the service's part and aborts the command
/// rather than being silently dropped.
///
/// Matching is lenient on the error side: the service tags errors with
/// an error id and puts the identifier at the front of the message.
pub fn verify_batch_coverage(
    requested: &[String],
    resolved: &[&str],
    errors: &[ItemError],
) -> Result<(), ClientError> {
    let missing: Vec<&str> = requested
        .iter()
        .filter(|name| {
            !resolved.contains(&name.as_str())
                && !errors
                    .iter()
                    .any(|e| e.id == **name || e.msg.contains(name.as_str()))
        })
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Protocol(format!(
            "response is missing requested items: {}",
            missing.join(", ")
        )))
    }
}
