//! SQL scalar functions registered on every store connection.
//!
//! # Invariants
//! - `unicode_lower(text)` folds case with full Unicode rules; SQLite's
//!   built-in `lower()` only folds ASCII.
//! - `unicode_lower(NULL)` is `NULL`.

use super::DbResult;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

pub const UNICODE_LOWER_FN: &str = "unicode_lower";

/// Registers the store's scalar functions on `conn`.
///
/// Re-registering replaces the previous definition, so repeated calls are harmless.
pub fn register_functions(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        UNICODE_LOWER_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|text| text.to_lowercase()))
        },
    )?;
    Ok(())
}
