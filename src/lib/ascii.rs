//! ASCII folding for instrument-facing text fields.
//!
//! The sample-sheet consumer only accepts a restricted character set, so
//! free-text fields (request names, protocol names) are folded: NFKD
//! decomposition first, then every remaining non-ASCII character is dropped.
//! Characters are dropped, never substituted.

use unicode_normalization::UnicodeNormalization;

/// Fold a string to its ASCII-representable content.
///
/// Diacritics decompose and keep their base letter ("Müller" -> "Muller");
/// characters with no ASCII decomposition disappear entirely.
#[must_use]
pub fn fold_ascii(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}
