//! Collation keys for locale-aware ordering of Portuguese text.
//!
//! Plain `str` ordering compares code points, which puts "Ótica" after
//! "Zona" and "ácido" after "azul". Spreadsheet users expect the order a
//! pt-BR collator gives:
//!
//! - Case is ignored at the primary level
//! - Diacritics are ignored at the primary level: "é" sorts with "e"
//! - Equal primary keys fall back to code point order, so "e" < "é"
//!   and the ordering stays total

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Primary collation key: lowercase with diacritics folded away.
///
/// Decomposes to NFD and drops combining marks, so precomposed and
/// decomposed spellings of the same letter get the same key.
/// Input: "Laboratório Ômega", output: "laboratorio omega".
pub fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare two strings by collation key, then by code point.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}
