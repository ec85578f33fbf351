//! Label escaping for Newick and NEXUS output.

use std::borrow::Cow;

/// Characters that end an unquoted Newick/NEXUS label.
const SPECIAL_CHARS: &[char] = &[',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Escapes a label for safe use in Newick and NEXUS output.
///
/// Labels containing special characters (punctuation, delimiters) are
/// wrapped in single quotes, with internal single quotes doubled.
/// Otherwise spaces are replaced with underscores.
///
/// # Examples
/// ```
/// # use phylogen::newick::escape_label;
/// assert_eq!(escape_label("Kobeli"), "Kobeli");
/// assert_eq!(escape_label("Tapphis moccus"), "Tapphis_moccus");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> Cow<'_, str> {
    if label.contains(SPECIAL_CHARS) {
        Cow::Owned(format!("'{}'", label.replace('\'', "''")))
    } else if label.contains(' ') {
        Cow::Owned(label.replace(' ', "_"))
    } else {
        Cow::Borrowed(label)
    }
}
