use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold a raw description for matching: uppercase, NFD decomposition with
/// combining marks stripped, and `.`/`-`/`_`/whitespace runs collapsed to
/// a single space. `"Crédito - Máq.Cielo"` becomes `"CREDITO MAQ CIELO"`.
pub fn fold(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if matches!(c, '.' | '-' | '_') || c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.extend(c.to_uppercase());
    }

    out
}
