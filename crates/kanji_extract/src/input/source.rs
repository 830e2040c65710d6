//! Isolates each grade's array literal in the TypeScript kanji module.
//!
//! The module is not parsed as a whole. Module syntax is stripped with a few line-anchored
//! patterns, the `const <name>Kanji = [` declaration is located and the array is delimited by
//! counting brackets, ignoring the ones that appear inside string literals.

use crate::error::GroupError;
use once_cell::sync::Lazy;
use regex::Regex;

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+[^;\n]*?from\s+['"][^'"\n]*['"];?[ \t]*\r?\n?"#).unwrap()
});
static EXPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([ \t]*)export\s+").unwrap());
static TYPE_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":\s*(?:KanjiCharacter|KanjiGradeSection)\[\]").unwrap());
static DECLARATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)\bconst\s+([A-Za-z_$][\w$]*)\s*=\s*\[").unwrap());

/// Removes imports, `export` keywords and the array type annotations of the module.
pub fn clean(source: &str) -> String {
    let source = IMPORT.replace_all(source, "");
    let source = EXPORT.replace_all(&source, "$1");
    TYPE_ANNOTATION.replace_all(&source, "").into_owned()
}

/// Returns the `const <name>Kanji = [...]` declaration, from `const` to the closing bracket.
pub fn extract<'a>(source: &'a str, name: &str) -> Result<&'a str, GroupError> {
    let identifier = format!("{name}Kanji");
    let declaration = DECLARATION
        .captures_iter(source)
        .find(|c| c[1] == identifier)
        .and_then(|c| c.get(0))
        .ok_or_else(|| GroupError::NotFound(name.to_string()))?;

    let end = closing_bracket(source.as_bytes(), declaration.end())
        .ok_or_else(|| GroupError::Unbalanced(name.to_string()))?;
    Ok(&source[declaration.start()..end])
}

// returns the index just past the bracket that closes the one opened before `start`
// all the delimiters are ASCII, so walking the bytes of UTF-8 text is fine
fn closing_bracket(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote = None;
    let mut escaped = false;

    for (idx, &b) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        match (b, quote) {
            (b'\\', _) => escaped = true,
            (b'\'' | b'"', None) => quote = Some(b),
            (b, Some(q)) if b == q => quote = None,
            (b'[', None) => depth += 1,
            (b']', None) => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}
