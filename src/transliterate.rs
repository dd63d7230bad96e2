//! Latin transcription to Ukrainian Cyrillic.
//!
//! Replacement is done on substrings, longest key first, so digraphs such as
//! `zh` or `shch` win over their single letters. Only lowercase ASCII letters
//! and the apostrophe are keys; everything else is copied through.

use std::ffi::OsString;
use std::path::Path;

/// Replacement table, ordered longest key first.
///
/// The Latin `i` is claimed by both `і` and `й` in the usual romanization; it
/// resolves to `і` here and `й` has no Latin key.
const TABLE: &[(&str, &str)] = &[
    ("shch", "щ"),
    ("ie", "є"),
    ("zh", "ж"),
    ("yi", "ї"),
    ("kh", "х"),
    ("ts", "ц"),
    ("ch", "ч"),
    ("sh", "ш"),
    ("iu", "ю"),
    ("ia", "я"),
    ("a", "а"),
    ("b", "б"),
    ("v", "в"),
    ("h", "г"),
    ("g", "ґ"),
    ("d", "д"),
    ("e", "е"),
    ("z", "з"),
    ("y", "и"),
    ("i", "і"),
    ("k", "к"),
    ("l", "л"),
    ("m", "м"),
    ("n", "н"),
    ("o", "о"),
    ("p", "п"),
    ("r", "р"),
    ("s", "с"),
    ("t", "т"),
    ("u", "у"),
    ("f", "ф"),
    ("'", "ь"),
];

/// Transliterates a filename stem.
///
/// # Examples
///
/// ```
/// use dirsort::transliterate::transliterate;
///
/// assert_eq!(transliterate("borshch"), "борщ");
/// assert_eq!(transliterate("Zhuk_2"), "Zгук_2");
/// ```
pub fn transliterate(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len() * 2);
    let mut rest = stem;

    'outer: while !rest.is_empty() {
        for (latin, cyrillic) in TABLE {
            if let Some(tail) = rest.strip_prefix(latin) {
                out.push_str(cyrillic);
                rest = tail;
                continue 'outer;
            }
        }

        // `rest` is non-empty, so there is always a next char.
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }

    out
}

/// Transliterates the stem of a file name and keeps its extension verbatim.
///
/// Returns `None` when the path has no file name. A stem that is not valid
/// UTF-8 is converted lossily; the extension is kept byte for byte.
pub fn transliterate_file_name(path: &Path) -> Option<OsString> {
    path.file_name()?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let mut name = OsString::from(transliterate(&stem));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(name)
}
