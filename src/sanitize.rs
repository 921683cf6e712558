//! Text sanitizers for titles, slugs and file names.

use std::borrow::Cow;
use std::path::Path;

use percent_encoding::percent_decode_str;

/// Characters stripped from file names before they are written to disk.
const FILE_NAME_SPECIAL_CHARS: &[char] = &[
    '?', '[', ']', '/', '\\', '=', '<', '>', ':', ';', ',', '\'', '"', '&', '$', '#', '*', '(',
    ')', '|', '~', '`', '!', '{', '}', '%', '+', '\u{2019}', '\u{ab}', '\u{bb}', '\u{201d}',
    '\u{201c}', '\0',
];

/// Make text safe to embed as an XML attribute value.
///
/// Entities already present are decoded first so that sanitizing twice does
/// not double-escape. Characters that are not allowed in XML are dropped.
pub fn sanitize_xml_attribute(s: &str) -> String {
    let decoded: Cow<'_, str> = quick_xml::escape::unescape(s).unwrap_or(Cow::Borrowed(s));
    let cleaned: String = decoded.chars().filter(|&c| is_xml_char(c)).collect();
    quick_xml::escape::escape(cleaned.as_str()).into_owned()
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Reduce a section slug to a filesystem- and URL-safe token.
///
/// # Examples
///
/// ```
/// use bindery::sanitize::sanitize_slug;
///
/// assert_eq!(sanitize_slug("Chapter One"), "chapter-one");
/// assert_eq!(sanitize_slug("caf%C3%A9-au-lait"), "caf-au-lait");
/// ```
pub fn sanitize_slug(slug: &str) -> String {
    let decoded = percent_decode_str(slug).decode_utf8_lossy();
    force_ascii(&decoded)
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                Some(c.to_ascii_lowercase())
            } else if c.is_whitespace() || matches!(c, '-' | '.' | '/') {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Strip characters that are unsafe in file names.
///
/// Whitespace becomes a hyphen, runs of hyphens collapse, and leading or
/// trailing dots, hyphens and underscores are trimmed. Case is preserved.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if FILE_NAME_SPECIAL_CHARS.contains(&c) {
            continue;
        }
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches(|c| matches!(c, '.' | '-' | '_')).to_string()
}

/// Remove every character outside printable ASCII.
pub fn force_ascii(s: &str) -> String {
    s.chars().filter(|c| matches!(c, ' '..='~')).collect()
}

/// Pick a name that does not exist in `dir`, appending `-1`, `-2`, ... to the
/// stem of `name` as needed.
pub fn unique_file_name(dir: &Path, name: &str) -> String {
    if !dir.join(name).exists() {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    };
    let mut n = 1;
    loop {
        let candidate = format!("{stem}-{n}{ext}");
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        n += 1;
    }
}
