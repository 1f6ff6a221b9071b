use std::fmt::Display;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Turns a path-like string into its canonical form.
///
/// Backslashes become forward slashes and the text is put in Unicode
/// canonical composition (NFC). Letter case is preserved: `Foo/Bar.JPG` and
/// `foo/bar.jpg` are two different images.
///
/// ```
/// use photo_ranking::canonicalize;
///
/// assert_eq!(canonicalize(r"CONCURSANTES\Ana\Foto.JPG"), "CONCURSANTES/Ana/Foto.JPG");
/// ```
pub fn canonicalize(path: &str) -> String {
    path.replace('\\', "/").nfc().collect()
}

/// Unicode NFC normalization for free text (names, observations).
pub fn normalize_text(text: &str) -> String {
    text.nfc().collect()
}

/// The primary key of every record: a canonicalized path.
///
/// Two records denote the same logical image iff their keys are
/// byte-identical. The ordering is the byte (code point) order of the
/// canonical string.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Builds a key from a raw path. Returns None when nothing usable is left
    /// after trimming.
    pub fn parse(raw: &str) -> Option<IdentityKey> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(IdentityKey(canonicalize(trimmed)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty path segments, in order.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('/').filter(|s| !s.is_empty()).collect()
    }

    /// The last path segment (usually the file name).
    pub fn file_name(&self) -> &str {
        self.segments().last().copied().unwrap_or(self.0.as_str())
    }

    /// Everything up to and including the last slash. Empty for a bare file name.
    pub fn directory(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx + 1],
            None => "",
        }
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdentityKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Splits a file name into its base name and lower-cased extension.
/// `photo.TIFF` gives `("photo", Some("tiff"))`.
pub fn split_extension(file_name: &str) -> (&str, Option<String>) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => (
            &file_name[..idx],
            Some(file_name[idx + 1..].to_lowercase()),
        ),
        _ => (file_name, None),
    }
}
