//! Typed interpretation of raw CSV values.
//!
//! The interpretation is decided once per column from its name and carried
//! as a [`FieldKind`].

use std::{
    fmt,
    path::{self, Path, PathBuf},
};

use tracing::warn;

use crate::color;

/// How a column's values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain text, passed through as-is.
    Text,
    /// A media path, resolved and checked for existence.
    FilePath,
    /// A color token, decoded to a packed value.
    Color,
}

impl FieldKind {
    /// Derive the kind from a column name (case-insensitive).
    ///
    /// `_picture`/`_image` take precedence over `_hex`/`_color`.
    pub fn from_field_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("_picture") || lower.contains("_image") {
            Self::FilePath
        } else if lower.contains("_hex") || lower.contains("_color") {
            Self::Color
        } else {
            Self::Text
        }
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::FilePath => "file",
            Self::Color => "color",
        }
    }
}

/// A classified value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    /// Text, unmodified.
    Text(String),
    /// Absolute path to an existing file, or empty when the file was missing.
    FilePath(String),
    /// Packed color; `0` when the token failed to decode.
    Color(u32),
}

impl TypedValue {
    /// The value rendered as text, as used for string-valued settings.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) | Self::FilePath(s) => s.clone(),
            Self::Color(n) => n.to_string(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s:?}"),
            Self::FilePath(p) => write!(f, "file {p:?}"),
            Self::Color(n) => write!(f, "color {n:#010X}"),
        }
    }
}

/// Classifies raw values, resolving relative media paths against the data
/// file's directory.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Directory relative media paths are resolved against.
    base_dir: PathBuf,
}

impl Classifier {
    /// Classifier for values read from `data_file`.
    pub fn for_data_file(data_file: &Path) -> Self {
        Self::new(data_file.parent().unwrap_or_else(|| Path::new(".")))
    }

    /// Classifier resolving relative paths against `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Classify `raw` from the column named `field`.
    pub fn classify(&self, field: &str, raw: &str) -> TypedValue {
        if raw.trim().is_empty() {
            return TypedValue::Text(String::new());
        }
        match FieldKind::from_field_name(field) {
            FieldKind::Text => TypedValue::Text(raw.to_string()),
            FieldKind::FilePath => TypedValue::FilePath(self.resolve_file(field, raw.trim())),
            FieldKind::Color => match color::decode(raw) {
                Ok(n) => TypedValue::Color(n),
                Err(e) => {
                    warn!(field, "{e}; using 0");
                    TypedValue::Color(0)
                }
            },
        }
    }

    /// Resolve `raw` to an absolute existing path, or empty when missing.
    fn resolve_file(&self, field: &str, raw: &str) -> String {
        let p = Path::new(raw);
        let resolved = if p.is_absolute() {
            p.to_path_buf()
        } else {
            absolute(&self.base_dir.join(p))
        };
        if resolved.exists() {
            resolved.to_string_lossy().into_owned()
        } else {
            warn!(field, path = %resolved.display(), "File not found");
            String::new()
        }
    }
}

/// Make `p` absolute against the current directory without touching the filesystem.
fn absolute(p: &Path) -> PathBuf {
    path::absolute(p).unwrap_or_else(|_| p.to_path_buf())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn field_kind_precedence() {
        assert_eq!(FieldKind::from_field_name("p1_picture"), FieldKind::FilePath);
        assert_eq!(FieldKind::from_field_name("Team_IMAGE"), FieldKind::FilePath);
        assert_eq!(FieldKind::from_field_name("bg_color"), FieldKind::Color);
        assert_eq!(FieldKind::from_field_name("accent_HEX"), FieldKind::Color);
        assert_eq!(FieldKind::from_field_name("logo_image_color"), FieldKind::FilePath);
        assert_eq!(FieldKind::from_field_name("color"), FieldKind::Text);
        assert_eq!(FieldKind::from_field_name("player_1_name"), FieldKind::Text);
    }

    #[test]
    fn color_field_decodes() {
        let c = Classifier::new("/tmp");
        assert_eq!(
            c.classify("bg_color", "CFAA4C"),
            TypedValue::Color(color::decode("CFAA4C").unwrap())
        );
        assert_eq!(c.classify("bg_color", "GGGGGG"), TypedValue::Color(0));
    }

    #[test]
    fn text_is_unmodified_and_empty_short_circuits() {
        let c = Classifier::new("/tmp");
        assert_eq!(
            c.classify("player_name", "  Ada  "),
            TypedValue::Text("  Ada  ".into())
        );
        assert_eq!(c.classify("bg_color", "  "), TypedValue::Text(String::new()));
        assert_eq!(c.classify("p1_picture", ""), TypedValue::Text(String::new()));
    }

    #[test]
    fn picture_resolves_relative_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("img.png"), b"png").unwrap();
        let c = Classifier::for_data_file(&dir.path().join("data.csv"));

        let expected = dir.path().join("img.png");
        assert_eq!(
            c.classify("p1_picture", "img.png"),
            TypedValue::FilePath(expected.to_string_lossy().into_owned())
        );
        assert_eq!(
            c.classify("p1_picture", &expected.to_string_lossy()),
            TypedValue::FilePath(expected.to_string_lossy().into_owned())
        );
    }

    #[test]
    fn missing_picture_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let c = Classifier::new(dir.path());
        assert_eq!(
            c.classify("p1_picture", "nope.png"),
            TypedValue::FilePath(String::new())
        );
    }
}
