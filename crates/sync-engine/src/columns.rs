//! Column grouping and source-name suggestions for building a mapping.

use config::FieldMapping;

/// Group label for columns without an underscore.
pub const OTHER_GROUP: &str = "Other";

/// A set of related columns, e.g. every `player_1_*` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnGroup {
    /// Group key: the first two `_`-separated parts, or [`OTHER_GROUP`].
    pub key: String,
    /// Member columns in file order.
    pub columns: Vec<String>,
}

impl ColumnGroup {
    /// Display label for the group (`player_1` becomes `Player 1`).
    pub fn label(&self) -> String {
        suggest_source_name(&self.key)
    }
}

/// Group columns by their first two `_`-separated parts.
///
/// Groups appear in order of first occurrence. Empty column names are skipped.
pub fn group_columns<S: AsRef<str>>(columns: &[S]) -> Vec<ColumnGroup> {
    let mut groups: Vec<ColumnGroup> = Vec::new();
    for col in columns.iter().map(AsRef::as_ref) {
        if col.is_empty() {
            continue;
        }
        let key = match col.split('_').take(2).collect::<Vec<_>>().as_slice() {
            [a, b] => format!("{a}_{b}"),
            _ => OTHER_GROUP.to_string(),
        };
        match groups.iter_mut().find(|g| g.key == key) {
            Some(g) => g.columns.push(col.to_string()),
            None => groups.push(ColumnGroup {
                key,
                columns: vec![col.to_string()],
            }),
        }
    }
    groups
}

/// Suggest a source name for a column: underscores become spaces and each
/// word is title-cased (`player_1_name` becomes `Player 1 Name`).
///
/// A letter starts a new word when the previous character is not a letter.
pub fn suggest_source_name(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut prev_alpha = false;
    for ch in column.chars().map(|c| if c == '_' { ' ' } else { c }) {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// A mapping with one suggested source per non-empty column.
pub fn suggest_mapping<S: AsRef<str>>(columns: &[S]) -> FieldMapping {
    columns
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| !c.is_empty())
        .map(|c| (suggest_source_name(c), c.to_string()))
        .filter(|(name, _)| !name.trim().is_empty())
        .collect()
}
