//! Type modifiers: the list and non-null wrappers around a named type.
//!
//! A modifier string is exactly the text that follows the named type in a
//! GraphQL type reference:
//!
//! | Reference      | Base      | Modifiers |
//! |----------------|-----------|-----------|
//! | `ID`           | `ID`      | ``        |
//! | `ID!`          | `ID`      | `!`       |
//! | `[ID]!`        | `ID`      | `]!`      |
//! | `[ID!]`        | `ID`      | `!]`      |
//! | `[[Boolean]]!` | `Boolean` | `]]!`     |
//!
//! The opening brackets are implied by the number of `]`, so the encoding is
//! lossless and the outermost non-null marker is always the last character.

use serde::{Deserialize, Serialize};

/// Decoded form of a [`TypeModifiers`] string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Wrapping {
    /// Whether the named type itself is non-null
    pub inner_non_null: bool,
    /// Non-null flag of each list level, innermost first
    pub lists: Vec<bool>,
}

impl Wrapping {
    /// Non-null flags of every level, outermost first, ending with the named type
    fn levels_outer_first(&self) -> impl Iterator<Item = bool> + '_ {
        self.lists
            .iter()
            .rev()
            .copied()
            .chain(std::iter::once(self.inner_non_null))
    }
}

/// Encoded list / non-null wrappers of a type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeModifiers(String);

impl TypeModifiers {
    /// The modifiers of a bare nullable named type
    #[must_use]
    pub fn none() -> Self {
        Self(String::new())
    }

    /// Validate and wrap a modifier string.
    ///
    /// Returns `None` if the text is not a sequence produced by some type
    /// reference (a leading optional `!`, then `]` each optionally followed
    /// by `!`).
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars().peekable();
        if chars.peek() == Some(&'!') {
            chars.next();
        }
        while let Some(c) = chars.next() {
            if c != ']' {
                return None;
            }
            if chars.peek() == Some(&'!') {
                chars.next();
            }
        }
        Some(Self(text.to_string()))
    }

    /// Encode a decoded wrapping
    #[must_use]
    pub fn from_wrapping(wrapping: &Wrapping) -> Self {
        let mut text = String::new();
        if wrapping.inner_non_null {
            text.push('!');
        }
        for non_null in &wrapping.lists {
            text.push(']');
            if *non_null {
                text.push('!');
            }
        }
        Self(text)
    }

    /// Decode into per-level non-null flags
    #[must_use]
    pub fn wrapping(&self) -> Wrapping {
        let mut wrapping = Wrapping::default();
        let mut chars = self.0.chars().peekable();
        if chars.peek() == Some(&'!') {
            wrapping.inner_non_null = true;
            chars.next();
        }
        while let Some(c) = chars.next() {
            if c == ']' {
                let non_null = chars.peek() == Some(&'!');
                if non_null {
                    chars.next();
                }
                wrapping.lists.push(non_null);
            }
        }
        wrapping
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the outermost level is non-null
    #[must_use]
    pub fn is_non_null(&self) -> bool {
        self.0.ends_with('!')
    }

    /// Whether the outermost nullable level is a list
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.nullable().0.ends_with(']')
    }

    #[must_use]
    pub fn list_depth(&self) -> usize {
        self.0.matches(']').count()
    }

    /// Drop the outermost non-null marker, if any
    #[must_use]
    pub fn nullable(&self) -> Self {
        Self(self.0.strip_suffix('!').unwrap_or(&self.0).to_string())
    }

    /// Modifiers of a list's items: drop the outer non-null marker, then one list level.
    ///
    /// Returns `None` when the type is not a list.
    #[must_use]
    pub fn unwrap_list(&self) -> Option<Self> {
        let nullable = self.nullable();
        nullable.0.strip_suffix(']').map(|inner| Self(inner.to_string()))
    }

    /// Render the full type reference for a named type
    #[must_use]
    pub fn wrap(&self, base: &str) -> String {
        let mut text = "[".repeat(self.list_depth());
        text.push_str(base);
        text.push_str(&self.0);
        text
    }

    /// Whether a value of type `self` can be used where `expected` is required.
    ///
    /// List structure must match exactly and every level that `expected`
    /// marks as non-null must also be non-null in `self`.
    #[must_use]
    pub fn is_compatible_with(&self, expected: &TypeModifiers) -> bool {
        let provided = self.wrapping();
        let expected = expected.wrapping();
        if provided.lists.len() != expected.lists.len() {
            return false;
        }
        let compatible = provided
            .levels_outer_first()
            .zip(expected.levels_outer_first())
            .all(|(provided, expected)| provided || !expected);
        compatible
    }
}

impl std::fmt::Display for TypeModifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TypeModifiers {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(text: &str) -> TypeModifiers {
        TypeModifiers::parse(text).unwrap()
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TypeModifiers::parse("!!").is_none());
        assert!(TypeModifiers::parse("[").is_none());
        assert!(TypeModifiers::parse("]x").is_none());
        assert!(TypeModifiers::parse("").is_some());
        assert!(TypeModifiers::parse("!]!]!").is_some());
    }

    #[test]
    fn test_wrap_renders_reference() {
        assert_eq!(m("").wrap("ID"), "ID");
        assert_eq!(m("!").wrap("ID"), "ID!");
        assert_eq!(m("]!").wrap("ID"), "[ID]!");
        assert_eq!(m("!]").wrap("ID"), "[ID!]");
        assert_eq!(m("]]!").wrap("Boolean"), "[[Boolean]]!");
    }

    #[test]
    fn test_outer_non_null_and_depth() {
        assert!(m("]]!").is_non_null());
        assert!(!m("!]").is_non_null());
        assert_eq!(m("]]!").list_depth(), 2);
        assert_eq!(m("!").list_depth(), 0);
        assert!(m("!]!").is_list());
        assert!(!m("!").is_list());
    }

    #[test]
    fn test_unwrap_list() {
        assert_eq!(m("!]!").unwrap_list(), Some(m("!")));
        assert_eq!(m("]]!").unwrap_list(), Some(m("]")));
        assert_eq!(m("]").unwrap_list(), Some(m("")));
        assert_eq!(m("!").unwrap_list(), None);
    }

    #[test]
    fn test_wrapping_decodes_inside_out() {
        let wrapping = m("!]]!").wrapping();
        assert!(wrapping.inner_non_null);
        assert_eq!(wrapping.lists, vec![false, true]);
        assert_eq!(TypeModifiers::from_wrapping(&wrapping), m("!]]!"));
    }

    #[test]
    fn test_compatibility() {
        // stricter is always fine
        assert!(m("!").is_compatible_with(&m("")));
        assert!(m("!]!").is_compatible_with(&m("]")));
        // missing non-null
        assert!(!m("").is_compatible_with(&m("!")));
        assert!(!m("]!").is_compatible_with(&m("!]!")));
        // list structure mismatch
        assert!(!m("!").is_compatible_with(&m("]")));
        assert!(!m("]").is_compatible_with(&m("]]")));
    }
}
