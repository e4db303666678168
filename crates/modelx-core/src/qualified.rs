//! Qualified-name helpers
//!
//! A qualified name is the dot-separated path of an entity from the project
//! root. The root namespace has the empty qualified name.

use crate::errors::{ModelXError, Result};

/// Separator between qualified-name segments
pub const SEPARATOR: char = '.';

const RESERVED: [char; 3] = [SEPARATOR, '/', '\\'];

/// Join a parent qualified name and a child segment
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", parent, SEPARATOR, name)
    }
}

/// Qualified name of the enclosing namespace (`""` for top-level entities)
pub fn parent(qualified_name: &str) -> &str {
    match qualified_name.rfind(SEPARATOR) {
        Some(idx) => &qualified_name[..idx],
        None => "",
    }
}

/// Last segment of a qualified name
pub fn basename(qualified_name: &str) -> &str {
    match qualified_name.rfind(SEPARATOR) {
        Some(idx) => &qualified_name[idx + 1..],
        None => qualified_name,
    }
}

/// Segments of a qualified name, root first; empty for the root
pub fn segments(qualified_name: &str) -> impl Iterator<Item = &str> {
    qualified_name
        .split(SEPARATOR)
        .filter(move |_| !qualified_name.is_empty())
}

/// Validate a single name segment
///
/// # Errors
/// * `InvalidName` - empty, or containing `.`, `/` or `\`
pub fn validate_segment(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ModelXError::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty or whitespace-only".to_string(),
        });
    }
    if let Some(c) = name.chars().find(|c| RESERVED.contains(c)) {
        return Err(ModelXError::InvalidName {
            name: name.to_string(),
            reason: format!("name cannot contain '{}'", c),
        });
    }
    Ok(())
}

/// Validate every segment of a non-root qualified name
///
/// # Errors
/// * `InvalidName` - empty, or any segment fails [`validate_segment`]
pub fn validate(qualified_name: &str) -> Result<()> {
    if qualified_name.is_empty() {
        return Err(ModelXError::InvalidName {
            name: String::new(),
            reason: "qualified name cannot be empty".to_string(),
        });
    }
    qualified_name.split(SEPARATOR).try_for_each(validate_segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_join_and_split() {
        assert_eq!(join("", "one"), "one");
        assert_eq!(join("one.two", "m"), "one.two.m");
        assert_eq!(parent("one.two.m"), "one.two");
        assert_eq!(parent("one"), "");
        assert_eq!(basename("one.two.m"), "m");
        assert_eq!(basename("m"), "m");
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("a.b.c").collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(segments("").count(), 0);
    }

    #[test]
    fn test_validate_segment_rejects_reserved() {
        assert!(validate_segment("model_one").is_ok());
        assert!(validate_segment("").is_err());
        assert!(validate_segment("  ").is_err());
        assert!(validate_segment("a.b").is_err());
        assert!(validate_segment("a/b").is_err());
        assert!(validate_segment("a\\b").is_err());
    }

    #[test]
    fn test_validate_qualified() {
        assert!(validate("one.two").is_ok());
        assert!(validate("").is_err());
        assert!(validate("one..two").is_err());
    }

    proptest! {
        #[test]
        fn prop_join_splits_back(
            parent_name in "([a-z_][a-z0-9_]{0,7}(\\.[a-z_][a-z0-9_]{0,7}){0,3})?",
            name in "[a-z_][a-z0-9_]{0,7}",
        ) {
            let joined = join(&parent_name, &name);
            prop_assert_eq!(parent(&joined), parent_name.as_str());
            prop_assert_eq!(basename(&joined), name.as_str());
            prop_assert!(validate(&joined).is_ok());

            let expected = segments(&parent_name).count() + 1;
            prop_assert_eq!(segments(&joined).count(), expected);
        }

        #[test]
        fn prop_reserved_chars_rejected(
            head in "[a-z]{0,4}",
            reserved in prop::sample::select(vec!['.', '/', '\\']),
            tail in "[a-z]{0,4}",
        ) {
            let name = format!("{}{}{}", head, reserved, tail);
            prop_assert!(validate_segment(&name).is_err());
        }
    }
}
