//! Field-name validation and cross-selector consistency checks

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{MismatchKind, SelectorError};

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w").unwrap());

/// A field name must contain at least one word character
pub fn valid_field_name(name: &str) -> Result<(), SelectorError> {
    if WORD_RE.is_match(name) {
        Ok(())
    } else {
        Err(SelectorError::InvalidFieldName {
            name: name.to_string(),
        })
    }
}

/// Compute `attribute` for every selector and require that they all agree.
///
/// Returns the shared value, or a `Mismatch` naming the first selector whose
/// value differs from the first one.
pub fn uniform_attribute<S, T, F>(
    selectors: &[S],
    kind: MismatchKind,
    attribute: F,
) -> Result<T, SelectorError>
where
    S: fmt::Display,
    T: PartialEq + fmt::Display,
    F: Fn(&S) -> T,
{
    let (first, rest) = selectors.split_first().ok_or(SelectorError::Empty)?;
    let expected = attribute(first);

    for selector in rest {
        let found = attribute(selector);
        if found != expected {
            return Err(SelectorError::Mismatch {
                selector: selector.to_string(),
                kind,
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_field_name() {
        for name in ["name", "experience_item", "a", "x1", "_", "foo.*.bar", "über"] {
            assert!(valid_field_name(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_wildcard_alone_is_invalid() {
        let err = valid_field_name("*").unwrap_err();
        assert!(err.to_string().contains("'*'"));
    }

    #[test]
    fn test_punctuation_only_is_invalid() {
        assert!(valid_field_name("").is_err());
        assert!(valid_field_name(".,-").is_err());
    }

    #[test]
    fn test_uniform_attribute_agrees() {
        let words = ["apple", "avocado", "apricot"];
        let first = uniform_attribute(&words, MismatchKind::ItemGroup, |w| {
            w.chars().next().unwrap_or_default()
        });
        assert_eq!(first, Ok('a'));
    }

    #[test]
    fn test_uniform_attribute_names_first_disagreement() {
        let words = ["apple", "banana", "cherry"];
        let err = uniform_attribute(&words, MismatchKind::ItemGroup, |w| {
            w.chars().next().unwrap_or_default()
        })
        .unwrap_err();
        match err {
            SelectorError::Mismatch { selector, expected, found, .. } => {
                assert_eq!(selector, "banana");
                assert_eq!(expected, "a");
                assert_eq!(found, "b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_uniform_attribute_empty() {
        let words: [&str; 0] = [];
        assert_eq!(
            uniform_attribute(&words, MismatchKind::DocumentKind, |w| w.len()),
            Err(SelectorError::Empty)
        );
    }
}
