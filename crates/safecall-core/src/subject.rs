//! Subject shape preservation for substitution operations.
//!
//! A substitution accepts either a single string or a batch of strings and
//! must return exactly the shape it was given, transforming per element.
//! Only the top-level failure signal is replaced by an error; per-element
//! values are never reshaped.

/// A substitution subject: one string or a batch of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    One(String),
    Many(Vec<String>),
}

impl Subject {
    /// Applies `f` to every element, preserving shape. The closure may
    /// fail; the first failure aborts the whole operation.
    pub fn try_map<E>(self, mut f: impl FnMut(String) -> Result<String, E>) -> Result<Self, E> {
        match self {
            Subject::One(s) => Ok(Subject::One(f(s)?)),
            Subject::Many(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(f(item)?);
                }
                Ok(Subject::Many(out))
            }
        }
    }

    /// Number of elements carried (1 for a single string).
    pub fn len(&self) -> usize {
        match self {
            Subject::One(_) => 1,
            Subject::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Subject::Many(items) if items.is_empty())
    }
}

impl From<String> for Subject {
    fn from(s: String) -> Self {
        Subject::One(s)
    }
}

impl From<&str> for Subject {
    fn from(s: &str) -> Self {
        Subject::One(s.to_string())
    }
}

impl From<Vec<String>> for Subject {
    fn from(items: Vec<String>) -> Self {
        Subject::Many(items)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_in_single_out() {
        let s = Subject::from("abc");
        let out = s.try_map(|v| Ok::<_, ()>(v.to_uppercase())).unwrap();
        assert_eq!(out, Subject::One("ABC".to_string()));
    }

    #[test]
    fn test_batch_in_batch_out() {
        let s = Subject::from(vec!["a".to_string(), "b".to_string()]);
        let out = s.try_map(|v| Ok::<_, ()>(format!("{v}!"))).unwrap();
        assert_eq!(
            out,
            Subject::Many(vec!["a!".to_string(), "b!".to_string()])
        );
    }

    #[test]
    fn test_first_failure_aborts() {
        let s = Subject::from(vec!["ok".to_string(), "bad".to_string()]);
        let r = s.try_map(|v| if v == "bad" { Err("boom") } else { Ok(v) });
        assert_eq!(r, Err("boom"));
    }

    #[test]
    fn test_len_and_empty() {
        assert_eq!(Subject::from("x").len(), 1);
        assert!(!Subject::from("x").is_empty());
        assert!(Subject::Many(vec![]).is_empty());
    }
}
