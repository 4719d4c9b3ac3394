//! Pattern-matching wrappers.
//!
//! The `regex` crate is the engine; these wrappers only normalize its
//! failure signal. A malformed pattern surfaces as a typed error at
//! compile time, classified purely from the engine's returned error
//! value (no ambient error slot exists for this family). A non-match at
//! run time is a legitimate result, never a failure.

use regex::Regex;

use safecall_core::textops::{self, DelimSpan, ReplacementSpan};
use safecall_core::{SafeError, SafeResult, Subject};

pub use safecall_core::textops::{SPLIT_DELIM_CAPTURE, SPLIT_NO_EMPTY};

/// Replacement-limit value meaning "no limit".
pub const NO_LIMIT: i64 = -1;

/// One captured group: matched text plus its byte offset in the subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCapture {
    pub text: String,
    pub offset: usize,
}

/// A (pattern, handler) pair for [`replace_callback_array`]. Handlers
/// receive the capture set of each match and return the replacement.
pub struct ReplacePair<'a> {
    pub pattern: &'a str,
    pub handler: Box<dyn FnMut(&[Option<MatchCapture>]) -> String + 'a>,
}

fn compile(operation: &'static str, pattern: &str) -> SafeResult<Regex> {
    Regex::new(pattern).map_err(|e| SafeError::for_operation(operation, None, e.to_string()))
}

fn capture_set(caps: &regex::Captures<'_>) -> Vec<Option<MatchCapture>> {
    caps.iter()
        .map(|group| {
            group.map(|m| MatchCapture {
                text: m.as_str().to_string(),
                offset: m.start(),
            })
        })
        .collect()
}

/// Returns the elements of `items` that match `pattern` (or, with
/// `invert`, those that do not), order preserved.
pub fn grep(pattern: &str, items: &[String], invert: bool) -> SafeResult<Vec<String>> {
    let re = compile("grep", pattern)?;
    Ok(items
        .iter()
        .filter(|item| re.is_match(item) != invert)
        .cloned()
        .collect())
}

/// Searches `subject` for the first match of `pattern`.
///
/// Returns `1` if the pattern matched, `0` otherwise. The by-reference
/// `matches` slot is always populated: the full match followed by each
/// capture group (`None` for groups that did not participate), or an
/// empty set when nothing matched.
pub fn match_first(
    pattern: &str,
    subject: &str,
    matches: &mut Option<Vec<Option<MatchCapture>>>,
) -> SafeResult<u32> {
    let re = compile("match_first", pattern)?;
    match re.captures(subject) {
        Some(caps) => {
            *matches = Some(capture_set(&caps));
            Ok(1)
        }
        None => {
            *matches = Some(Vec::new());
            Ok(0)
        }
    }
}

/// Searches `subject` for every match of `pattern`.
///
/// Returns the number of full-pattern matches (possibly zero). The
/// by-reference `matches` slot receives one capture set per match, in
/// match order.
pub fn match_all(
    pattern: &str,
    subject: &str,
    matches: &mut Option<Vec<Vec<Option<MatchCapture>>>>,
) -> SafeResult<usize> {
    let re = compile("match_all", pattern)?;
    let sets: Vec<Vec<Option<MatchCapture>>> = re
        .captures_iter(subject)
        .map(|caps| capture_set(&caps))
        .collect();
    let n = sets.len();
    *matches = Some(sets);
    Ok(n)
}

/// Applies up to `limit` replacements of `re` in one subject element.
/// The per-element replacement count is added to `total`.
fn replace_one(
    re: &Regex,
    subject: &str,
    callback: &mut dyn FnMut(&[Option<MatchCapture>]) -> String,
    limit: i64,
    total: &mut usize,
) -> String {
    let mut spans: Vec<ReplacementSpan> = Vec::new();
    for caps in re.captures_iter(subject) {
        if limit >= 0 && spans.len() as i64 >= limit {
            break;
        }
        let Some(m) = caps.get(0) else { continue };
        let set = capture_set(&caps);
        spans.push(ReplacementSpan {
            start: m.start(),
            end: m.end(),
            text: callback(&set),
        });
    }
    *total += spans.len();
    textops::splice(subject, &spans)
}

/// Replaces matches of `pattern` in `subject` with the callback's
/// output.
///
/// `limit` caps replacements per subject element ([`NO_LIMIT`] for
/// unlimited). The by-reference `count` slot receives the total number of
/// replacements performed. The result has exactly the shape of the input
/// subject: a single string stays a single string, a batch stays a batch
/// with elements transformed independently.
pub fn replace_callback<F>(
    pattern: &str,
    mut callback: F,
    subject: Subject,
    limit: i64,
    count: &mut Option<usize>,
) -> SafeResult<Subject>
where
    F: FnMut(&[Option<MatchCapture>]) -> String,
{
    let re = compile("replace_callback", pattern)?;
    let mut total = 0usize;
    let out = subject.try_map(|s| {
        Ok::<_, SafeError>(replace_one(&re, &s, &mut callback, limit, &mut total))
    })?;
    *count = Some(total);
    Ok(out)
}

/// Applies each (pattern, handler) pair in order to every subject
/// element.
///
/// Elements matched by no pattern are returned unchanged; the shape of
/// the subject is preserved. All patterns are compiled before any handler
/// runs, so a malformed pattern fails the whole call without side
/// effects. `count` accumulates replacements across patterns and
/// elements.
pub fn replace_callback_array(
    handlers: &mut [ReplacePair<'_>],
    subject: Subject,
    limit: i64,
    count: &mut Option<usize>,
) -> SafeResult<Subject> {
    let mut compiled = Vec::with_capacity(handlers.len());
    for pair in handlers.iter() {
        compiled.push(compile("replace_callback_array", pair.pattern)?);
    }
    let mut total = 0usize;
    let out = subject.try_map(|mut s| {
        for (re, pair) in compiled.iter().zip(handlers.iter_mut()) {
            s = replace_one(re, &s, &mut pair.handler, limit, &mut total);
        }
        Ok::<_, SafeError>(s)
    })?;
    *count = Some(total);
    Ok(out)
}

/// Splits `subject` on matches of `pattern`.
///
/// `limit <= 0` means no limit; `limit == n > 0` returns at most `n`
/// pieces with the remainder concatenated into the final piece. Flags:
/// [`SPLIT_NO_EMPTY`], [`SPLIT_DELIM_CAPTURE`].
pub fn split(pattern: &str, subject: &str, limit: i64, flags: u32) -> SafeResult<Vec<String>> {
    let re = compile("split", pattern)?;
    let mut delims: Vec<DelimSpan> = Vec::new();
    for caps in re.captures_iter(subject) {
        let Some(m) = caps.get(0) else { continue };
        delims.push(DelimSpan {
            start: m.start(),
            end: m.end(),
            groups: caps
                .iter()
                .skip(1)
                .map(|g| g.map(|m| m.as_str().to_string()))
                .collect(),
        });
    }
    Ok(textops::assemble_split(subject, &delims, limit, flags))
}

/// Escapes regex metacharacters so the result matches `text` literally.
/// Never fails.
pub fn quote(text: &str) -> String {
    regex::escape(text)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_pattern_is_typed_error() {
        let mut m = None;
        let err = match_first("(unclosed", "subject", &mut m).unwrap_err();
        assert!(matches!(err, SafeError::Pcre { .. }));
        assert_eq!(err.operation(), "match_first");
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_match_first_fills_captures() {
        let mut m = None;
        let rc = match_first(r"(\w+)@(\w+)", "mail me at user@host now", &mut m).unwrap();
        assert_eq!(rc, 1);
        let caps = m.unwrap();
        assert_eq!(caps[0].as_ref().unwrap().text, "user@host");
        assert_eq!(caps[0].as_ref().unwrap().offset, 11);
        assert_eq!(caps[1].as_ref().unwrap().text, "user");
        assert_eq!(caps[2].as_ref().unwrap().text, "host");
    }

    #[test]
    fn test_match_first_no_match_is_zero_not_error() {
        let mut m = None;
        let rc = match_first(r"\d+", "no digits here", &mut m).unwrap();
        assert_eq!(rc, 0);
        assert_eq!(m, Some(Vec::new()));
    }

    #[test]
    fn test_match_first_unmatched_group_is_none() {
        let mut m = None;
        let rc = match_first(r"a(b)?(c)", "ac", &mut m).unwrap();
        assert_eq!(rc, 1);
        let caps = m.unwrap();
        assert!(caps[1].is_none());
        assert_eq!(caps[2].as_ref().unwrap().text, "c");
    }

    #[test]
    fn test_match_all_counts_and_orders() {
        let mut m = None;
        let n = match_all(r"(\d+)", "a1 b22 c333", &mut m).unwrap();
        assert_eq!(n, 3);
        let sets = m.unwrap();
        assert_eq!(sets.len(), 3);
        assert_eq!(sets[1][1].as_ref().unwrap().text, "22");
        assert_eq!(sets[2][0].as_ref().unwrap().offset, 8);
    }

    #[test]
    fn test_grep_and_invert() {
        let items: Vec<String> = ["alpha", "42", "beta", "7"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(grep(r"^\d+$", &items, false).unwrap(), vec!["42", "7"]);
        assert_eq!(
            grep(r"^\d+$", &items, true).unwrap(),
            vec!["alpha", "beta"]
        );
    }

    #[test]
    fn test_replace_callback_scalar_shape_and_count() {
        let mut count = None;
        let out = replace_callback(
            r"\d+",
            |caps| format!("<{}>", caps[0].as_ref().map(|c| c.text.as_str()).unwrap_or("")),
            Subject::from("a1b22c"),
            NO_LIMIT,
            &mut count,
        )
        .unwrap();
        assert_eq!(out, Subject::One("a<1>b<22>c".to_string()));
        assert_eq!(count, Some(2));
    }

    #[test]
    fn test_replace_callback_limit_is_per_element() {
        let mut count = None;
        let subject = Subject::from(vec!["1 2 3".to_string(), "4 5".to_string()]);
        let out = replace_callback(r"\d", |_| "x".to_string(), subject, 1, &mut count).unwrap();
        assert_eq!(
            out,
            Subject::Many(vec!["x 2 3".to_string(), "x 5".to_string()])
        );
        assert_eq!(count, Some(2));
    }

    #[test]
    fn test_replace_callback_array_shape_preserved() {
        // Two patterns, two handlers, a batch subject: each element is
        // transformed by whichever pattern matches; unmatched elements
        // pass through unchanged.
        let mut pairs = [
            ReplacePair {
                pattern: r"^\d+$",
                handler: Box::new(|_: &[Option<MatchCapture>]| "NUM".to_string()),
            },
            ReplacePair {
                pattern: r"^[a-z]+$",
                handler: Box::new(|caps: &[Option<MatchCapture>]| {
                    caps[0].as_ref().map(|c| c.text.to_uppercase()).unwrap_or_default()
                }),
            },
        ];
        let subject = Subject::from(vec![
            "123".to_string(),
            "abc".to_string(),
            "?!".to_string(),
        ]);
        let mut count = None;
        let out = replace_callback_array(&mut pairs, subject, NO_LIMIT, &mut count).unwrap();
        assert_eq!(
            out,
            Subject::Many(vec![
                "NUM".to_string(),
                "ABC".to_string(),
                "?!".to_string(),
            ])
        );
        assert_eq!(count, Some(2));
    }

    #[test]
    fn test_replace_callback_array_single_string_stays_single() {
        let mut pairs = [ReplacePair {
            pattern: r"b",
            handler: Box::new(|_: &[Option<MatchCapture>]| "B".to_string()),
        }];
        let mut count = None;
        let out =
            replace_callback_array(&mut pairs, Subject::from("abc"), NO_LIMIT, &mut count)
                .unwrap();
        assert_eq!(out, Subject::One("aBc".to_string()));
    }

    #[test]
    fn test_replace_callback_array_bad_pattern_fails_whole_call() {
        let mut pairs = [
            ReplacePair {
                pattern: r"ok",
                handler: Box::new(|_: &[Option<MatchCapture>]| "x".to_string()),
            },
            ReplacePair {
                pattern: r"(broken",
                handler: Box::new(|_: &[Option<MatchCapture>]| "y".to_string()),
            },
        ];
        let mut count = None;
        let err = replace_callback_array(&mut pairs, Subject::from("ok"), NO_LIMIT, &mut count)
            .unwrap_err();
        assert_eq!(err.operation(), "replace_callback_array");
        assert!(count.is_none());
    }

    #[test]
    fn test_split_no_limit_and_positive_limit() {
        assert_eq!(
            split(r",", "a,b,c", 0, 0).unwrap(),
            vec!["a", "b", "c"]
        );
        assert_eq!(split(r",", "a,b,c", -1, 0).unwrap(), vec!["a", "b", "c"]);
        assert_eq!(split(r",", "a,b,c", 2, 0).unwrap(), vec!["a", "b,c"]);
    }

    #[test]
    fn test_split_flags() {
        assert_eq!(
            split(r"\s*(,)\s*", "a , b,c", 0, SPLIT_DELIM_CAPTURE).unwrap(),
            vec!["a", ",", "b", ",", "c"]
        );
        assert_eq!(
            split(r",", ",a,,b,", 0, SPLIT_NO_EMPTY).unwrap(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_quote_round_trips_through_matcher() {
        let literal = "1.5+2 (approx?)";
        let mut m = None;
        let rc = match_first(&quote(literal), literal, &mut m).unwrap();
        assert_eq!(rc, 1);
    }

    #[test]
    fn test_failed_compile_then_valid_match_succeeds() {
        // Diagnostic attribution: an earlier failure must not leak into a
        // later, valid call.
        let mut m = None;
        assert!(match_first("(bad", "x", &mut m).is_err());
        let rc = match_first("x", "x", &mut m).unwrap();
        assert_eq!(rc, 1);
    }
}
