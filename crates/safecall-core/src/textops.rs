//! Pure text shaping for the split and replace wrappers.
//!
//! The pattern engine only reports where delimiters/matches sit in the
//! subject; everything else (limit handling, empty-piece filtering,
//! delimiter capture, replacement splicing) is plain offset arithmetic
//! kept here so it can be tested without an engine.

/// Drop empty pieces from the split result.
pub const SPLIT_NO_EMPTY: u32 = 1 << 0;
/// Append captured delimiter groups to the split result.
pub const SPLIT_DELIM_CAPTURE: u32 = 1 << 1;

/// One delimiter occurrence located by the engine. Offsets are byte
/// positions into the subject; `groups` holds captured delimiter groups
/// (`None` for groups that did not participate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimSpan {
    pub start: usize,
    pub end: usize,
    pub groups: Vec<Option<String>>,
}

/// One replacement decided by a callback. Spans must be ascending and
/// non-overlapping, as produced by an engine match iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Assembles the split result from delimiter spans.
///
/// `limit <= 0` means no limit. `limit == n > 0` returns at most `n`
/// subject pieces, with the remainder of the subject (including any later
/// delimiters) concatenated into the final piece. Captured delimiter
/// groups appended under [`SPLIT_DELIM_CAPTURE`] do not count toward the
/// limit.
pub fn assemble_split(subject: &str, delims: &[DelimSpan], limit: i64, flags: u32) -> Vec<String> {
    let max_pieces = if limit <= 0 { usize::MAX } else { limit as usize };
    let no_empty = flags & SPLIT_NO_EMPTY != 0;
    let capture = flags & SPLIT_DELIM_CAPTURE != 0;

    let mut out: Vec<String> = Vec::new();
    let mut pieces = 0usize;
    let mut pos = 0usize;

    for d in delims {
        if pieces + 1 >= max_pieces {
            break;
        }
        // Engines hand spans in ascending order; anything overlapping the
        // consumed prefix is stale and skipped.
        if d.start < pos {
            continue;
        }
        let piece = &subject[pos..d.start];
        if !(no_empty && piece.is_empty()) {
            out.push(piece.to_string());
            pieces += 1;
        }
        if capture {
            for g in d.groups.iter().flatten() {
                if !(no_empty && g.is_empty()) {
                    out.push(g.clone());
                }
            }
        }
        pos = d.end;
    }

    let rest = &subject[pos..];
    if !(no_empty && rest.is_empty()) {
        out.push(rest.to_string());
    }
    out
}

/// Splices callback-produced replacements into the subject. Untouched
/// regions are copied through byte-identically.
pub fn splice(subject: &str, spans: &[ReplacementSpan]) -> String {
    let mut out = String::with_capacity(subject.len());
    let mut pos = 0usize;
    for s in spans {
        debug_assert!(s.start >= pos && s.end >= s.start);
        out.push_str(&subject[pos..s.start]);
        out.push_str(&s.text);
        pos = s.end;
    }
    out.push_str(&subject[pos..]);
    out
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(start: usize, end: usize) -> DelimSpan {
        DelimSpan {
            start,
            end,
            groups: Vec::new(),
        }
    }

    // -- assemble_split --

    #[test]
    fn test_split_no_limit_returns_all_pieces() {
        // "a,b,c" with delimiters at the commas.
        let got = assemble_split("a,b,c", &[d(1, 2), d(3, 4)], 0, 0);
        assert_eq!(got, vec!["a", "b", "c"]);
        let got = assemble_split("a,b,c", &[d(1, 2), d(3, 4)], -1, 0);
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_limit_concatenates_remainder() {
        let got = assemble_split("a,b,c", &[d(1, 2), d(3, 4)], 2, 0);
        assert_eq!(got, vec!["a", "b,c"]);
        let got = assemble_split("a,b,c", &[d(1, 2), d(3, 4)], 1, 0);
        assert_eq!(got, vec!["a,b,c"]);
    }

    #[test]
    fn test_split_limit_larger_than_pieces() {
        let got = assemble_split("a,b", &[d(1, 2)], 10, 0);
        assert_eq!(got, vec!["a", "b"]);
    }

    #[test]
    fn test_split_no_empty_drops_empty_pieces() {
        // ",a,,b," splits to ["", "a", "", "b", ""] without the flag.
        let delims = [d(0, 1), d(2, 3), d(3, 4), d(5, 6)];
        let got = assemble_split(",a,,b,", &delims, 0, 0);
        assert_eq!(got, vec!["", "a", "", "b", ""]);
        let got = assemble_split(",a,,b,", &delims, 0, SPLIT_NO_EMPTY);
        assert_eq!(got, vec!["a", "b"]);
    }

    #[test]
    fn test_split_delim_capture_appends_groups() {
        let delims = [DelimSpan {
            start: 1,
            end: 2,
            groups: vec![Some(",".to_string()), None],
        }];
        let got = assemble_split("a,b", &delims, 0, SPLIT_DELIM_CAPTURE);
        assert_eq!(got, vec!["a", ",", "b"]);
        // Without the flag, captures are ignored.
        let got = assemble_split("a,b", &delims, 0, 0);
        assert_eq!(got, vec!["a", "b"]);
    }

    #[test]
    fn test_split_delim_capture_does_not_count_toward_limit() {
        let delims = [
            DelimSpan {
                start: 1,
                end: 2,
                groups: vec![Some(",".to_string())],
            },
            DelimSpan {
                start: 3,
                end: 4,
                groups: vec![Some(",".to_string())],
            },
        ];
        let got = assemble_split("a,b,c", &delims, 2, SPLIT_DELIM_CAPTURE);
        assert_eq!(got, vec!["a", ",", "b,c"]);
    }

    #[test]
    fn test_split_no_delimiters_returns_whole_subject() {
        assert_eq!(assemble_split("abc", &[], 0, 0), vec!["abc"]);
        assert_eq!(
            assemble_split("", &[], 0, SPLIT_NO_EMPTY),
            Vec::<String>::new()
        );
    }

    // -- splice --

    #[test]
    fn test_splice_empty_spans_is_identity() {
        assert_eq!(splice("hello", &[]), "hello");
    }

    #[test]
    fn test_splice_replaces_in_order() {
        let spans = [
            ReplacementSpan {
                start: 0,
                end: 1,
                text: "H".to_string(),
            },
            ReplacementSpan {
                start: 4,
                end: 5,
                text: "O!".to_string(),
            },
        ];
        assert_eq!(splice("hello", &spans), "HellO!");
    }

    #[test]
    fn test_splice_adjacent_spans() {
        let spans = [
            ReplacementSpan {
                start: 0,
                end: 2,
                text: "X".to_string(),
            },
            ReplacementSpan {
                start: 2,
                end: 4,
                text: "Y".to_string(),
            },
        ];
        assert_eq!(splice("abcd", &spans), "XY");
    }

    #[test]
    fn test_splice_empty_replacement_deletes() {
        let spans = [ReplacementSpan {
            start: 1,
            end: 4,
            text: String::new(),
        }];
        assert_eq!(splice("abcde", &spans), "ae");
    }
}
