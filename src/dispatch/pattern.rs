//! Address pattern matching.
//!
//! Patterns are matched left to right against the whole address:
//!
//! - `?` matches any single character.
//! - `*` matches the shortest run up to the next literal pattern character;
//!   a trailing `*` matches whatever is left, including nothing.
//! - `[abc]` matches one character from the set, `[a-z]` one character in
//!   the range (bounds may be given in either order). A leading `!` negates.
//! - `{foo,bar}` matches the first alternative that is a prefix of the
//!   remaining address. There is no backtracking into a class or alternation.
//! - Any other character matches itself.
//!
//! Patterns are not validated. An unterminated `[` or `{` never matches.
//!
//! # Example
//!
//! ```
//! use oscwire::dispatch::pattern_match;
//!
//! assert!(pattern_match("/mixer/ch3/gain", "/mixer/ch[1-4]/*"));
//! assert!(pattern_match("/mixer/ch3/gain", "/mixer/*/{gain,pan}"));
//! assert!(!pattern_match("/mixer/ch3/gain", "/mixer/ch[!3]/gain"));
//! ```

/// Check whether `address` matches `pattern` in full.
pub fn pattern_match(address: &str, pattern: &str) -> bool {
    let seq = address.as_bytes();
    let pat = pattern.as_bytes();
    let (mut s, mut p) = (0, 0);

    while s < seq.len() && p < pat.len() {
        match pat[p] {
            b'?' => {}
            b'*' => {
                p += 1;
                let Some(&next) = pat.get(p) else {
                    return true;
                };
                match seq[s..].iter().position(|&c| c == next) {
                    Some(offset) => s += offset,
                    None => return false,
                }
            }
            b'[' => match match_class(seq[s], pat, p + 1) {
                Some(close) => p = close,
                None => return false,
            },
            b'{' => match match_alternation(&seq[s..], pat, p + 1) {
                Some((consumed, close)) => {
                    s += consumed;
                    p = close + 1;
                    continue;
                }
                None => return false,
            },
            literal => {
                if seq[s] != literal {
                    return false;
                }
            }
        }
        s += 1;
        p += 1;
    }

    s == seq.len() && (p == pat.len() || &pat[p..] == b"*")
}

/// Match one character against the class body starting at `start`.
///
/// Returns the index of the closing `]` when `c` is accepted.
fn match_class(c: u8, pat: &[u8], start: usize) -> Option<usize> {
    let mut p = start;
    let negate = pat.get(p) == Some(&b'!');
    if negate {
        p += 1;
    }

    let close = p + pat.get(p..)?.iter().position(|&b| b == b']')?;
    let body = &pat[p..close];

    let member = if body.len() >= 3 && body[1] == b'-' {
        let (lo, hi) = if body[0] <= body[2] {
            (body[0], body[2])
        } else {
            (body[2], body[0])
        };
        (lo..=hi).contains(&c)
    } else {
        body.contains(&c)
    };

    (member != negate).then_some(close)
}

/// Try each comma-separated alternative starting at `start` against `seq`.
///
/// Returns the number of address bytes consumed and the index of the
/// closing `}`.
fn match_alternation(seq: &[u8], pat: &[u8], start: usize) -> Option<(usize, usize)> {
    let close = start + pat.get(start..)?.iter().position(|&b| b == b'}')?;

    pat[start..close]
        .split(|&b| b == b',')
        .find(|alt| seq.starts_with(alt))
        .map(|alt| (alt.len(), close))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQ: &str = "/abc/d";

    #[test]
    fn test_plain_characters() {
        assert!(pattern_match(SEQ, "/abc/d"));
        assert!(!pattern_match(SEQ, "/ab/d"));
        assert!(!pattern_match(SEQ, "/abc/de"));
        assert!(!pattern_match(SEQ, "/abc/"));
    }

    #[test]
    fn test_question_mark() {
        assert!(pattern_match(SEQ, "/abc/?"));
        assert!(pattern_match(SEQ, "/?bc/?"));
        assert!(!pattern_match(SEQ, "/?/d"));
    }

    #[test]
    fn test_star() {
        assert!(pattern_match(SEQ, "/*/d"));
        assert!(pattern_match(SEQ, "/*/?"));
        assert!(pattern_match(SEQ, "/*/*"));
        assert!(pattern_match(SEQ, "/a*c/d"));
        assert!(pattern_match(SEQ, "*"));
        assert!(!pattern_match(SEQ, "/*/x"));
    }

    #[test]
    fn test_trailing_star_matches_empty_rest() {
        assert!(pattern_match("/abc", "/abc*"));
        assert!(!pattern_match("/abc", "/abc**"));
    }

    #[test]
    fn test_character_class() {
        assert!(pattern_match(SEQ, "/[abc]bc/d"));
        assert!(!pattern_match(SEQ, "/[!abc]bc/d"));
        assert!(pattern_match(SEQ, "/abc/[d]"));
        assert!(pattern_match(SEQ, "/abc/[!abc]"));
        assert!(!pattern_match(SEQ, "/[xyz]bc/d"));
    }

    #[test]
    fn test_character_range() {
        assert!(pattern_match(SEQ, "/abc/[!a-c]"));
        assert!(pattern_match(SEQ, "/a[a-c]c/d"));
        assert!(!pattern_match(SEQ, "/[1-9]bc/d"));
        assert!(pattern_match(SEQ, "/a[c-a]c/d"));
        assert!(!pattern_match(SEQ, "/a[!c-a]c/d"));
    }

    #[test]
    fn test_alternation() {
        assert!(pattern_match(SEQ, "/{bed,abc,foo}/d"));
        assert!(pattern_match(SEQ, "/{abc,foo}/d"));
        assert!(!pattern_match(SEQ, "/{abcd,foo}/d"));
        assert!(pattern_match(SEQ, "/abc/{a,b,d}"));
        assert!(!pattern_match(SEQ, "/abc/{a,b,c}"));
        assert!(pattern_match(SEQ, "/a{blah,bc}/d"));
    }

    #[test]
    fn test_alternation_first_prefix_wins() {
        // "ab" is taken first, leaving "c/d" against "/d"
        assert!(!pattern_match(SEQ, "/{ab,abc}/d"));
        assert!(pattern_match(SEQ, "/{ab,abc}c/d"));
    }

    #[test]
    fn test_empty_alternative() {
        assert!(pattern_match(SEQ, "/abc{,x}/d"));
    }

    #[test]
    fn test_malformed_patterns_do_not_match() {
        assert!(!pattern_match(SEQ, "/[abc"));
        assert!(!pattern_match(SEQ, "/{abc"));
        assert!(!pattern_match(SEQ, "/["));
        assert!(!pattern_match(SEQ, "/[!"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(pattern_match("", ""));
        assert!(!pattern_match("", "/a"));
        assert!(!pattern_match("/a", ""));
    }

    #[test]
    fn test_minus_at_end_is_literal() {
        assert!(pattern_match("/a-", "/a[b-]"));
        assert!(!pattern_match("/ac", "/a[b-]"));
    }
}
