//! Metric name normalization.
//!
//! Heka reports field names in camel case (`ProcessMessageCount`) and
//! occasionally with hyphens. Prometheus metric names are conventionally
//! lowercase with underscores, so every field key goes through [`normalize`]
//! before it becomes part of a metric name.

/// Separator inserted between words.
const SEPARATOR: char = '_';

/// Convert a camel-case (possibly hyphenated) identifier into a lowercase,
/// underscore-delimited metric name fragment.
///
/// A separator is inserted before an uppercase letter only when a lowercase
/// letter or non-letter has been seen since the previous separator, so runs of
/// capitals stay together. Hyphens become separators afterwards.
///
/// # Example
///
/// ```
/// use heka_exporter::normalize;
///
/// assert_eq!(normalize("inputDroppedEvents"), "input_dropped_events");
/// assert_eq!(normalize("ProcessMessageCount"), "process_message_count");
/// assert_eq!(normalize("foo-bar"), "foo_bar");
/// ```
pub fn normalize(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len() + 4);
    let mut pending_separator = false;

    for c in identifier.chars() {
        if c.is_uppercase() {
            if pending_separator {
                out.push(SEPARATOR);
                pending_separator = false;
            }
            out.extend(c.to_lowercase());
        } else {
            pending_separator = true;
            out.push(c);
        }
    }

    out.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(normalize("inputDroppedEvents"), "input_dropped_events");
        assert_eq!(normalize("ProcessMessageCount"), "process_message_count");
        assert_eq!(normalize("InChanLength"), "in_chan_length");
    }

    #[test]
    fn test_hyphens() {
        assert_eq!(normalize("foo-bar"), "foo_bar");
        assert_eq!(normalize("memstats-HeapAlloc"), "memstats__heap_alloc");
    }

    #[test]
    fn test_uppercase_runs_do_not_split() {
        assert_eq!(normalize("ABCfoo"), "abcfoo");
        assert_eq!(normalize("ABC"), "abc");
        assert_eq!(normalize("fooBAR"), "foo_bar");
        assert_eq!(normalize("MatchAvgDuration"), "match_avg_duration");
    }

    #[test]
    fn test_digits_count_as_non_letters() {
        assert_eq!(normalize("tcp4Output"), "tcp4_output");
        assert_eq!(normalize("Output2"), "output2");
    }

    #[test]
    fn test_already_normalized_is_unchanged() {
        for name in ["process_message_count", "memory", "a_b_c"] {
            assert_eq!(normalize(name), name);
        }
    }

    #[test]
    fn test_separators_only_follow_non_uppercase() {
        for input in ["ABCfoo", "aBcDeF", "X-Y", "HTTPServerErrors", "lowerUPPERlower"] {
            let chars: Vec<char> = input.chars().collect();
            let mut expected_separators = 0;
            let mut pending = false;
            for c in &chars {
                if c.is_uppercase() {
                    if pending {
                        expected_separators += 1;
                        pending = false;
                    }
                } else {
                    pending = true;
                }
            }
            let hyphens = chars.iter().filter(|c| **c == '-').count();
            let produced = normalize(input).chars().filter(|c| *c == '_').count();
            assert_eq!(produced, expected_separators + hyphens, "input {input:?}");
        }
    }
}
