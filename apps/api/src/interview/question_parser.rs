//! Question List Parser — turns free-form generator output into clean questions.
//!
//! Fallback chain:
//! 1. strip every code-fence marker,
//! 2. try the cleaned text as a JSON array,
//! 3. otherwise split into lines and strip bullet / numbering markers.
//!
//! An empty result is legal here; callers decide whether it is a failure.

use serde_json::Value;

/// Parses raw generator text into an ordered list of trimmed, non-empty questions.
pub fn parse_question_list(raw: &str) -> Vec<String> {
    let cleaned = strip_fence_markers(raw);

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&cleaned) {
        return items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string().trim().to_string(),
            })
            .filter(|q| !q.is_empty())
            .collect();
    }

    cleaned
        .lines()
        .map(strip_list_marker)
        .filter(|q| !q.is_empty())
        .map(String::from)
        .collect()
}

/// Removes every "```json" (any case) and "```" occurrence, then trims.
fn strip_fence_markers(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find("```") {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        if rest
            .get(..4)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("json"))
        {
            rest = &rest[4..];
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

/// Strips one leading "-" / "*" bullet, then one leading "12." / "12)" number.
fn strip_list_marker(line: &str) -> &str {
    let mut s = line.trim_start();

    if let Some(rest) = s.strip_prefix(|c: char| c == '-' || c == '*') {
        s = rest.trim_start();
    }

    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = s[digits..].strip_prefix(|c: char| c == '.' || c == ')') {
            s = rest;
        }
    }

    s.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_array_literal() {
        assert_eq!(parse_question_list(r#"["Q1","Q2"]"#), vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_fenced_numbered_list() {
        let raw = "```\n1. Q1\n2. Q2\n```";
        assert_eq!(parse_question_list(raw), vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_fenced_json_array_with_tag() {
        let raw = "```JSON\n[\"  What is ownership? \", \"\", \"Explain lifetimes.\"]\n```";
        assert_eq!(
            parse_question_list(raw),
            vec!["What is ownership?", "Explain lifetimes."]
        );
    }

    #[test]
    fn test_plain_lines() {
        let raw = "Tell me about Go.\nDescribe a project.";
        assert_eq!(
            parse_question_list(raw),
            vec!["Tell me about Go.", "Describe a project."]
        );
    }

    #[test]
    fn test_bullets_and_paren_numbering() {
        let raw = "- First?\r\n* Second?\r\n\r\n\r\n3) Third?\n  - 4. Fourth?";
        assert_eq!(
            parse_question_list(raw),
            vec!["First?", "Second?", "Third?", "Fourth?"]
        );
    }

    #[test]
    fn test_number_without_marker_is_kept() {
        assert_eq!(
            parse_question_list("5 years of Rust: what changed?"),
            vec!["5 years of Rust: what changed?"]
        );
    }

    #[test]
    fn test_non_string_array_items_are_rendered() {
        assert_eq!(parse_question_list("[1, \"Q\", null]"), vec!["1", "Q", "null"]);
    }

    #[test]
    fn test_json_non_array_falls_back_to_lines() {
        assert_eq!(
            parse_question_list("\"Why Rust?\""),
            vec!["\"Why Rust?\""]
        );
    }

    #[test]
    fn test_empty_array_yields_nothing() {
        assert!(parse_question_list("[]").is_empty());
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(parse_question_list("").is_empty());
        assert!(parse_question_list("```json\n```").is_empty());
        assert!(parse_question_list("\n - \n * \n").is_empty());
    }

    #[test]
    fn test_reparsing_clean_output_is_stable() {
        let raw = "```\n1. Explain the borrow checker.\n2) Describe a project.\n- Why async?\n```";
        let once = parse_question_list(raw);
        let twice = parse_question_list(&once.join("\n"));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_strip_fence_markers_mid_text() {
        assert_eq!(strip_fence_markers("a```json b ``` c"), "a b  c");
    }
}
