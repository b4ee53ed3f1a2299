//! Score extraction and final aggregation.

use crate::models::interview::InterviewResponse;

/// Used when an evaluation contains no parsable integer.
pub const DEFAULT_SCORE: u32 = 5;
/// Averages strictly above this are labelled positively.
pub const STRONG_THRESHOLD: f64 = 7.0;

pub const STRONG_FEEDBACK: &str = "Strong performance";
pub const IMPROVEMENT_FEEDBACK: &str = "Needs improvement";

/// Returns the first run of ASCII digits in `evaluation` as the score.
/// Falls back to `DEFAULT_SCORE` when there is none or it overflows.
pub fn extract_score(evaluation: &str) -> u32 {
    let Some(start) = evaluation.find(|c: char| c.is_ascii_digit()) else {
        return DEFAULT_SCORE;
    };
    let digits = &evaluation[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().unwrap_or(DEFAULT_SCORE)
}

/// Arithmetic mean of all response scores, `None` for an empty slice.
pub fn average_score(responses: &[InterviewResponse]) -> Option<f64> {
    if responses.is_empty() {
        return None;
    }
    let total: f64 = responses.iter().map(|r| f64::from(r.score)).sum();
    Some(total / responses.len() as f64)
}

pub fn feedback_for(average: f64) -> &'static str {
    if average > STRONG_THRESHOLD {
        STRONG_FEEDBACK
    } else {
        IMPROVEMENT_FEEDBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(score: u32) -> InterviewResponse {
        InterviewResponse {
            question: "Q".into(),
            answer: "A".into(),
            evaluation: format!("Score: {score}/10"),
            score,
        }
    }

    #[test]
    fn test_extract_score_from_fraction() {
        assert_eq!(extract_score("Score: 8/10. Clear and correct."), 8);
    }

    #[test]
    fn test_extract_score_multi_digit() {
        assert_eq!(extract_score("Rating 10 out of 10"), 10);
    }

    #[test]
    fn test_extract_score_defaults_without_digits() {
        assert_eq!(extract_score("A thoughtful answer, well structured."), DEFAULT_SCORE);
        assert_eq!(extract_score(""), DEFAULT_SCORE);
    }

    #[test]
    fn test_extract_score_overflow_defaults() {
        assert_eq!(extract_score("id 99999999999999999999"), DEFAULT_SCORE);
    }

    #[test]
    fn test_extract_score_ignores_non_ascii_digits() {
        assert_eq!(extract_score("٣ then 4"), 4);
    }

    #[test]
    fn test_average_six_and_eight() {
        let avg = average_score(&[response(6), response(8)]).unwrap();
        assert!((avg - 7.0).abs() < f64::EPSILON);
        assert_eq!(feedback_for(avg), IMPROVEMENT_FEEDBACK);
    }

    #[test]
    fn test_average_empty_is_none() {
        assert_eq!(average_score(&[]), None);
    }

    #[test]
    fn test_feedback_threshold_is_strict() {
        assert_eq!(feedback_for(7.0), IMPROVEMENT_FEEDBACK);
        assert_eq!(feedback_for(7.01), STRONG_FEEDBACK);
        assert_eq!(feedback_for(2.0), IMPROVEMENT_FEEDBACK);
    }
}
