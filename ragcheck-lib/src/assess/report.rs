use std::fmt;

use serde::Serialize;

use crate::assess::TestCase;
use crate::extract::Answer;
use crate::search::Retrieval;
use crate::Error;

/// Owned copy of a [`Retrieval`], kept in the report after the store is gone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedPassage {
    pub index: usize,
    pub passage: String,
    pub score: f32,
}

impl From<&Retrieval<'_>> for RetrievedPassage {
    fn from(r: &Retrieval<'_>) -> Self {
        Self {
            index: r.index,
            passage: r.passage.to_string(),
            score: r.score,
        }
    }
}

/// Pipeline stage at which a case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Retrieval,
    Extraction,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retrieval => f.write_str("retrieval"),
            Self::Extraction => f.write_str("extraction"),
        }
    }
}

/// An error caught while assessing one case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseFailure {
    pub stage: Stage,
    pub message: String,
}

impl CaseFailure {
    #[must_use]
    pub fn new(stage: Stage, error: &Error) -> Self {
        Self {
            stage,
            message: error.to_string(),
        }
    }
}

/// Outcome of a single test case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    /// The case as supplied
    pub case: TestCase,
    /// Best passage, absent when retrieval failed
    pub retrieved: Option<RetrievedPassage>,
    /// Extracted answer, absent when retrieval or extraction failed
    pub answer: Option<Answer>,
    pub retrieval_correct: bool,
    pub answer_correct: bool,
    /// Set when a stage errored instead of producing output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CaseFailure>,
}

impl CaseResult {
    /// Points earned by this case, 0 to 2.
    #[must_use]
    pub fn points(&self) -> u32 {
        u32::from(self.retrieval_correct) + u32::from(self.answer_correct)
    }
}

/// Qualitative band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every point earned
    Perfect,
    /// At least half of the points earned
    Passing,
    /// Less than half of the points earned
    NeedsWork,
}

impl Verdict {
    #[must_use]
    pub fn from_points(earned: u32, possible: u32) -> Self {
        if earned >= possible {
            Self::Perfect
        } else if u64::from(earned) * 2 >= u64::from(possible) {
            Self::Passing
        } else {
            Self::NeedsWork
        }
    }
}

/// Aggregate result of one assessment run.
///
/// Points are derived from the per-case results at construction, two
/// possible per case.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    points_earned: u32,
    points_possible: u32,
    verdict: Verdict,
    results: Vec<CaseResult>,
}

impl ScoreReport {
    #[must_use]
    pub fn new(results: Vec<CaseResult>) -> Self {
        let points_earned = results.iter().map(CaseResult::points).sum();
        let points_possible = 2 * results.len() as u32;

        Self {
            points_earned,
            points_possible,
            verdict: Verdict::from_points(points_earned, points_possible),
            results,
        }
    }

    #[must_use]
    pub fn points_earned(&self) -> u32 {
        self.points_earned
    }

    #[must_use]
    pub fn points_possible(&self) -> u32 {
        self.points_possible
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Per-case results in input order.
    #[must_use]
    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    /// Fraction of points earned; `1.0` when nothing was possible.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.points_possible == 0 {
            return 1.0;
        }
        f64::from(self.points_earned) / f64::from(self.points_possible)
    }

    #[must_use]
    pub fn retrieval_points(&self) -> u32 {
        self.results.iter().filter(|r| r.retrieval_correct).count() as u32
    }

    #[must_use]
    pub fn answer_points(&self) -> u32 {
        self.results.iter().filter(|r| r.answer_correct).count() as u32
    }

    /// Cases where a stage raised an error.
    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.failure.is_some())
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.verdict == Verdict::Perfect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(retrieval_correct: bool, answer_correct: bool) -> CaseResult {
        CaseResult {
            case: TestCase::new("q", "k", "a"),
            retrieved: None,
            answer: None,
            retrieval_correct,
            answer_correct,
            failure: None,
        }
    }

    #[test]
    fn test_points_per_case() {
        assert_eq!(result(false, false).points(), 0);
        assert_eq!(result(true, false).points(), 1);
        assert_eq!(result(false, true).points(), 1);
        assert_eq!(result(true, true).points(), 2);
    }

    #[test]
    fn test_report_totals() {
        let report = ScoreReport::new(vec![result(true, true), result(true, false), result(false, false)]);

        assert_eq!(report.points_earned(), 3);
        assert_eq!(report.points_possible(), 6);
        assert_eq!(report.retrieval_points(), 2);
        assert_eq!(report.answer_points(), 1);
        assert!((report.ratio() - 0.5).abs() < 1e-9);
        assert_eq!(report.verdict(), Verdict::Passing);
    }

    #[test]
    fn test_empty_report() {
        let report = ScoreReport::new(Vec::new());
        assert_eq!(report.points_earned(), 0);
        assert_eq!(report.points_possible(), 0);
        assert!(report.results().is_empty());
        assert!(report.is_perfect());
        assert_eq!(report.ratio(), 1.0);
    }

    #[test]
    fn test_lost_point_is_not_perfect() {
        let report = ScoreReport::new(vec![result(true, true), result(true, false)]);
        assert!(!report.is_perfect());
        assert!((report.ratio() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_verdict_bands() {
        assert_eq!(Verdict::from_points(10, 10), Verdict::Perfect);
        assert_eq!(Verdict::from_points(5, 10), Verdict::Passing);
        assert_eq!(Verdict::from_points(7, 10), Verdict::Passing);
        assert_eq!(Verdict::from_points(4, 10), Verdict::NeedsWork);
        assert_eq!(Verdict::from_points(1, 3), Verdict::NeedsWork);
        assert_eq!(Verdict::from_points(0, 2), Verdict::NeedsWork);
    }

    #[test]
    fn test_failures_filter() {
        let mut failed = result(true, false);
        failed.failure = Some(CaseFailure::new(
            Stage::Extraction,
            &Error::Extraction("boom".to_string()),
        ));
        let report = ScoreReport::new(vec![result(true, true), failed]);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].failure.as_ref().unwrap().message, "extraction error: boom");
    }
}
