//! Console rendering for score reports

use ragcheck_lib::assess::{CaseResult, ScoreReport, Verdict};
use ragcheck_lib::suite::Suite;

/// Print a suite's report in the human readable format.
pub fn print_report(suite: &Suite, report: &ScoreReport) {
    println!("=== Assessment: {} ===", suite.name);
    if let Some(description) = &suite.description {
        println!("{description}");
    }

    for (i, result) in report.results().iter().enumerate() {
        print_case(i + 1, result);
    }

    println!("\n--- Assessment complete ---");
    println!(
        "Final score: {} / {} ({:.0}%)  (retrieval {}, generation {})",
        report.points_earned(),
        report.points_possible(),
        report.ratio() * 100.0,
        report.retrieval_points(),
        report.answer_points(),
    );
    println!("{}\n", verdict_message(suite, report.verdict()));
}

fn print_case(number: usize, result: &CaseResult) {
    let case = &result.case;
    println!("\n--- Question {number}: '{}' ---", case.question);

    match &result.retrieved {
        Some(retrieved) => {
            println!(
                "Retrieved context #{} (score: {:.4}): '{}'",
                retrieved.index, retrieved.score, retrieved.passage
            );
            if result.retrieval_correct {
                println!("  [PASS] retrieval");
            } else {
                println!(
                    "  [FAIL] retrieval, expected context with keyword '{}'",
                    case.expected_keyword
                );
            }
        }
        None => println!("  [FAIL] retrieval"),
    }

    if let Some(answer) = &result.answer {
        match answer.confidence {
            Some(confidence) => println!("Generated answer: '{}' (confidence: {confidence:.4})", answer.text),
            None => println!("Generated answer: '{}'", answer.text),
        }
        if result.answer_correct {
            println!("  [PASS] generation");
        } else {
            println!("  [FAIL] generation, expected answer '{}'", case.expected_answer);
        }
    } else if result.retrieved.is_some() {
        println!("  [FAIL] generation");
    }

    if let Some(failure) = &result.failure {
        println!("  error during {}: {}", failure.stage, failure.message);
    }
}

fn verdict_message(suite: &Suite, verdict: Verdict) -> &str {
    match verdict {
        Verdict::Perfect => suite
            .success_message
            .as_deref()
            .unwrap_or("Perfect! The RAG system is working as expected."),
        Verdict::Passing => "Good job! The system is mostly correct.",
        Verdict::NeedsWork => "The system ran into some issues. Review the steps and check the logic.",
    }
}
