//! Simulated feedback: a fixed processing delay followed by a hardcoded
//! report. Nothing here reads the interview record or the candidate's
//! answers, and nothing is written back.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::TextExport;

/// How long the "analysis" appears to take.
pub const FEEDBACK_PROCESSING_DELAY: Duration = Duration::from_secs(3);

pub const FEEDBACK_REPORT_FILE_NAME: &str = "interview_feedback_report.txt";

/// Transient, view-local scores; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackData {
    pub overall_score: u8,
    pub communication: u8,
    pub technical: u8,
    pub confidence: u8,
    pub clarity: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
    pub recommendations: Vec<String>,
}

/// The canned report every session receives.
pub fn simulated_feedback() -> FeedbackData {
    FeedbackData {
        overall_score: 78,
        communication: 82,
        technical: 75,
        confidence: 80,
        clarity: 76,
        strengths: vec![
            "Excellent communication skills and clear articulation".to_string(),
            "Strong technical knowledge in relevant areas".to_string(),
            "Confident presentation and professional demeanor".to_string(),
            "Good examples and specific details in responses".to_string(),
        ],
        improvements: vec![
            "Could provide more specific examples for behavioral questions".to_string(),
            "Consider structuring answers using the STAR method".to_string(),
            "Work on reducing filler words during responses".to_string(),
            "Prepare more questions to ask the interviewer".to_string(),
        ],
        detailed_feedback: "Your interview performance showed strong potential with several \
                            standout qualities. Your communication skills were particularly \
                            impressive, demonstrating clarity and professionalism throughout the \
                            session. Your technical responses showed solid understanding of core \
                            concepts, though there's room for more detailed explanations in some \
                            areas. Your confidence level was appropriate and you maintained good \
                            eye contact with the camera. Overall, this was a solid interview \
                            performance that positions you well for consideration."
            .to_string(),
        recommendations: vec![
            "Practice the STAR method for behavioral questions".to_string(),
            "Research common industry-specific technical questions".to_string(),
            "Prepare thoughtful questions about the company culture".to_string(),
            "Work on storytelling techniques to make examples more engaging".to_string(),
            "Consider taking a public speaking or presentation course".to_string(),
        ],
    }
}

/// Label scale shown beside a score.
pub fn score_label(score: u8) -> &'static str {
    match score {
        90.. => "Excellent",
        80..=89 => "Good",
        70..=79 => "Average",
        60..=69 => "Below Average",
        _ => "Needs Improvement",
    }
}

/// Stub generator: waits the fixed processing delay, then fabricates the
/// report. `immediate` skips the delay for tests and the CLI demo.
pub struct FeedbackGenerator {
    delay: Duration,
}

impl FeedbackGenerator {
    pub fn new() -> Self {
        Self {
            delay: FEEDBACK_PROCESSING_DELAY,
        }
    }

    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    pub async fn generate(&self) -> FeedbackData {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        simulated_feedback()
    }
}

impl Default for FeedbackGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the plain-text report offered as a download.
pub fn feedback_report_export(feedback: &FeedbackData, generated_on: NaiveDate) -> TextExport {
    let bullets = |lines: &[String]| {
        lines
            .iter()
            .map(|line| format!("\u{2022} {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = format!(
        "INTERVIEW FEEDBACK REPORT\n\n\
         Overall Score: {}/100\n\n\
         SKILL BREAKDOWN:\n\
         - Communication: {}/100\n\
         - Technical Knowledge: {}/100\n\
         - Confidence: {}/100\n\
         - Clarity: {}/100\n\n\
         STRENGTHS:\n{}\n\n\
         AREAS FOR IMPROVEMENT:\n{}\n\n\
         DETAILED FEEDBACK:\n{}\n\n\
         RECOMMENDATIONS:\n{}\n\n\
         Generated on: {}",
        feedback.overall_score,
        feedback.communication,
        feedback.technical,
        feedback.confidence,
        feedback.clarity,
        bullets(&feedback.strengths),
        bullets(&feedback.improvements),
        feedback.detailed_feedback,
        bullets(&feedback.recommendations),
        generated_on.format("%-m/%-d/%Y"),
    );

    TextExport {
        file_name: FEEDBACK_REPORT_FILE_NAME.to_string(),
        content,
    }
}
