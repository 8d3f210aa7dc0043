use serde::{Deserialize, Serialize};

use super::domain::Job;

/// Download formats offered on a listing. Only plain text is generated
/// in-service; the richer formats are placeholders for a future document
/// pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Txt,
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "txt" => Some(ExportFormat::Txt),
            "pdf" => Some(ExportFormat::Pdf),
            "docx" => Some(ExportFormat::Docx),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ExportFormat::Txt => "TXT",
            ExportFormat::Pdf => "PDF",
            ExportFormat::Docx => "DOCX",
        }
    }
}

/// An in-memory plain-text download, released to the caller immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextExport {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("{0} download would be implemented with backend API")]
    Unsupported(&'static str),
}

pub fn export_job_description(job: &Job, format: ExportFormat) -> Result<TextExport, ExportError> {
    match format {
        ExportFormat::Txt => Ok(job_description_text(job)),
        other => Err(ExportError::Unsupported(other.label())),
    }
}

fn job_description_text(job: &Job) -> TextExport {
    let content = format!(
        "{}\n{}\nLocation: {}\nType: {}\nSalary: {}\n\nDescription:\n{}\n\nRequirements:\n{}\n\nBenefits:\n{}",
        job.title,
        job.company,
        job.location,
        job.job_type.label(),
        job.salary_range,
        job.description,
        job.requirements.join("\n"),
        job.benefits.join("\n"),
    );

    TextExport {
        file_name: format!("{}_job_description.txt", underscored(&job.title)),
        content,
    }
}

/// Collapses whitespace runs in a title into single underscores.
fn underscored(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join("_")
}
