pub mod json;
pub mod md;
pub mod sarif;

use crate::error::GradeError;
use crate::types::report::Report;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
    Sarif,
}

pub fn render(report: &Report, format: OutputFormat) -> Result<String, GradeError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(GradeError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
        OutputFormat::Sarif => sarif::to_sarif(report).map_err(GradeError::Json),
    }
}
