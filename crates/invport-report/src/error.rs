/// Errors that can occur while rendering report exports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// CSV serialization failed.
    #[error("Report: CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV buffer could not be finalized into a string.
    #[error("Report: CSV output error: {0}")]
    CsvOutput(String),

    /// PDF document construction failed.
    #[error("Report: PDF error: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Convenience `Result` alias for report rendering.
pub type Result<T> = std::result::Result<T, ReportError>;
