//! Report module - standalone XHTML report with decorated sub-headings

pub mod ornament;
mod page;

pub use ornament::decorate_headings;
pub use page::ReportWriter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Report markup error: {0}")]
    Xml(String),
}

pub(crate) fn xml_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Xml(err.to_string())
}
