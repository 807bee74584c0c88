//! Error kinds raised while converting a document.
//!
//! Ordinary markup problems (unknown elements, misplaced children, bad
//! attribute values) are repaired or dropped in place and never surface
//! here; the variants below are the conditions that end a conversion.

use std::fmt;

/// A condition that terminates the whole conversion.
///
/// `Dataset` and `NoRootElement` are internal-consistency failures: they can
/// only be produced by a corrupt grammar dataset or by an input that never
/// yielded a single element, never by malformed markup alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XhtmlError {
    /// The compiled grammar dataset is malformed (for example a content
    /// model whose byte stream does not open with a group marker).
    Dataset(String),
    /// End of input was reached without any root element being created.
    NoRootElement,
    /// Strict mode discarded the document root during close-time repair.
    DocumentDiscarded,
    /// The configured error ceiling was exceeded.
    TooManyErrors(u32),
}

impl fmt::Display for XhtmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XhtmlError::Dataset(msg) => write!(f, "corrupt grammar dataset: {msg}"),
            XhtmlError::NoRootElement => write!(f, "document without root element"),
            XhtmlError::DocumentDiscarded => write!(f, "document discarded in strict mode"),
            XhtmlError::TooManyErrors(n) => write!(f, "too many errors in the input ({n})"),
        }
    }
}

impl std::error::Error for XhtmlError {}
