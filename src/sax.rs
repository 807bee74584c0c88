//! Push event interface between a tokenizer and the conversion session.
//!
//! Events mirror a SAX content handler.  Returning `Err` aborts the whole
//! conversion; every recoverable markup problem is handled inside the
//! receiver and reported through its counters instead.

use crate::error::XhtmlError;

pub trait SaxHandler {
    /// An opening tag (or the opening half of a self-closed tag).
    /// Attribute names and values arrive raw, in source order.
    fn start_element(
        &mut self,
        name: &str,
        attrs: &[(String, String)],
    ) -> Result<(), XhtmlError>;

    fn end_element(&mut self, name: &str) -> Result<(), XhtmlError>;

    /// Character data that is not only whitespace.
    fn characters(&mut self, text: &str) -> Result<(), XhtmlError>;

    /// A run of whitespace between other events.
    fn whitespace(&mut self) -> Result<(), XhtmlError>;

    fn cdata_section(&mut self, text: &str) -> Result<(), XhtmlError>;

    fn comment(&mut self, text: &str) -> Result<(), XhtmlError>;

    /// The raw text between `<!DOCTYPE` and `>`.
    fn doctype_declaration(&mut self, text: &str) -> Result<(), XhtmlError>;

    /// An entity or character reference, `name` without `&` and `;`.
    fn reference(&mut self, name: &str) -> Result<(), XhtmlError>;

    /// A low-level markup error the tokenizer recovered from.
    fn error(&mut self) -> Result<(), XhtmlError>;
}
