//! Convert tag-soup HTML into valid XHTML 1.0.
//!
//! The crate compiles the three XHTML 1.0 DTDs (strict, transitional and
//! frameset) into packed content models, then repairs an arbitrary HTML
//! event stream against them: misplaced elements are moved, wrapped or
//! dropped, attributes are validated and defaulted, and the document
//! skeleton is completed, so the finished tree always satisfies the
//! selected grammar.
//!
//! # Examples
//!
//! ```
//! use exhtml::{ConvertOptions, convert, output};
//!
//! let conv = convert("<p>Hello, world!", ConvertOptions::default()).unwrap();
//! let mut xhtml = Vec::new();
//! output::write_document(&conv, &mut xhtml).unwrap();
//! assert!(String::from_utf8(xhtml).unwrap().contains("<p>Hello, world!</p>"));
//! ```

pub mod conv;
pub mod dtd;
pub mod error;
pub mod output;
pub mod parser;
pub mod sax;
pub mod tree;
pub mod valid;

pub use conv::{Conversion, ConvertOptions, Session};
pub use dtd::Doctype;
pub use error::XhtmlError;

/// Run a whole conversion over `input`.
pub fn convert(input: &str, options: ConvertOptions) -> Result<Conversion, XhtmlError> {
    let mut session = Session::new(options)?;
    parser::parse(input, &mut session)?;
    session.finish()
}
