//! Document writers
//!
//! The generator does not produce bytes itself. It reports a document as a
//! sequence of structural events to a [`DocumentWriter`]:
//!
//! - `start_document`, `end_document`
//! - `declare_prefix(uri)`: bind a prefix ahead of use, returning it
//! - `start_element(namespace, name)` / `end_element`
//! - `add_attribute(namespace, name, value)`, only directly after
//!   `start_element` or another attribute
//! - `add_text(value)`, `add_comment(text)`
//!
//! Namespaces are passed as URIs; the empty string means no namespace.
//! Errors raised by a writer abort generation and reach the caller
//! unchanged.

mod recording;
mod xml;

pub use recording::{DocumentEvent, EventRecorder};
pub use xml::XmlWriter;

use crate::error::Result;

/// Receiver of the structural events of a generated document
pub trait DocumentWriter {
    /// Begin the document
    fn start_document(&mut self) -> Result<()>;

    /// Make sure `uri` has a prefix bound and return it. Prefixes declared
    /// before the first element are declared on the root element.
    fn declare_prefix(&mut self, uri: &str) -> Result<String>;

    /// Open an element
    fn start_element(&mut self, namespace: &str, name: &str) -> Result<()>;

    /// Add an attribute to the element just opened
    fn add_attribute(&mut self, namespace: &str, name: &str, value: &str) -> Result<()>;

    /// Add character data to the current element
    fn add_text(&mut self, text: &str) -> Result<()>;

    /// Add a comment
    fn add_comment(&mut self, text: &str) -> Result<()>;

    /// Close the innermost open element
    fn end_element(&mut self) -> Result<()>;

    /// Finish the document
    fn end_document(&mut self) -> Result<()>;
}
