//! XML serialization of document events
//!
//! Start tags are held back until the first event that is not an
//! attribute, so attributes and namespace declarations can still be added
//! and elements without content are written self-closed.
//!
//! Namespace prefixes are stable for the whole document (`xsi`, `xs`, then
//! `ns1`, `ns2`, ...). A namespace is declared on the element where it is
//! first needed inside the current scope; prefixes requested before the
//! root element are declared on the root.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::DocumentWriter;
use crate::error::{Error, Result};
use crate::namespaces::{PrefixMap, XML_NAMESPACE};

#[derive(Debug)]
struct PendingStart {
    name: String,
    attributes: Vec<(String, String)>,
    declared: Vec<String>,
}

#[derive(Debug)]
struct OpenElement {
    name: String,
    declared: Vec<String>,
}

/// Writer serializing events as XML text through `quick-xml`
pub struct XmlWriter<W: Write> {
    writer: Writer<W>,
    prefixes: PrefixMap,
    pending: Option<PendingStart>,
    open: Vec<OpenElement>,
    queued: Vec<String>,
}

impl<W: Write> XmlWriter<W> {
    /// Write compact XML
    pub fn new(inner: W) -> Self {
        Self::from_writer(Writer::new(inner))
    }

    /// Write XML indented by `indent` spaces per level
    pub fn with_indent(inner: W, indent: usize) -> Self {
        if indent == 0 {
            return Self::new(inner);
        }
        Self::from_writer(Writer::new_with_indent(inner, b' ', indent))
    }

    fn from_writer(writer: Writer<W>) -> Self {
        Self {
            writer,
            prefixes: PrefixMap::new(),
            pending: None,
            open: Vec::new(),
            queued: Vec::new(),
        }
    }

    /// Get the underlying sink
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Xml(e.to_string()))
    }

    fn in_scope(&self, uri: &str) -> bool {
        uri == XML_NAMESPACE
            || self.open.iter().any(|e| e.declared.iter().any(|d| d == uri))
            || self
                .pending
                .as_ref()
                .is_some_and(|p| p.declared.iter().any(|d| d == uri))
    }

    /// Prefix for `uri`, declared on the pending start tag when it is not
    /// in scope yet
    fn ensure_declared(&mut self, uri: &str) -> Result<String> {
        if uri.is_empty() {
            return Ok(String::new());
        }
        let (prefix, _) = self.prefixes.bind(uri);
        if self.in_scope(uri) {
            return Ok(prefix);
        }
        match self.pending.as_mut() {
            Some(pending) => {
                pending
                    .attributes
                    .push((format!("xmlns:{}", prefix), uri.to_string()));
                pending.declared.push(uri.to_string());
            }
            None => {
                if !self.queued.iter().any(|q| q == uri) {
                    self.queued.push(uri.to_string());
                }
            }
        }
        Ok(prefix)
    }

    fn qualified(prefix: &str, name: &str) -> String {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}:{}", prefix, name)
        }
    }

    fn flush_pending(&mut self, empty: bool) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let mut start = BytesStart::new(pending.name.as_str());
        for (name, value) in &pending.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }
        if empty {
            self.write(Event::Empty(start))
        } else {
            self.write(Event::Start(start))?;
            self.open.push(OpenElement {
                name: pending.name,
                declared: pending.declared,
            });
            Ok(())
        }
    }
}

impl XmlWriter<Vec<u8>> {
    /// Take the written document as a string
    pub fn into_string(self) -> Result<String> {
        String::from_utf8(self.into_inner()).map_err(|e| Error::Write(e.to_string()))
    }
}

impl<W: Write> DocumentWriter for XmlWriter<W> {
    fn start_document(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    fn declare_prefix(&mut self, uri: &str) -> Result<String> {
        self.ensure_declared(uri)
    }

    fn start_element(&mut self, namespace: &str, name: &str) -> Result<()> {
        self.flush_pending(false)?;
        self.pending = Some(PendingStart {
            name: String::new(),
            attributes: Vec::new(),
            declared: Vec::new(),
        });
        for uri in std::mem::take(&mut self.queued) {
            self.ensure_declared(&uri)?;
        }
        let prefix = self.ensure_declared(namespace)?;
        if let Some(pending) = self.pending.as_mut() {
            pending.name = Self::qualified(&prefix, name);
        }
        Ok(())
    }

    fn add_attribute(&mut self, namespace: &str, name: &str, value: &str) -> Result<()> {
        if self.pending.is_none() {
            return Err(Error::Write(format!(
                "attribute '{}' outside of a start tag",
                name
            )));
        }
        let prefix = self.ensure_declared(namespace)?;
        let qualified = Self::qualified(&prefix, name);
        if let Some(pending) = self.pending.as_mut() {
            pending.attributes.push((qualified, value.to_string()));
        }
        Ok(())
    }

    fn add_text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.flush_pending(false)?;
        self.write(Event::Text(BytesText::new(text)))
    }

    fn add_comment(&mut self, text: &str) -> Result<()> {
        self.flush_pending(false)?;
        self.write(Event::Comment(BytesText::from_escaped(format!(
            " {} ",
            comment_safe(text)
        ))))
    }

    fn end_element(&mut self) -> Result<()> {
        if self.pending.is_some() {
            return self.flush_pending(true);
        }
        let element = self
            .open
            .pop()
            .ok_or_else(|| Error::Write("end of element without a matching start".to_string()))?;
        self.write(Event::End(BytesEnd::new(element.name)))
    }

    fn end_document(&mut self) -> Result<()> {
        self.flush_pending(true)?;
        if let Some(element) = self.open.last() {
            return Err(Error::Write(format!("element '{}' is not closed", element.name)));
        }
        self.writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

/// Break up `--`, which may not occur inside a comment
fn comment_safe(text: &str) -> String {
    let mut safe = text.to_string();
    while safe.contains("--") {
        safe = safe.replace("--", "- -");
    }
    safe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::XSI_NAMESPACE;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_compact_document() {
        let mut writer = XmlWriter::new(Vec::new());
        writer.start_document().unwrap();
        writer.declare_prefix(XSI_NAMESPACE).unwrap();
        writer.start_element("urn:shop", "order").unwrap();
        writer.add_attribute("", "id", "a<b").unwrap();
        writer.start_element("urn:shop", "note").unwrap();
        writer.add_text("fish & chips").unwrap();
        writer.end_element().unwrap();
        writer.start_element("", "empty").unwrap();
        writer.end_element().unwrap();
        writer.end_element().unwrap();
        writer.end_document().unwrap();

        assert_eq!(
            writer.into_string().unwrap(),
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<ns1:order xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
                r#"xmlns:ns1="urn:shop" id="a&lt;b">"#,
                "<ns1:note>fish &amp; chips</ns1:note><empty/></ns1:order>\n"
            )
        );
    }

    #[test]
    fn test_namespace_redeclared_in_sibling_scope() {
        let mut writer = XmlWriter::new(Vec::new());
        writer.start_element("", "root").unwrap();
        writer.start_element("urn:x", "a").unwrap();
        writer.end_element().unwrap();
        writer.start_element("urn:x", "b").unwrap();
        writer.end_element().unwrap();
        writer.end_element().unwrap();
        writer.end_document().unwrap();

        assert_eq!(
            writer.into_string().unwrap(),
            concat!(
                r#"<root><ns1:a xmlns:ns1="urn:x"/><ns1:b xmlns:ns1="urn:x"/></root>"#,
                "\n"
            )
        );
    }

    #[test]
    fn test_prefix_for_attribute_value() {
        let mut writer = XmlWriter::new(Vec::new());
        writer.start_element("", "vehicle").unwrap();
        let prefix = writer.declare_prefix("urn:cars").unwrap();
        writer
            .add_attribute(XSI_NAMESPACE, "type", &format!("{}:Car", prefix))
            .unwrap();
        writer.end_element().unwrap();
        writer.end_document().unwrap();

        assert_eq!(
            writer.into_string().unwrap(),
            concat!(
                r#"<vehicle xmlns:ns1="urn:cars" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="ns1:Car"/>"#,
                "\n"
            )
        );
    }

    #[test]
    fn test_comment_and_errors() {
        let mut writer = XmlWriter::new(Vec::new());
        assert!(matches!(
            writer.add_attribute("", "a", "b"),
            Err(Error::Write(_))
        ));
        writer.add_comment("a | b").unwrap();
        writer.start_element("", "open").unwrap();
        writer.add_text("x").unwrap();
        assert!(matches!(writer.end_document(), Err(Error::Write(_))));
    }

    #[test]
    fn test_comment_with_double_hyphen() {
        let mut writer = XmlWriter::new(Vec::new());
        writer.start_element("", "root").unwrap();
        writer.add_comment("(a--b, c---d?)").unwrap();
        writer.end_element().unwrap();
        writer.end_document().unwrap();

        let xml = writer.into_string().unwrap();
        assert_eq!(xml, "<root><!-- (a- -b, c- - -d?) --></root>\n");
        let doc = roxmltree::Document::parse(&xml).unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "root");
    }

    #[test]
    fn test_indented_output() {
        let mut writer = XmlWriter::with_indent(Vec::new(), 2);
        writer.start_element("", "a").unwrap();
        writer.start_element("", "b").unwrap();
        writer.end_element().unwrap();
        writer.end_element().unwrap();
        writer.end_document().unwrap();
        assert_eq!(writer.into_string().unwrap(), "<a>\n  <b/>\n</a>\n");
    }
}
