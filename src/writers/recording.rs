//! Event recording writer

use serde::{Deserialize, Serialize};

use super::DocumentWriter;
use crate::error::{Error, Result};
use crate::namespaces::PrefixMap;

/// One structural event of a generated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DocumentEvent {
    /// Document start
    StartDocument,
    /// Prefix bound for a namespace
    DeclarePrefix {
        /// Namespace URI
        uri: String,
        /// Prefix returned to the generator
        prefix: String,
    },
    /// Element start
    StartElement {
        /// Namespace URI, empty for none
        namespace: String,
        /// Local name
        name: String,
    },
    /// Attribute of the current element
    Attribute {
        /// Namespace URI, empty for none
        namespace: String,
        /// Local name
        name: String,
        /// Attribute value
        value: String,
    },
    /// Character data
    Text {
        /// Text content
        value: String,
    },
    /// Comment
    Comment {
        /// Comment text
        text: String,
    },
    /// Element end
    EndElement,
    /// Document end
    EndDocument,
}

/// Writer that keeps every event in memory.
///
/// Used for event-level assertions, determinism checks and the `events`
/// output format of the command line tool.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Vec<DocumentEvent>,
    prefixes: PrefixMap,
    open: usize,
}

impl EventRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in order
    pub fn events(&self) -> &[DocumentEvent] {
        &self.events
    }

    /// Take the recorded events
    pub fn into_events(self) -> Vec<DocumentEvent> {
        self.events
    }

    /// Recorded events as a JSON array
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }

    /// Names of the started elements, in document order
    pub fn element_names(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                DocumentEvent::StartElement { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DocumentWriter for EventRecorder {
    fn start_document(&mut self) -> Result<()> {
        self.events.push(DocumentEvent::StartDocument);
        Ok(())
    }

    fn declare_prefix(&mut self, uri: &str) -> Result<String> {
        let prefix = if uri.is_empty() {
            String::new()
        } else {
            self.prefixes.bind(uri).0
        };
        self.events.push(DocumentEvent::DeclarePrefix {
            uri: uri.to_string(),
            prefix: prefix.clone(),
        });
        Ok(prefix)
    }

    fn start_element(&mut self, namespace: &str, name: &str) -> Result<()> {
        self.open += 1;
        self.events.push(DocumentEvent::StartElement {
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    fn add_attribute(&mut self, namespace: &str, name: &str, value: &str) -> Result<()> {
        self.events.push(DocumentEvent::Attribute {
            namespace: namespace.to_string(),
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn add_text(&mut self, text: &str) -> Result<()> {
        self.events.push(DocumentEvent::Text {
            value: text.to_string(),
        });
        Ok(())
    }

    fn add_comment(&mut self, text: &str) -> Result<()> {
        self.events.push(DocumentEvent::Comment {
            text: text.to_string(),
        });
        Ok(())
    }

    fn end_element(&mut self) -> Result<()> {
        self.open = self
            .open
            .checked_sub(1)
            .ok_or_else(|| Error::Write("end of element without a matching start".to_string()))?;
        self.events.push(DocumentEvent::EndElement);
        Ok(())
    }

    fn end_document(&mut self) -> Result<()> {
        self.events.push(DocumentEvent::EndDocument);
        Ok(())
    }
}
