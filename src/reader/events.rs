//! XML Event Types
//!
//! The reduced event vocabulary the row decoder consumes: element starts,
//! element ends and processing instructions. Character data, comments,
//! CDATA and DOCTYPE never reach this layer.

use std::fmt;

use crate::core::attributes::Attribute;
use crate::core::tokenizer::Tag;

/// XML parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Start of an element: <name attrs...> (also the first half of <name/>)
    StartElement(StartElement),
    /// End of an element: </name> (also synthesized for <name/>)
    EndElement(EndElement),
    /// Processing instruction: <?target data?>
    ProcessingInstruction { target: String, data: String },
}

/// Start element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement {
    /// Element name
    pub name: String,
    /// Element attributes
    pub attributes: Vec<Attribute>,
}

impl StartElement {
    /// Check the element name, ignoring ASCII case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl From<Tag> for StartElement {
    fn from(tag: Tag) -> Self {
        StartElement {
            name: tag.name,
            attributes: tag.attributes,
        }
    }
}

/// End element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndElement {
    /// Element name
    pub name: String,
}

impl EndElement {
    /// Check the element name, ignoring ASCII case
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

impl XmlEvent {
    /// Check if this is a start element with the given name (ASCII case-insensitive)
    pub fn is_start_named(&self, name: &str) -> bool {
        matches!(self, XmlEvent::StartElement(e) if e.is_named(name))
    }

    /// Check if this is an end element with the given name (ASCII case-insensitive)
    pub fn is_end_named(&self, name: &str) -> bool {
        matches!(self, XmlEvent::EndElement(e) if e.is_named(name))
    }

    /// Get as start element if applicable
    pub fn into_start_element(self) -> Result<StartElement, XmlEvent> {
        match self {
            XmlEvent::StartElement(e) => Ok(e),
            other => Err(other),
        }
    }
}

impl fmt::Display for XmlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XmlEvent::StartElement(e) => write!(f, "<{}>", e.name),
            XmlEvent::EndElement(e) => write!(f, "</{}>", e.name),
            XmlEvent::ProcessingInstruction { target, .. } => write!(f, "<?{target}?>"),
        }
    }
}
