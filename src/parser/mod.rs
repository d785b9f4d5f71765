mod xml_parser;
mod xml_writer;

use crate::constants::{FIELD_ELEMENT, OBJECTS_ELEMENT, OBJECT_ELEMENT, ROOT_ELEMENT};

// Re-export public API
pub use xml_parser::parse_document;
pub use xml_writer::render_document;

/// Element names of the serialized document layout.
///
/// Passed explicitly to the extractor and generator so one run never depends on
/// process-wide parser state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    pub root_element: String,
    pub field_element: String,
    pub objects_element: String,
    pub object_element: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            root_element: ROOT_ELEMENT.to_string(),
            field_element: FIELD_ELEMENT.to_string(),
            objects_element: OBJECTS_ELEMENT.to_string(),
            object_element: OBJECT_ELEMENT.to_string(),
        }
    }
}
