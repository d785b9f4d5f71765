use super::ParserConfig;
use crate::constants::{ID_FIELD, LEVEL_FIELD};
use crate::errors::{AppError, AppResult};
use crate::models::Document;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::writer::Writer;
use std::io::Cursor;

/// Serializes a document into the layout understood by [`super::parse_document`].
///
/// The level field is omitted when absent.
pub fn render_document(document: &Document, config: &ParserConfig) -> AppResult<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    let mut events = Vec::with_capacity(document.objects.len() + 6);
    events.push(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)));
    events.push(Event::Start(BytesStart::new(config.root_element.as_str())));
    events.push(Event::Empty(
        BytesStart::new(config.field_element.as_str())
            .with_attributes([("name", ID_FIELD), ("value", document.id.as_str())]),
    ));
    if let Some(level) = &document.level {
        events.push(Event::Empty(
            BytesStart::new(config.field_element.as_str())
                .with_attributes([("name", LEVEL_FIELD), ("value", level.as_str())]),
        ));
    }
    events.push(Event::Start(BytesStart::new(config.objects_element.as_str())));
    for object in &document.objects {
        events.push(Event::Empty(
            BytesStart::new(config.object_element.as_str())
                .with_attributes([("name", object.name.as_str())]),
        ));
    }
    events.push(Event::End(BytesEnd::new(config.objects_element.as_str())));
    events.push(Event::End(BytesEnd::new(config.root_element.as_str())));

    for event in events {
        writer
            .write_event(event)
            .map_err(|e| AppError::ParseError(format!("Failed to render document: {e}")))?;
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| AppError::ParseError(format!("Rendered document is not UTF-8: {e}")))
}
