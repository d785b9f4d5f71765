use super::ParserConfig;
use crate::constants::{ID_FIELD, LEVEL_FIELD};
use crate::errors::{AppError, AppResult};
use crate::models::{Document, DocumentObject};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use quick_xml::Decoder;

/// Position of an open element relative to the document layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Root,
    Objects,
    Other,
}

/// Builder for constructing a Document during XML parsing.
///
/// Only the first `var` carrying a given field name counts, even if it has no
/// `value` attribute.
struct DocumentBuilder {
    id: Option<Option<String>>,
    level: Option<Option<String>>,
    objects: Vec<DocumentObject>,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            id: None,
            level: None,
            objects: Vec::new(),
        }
    }

    fn set_field(&mut self, name: &str, value: Option<String>) {
        let slot = match name {
            ID_FIELD => &mut self.id,
            LEVEL_FIELD => &mut self.level,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }

    fn push_object(&mut self, name: String) {
        self.objects.push(DocumentObject { name });
    }

    /// Classifies missing attributes: a missing or empty id is an error, a missing
    /// level is a valid absent value.
    fn build(self) -> AppResult<Document> {
        let id = match self.id {
            None => return Err(AppError::ParseError("missing id".into())),
            Some(None) => return Err(AppError::ParseError("id has no value".into())),
            Some(Some(id)) if id.trim().is_empty() => {
                return Err(AppError::ParseError("id is empty".into()))
            }
            Some(Some(id)) => id,
        };

        Ok(Document {
            id,
            level: self.level.flatten(),
            objects: self.objects,
        })
    }
}

fn attribute(element: &BytesStart, key: &[u8], decoder: Decoder) -> AppResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.decode_and_unescape_value(decoder)?.into_owned()));
        }
    }
    Ok(None)
}

/// Applies an opening (or self-closing) element to the builder and returns its scope.
fn open_element(
    element: &BytesStart,
    parent: Option<Scope>,
    seen_root: &mut bool,
    builder: &mut DocumentBuilder,
    config: &ParserConfig,
    decoder: Decoder,
) -> AppResult<Scope> {
    let name = element.name();
    let name = name.as_ref();

    match parent {
        None => {
            if *seen_root {
                return Err(AppError::ParseError("multiple root elements".into()));
            }
            if name != config.root_element.as_bytes() {
                return Err(AppError::ParseError(format!(
                    "unexpected root element '{}'",
                    String::from_utf8_lossy(name)
                )));
            }
            *seen_root = true;
            Ok(Scope::Root)
        }
        Some(Scope::Root) if name == config.field_element.as_bytes() => {
            if let Some(field) = attribute(element, b"name", decoder)? {
                let value = attribute(element, b"value", decoder)?;
                builder.set_field(&field, value);
            }
            Ok(Scope::Other)
        }
        Some(Scope::Root) if name == config.objects_element.as_bytes() => Ok(Scope::Objects),
        Some(Scope::Objects) if name == config.object_element.as_bytes() => {
            let object_name = attribute(element, b"name", decoder)?
                .ok_or_else(|| AppError::ParseError("object without name".into()))?;
            builder.push_object(object_name);
            Ok(Scope::Other)
        }
        Some(_) => Ok(Scope::Other),
    }
}

/// Parses one serialized document.
///
/// Expects a single root element holding `var` fields (`name`/`value` attributes)
/// and an `objects` element whose `object` children each carry a `name` attribute.
/// Unknown elements and text are ignored.
///
/// # Errors
///
/// Returns `ParseError` for malformed XML, an unexpected root element, a missing or
/// empty id, or an object without a name.
pub fn parse_document(content: &str, config: &ParserConfig) -> AppResult<Document> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Scope> = Vec::with_capacity(4);
    let mut seen_root = false;
    let mut builder = DocumentBuilder::new();

    loop {
        let decoder = reader.decoder();
        match reader.read_event()? {
            Event::Start(e) => {
                let scope = open_element(
                    &e,
                    stack.last().copied(),
                    &mut seen_root,
                    &mut builder,
                    config,
                    decoder,
                )?;
                stack.push(scope);
            }
            Event::Empty(e) => {
                open_element(
                    &e,
                    stack.last().copied(),
                    &mut seen_root,
                    &mut builder,
                    config,
                    decoder,
                )?;
            }
            Event::End(_) => {
                if stack.pop().is_none() {
                    return Err(AppError::ParseError("unexpected closing tag".into()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(AppError::ParseError("unexpected end of document".into()));
    }
    if !seen_root {
        return Err(AppError::ParseError("document has no root element".into()));
    }

    builder.build()
}
