//! XML reading for scene documents

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::document::{ItemId, SceneDocument};
use crate::error::{Error, ErrorContext, Result};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Namespace bindings declared on one element
#[derive(Debug, Default)]
struct Scope {
    bindings: Vec<(Option<String>, String)>,
}

/// Parse a scene document held in memory
///
/// # Errors
///
/// Returns [`Error::SceneParse`] for malformed XML, an unclosed element or a
/// document without a root element. Documents with a `<!DOCTYPE ...>`
/// declaration are rejected as well, so no entity is ever expanded.
pub fn parse_scene(xml: &str) -> Result<SceneDocument> {
    parse_scene_with_file(xml, None)
}

/// Parse a scene document, naming `file` in error context
pub(crate) fn parse_scene_with_file(xml: &str, file: Option<&str>) -> Result<SceneDocument> {
    let context_at = |offset: usize| {
        let ctx = ErrorContext::at_offset(xml, offset);
        match file {
            Some(f) => ctx.file(f),
            None => ctx,
        }
    };

    let mut reader = Reader::from_str(xml);
    // Whitespace is kept so unpruned content is written back byte for byte

    let mut document = SceneDocument::new();
    let mut open: Vec<ItemId> = Vec::new();
    let mut scopes: Vec<Scope> = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(Error::scene_parse(
                    e.to_string(),
                    context_at(reader.error_position() as usize),
                ));
            }
        };

        match event {
            Event::DocType(_) => {
                // DTD declarations are not allowed (entity expansion risk)
                return Err(Error::scene_parse(
                    "DTD declarations are not allowed in scene documents",
                    context_at(reader.buffer_position() as usize),
                ));
            }
            Event::Start(e) => {
                let scope = declared_scope(&e)?;
                scopes.push(scope);
                let namespace = resolve_namespace(&e, &scopes);
                let id = document.push_element(e.into_owned(), false, namespace, open.last().copied())?;
                open.push(id);
            }
            Event::Empty(e) => {
                scopes.push(declared_scope(&e)?);
                let namespace = resolve_namespace(&e, &scopes);
                scopes.pop();
                document.push_element(e.into_owned(), true, namespace, open.last().copied())?;
            }
            Event::End(_) => {
                open.pop();
                scopes.pop();
            }
            Event::Eof => break,
            other => {
                document.push_other(other.into_owned(), open.last().copied());
            }
        }
    }

    if let Some(&unclosed) = open.last() {
        let name = document
            .element(unclosed)
            .map(|e| e.qualified_name().to_string())
            .unwrap_or_default();
        return Err(Error::scene_parse(
            format!("Unexpected end of document: <{}> is not closed", name),
            context_at(xml.len()),
        ));
    }

    if document.root().is_none() {
        return Err(Error::scene_parse(
            "Document has no root element",
            context_at(0).hint("Check that the file is a COLLADA (.dae) export"),
        ));
    }

    Ok(document)
}

fn declared_scope(e: &BytesStart<'_>) -> Result<Scope> {
    let mut scope = Scope::default();
    for attr in e.attributes() {
        let attr = attr?;
        let key = attr.key.as_ref();
        let prefix = if key == b"xmlns" {
            None
        } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            Some(String::from_utf8_lossy(prefix).into_owned())
        } else {
            continue;
        };
        let raw = String::from_utf8_lossy(&attr.value);
        let uri = quick_xml::escape::unescape(&raw)
            .map_err(|e| Error::XmlAttr(format!("Namespace declaration: {}", e)))?
            .into_owned();
        scope.bindings.push((prefix, uri));
    }
    Ok(scope)
}

fn resolve_namespace(e: &BytesStart<'_>, scopes: &[Scope]) -> Option<String> {
    let name = e.name();
    let name = name.as_ref();
    let prefix = name
        .iter()
        .position(|&b| b == b':')
        .map(|pos| String::from_utf8_lossy(&name[..pos]).into_owned());

    if prefix.as_deref() == Some("xml") {
        return Some(XML_NAMESPACE.to_string());
    }

    scopes
        .iter()
        .rev()
        .flat_map(|scope| scope.bindings.iter().rev())
        .find(|(bound, _)| *bound == prefix)
        // An empty default namespace declaration unbinds the default
        .filter(|(_, uri)| !uri.is_empty())
        .map(|(_, uri)| uri.clone())
}
