//! XML writing for scene documents
//!
//! Items are written exactly as they were read; only detached items are
//! missing from the output.

use std::io::{BufWriter, Write as IoWrite};
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, Event};
use tempfile::NamedTempFile;

use super::document::{Item, ItemId, SceneDocument};
use crate::error::{Error, Result};

enum Step {
    Enter(ItemId),
    Exit(ItemId),
}

/// Serialize a scene document
pub fn write_scene<W: IoWrite>(document: &SceneDocument, writer: W) -> Result<()> {
    let mut xml_writer = Writer::new(writer);

    // Iterative walk: scene graphs can nest deeper than the call stack allows
    let mut stack: Vec<Step> = document
        .top_level()
        .iter()
        .rev()
        .map(|&id| Step::Enter(id))
        .collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter(id) => match document.item(id) {
                Some(Item::Element(element)) => {
                    if element.self_closing && element.children().is_empty() {
                        xml_writer
                            .write_event(Event::Empty(element.start.clone()))
                            .map_err(|e| {
                                Error::xml_write(format!(
                                    "Failed to write <{}/>: {}",
                                    element.qualified_name, e
                                ))
                            })?;
                        continue;
                    }
                    xml_writer
                        .write_event(Event::Start(element.start.clone()))
                        .map_err(|e| {
                            Error::xml_write(format!(
                                "Failed to write <{}>: {}",
                                element.qualified_name, e
                            ))
                        })?;
                    stack.push(Step::Exit(id));
                    stack.extend(element.children().iter().rev().map(|&c| Step::Enter(c)));
                }
                Some(Item::Other { event, .. }) => {
                    xml_writer
                        .write_event(event.clone())
                        .map_err(|e| Error::xml_write(format!("Failed to write content: {}", e)))?;
                }
                None => {}
            },
            Step::Exit(id) => {
                if let Some(element) = document.element(id) {
                    xml_writer
                        .write_event(Event::End(BytesEnd::new(element.qualified_name.as_str())))
                        .map_err(|e| {
                            Error::xml_write(format!(
                                "Failed to close <{}>: {}",
                                element.qualified_name, e
                            ))
                        })?;
                }
            }
        }
    }

    Ok(())
}

/// Serialize a scene document to a string
pub fn write_scene_string(document: &SceneDocument) -> Result<String> {
    let mut buffer = Vec::new();
    write_scene(document, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| Error::xml_write(format!("Failed to convert XML to UTF-8: {}", e)))
}

/// Write a scene document to `path` atomically
///
/// The document is written to a temporary file in the destination directory
/// and renamed over `path` once complete. On failure the temporary file is
/// removed and `path` is left as it was.
pub fn write_scene_atomic(document: &SceneDocument, path: &Path) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
        Error::xml_write(format!(
            "Failed to create temporary file in {}: {}",
            dir.display(),
            e
        ))
    })?;

    {
        let mut buffered = BufWriter::new(temp.as_file_mut());
        write_scene(document, &mut buffered)?;
        buffered
            .flush()
            .map_err(|e| Error::xml_write(format!("Failed to flush scene output: {}", e)))?;
    }

    temp.persist(path).map_err(|e| {
        Error::xml_write(format!("Failed to move scene into {}: {}", path.display(), e.error))
    })?;

    Ok(())
}
