//! Arena representation of a scene document
//!
//! Every element and every other XML event (text, comments, declaration,
//! processing instructions) is stored once in a flat vector. Elements keep
//! the indices of their children, so pruning is a matter of unlinking
//! indices; nothing is moved while a traversal holds ids.

use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// Index of an item in a [`SceneDocument`]
pub type ItemId = usize;

/// An element with its original start tag
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) start: BytesStart<'static>,
    pub(crate) qualified_name: String,
    pub(crate) self_closing: bool,
    namespace: Option<String>,
    local_name: String,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
}

impl Element {
    /// Tag name as written, including any prefix
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Tag name without prefix
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Resolved namespace URI
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Parent element, `None` for top-level items
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    /// Attached children in document order
    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Item {
    Element(Element),
    Other {
        event: Event<'static>,
        parent: Option<ItemId>,
    },
}

/// A fully loaded XML scene document
#[derive(Debug, Clone, Default)]
pub struct SceneDocument {
    items: Vec<Item>,
    top_level: Vec<ItemId>,
}

impl SceneDocument {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_element(
        &mut self,
        start: BytesStart<'static>,
        self_closing: bool,
        namespace: Option<String>,
        parent: Option<ItemId>,
    ) -> Result<ItemId> {
        let qualified_name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::InvalidXml(format!("Element name is not UTF-8: {}", e)))?
            .to_string();
        let local_name = match qualified_name.rfind(':') {
            Some(pos) => qualified_name[pos + 1..].to_string(),
            None => qualified_name.clone(),
        };
        let element = Element {
            start,
            qualified_name,
            self_closing,
            namespace,
            local_name,
            parent,
            children: Vec::new(),
        };
        Ok(self.attach(Item::Element(element), parent))
    }

    pub(crate) fn push_other(&mut self, event: Event<'static>, parent: Option<ItemId>) -> ItemId {
        self.attach(Item::Other { event, parent }, parent)
    }

    fn attach(&mut self, item: Item, parent: Option<ItemId>) -> ItemId {
        let id = self.items.len();
        self.items.push(item);
        match parent.and_then(|p| self.element_mut(p)) {
            Some(parent) => parent.children.push(id),
            None => self.top_level.push(id),
        }
        id
    }

    pub(crate) fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    pub(crate) fn top_level(&self) -> &[ItemId] {
        &self.top_level
    }

    /// Element at `id`, if `id` is an element
    pub fn element(&self, id: ItemId) -> Option<&Element> {
        match self.items.get(id) {
            Some(Item::Element(e)) => Some(e),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: ItemId) -> Option<&mut Element> {
        match self.items.get_mut(id) {
            Some(Item::Element(e)) => Some(e),
            _ => None,
        }
    }

    /// The document element
    pub fn root(&self) -> Option<ItemId> {
        self.top_level
            .iter()
            .copied()
            .find(|&id| self.element(id).is_some())
    }

    /// Attached elements in document order
    pub fn elements(&self) -> Vec<ItemId> {
        let mut out = Vec::new();
        let mut stack: Vec<ItemId> = self.top_level.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(element) = self.element(id) {
                out.push(id);
                stack.extend(element.children.iter().rev().copied());
            }
        }
        out
    }

    /// Attached elements with the given namespace and local name, in document order
    pub fn find_all(&self, namespace: &str, local_name: &str) -> Vec<ItemId> {
        self.elements()
            .into_iter()
            .filter(|&id| self.element(id).is_some_and(|e| e.is(namespace, local_name)))
            .collect()
    }

    /// Direct child elements of `parent` with the given namespace and local name
    pub fn child_elements(&self, parent: ItemId, namespace: &str, local_name: &str) -> Vec<ItemId> {
        self.element(parent)
            .map(|p| {
                p.children
                    .iter()
                    .copied()
                    .filter(|&c| self.element(c).is_some_and(|e| e.is(namespace, local_name)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Unescaped value of an unprefixed attribute
    pub fn attribute(&self, id: ItemId, name: &str) -> Result<Option<String>> {
        let Some(element) = self.element(id) else {
            return Ok(None);
        };
        for attr in element.start.attributes() {
            let attr = attr?;
            if attr.key.as_ref() != name.as_bytes() {
                continue;
            }
            let raw = std::str::from_utf8(&attr.value).map_err(|e| {
                Error::invalid_xml_element(&element.qualified_name, &e.to_string())
            })?;
            let value = quick_xml::escape::unescape(raw).map_err(|e| {
                Error::XmlAttr(format!(
                    "Attribute '{}' of <{}>: {}",
                    name, element.qualified_name, e
                ))
            })?;
            return Ok(Some(value.into_owned()));
        }
        Ok(None)
    }

    /// Unlink `id` from its parent
    ///
    /// A whitespace-only text item directly before it is unlinked too, so the
    /// written document does not keep blank lines where elements were.
    /// Detaching an item twice is a no-op.
    pub fn detach(&mut self, id: ItemId) {
        let parent = match self.items.get(id) {
            Some(Item::Element(e)) => e.parent,
            Some(Item::Other { parent, .. }) => *parent,
            None => return,
        };

        let siblings = match parent {
            Some(p) => match self.items.get(p) {
                Some(Item::Element(e)) => e.children.clone(),
                _ => return,
            },
            None => self.top_level.clone(),
        };
        let Some(position) = siblings.iter().position(|&s| s == id) else {
            return;
        };

        let mut remove = vec![id];
        if position > 0 {
            let previous = siblings[position - 1];
            if self.is_whitespace_text(previous) {
                remove.push(previous);
            }
        }

        let list = match parent {
            Some(p) => match self.element_mut(p) {
                Some(e) => &mut e.children,
                None => return,
            },
            None => &mut self.top_level,
        };
        list.retain(|c| !remove.contains(c));
    }

    fn is_whitespace_text(&self, id: ItemId) -> bool {
        match self.items.get(id) {
            Some(Item::Other {
                event: Event::Text(text),
                ..
            }) => text.iter().all(u8::is_ascii_whitespace),
            _ => false,
        }
    }
}
