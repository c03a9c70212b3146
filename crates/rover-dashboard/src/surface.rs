//! Display surface the dashboard renders into
//!
//! Elements are addressed by string identifier, like elements of an HTML
//! page. The dashboard only ever writes; hosts decide how writes become
//! pixels. [`MemorySurface`] keeps the element tree in memory and records
//! every mutation, which is what the console binary and the tests use.

use std::collections::{BTreeMap, BTreeSet};

/// Write-side interface of a page
pub trait Surface {
    /// Replace the text content of an element
    fn set_text(&mut self, id: &str, text: &str);

    /// Set one inline style property (e.g. `transform`, `height`)
    fn set_style(&mut self, id: &str, property: &str, value: &str);

    /// Add or remove a class on an element
    fn set_class(&mut self, id: &str, class: &str, enabled: bool);

    /// Create a new element with the given classes as last child of `parent`
    fn append_child(&mut self, parent: &str, id: &str, classes: &[&str]);

    /// Remove an element and its subtree
    fn remove(&mut self, id: &str);

    /// Enter or leave fullscreen presentation
    fn set_fullscreen(&mut self, fullscreen: bool);
}

/// A single recorded write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Text { id: String, text: String },
    Style { id: String, property: String, value: String },
    Class { id: String, class: String, enabled: bool },
    Append { parent: String, id: String },
    Remove { id: String },
    Fullscreen(bool),
}

impl Mutation {
    /// Element touched by this mutation, if any
    pub fn target(&self) -> Option<&str> {
        match self {
            Mutation::Text { id, .. }
            | Mutation::Style { id, .. }
            | Mutation::Class { id, .. }
            | Mutation::Append { id, .. }
            | Mutation::Remove { id } => Some(id),
            Mutation::Fullscreen(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Element {
    pub text: String,
    pub classes: BTreeSet<String>,
    pub style: BTreeMap<String, String>,
    pub children: Vec<String>,
    pub parent: Option<String>,
}

/// In-memory surface.
///
/// Writing to an unknown element creates it, so a host does not need to
/// declare its markup up front.
#[derive(Debug, Default)]
pub struct MemorySurface {
    elements: BTreeMap<String, Element>,
    fullscreen: bool,
    mutations: Vec<Mutation>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Text content of an element (empty if it does not exist)
    pub fn text(&self, id: &str) -> &str {
        self.elements.get(id).map(|e| e.text.as_str()).unwrap_or("")
    }

    pub fn style(&self, id: &str, property: &str) -> Option<&str> {
        self.elements
            .get(id)
            .and_then(|e| e.style.get(property))
            .map(|s| s.as_str())
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .map(|e| e.classes.contains(class))
            .unwrap_or(false)
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.elements
            .get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Drain the mutation log, e.g. after rendering a frame
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    /// Distinct elements touched since the log was last drained
    pub fn touched(&self) -> BTreeSet<&str> {
        self.mutations.iter().filter_map(|m| m.target()).collect()
    }

    fn entry(&mut self, id: &str) -> &mut Element {
        self.elements.entry(id.to_string()).or_default()
    }
}

impl Surface for MemorySurface {
    fn set_text(&mut self, id: &str, text: &str) {
        self.entry(id).text = text.to_string();
        self.mutations.push(Mutation::Text {
            id: id.to_string(),
            text: text.to_string(),
        });
    }

    fn set_style(&mut self, id: &str, property: &str, value: &str) {
        self.entry(id)
            .style
            .insert(property.to_string(), value.to_string());
        self.mutations.push(Mutation::Style {
            id: id.to_string(),
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    fn set_class(&mut self, id: &str, class: &str, enabled: bool) {
        let element = self.entry(id);
        if enabled {
            element.classes.insert(class.to_string());
        } else {
            element.classes.remove(class);
        }
        self.mutations.push(Mutation::Class {
            id: id.to_string(),
            class: class.to_string(),
            enabled,
        });
    }

    fn append_child(&mut self, parent: &str, id: &str, classes: &[&str]) {
        self.entry(parent).children.push(id.to_string());
        let element = Element {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent: Some(parent.to_string()),
            ..Default::default()
        };
        self.elements.insert(id.to_string(), element);
        self.mutations.push(Mutation::Append {
            parent: parent.to_string(),
            id: id.to_string(),
        });
    }

    fn remove(&mut self, id: &str) {
        let Some(element) = self.elements.remove(id) else {
            return;
        };
        if let Some(parent) = element.parent.as_deref().and_then(|p| self.elements.get_mut(p)) {
            parent.children.retain(|child| child != id);
        }
        let mut pending = element.children;
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.elements.remove(&child) {
                pending.extend(removed.children);
            }
        }
        self.mutations.push(Mutation::Remove { id: id.to_string() });
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
        self.mutations.push(Mutation::Fullscreen(fullscreen));
    }
}
