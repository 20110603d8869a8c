//! Minimal in-memory document: an arena of elements addressed by [`NodeId`].
//!
//! Elements keep their tag, optional `id`, classes, attributes, text, input
//! value and an optional bound [`Action`]. Subtrees removed by
//! [`Document::clear_children`] are freed and their slots reused; a `NodeId`
//! carries its slot generation and owning document, so stale or foreign ids
//! resolve to nothing instead of to a reused slot.

use crate::stage::StageId;
use indexmap::IndexMap;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_DOCUMENT: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    document: u32,
    index: usize,
    generation: u32,
}

/// Handler an element is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SubmitForm,
    AddUrlInputs,
    DeleteStage(StageId),
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: IndexMap<String, String>,
    pub text: Option<String>,
    pub value: String,
    pub action: Option<Action>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

const VOID_TAGS: &[&str] = &["input", "br", "hr", "img", "meta", "link"];

#[derive(Debug, Clone)]
pub struct Document {
    id: u32,
    slots: Vec<Slot>,
    free: Vec<usize>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let id = NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed);
        Document {
            id,
            slots: vec![Slot {
                generation: 0,
                element: Some(Element::new("body")),
            }],
            free: Vec::new(),
            root: NodeId {
                document: id,
                index: 0,
                generation: 0,
            },
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let element = Some(Element::new(tag));
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].element = element;
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    element,
                });
                self.slots.len() - 1
            }
        };
        NodeId {
            document: self.id,
            index,
            generation: self.slots[index].generation,
        }
    }

    /// Live elements, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Slots allocated so far, including freed ones awaiting reuse.
    pub fn arena_len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the element, or `None` for a freed node or one from another document.
    pub fn get(&self, node: NodeId) -> Option<&Element> {
        if node.document != self.id {
            return None;
        }
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_ref())
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        if node.document != self.id {
            return None;
        }
        self.slots
            .get_mut(node.index)
            .filter(|slot| slot.generation == node.generation)
            .and_then(|slot| slot.element.as_mut())
    }

    /// # Panics
    ///
    /// Panics if `node` was freed or belongs to another document; see [`Document::get`].
    pub fn element(&self, node: NodeId) -> &Element {
        match self.get(node) {
            Some(element) => element,
            None => panic!("{:?} is not a live node of this document", node),
        }
    }

    /// # Panics
    ///
    /// Panics if `node` was freed or belongs to another document; see [`Document::get_mut`].
    pub fn element_mut(&mut self, node: NodeId) -> &mut Element {
        match self.get_mut(node) {
            Some(element) => element,
            None => panic!("{:?} is not a live node of this document", node),
        }
    }

    /// Moves `child` under `parent`, detaching it from any previous parent.
    ///
    /// Returns `false` and changes nothing when either node is not live, when
    /// `child` is the root, or when `child` is `parent` or one of its ancestors.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() || child == self.root {
            return false;
        }
        let mut current = Some(parent);
        while let Some(node) = current {
            if node == child {
                log::warn!("refusing to append {:?} under its own descendant", child);
                return false;
            }
            current = self.get(node).and_then(|e| e.parent);
        }

        let old_parent = self.get_mut(child).and_then(|e| e.parent.take());
        if let Some(old) = old_parent.and_then(|old| self.get_mut(old)) {
            old.children.retain(|c| *c != child);
        }
        if let Some(element) = self.get_mut(child) {
            element.parent = Some(parent);
        }
        if let Some(element) = self.get_mut(parent) {
            element.children.push(child);
        }
        true
    }

    /// Equivalent of `innerHTML = ''`: removes and frees every child subtree.
    pub fn clear_children(&mut self, parent: NodeId) {
        let children = match self.get_mut(parent) {
            Some(element) => std::mem::take(&mut element.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
    }

    fn free_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if self.get(current).is_none() {
                continue;
            }
            let slot = &mut self.slots[current.index];
            if let Some(element) = slot.element.take() {
                stack.extend(element.children);
            }
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|e| e.children.as_slice()).unwrap_or(&[])
    }

    pub fn child_element_count(&self, node: NodeId) -> usize {
        self.children(node).len()
    }

    pub fn set_id(&mut self, node: NodeId, id: &str) {
        if let Some(element) = self.get_mut(node) {
            element.id = Some(id.to_string());
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get_mut(node) {
            if !element.has_class(class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.get_mut(node) {
            element.attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) {
        if let Some(element) = self.get_mut(node) {
            element.text = Some(text.into());
        }
    }

    /// Input value; empty for a node that is not live.
    pub fn value(&self, node: NodeId) -> &str {
        self.get(node).map(|e| e.value.as_str()).unwrap_or("")
    }

    pub fn set_value(&mut self, node: NodeId, value: impl Into<String>) {
        if let Some(element) = self.get_mut(node) {
            element.value = value.into();
        }
    }

    pub fn bind(&mut self, node: NodeId, action: Action) {
        if let Some(element) = self.get_mut(node) {
            element.action = Some(action);
        }
    }

    /// Returns the action bound to `node` if it is attached and clickable.
    pub fn click(&self, node: NodeId) -> Option<Action> {
        if !self.is_attached(node) {
            return None;
        }
        self.get(node)?.action
    }

    /// Returns the submit action of a `form` element.
    pub fn submit(&self, form: NodeId) -> Option<Action> {
        match self.click(form) {
            Some(Action::SubmitForm) if self.get(form)?.tag == "form" => Some(Action::SubmitForm),
            _ => None,
        }
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.get(current).and_then(|e| e.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|node| self.get(*node).and_then(|e| e.id.as_deref()) == Some(id))
    }

    /// Descendants of `node` in document order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    pub fn descendants_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(node)
            .into_iter()
            .filter(|n| self.get(*n).is_some_and(|e| e.tag == tag))
            .collect()
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for current in std::iter::once(node).chain(self.descendants(node)) {
            if let Some(text) = self.get(current).and_then(|e| e.text.as_ref()) {
                out.push_str(text);
            }
        }
        out
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, 0, &mut out);
        out
    }

    pub fn node_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, 0, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, depth: usize, out: &mut String) {
        let Some(element) = self.get(node) else {
            return;
        };
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&element.tag);
        if let Some(id) = &element.id {
            push_attr(out, "id", id);
        }
        if !element.classes.is_empty() {
            push_attr(out, "class", &element.classes.join(" "));
        }
        for (name, value) in &element.attrs {
            push_attr(out, name, value);
        }
        if element.tag == "input" && !element.value.is_empty() {
            push_attr(out, "value", &element.value);
        }
        out.push('>');

        if VOID_TAGS.contains(&element.tag.as_str()) {
            out.push('\n');
            return;
        }

        if element.children.is_empty() {
            if let Some(text) = &element.text {
                out.push_str(&escape(text, false));
            }
        } else {
            out.push('\n');
            if let Some(text) = &element.text {
                out.push_str(&"  ".repeat(depth + 1));
                out.push_str(&escape(text, false));
                out.push('\n');
            }
            for child in &element.children {
                self.write_html(*child, depth + 1, out);
            }
            out.push_str(&indent);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push_str(">\n");
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value, true));
    out.push('"');
}

fn escape(raw: &str, attr: bool) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
