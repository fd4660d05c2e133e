#![forbid(unsafe_code)]

//! In-memory element tree.
//!
//! Nodes carry exactly what widgets can observe through
//! [`Dom`](domkit_core::host::Dom): tag, id, classes, attributes, a
//! stylesheet layer, an inline style layer, markup, and fixed layout
//! measurements set by the test.

use std::collections::BTreeMap;

use domkit_core::css::{CssValue, parse_px};
use domkit_core::geometry::Size;
use domkit_core::host::NodeId;

use crate::selector::{Combinator, Compound, Selector};

/// Builder for a node appended with [`DomTree::append`].
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, String)>,
    sheet: Vec<(String, String)>,
    size: Size,
    offset_top: i32,
}

impl ElementSpec {
    /// Start an element with the given tag.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    /// Add space-separated classes.
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_owned));
        self
    }

    /// Set an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Set a stylesheet (non-inline) property.
    #[must_use]
    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.sheet.push((property.to_owned(), value.to_owned()));
        self
    }

    /// Set the outer size.
    #[must_use]
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Set the document offset of the top edge.
    #[must_use]
    pub fn offset_top(mut self, top: i32) -> Self {
        self.offset_top = top;
        self
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    sheet: BTreeMap<String, String>,
    inline: BTreeMap<String, CssValue>,
    html: String,
    size: Size,
    offset_top: i32,
    hidden: bool,
}

/// A document made of [`ElementSpec`] nodes under a `body` root.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<NodeData>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a document containing only `body`.
    #[must_use]
    pub fn new() -> Self {
        let body = NodeData {
            tag: "body".to_owned(),
            classes: Vec::new(),
            attrs: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
            sheet: BTreeMap::new(),
            inline: BTreeMap::new(),
            html: String::new(),
            size: Size::ZERO,
            offset_top: 0,
            hidden: false,
        };
        Self { nodes: vec![body] }
    }

    /// The `body` node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a child to `parent` and return it.
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut attrs: BTreeMap<String, String> = spec.attrs.into_iter().collect();
        if let Some(el_id) = spec.id {
            attrs.insert("id".to_owned(), el_id);
        }
        self.nodes.push(NodeData {
            tag: spec.tag,
            classes: spec.classes,
            attrs,
            parent: Some(parent),
            children: Vec::new(),
            sheet: spec.sheet.into_iter().collect(),
            inline: BTreeMap::new(),
            html: String::new(),
            size: spec.size,
            offset_top: spec.offset_top,
            hidden: false,
        });
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Number of nodes including `body`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; `body` exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Tag name.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    /// Children in order.
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map_or(&[], |n| n.children.as_slice())
    }

    /// Parent node.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    /// Attribute value.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)
            .and_then(|n| n.attrs.get(name))
            .map(String::as_str)
    }

    /// Set an attribute.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            n.attrs.insert(name.to_owned(), value.to_owned());
        }
    }

    /// Current classes.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> &[String] {
        self.node(node).map_or(&[], |n| n.classes.as_slice())
    }

    /// Check for a class.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    /// Add a class if missing.
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            if !n.classes.iter().any(|c| c == class) {
                n.classes.push(class.to_owned());
            }
        }
    }

    /// Remove a class if present.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(n) = self.node_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    /// Inline style property.
    #[must_use]
    pub fn inline_style(&self, node: NodeId, property: &str) -> Option<CssValue> {
        self.node(node).and_then(|n| n.inline.get(property).copied())
    }

    /// Whether the node has any inline style.
    #[must_use]
    pub fn has_inline_style(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| !n.inline.is_empty())
    }

    /// Set an inline style property.
    pub fn set_inline_style(&mut self, node: NodeId, property: &str, value: CssValue) {
        if let Some(n) = self.node_mut(node) {
            n.inline.insert(property.to_owned(), value);
        }
    }

    /// Drop every inline style.
    pub fn clear_inline_style(&mut self, node: NodeId) {
        if let Some(n) = self.node_mut(node) {
            n.inline.clear();
        }
    }

    /// A style property as whole pixels, inline layer first.
    #[must_use]
    pub fn css_px(&self, node: NodeId, property: &str) -> Option<i32> {
        let n = self.node(node)?;
        match n.inline.get(property) {
            Some(value) => value.as_px(),
            None => n.sheet.get(property).and_then(|v| parse_px(v)),
        }
    }

    /// Markup set through `set_html`.
    #[must_use]
    pub fn html(&self, node: NodeId) -> &str {
        self.node(node).map_or("", |n| n.html.as_str())
    }

    /// Replace markup.
    pub fn set_html(&mut self, node: NodeId, html: &str) {
        if let Some(n) = self.node_mut(node) {
            n.html = html.to_owned();
        }
    }

    /// Outer size.
    #[must_use]
    pub fn size(&self, node: NodeId) -> Size {
        self.node(node).map_or(Size::ZERO, |n| n.size)
    }

    /// Change the outer size (simulates reflow).
    pub fn set_size(&mut self, node: NodeId, size: Size) {
        if let Some(n) = self.node_mut(node) {
            n.size = size;
        }
    }

    /// Document offset of the top edge.
    #[must_use]
    pub fn offset_top(&self, node: NodeId) -> i32 {
        self.node(node).map_or(0, |n| n.offset_top)
    }

    /// Change the document offset (simulates reflow).
    pub fn set_offset_top(&mut self, node: NodeId, top: i32) {
        if let Some(n) = self.node_mut(node) {
            n.offset_top = top;
        }
    }

    /// Take the node out of layout (`display: none` from a stylesheet).
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(n) = self.node_mut(node) {
            n.hidden = hidden;
        }
    }

    /// Whether the node or any ancestor is out of layout.
    #[must_use]
    pub fn is_hidden(&self, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            let Some(n) = self.node(id) else {
                return true;
            };
            let display_none = matches!(n.inline.get("display"), Some(CssValue::Keyword("none")));
            if n.hidden || display_none {
                return true;
            }
            cursor = n.parent;
        }
        false
    }

    /// Whether `node` is `ancestor` or below it.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }

    /// Descendants of `scope` matching `selector`, in document order.
    #[must_use]
    pub fn find(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        let Some(sel) = Selector::parse(selector) else {
            tracing::debug!(selector, "unsupported selector");
            return Vec::new();
        };
        let mut out = Vec::new();
        self.collect_matches(scope, &sel, &mut out);
        out
    }

    /// Nearest proper ancestor matching `selector`, or the parent when `None`.
    #[must_use]
    pub fn closest(&self, node: NodeId, selector: Option<&str>) -> Option<NodeId> {
        let Some(selector) = selector else {
            return self.parent(node);
        };
        let sel = Selector::parse(selector)?;
        let mut cursor = self.parent(node);
        while let Some(id) = cursor {
            if self.matches(id, &sel) {
                return Some(id);
            }
            cursor = self.parent(id);
        }
        None
    }

    /// Whether `node` matches `selector`.
    #[must_use]
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        self.matches_part(node, &selector.parts, selector.parts.len() - 1)
    }

    fn collect_matches(&self, parent: NodeId, sel: &Selector, out: &mut Vec<NodeId>) {
        for &child in self.children(parent) {
            if self.matches(child, sel) {
                out.push(child);
            }
            self.collect_matches(child, sel, out);
        }
    }

    fn matches_part(&self, node: NodeId, parts: &[(Combinator, Compound)], idx: usize) -> bool {
        if !self.matches_compound(node, &parts[idx].1) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match parts[idx].0 {
            Combinator::Child => self
                .parent(node)
                .is_some_and(|p| self.matches_part(p, parts, idx - 1)),
            Combinator::Descendant => {
                let mut cursor = self.parent(node);
                while let Some(id) = cursor {
                    if self.matches_part(id, parts, idx - 1) {
                        return true;
                    }
                    cursor = self.parent(id);
                }
                false
            }
        }
    }

    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let Some(n) = self.node(node) else {
            return false;
        };
        if compound.tag.as_ref().is_some_and(|t| *t != n.tag) {
            return false;
        }
        if compound
            .id
            .as_ref()
            .is_some_and(|id| n.attrs.get("id") != Some(id))
        {
            return false;
        }
        compound
            .classes
            .iter()
            .all(|c| n.classes.iter().any(|have| have == c))
    }

    fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id.0 as usize)
    }
}
