//! The visual tree produced by section renderers.
//!
//! A small element tree with classes, attributes and inline styles. It is the
//! shared mutable surface export mode operates on, so every field is ordered
//! and comparable: two trees are equal exactly when they serialize equally.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewNode {
    pub tag: String,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub attrs: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<ViewNode>,
}

/// Position of a node as child indices from the root.
pub type NodePath = Vec<usize>;

const VOID_TAGS: [&str; 4] = ["img", "br", "hr", "meta"];

pub fn el(tag: &str) -> ViewNode {
    ViewNode {
        tag: tag.to_string(),
        ..ViewNode::default()
    }
}

impl ViewNode {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        for c in class.split_whitespace() {
            self.classes.insert(c.to_string());
        }
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn style(mut self, name: &str, value: impl Into<String>) -> Self {
        self.styles.insert(name.to_string(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ViewNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Appends `child` only when present.
    pub fn maybe(self, child: Option<ViewNode>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn style_value(&self, name: &str) -> Option<&str> {
        self.styles.get(name).map(String::as_str)
    }

    /// Depth-first, parent before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ViewNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Depth-first with the path of each node.
    pub fn walk_paths<'a>(&'a self, visit: &mut impl FnMut(&NodePath, &'a ViewNode)) {
        let mut path = Vec::new();
        self.walk_paths_inner(&mut path, visit);
    }

    fn walk_paths_inner<'a>(
        &'a self,
        path: &mut NodePath,
        visit: &mut impl FnMut(&NodePath, &'a ViewNode),
    ) {
        visit(path, self);
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            child.walk_paths_inner(path, visit);
            path.pop();
        }
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut ViewNode> {
        let mut node = self;
        for &index in path {
            node = node.children.get_mut(index)?;
        }
        Some(node)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ViewNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_id(id))
    }

    /// Every node carrying `class`, in document order.
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a ViewNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if node.has_class(class) {
                found.push(node);
            }
        });
        found
    }

    /// All text in document order, joined by single spaces.
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.walk(&mut |node| {
            if let Some(text) = node.text.as_deref() {
                if !text.is_empty() {
                    parts.push(text);
                }
            }
        });
        parts.join(" ")
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            let joined = self.classes.iter().map(String::as_str).collect::<Vec<_>>().join(" ");
            push_attr(out, "class", &joined);
        }
        for (name, value) in &self.attrs {
            push_attr(out, name, value);
        }
        if !self.styles.is_empty() {
            let joined = self
                .styles
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; ");
            push_attr(out, "style", &joined);
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escapes_text_and_attributes() {
        let node = el("p")
            .class("note  muted")
            .attr("title", "a \"quoted\" <b>")
            .text("Tom & Jerry <3");
        assert_eq!(
            node.to_html(),
            "<p class=\"muted note\" title=\"a &quot;quoted&quot; &lt;b&gt;\">Tom &amp; Jerry &lt;3</p>"
        );
    }

    #[test]
    fn test_void_tags_have_no_closing_tag() {
        let node = el("div").child(el("img").attr("src", "/a.png")).child(el("br"));
        assert_eq!(node.to_html(), "<div><img src=\"/a.png\"><br></div>");
    }

    #[test]
    fn test_paths_address_nodes() {
        let mut root = el("main").child(el("section").id("a").child(el("p").id("inner")));
        let mut seen = Vec::new();
        root.walk_paths(&mut |path, node| seen.push((path.clone(), node.tag.clone())));
        assert_eq!(seen[2], (vec![0, 0], "p".to_string()));

        root.node_at_mut(&[0, 0]).unwrap().classes.insert("x".to_string());
        assert!(root.find_by_id("inner").unwrap().has_class("x"));
        assert!(root.node_at_mut(&[3]).is_none());
    }

    #[test]
    fn test_text_content_skips_empty() {
        let node = el("div").text("Hello").child(el("span").text("")).child(el("b").text("world"));
        assert_eq!(node.text_content(), "Hello world");
    }
}
