//! Minimal ordered XML element tree.
//!
//! Attributes keep insertion order and the renderer is a pure function of the
//! tree, so the same tree always renders to the same bytes.

use std::fmt::{Display, Write as _};

use crate::values::Vec3;

const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq)]
enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element carrying a single `value` attribute.
    #[must_use]
    pub fn value(name: impl Into<String>, value: impl Display) -> Self {
        Self::new(name).attr("value", value)
    }

    /// Element carrying `x`, `y`, `z` attributes.
    #[must_use]
    pub fn point(name: impl Into<String>, v: Vec3) -> Self {
        Self::new(name).xyz(v)
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.attrs.push((key.into(), value.to_string()));
        self
    }

    #[must_use]
    pub fn attr_opt(self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        match value {
            Some(v) => self.attr(key, v),
            None => self,
        }
    }

    #[must_use]
    pub fn xyz(self, v: Vec3) -> Self {
        self.attr("x", v.x).attr("y", v.y).attr("z", v.z)
    }

    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        self.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children
            .extend(children.into_iter().map(XmlNode::Element));
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn push(&mut self, child: Self) {
        self.children.push(XmlNode::Element(child));
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Value of an attribute, if set.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct child elements named `name`.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter_map(move |node| match node {
            XmlNode::Element(e) if e.name == name => Some(e),
            XmlNode::Element(_) | XmlNode::Text(_) => None,
        })
    }

    /// Render as a standalone document with an XML declaration.
    #[must_use]
    pub fn to_document(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        let indent = INDENT.repeat(depth);
        let _ = write!(out, "{indent}<{}", self.name);
        for (key, value) in &self.attrs {
            let _ = write!(out, " {key}=\"{}\"", escape(value));
        }

        match self.children.as_slice() {
            [] => out.push_str(" />\n"),
            [XmlNode::Text(text)] => {
                let _ = writeln!(out, ">{}</{}>", escape(text), self.name);
            }
            children => {
                out.push_str(">\n");
                for child in children {
                    match child {
                        XmlNode::Element(e) => e.render_into(out, depth + 1),
                        XmlNode::Text(text) => {
                            let _ = writeln!(out, "{indent}{INDENT}{}", escape(text));
                        }
                    }
                }
                let _ = writeln!(out, "{indent}</{}>", self.name);
            }
        }
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
