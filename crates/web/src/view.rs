//! Minimal view tree
//!
//! Components produce a [`View`]; embedders turn it into markup with
//! [`View::to_html`] or inspect it directly.

use std::fmt::Write;

/// Rendered output of a component
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    /// Renders nothing
    #[default]
    Empty,
    /// Plain text, escaped on output
    Text(String),
    /// An element with attributes and children
    Element(Element),
    /// Several siblings without a wrapper
    Fragment(Vec<View>),
}

impl View {
    /// Text node
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// All text in document order, joined with single spaces
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        match self {
            Self::Empty => {}
            Self::Text(text) => parts.push(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(parts);
                }
            }
            Self::Fragment(children) => {
                for child in children {
                    child.collect_text(parts);
                }
            }
        }
    }

    /// Whether any text node contains `needle`
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.text_content().contains(needle)
    }

    /// First element (depth first) whose attribute `name` equals `value`
    #[must_use]
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<&Element> {
        match self {
            Self::Empty | Self::Text(_) => None,
            Self::Element(element) => {
                if element.attr_value(name) == Some(value) {
                    return Some(element);
                }
                element
                    .children
                    .iter()
                    .find_map(|child| child.find_by_attr(name, value))
            }
            Self::Fragment(children) => children
                .iter()
                .find_map(|child| child.find_by_attr(name, value)),
        }
    }

    /// Serialize to HTML
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Text(text) => out.push_str(&escape(text)),
            Self::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                for (name, value) in &element.attrs {
                    let _ = write!(out, " {name}=\"{}\"", escape(value));
                }
                out.push('>');
                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
            Self::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
        }
    }
}

impl From<Element> for View {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for View {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for View {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// An element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub tag: &'static str,
    /// Attributes in insertion order
    pub attrs: Vec<(&'static str, String)>,
    /// Child nodes
    pub children: Vec<View>,
}

impl Element {
    /// Create an empty element
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Set the `class` attribute
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Append a child
    #[must_use]
    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children
    #[must_use]
    pub fn children<I, V>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<View>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Value of an attribute
    #[must_use]
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_html_escapes() {
        let view: View = Element::new("p")
            .class("note")
            .child("a < b & \"c\"")
            .into();
        assert_eq!(
            view.to_html(),
            "<p class=\"note\">a &lt; b &amp; &quot;c&quot;</p>"
        );
    }

    #[test]
    fn test_text_content_and_find() {
        let view: View = Element::new("div")
            .child(Element::new("h1").child("Title"))
            .child(View::Fragment(vec![
                View::text("one"),
                Element::new("button").attr("data-action", "go").child("Go").into(),
            ]))
            .into();

        assert_eq!(view.text_content(), "Title one Go");
        assert!(view.contains_text("Title one"));
        let button = view.find_by_attr("data-action", "go").unwrap();
        assert_eq!(button.tag, "button");
        assert!(view.find_by_attr("data-action", "stop").is_none());
    }
}
