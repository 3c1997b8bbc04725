//! Embeddable image nodes
//!
//! Two block-level atom nodes the host schema registers next to its built-in
//! nodes. Each one has a static [`NodeSpec`], is parsed from one HTML element
//! shape and rendered back to it.

use serde::{Deserialize, Serialize};

/// Group a node type belongs to in the host schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeGroup {
    Block,
}

/// Which HTML elements a node is parsed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRule {
    pub tag: &'static str,
    /// Attribute that must be present with exactly this value
    pub required_attr: Option<(&'static str, &'static str)>,
}

impl ParseRule {
    pub fn matches(&self, element: &Element) -> bool {
        if element.tag != self.tag {
            return false;
        }
        match self.required_attr {
            Some((name, value)) => element.attr(name) == Some(value),
            None => true,
        }
    }
}

/// Declarative node registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub name: &'static str,
    pub group: NodeGroup,
    pub atom: bool,
    pub draggable: bool,
    pub selectable: bool,
    /// Attribute names, all defaulting to none
    pub attrs: &'static [&'static str],
    pub parse: ParseRule,
}

pub const IMAGE_EDITOR: NodeSpec = NodeSpec {
    name: "imageEditor",
    group: NodeGroup::Block,
    atom: true,
    draggable: true,
    selectable: true,
    attrs: &["src"],
    parse: ParseRule {
        tag: "div",
        required_attr: Some(("data-type", "image-editor")),
    },
};

pub const IMAGE_UPLOAD: NodeSpec = NodeSpec {
    name: "imageUpload",
    group: NodeGroup::Block,
    atom: true,
    draggable: true,
    selectable: true,
    attrs: &["src", "alt", "caption"],
    parse: ParseRule {
        tag: "image-upload",
        required_attr: None,
    },
};

/// All embed node types, in registration order
pub fn node_specs() -> [&'static NodeSpec; 2] {
    [&IMAGE_EDITOR, &IMAGE_UPLOAD]
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageEditorAttrs {
    pub src: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageUploadAttrs {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

/// An embed node instance with its attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbedNode {
    ImageEditor(ImageEditorAttrs),
    ImageUpload(ImageUploadAttrs),
}

impl EmbedNode {
    pub fn spec(&self) -> &'static NodeSpec {
        match self {
            Self::ImageEditor(_) => &IMAGE_EDITOR,
            Self::ImageUpload(_) => &IMAGE_UPLOAD,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Build a node from an element matching one of the parse rules
    pub fn from_element(element: &Element) -> Option<Self> {
        let owned = |name: &str| element.attr(name).map(str::to_string);
        if IMAGE_EDITOR.parse.matches(element) {
            Some(Self::ImageEditor(ImageEditorAttrs { src: owned("src") }))
        } else if IMAGE_UPLOAD.parse.matches(element) {
            Some(Self::ImageUpload(ImageUploadAttrs {
                src: owned("src"),
                alt: owned("alt"),
                caption: owned("caption"),
            }))
        } else {
            None
        }
    }

    /// Element this node serializes to; unset attributes are left out
    pub fn to_element(&self) -> Element {
        match self {
            Self::ImageEditor(attrs) => Element::new("div")
                .with_optional_attr("src", attrs.src.as_deref())
                .with_attr("data-type", "image-editor"),
            Self::ImageUpload(attrs) => Element::new("image-upload")
                .with_optional_attr("src", attrs.src.as_deref())
                .with_optional_attr("alt", attrs.alt.as_deref())
                .with_optional_attr("caption", attrs.caption.as_deref()),
        }
    }

    pub fn render_html(&self) -> String {
        self.to_element().to_html()
    }
}

/// A parsed HTML start tag: lower-cased name plus attributes in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    fn with_optional_attr(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with_attr(name, value),
            None => self,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Render as an empty element (`<tag ...></tag>`)
    pub fn to_html(&self) -> String {
        let mut html = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            html.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
        }
        html.push_str(&format!("></{}>", self.tag));
        html
    }

    /// Parse one start tag at the beginning of `input`
    ///
    /// Returns the element and the number of bytes consumed. Closing tags,
    /// comments and doctypes are not start tags and yield `None`.
    pub fn parse_start_tag(input: &str) -> Option<(Self, usize)> {
        let rest = input.strip_prefix('<')?;
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(rest.len());
        if name_len == 0 {
            return None;
        }
        let mut element = Element::new(rest[..name_len].to_ascii_lowercase());
        let mut pos = 1 + name_len;

        loop {
            let trimmed = input[pos..].trim_start();
            pos = input.len() - trimmed.len();
            if trimmed.starts_with("/>") {
                return Some((element, pos + 2));
            }
            if trimmed.starts_with('>') {
                return Some((element, pos + 1));
            }
            if trimmed.is_empty() {
                return None;
            }

            let attr_len = trimmed
                .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
                .unwrap_or(trimmed.len());
            if attr_len == 0 {
                // Stray '/' or '=' inside the tag
                pos += 1;
                continue;
            }
            let name = trimmed[..attr_len].to_ascii_lowercase();
            pos += attr_len;

            let after_name = input[pos..].trim_start();
            if let Some(value_start) = after_name.strip_prefix('=') {
                let value_start = value_start.trim_start();
                pos = input.len() - value_start.len();
                let (raw, consumed) = match value_start.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let end = value_start[1..].find(quote)?;
                        (&value_start[1..1 + end], end + 2)
                    }
                    _ => {
                        let end = value_start
                            .find(|c: char| c.is_whitespace() || c == '>')
                            .unwrap_or(value_start.len());
                        (&value_start[..end], end)
                    }
                };
                element.attrs.push((name, decode_entities(raw)));
                pos += consumed;
            } else {
                element.attrs.push((name, String::new()));
            }
        }
    }
}

/// Find every embed node in an HTML fragment, in document order
pub fn find_embeds(html: &str) -> Vec<EmbedNode> {
    let mut nodes = Vec::new();
    let mut offset = 0;
    while let Some(found) = html[offset..].find('<') {
        let start = offset + found;
        match Element::parse_start_tag(&html[start..]) {
            Some((element, consumed)) => {
                if let Some(node) = EmbedNode::from_element(&element) {
                    nodes.push(node);
                }
                offset = start + consumed;
            }
            None => offset = start + 1,
        }
    }
    nodes
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_are_block_atoms() {
        for spec in node_specs() {
            assert_eq!(spec.group, NodeGroup::Block);
            assert!(spec.atom, "{} must be an atom", spec.name);
            assert!(spec.draggable, "{} must be draggable", spec.name);
        }
    }

    #[test]
    fn test_parse_start_tag_quoted_and_bare() {
        let (element, consumed) =
            Element::parse_start_tag(r#"<Image-Upload src='a.png' alt="x &amp; y" hidden>rest"#)
                .unwrap();
        assert_eq!(element.tag, "image-upload");
        assert_eq!(element.attr("src"), Some("a.png"));
        assert_eq!(element.attr("alt"), Some("x & y"));
        assert_eq!(element.attr("hidden"), Some(""));
        assert_eq!(consumed, 49);
    }

    #[test]
    fn test_parse_start_tag_rejects_non_start_tags() {
        assert!(Element::parse_start_tag("</div>").is_none());
        assert!(Element::parse_start_tag("<!-- x -->").is_none());
        assert!(Element::parse_start_tag("<div class=\"open").is_none());
        assert!(Element::parse_start_tag("text").is_none());
    }

    #[test]
    fn test_self_closing_and_unquoted() {
        let (element, consumed) = Element::parse_start_tag("<hr data-x=1/>").unwrap();
        assert_eq!(element.tag, "hr");
        assert_eq!(element.attr("data-x"), Some("1/"));
        assert_eq!(consumed, 14);

        let (element, _) = Element::parse_start_tag("<br />").unwrap();
        assert_eq!(element.tag, "br");
        assert!(element.attrs.is_empty());
    }

    #[test]
    fn test_image_editor_requires_data_type() {
        let plain = Element::new("div").with_attr("src", "a.png");
        assert_eq!(EmbedNode::from_element(&plain), None);

        let tagged = plain.with_attr("data-type", "image-editor");
        assert_eq!(
            EmbedNode::from_element(&tagged),
            Some(EmbedNode::ImageEditor(ImageEditorAttrs {
                src: Some("a.png".into())
            }))
        );
    }

    #[test]
    fn test_render_image_editor() {
        let empty = EmbedNode::ImageEditor(ImageEditorAttrs::default());
        insta::assert_snapshot!(empty.render_html(), @r#"<div data-type="image-editor"></div>"#);

        let with_src = EmbedNode::ImageEditor(ImageEditorAttrs {
            src: Some("cat.png".into()),
        });
        insta::assert_snapshot!(
            with_src.render_html(),
            @r#"<div src="cat.png" data-type="image-editor"></div>"#
        );
    }

    #[test]
    fn test_render_image_upload_escapes() {
        let node = EmbedNode::ImageUpload(ImageUploadAttrs {
            src: Some("a.png?x=1&y=2".into()),
            alt: None,
            caption: Some("\"quoted\" <b>".into()),
        });
        insta::assert_snapshot!(
            node.render_html(),
            @r#"<image-upload src="a.png?x=1&amp;y=2" caption="&quot;quoted&quot; &lt;b&gt;"></image-upload>"#
        );
    }

    #[test]
    fn test_render_then_find_preserves_attrs() {
        let node = EmbedNode::ImageUpload(ImageUploadAttrs {
            src: Some("https://example.com/a.png".into()),
            alt: Some("an <image>".into()),
            caption: Some("Tom & Jerry".into()),
        });
        let html = format!("<p>before</p>{}<p>after</p>", node.render_html());
        assert_eq!(find_embeds(&html), vec![node]);
    }
}
