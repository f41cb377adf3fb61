//! Minimal line-oriented XML writer used by the feed renderers.

const CDATA_END: &str = "]]>";

/// Append-only buffer of XML markup, one element per line.
#[derive(Debug, Default)]
pub struct XmlWriter {
    buf: String,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declaration(&mut self, attributes: &[(&str, &str)]) {
        self.buf.push_str("<?xml");
        self.push_attributes(attributes);
        self.buf.push_str("?>\n");
    }

    pub fn open(&mut self, tag: &str, attributes: &[(&str, &str)]) {
        self.start_tag(tag, attributes);
        self.buf.push('\n');
    }

    pub fn close(&mut self, tag: &str) {
        self.end_tag(tag);
        self.buf.push('\n');
    }

    /// `<tag attrs>escaped text</tag>`
    pub fn element(&mut self, tag: &str, attributes: &[(&str, &str)], text: &str) {
        self.start_tag(tag, attributes);
        self.buf.push_str(&escape(text));
        self.close(tag);
    }

    /// `<tag attrs/>`
    pub fn empty_element(&mut self, tag: &str, attributes: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.push_attributes(attributes);
        self.buf.push_str("/>\n");
    }

    /// `<tag attrs><![CDATA[text]]></tag>`
    pub fn cdata_element(&mut self, tag: &str, attributes: &[(&str, &str)], text: &str) {
        self.start_tag(tag, attributes);
        self.buf.push_str("<![CDATA[");
        self.buf.push_str(&text.replace(CDATA_END, "]]]]><![CDATA[>"));
        self.buf.push_str(CDATA_END);
        self.close(tag);
    }

    /// Pre-rendered markup, written unescaped.
    pub fn raw(&mut self, markup: &str) {
        self.buf.push_str(markup);
        if !markup.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    fn start_tag(&mut self, tag: &str, attributes: &[(&str, &str)]) {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.push_attributes(attributes);
        self.buf.push('>');
    }

    fn end_tag(&mut self, tag: &str) {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
    }

    fn push_attributes(&mut self, attributes: &[(&str, &str)]) {
        for (name, value) in attributes {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            self.buf.push_str(&escape(value));
            self.buf.push('"');
        }
    }
}

pub fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
