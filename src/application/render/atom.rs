//! Atom (RFC 4287) dialect.

use crate::domain::construct::{FeedItem, FieldValue};
use crate::domain::types::FeedFormat;

use super::dates;
use super::format::{FieldRenderer, FormatVariant, RenderContext, render_text_field};
use super::person;
use super::xml::XmlWriter;

pub static VARIANT: FormatVariant = FormatVariant {
    format: FeedFormat::Atom,
    root_tag: "feed",
    root_attributes: &[("xmlns", "http://www.w3.org/2005/Atom")],
    wrapper_tag: None,
    item_tag: "entry",
    field_renderers: &[
        ("link", render_link as FieldRenderer),
        ("id", render_id as FieldRenderer),
        ("author", render_author as FieldRenderer),
        ("contributor", render_contributor as FieldRenderer),
        ("published", render_published as FieldRenderer),
        ("updated", render_updated as FieldRenderer),
    ],
    item_renderer: render_entry,
};

fn render_link(ctx: &RenderContext<'_>, _value: &FieldValue, out: &mut XmlWriter) {
    out.empty_element(
        "link",
        &[
            ("rel", "self"),
            ("type", "application/atom+xml"),
            ("href", ctx.channel.url.as_str()),
        ],
    );
    let home = ctx.home_link();
    out.empty_element(
        "link",
        &[
            ("rel", "alternate"),
            ("type", "text/html"),
            ("href", home.as_str()),
        ],
    );
}

fn render_id(ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    match value.non_empty_text() {
        Some(id) => out.element("id", &[], &id),
        None => out.element("id", &[], &ctx.channel.url),
    }
}

fn render_author(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    person::write_atom(out, "author", value);
}

fn render_contributor(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    person::write_atom(out, "contributor", value);
}

fn render_published(ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    write_published(ctx, value, out);
}

fn render_updated(_ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    write_date(out, "updated", value);
}

fn render_entry(ctx: &RenderContext<'_>, item: &FeedItem, out: &mut XmlWriter) {
    let link = item.get("link").non_empty_text();
    if let Some(link) = link.as_deref() {
        out.element("id", &[], link);
    }
    render_text_field(out, "title", item.get("title"));
    if let Some(link) = link.as_deref() {
        out.empty_element(
            "link",
            &[("rel", "alternate"), ("type", "text/html"), ("href", link)],
        );
    }
    write_date(out, "updated", item.get("updated"));
    write_published(ctx, item.get("published"), out);
    render_text_field(out, "summary", item.get("summary"));

    let author = item.get("author");
    if author.is_truthy() {
        person::write_atom(out, "author", author);
    } else {
        person::write_atom(out, "author", ctx.construct_value("author"));
    }
    person::write_atom(out, "contributor", item.get("contributor"));

    if let Some(content) = item.get("content").non_empty_text() {
        let language = ctx.channel.language.as_str();
        if language.is_empty() {
            out.cdata_element("content", &[("type", "html")], &content);
        } else {
            out.cdata_element(
                "content",
                &[("type", "html"), ("xml:lang", language)],
                &content,
            );
        }
    }
}

/// Falls back to the channel publication date.
fn write_published(ctx: &RenderContext<'_>, value: &FieldValue, out: &mut XmlWriter) {
    match value.non_empty_text() {
        Some(_) => write_date(out, "published", value),
        None => write_date(out, "published", &FieldValue::text(ctx.channel.published.as_str())),
    }
}

fn write_date(out: &mut XmlWriter, tag: &str, value: &FieldValue) {
    let Some(raw) = value.non_empty_text() else {
        return;
    };
    if let Some(formatted) = dates::parse(&raw).and_then(dates::rfc3339) {
        out.element(tag, &[], &formatted);
    }
}
