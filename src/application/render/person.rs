//! Person constructs (`author`, `contributor`, `managingEditor`, `webMaster`).

use std::borrow::Cow;

use crate::domain::construct::FieldValue;

use super::xml::XmlWriter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Person<'a> {
    /// Free-form display string, emitted verbatim.
    Display(Cow<'a, str>),
    Record {
        name: Cow<'a, str>,
        email: Cow<'a, str>,
        uri: Cow<'a, str>,
    },
}

impl<'a> Person<'a> {
    /// `None` for falsy values and for records whose fields are all empty.
    pub fn from_value(value: &'a FieldValue) -> Option<Self> {
        if value.as_fields().is_some() {
            let (name, email, uri) = (
                value.field_text("name"),
                value.field_text("email"),
                value.field_text("uri"),
            );
            if name.is_empty() && email.is_empty() && uri.is_empty() {
                return None;
            }
            return Some(Person::Record { name, email, uri });
        }
        value.non_empty_text().map(Person::Display)
    }

    /// Single-text RSS form: `email (name)`, `email` or `name`.
    pub fn rss_text(&self) -> Option<Cow<'a, str>> {
        match self {
            Person::Display(text) => Some(text.clone()),
            Person::Record { name, email, .. } if !email.is_empty() => {
                if name.is_empty() {
                    Some(email.clone())
                } else {
                    Some(Cow::Owned(format!("{email} ({name})")))
                }
            }
            Person::Record { name, .. } if !name.is_empty() => Some(name.clone()),
            Person::Record { .. } => None,
        }
    }
}

/// RSS person: a single text element.
pub fn write_rss(out: &mut XmlWriter, tag: &str, value: &FieldValue) {
    if let Some(text) = Person::from_value(value).and_then(|person| person.rss_text()) {
        out.element(tag, &[], &text);
    }
}

/// Atom person: nested `<name>`, `<uri>`, `<email>` children.
pub fn write_atom(out: &mut XmlWriter, tag: &str, value: &FieldValue) {
    let Some(person) = Person::from_value(value) else {
        return;
    };

    out.open(tag, &[]);
    match person {
        Person::Display(text) => out.element("name", &[], &text),
        Person::Record { name, email, uri } => {
            for (child, text) in [("name", name), ("uri", uri), ("email", email)] {
                if !text.is_empty() {
                    out.element(child, &[], &text);
                }
            }
        }
    }
    out.close(tag);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(write: fn(&mut XmlWriter, &str, &FieldValue), value: FieldValue) -> String {
        let mut out = XmlWriter::new();
        write(&mut out, "author", &value);
        out.into_string()
    }

    #[test]
    fn name_only_record_renders_name() {
        let value = FieldValue::fields([("name", "A"), ("email", ""), ("uri", "")]);
        assert_eq!(rendered(write_rss, value.clone()), "<author>A</author>\n");
        assert_eq!(
            rendered(write_atom, value),
            "<author>\n<name>A</name>\n</author>\n"
        );
    }

    #[test]
    fn empty_record_renders_nothing() {
        let value = FieldValue::fields([("name", ""), ("email", ""), ("uri", "")]);
        assert_eq!(rendered(write_rss, value.clone()), "");
        assert_eq!(rendered(write_atom, value), "");
    }

    #[test]
    fn rss_prefers_email_with_name_in_parens() {
        let value = FieldValue::fields([("email", "e"), ("name", "n")]);
        assert_eq!(rendered(write_rss, value), "<author>e (n)</author>\n");
    }

    #[test]
    fn atom_emits_each_non_empty_part() {
        let value = FieldValue::fields([
            ("name", "Ann"),
            ("email", "ann@example.com"),
            ("uri", "https://ann.example"),
        ]);
        assert_eq!(
            rendered(write_atom, value),
            "<author>\n<name>Ann</name>\n<uri>https://ann.example</uri>\n<email>ann@example.com</email>\n</author>\n"
        );
    }

    #[test]
    fn plain_string_is_wrapped_verbatim() {
        assert_eq!(
            rendered(write_rss, FieldValue::text("geo@herald.com (George)")),
            "<author>geo@herald.com (George)</author>\n"
        );
        assert_eq!(
            rendered(write_atom, FieldValue::text("George")),
            "<author>\n<name>George</name>\n</author>\n"
        );
    }
}
