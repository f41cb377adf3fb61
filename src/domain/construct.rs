//! Feed constructs: the ordered, typed header fields of a syndication document.
//!
//! Each format owns a static template ([`ConstructSet::defaults`]) that fixes
//! which fields exist and the order they are emitted in. Host-supplied
//! overrides are folded into a copy of that template by
//! [`ConstructSet::merge`]; the result is never mutated afterwards.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::FeedFormat;

/// A raw field value as supplied by the host data layer.
///
/// Every TOML or JSON value shape maps onto a variant, so unexpected host data
/// degrades to an omitted field at render time instead of a load failure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Sequences such as `skipHours = [0, 1, 2]`.
    List(Vec<FieldValue>),
    /// Record values such as `{name, email, uri}` persons or cloud settings.
    Fields(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn fields<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self::Fields(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Loose truthiness: null, `false`, zero, empty strings, lists and records are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(value) => *value,
            FieldValue::Integer(value) => *value != 0,
            FieldValue::Float(value) => *value != 0.0,
            FieldValue::Text(value) => !value.is_empty(),
            FieldValue::List(values) => !values.is_empty(),
            FieldValue::Fields(entries) => !entries.is_empty(),
        }
    }

    /// Scalar rendering of the value; lists and records have no scalar form.
    pub fn as_scalar(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Null | FieldValue::List(_) | FieldValue::Fields(_) => None,
            FieldValue::Bool(value) => Some(Cow::Borrowed(if *value { "true" } else { "false" })),
            FieldValue::Integer(value) => Some(Cow::Owned(value.to_string())),
            FieldValue::Float(value) => Some(Cow::Owned(value.to_string())),
            FieldValue::Text(value) => Some(Cow::Borrowed(value.as_str())),
        }
    }

    /// Non-empty scalar text, if any.
    pub fn non_empty_text(&self) -> Option<Cow<'_, str>> {
        if !self.is_truthy() {
            return None;
        }
        self.as_scalar()
    }

    pub fn as_fields(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Fields(entries) => Some(entries),
            _ => None,
        }
    }

    /// Scalar text of a record entry; missing or non-scalar entries read as empty.
    pub fn field_text(&self, key: &str) -> Cow<'_, str> {
        self.as_fields()
            .and_then(|entries| entries.get(key))
            .and_then(FieldValue::as_scalar)
            .unwrap_or(Cow::Borrowed(""))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// One header field of a feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Construct {
    Plain(FieldValue),
    Structured {
        attributes: Vec<(String, String)>,
        value: FieldValue,
    },
}

impl Construct {
    pub fn value(&self) -> &FieldValue {
        match self {
            Construct::Plain(value) => value,
            Construct::Structured { value, .. } => value,
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        match self {
            Construct::Plain(_) => &[],
            Construct::Structured { attributes, .. } => attributes,
        }
    }

    fn with_value(&self, value: FieldValue) -> Self {
        match self {
            Construct::Plain(_) => Construct::Plain(value),
            Construct::Structured { attributes, .. } => Construct::Structured {
                attributes: attributes.clone(),
                value,
            },
        }
    }
}

/// Ordered set of constructs for a single feed format.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructSet {
    entries: Vec<(&'static str, Construct)>,
}

const RSS_FIELDS: &[&str] = &[
    "title",
    "link",
    "description",
    "language",
    "copyright",
    "managingEditor",
    "webMaster",
    "pubDate",
    "lastBuildDate",
    "category",
    "generator",
    "docs",
    "cloud",
    "ttl",
    "image",
    "rating",
    "textInput",
    "skipHours",
    "skipDays",
];

const ATOM_FIELDS: &[&str] = &[
    "title",
    "link",
    "subtitle",
    "id",
    "rights",
    "author",
    "contributor",
    "published",
    "updated",
    "category",
    "generator",
    "logo",
    "icon",
];

/// Atom text constructs carry an explicit `type` attribute.
const ATOM_TEXT_CONSTRUCTS: &[&str] = &["title", "subtitle", "rights"];

impl ConstructSet {
    /// Default template for the given format. `Json` has no constructs.
    pub fn defaults(format: FeedFormat) -> Self {
        let entries = match format {
            FeedFormat::Rss => RSS_FIELDS
                .iter()
                .map(|&name| {
                    let value = match name {
                        "ttl" => FieldValue::Integer(0),
                        "skipHours" | "skipDays" => FieldValue::Null,
                        _ => FieldValue::text(""),
                    };
                    (name, Construct::Plain(value))
                })
                .collect(),
            FeedFormat::Atom => ATOM_FIELDS
                .iter()
                .map(|&name| {
                    let construct = if ATOM_TEXT_CONSTRUCTS.contains(&name) {
                        Construct::Structured {
                            attributes: vec![("type".to_string(), "text".to_string())],
                            value: FieldValue::text(""),
                        }
                    } else {
                        Construct::Plain(FieldValue::text(""))
                    };
                    (name, construct)
                })
                .collect(),
            FeedFormat::Json => Vec::new(),
        };
        Self { entries }
    }

    /// Fold host overrides into the format template.
    ///
    /// Keys outside the template are dropped and `Null` overrides keep the
    /// default. Structured entries keep their attributes; only the value is
    /// replaced. Order always follows the template.
    pub fn merge(format: FeedFormat, overrides: &BTreeMap<String, FieldValue>) -> Self {
        let defaults = Self::defaults(format);

        for key in overrides.keys() {
            if defaults.get(key).is_none() {
                debug!(
                    target = "domain::construct",
                    format = %format,
                    field = %key,
                    "Ignoring construct unknown to the format template"
                );
            }
        }

        let entries = defaults
            .entries
            .into_iter()
            .map(|(name, construct)| match overrides.get(name) {
                Some(value) if *value != FieldValue::Null => {
                    (name, construct.with_value(value.clone()))
                }
                _ => (name, construct),
            })
            .collect();

        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&Construct> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, construct)| construct)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Construct)> {
        self.entries.iter().map(|(name, construct)| (*name, construct))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single syndicated entry. Missing keys read as [`FieldValue::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedItem(BTreeMap<String, FieldValue>);

static NULL_FIELD: FieldValue = FieldValue::Null;

impl FeedItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> &FieldValue {
        self.0.get(key).unwrap_or(&NULL_FIELD)
    }
}

impl<K, V> FromIterator<(K, V)> for FeedItem
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
