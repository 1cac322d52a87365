//! Metainf field registries.
//!
//! Each content type (page or navigation level) has a static table mapping
//! field name to its [`FieldKind`] and default value. Field names are stored
//! in their normalized form: lower-case, underscores instead of spaces.

use crate::value::MetaValue;

/// Declared type of a metainf field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integer.
    Int,
    /// Free text, stored verbatim.
    Text,
    /// Calendar date with optional time of day.
    Date,
    /// `true` when the value is `"true"` (case-insensitive), `false` otherwise.
    Bool,
}

impl FieldKind {
    /// Lower-case name used in error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Text => "text",
            Self::Date => "date",
            Self::Bool => "bool",
        }
    }
}

/// Default value of a field when the block does not set it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldDefault {
    /// No value.
    Null,
    /// Integer default.
    Int(i64),
    /// Boolean default.
    Bool(bool),
    /// Text default.
    Text(&'static str),
}

impl FieldDefault {
    pub(crate) fn to_value(self) -> MetaValue {
        match self {
            Self::Null => MetaValue::Null,
            Self::Int(v) => MetaValue::Int(v),
            Self::Bool(v) => MetaValue::Bool(v),
            Self::Text(v) => MetaValue::Text(v.to_owned()),
        }
    }
}

/// One registered field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Normalized field name.
    pub name: &'static str,
    /// Declared type.
    pub kind: FieldKind,
    /// Value used when the field is absent.
    pub default: FieldDefault,
}

const fn field(name: &'static str, kind: FieldKind, default: FieldDefault) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        default,
    }
}

/// Fields accepted in a content page's metainf block.
pub const PAGE_FIELDS: &[FieldSpec] = &[
    field("title", FieldKind::Text, FieldDefault::Null),
    field("nav_name", FieldKind::Text, FieldDefault::Null),
    field("description", FieldKind::Text, FieldDefault::Null),
    field("author", FieldKind::Text, FieldDefault::Null),
    field("date", FieldKind::Date, FieldDefault::Null),
    field("order", FieldKind::Int, FieldDefault::Int(0)),
    field("template", FieldKind::Text, FieldDefault::Null),
    field("teaser", FieldKind::Text, FieldDefault::Null),
    field("teaser_image", FieldKind::Text, FieldDefault::Null),
    field("sitemap_priority", FieldKind::Text, FieldDefault::Null),
    field("sitemap_changefreq", FieldKind::Text, FieldDefault::Null),
    field("robots", FieldKind::Text, FieldDefault::Null),
    field("published", FieldKind::Bool, FieldDefault::Bool(true)),
];

/// Fields accepted in a navigation level metadata file.
pub const NAV_FIELDS: &[FieldSpec] = &[
    field("nav_name", FieldKind::Text, FieldDefault::Null),
    field("order", FieldKind::Int, FieldDefault::Int(0)),
];

/// A field registry together with the policy for fields it does not list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetaInfSchema {
    name: &'static str,
    fields: &'static [FieldSpec],
    allow_custom_fields: bool,
}

impl MetaInfSchema {
    /// Build a schema from a static field table. Custom fields are rejected.
    #[must_use]
    pub const fn new(name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self {
            name,
            fields,
            allow_custom_fields: false,
        }
    }

    /// Schema for content pages.
    #[must_use]
    pub const fn page() -> Self {
        Self::new("page", PAGE_FIELDS)
    }

    /// Schema for navigation level metadata files.
    #[must_use]
    pub const fn navigation() -> Self {
        Self::new("navigation", NAV_FIELDS)
    }

    /// Accept (`true`) or reject (`false`) fields missing from the table.
    ///
    /// Accepted unknown fields are kept as text in
    /// [`ParsedMetaInf::custom_fields`](crate::ParsedMetaInf::custom_fields).
    #[must_use]
    pub const fn with_custom_fields(mut self, allow: bool) -> Self {
        self.allow_custom_fields = allow;
        self
    }

    /// Schema name, used in log output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Registered fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Whether unknown fields are stored instead of rejected.
    #[must_use]
    pub fn allows_custom_fields(&self) -> bool {
        self.allow_custom_fields
    }

    /// Look up a field by normalized name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
