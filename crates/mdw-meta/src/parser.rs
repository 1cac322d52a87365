//! Metainf block parser.
//!
//! # Grammar
//!
//! ```text
//! Title: Getting started
//! # comment lines and blank lines are ignored
//! Teaser: A long teaser that
//!     continues on indented lines
//! Robots: User-agent: *
//! ```
//!
//! A field starts on every line whose first character is not whitespace.
//! Indented lines continue the current field and are joined with single
//! spaces. The key is everything before the first colon.

use std::sync::LazyLock;

use regex::Regex;

use crate::date::parse_date;
use crate::error::MetaInfFieldError;
use crate::schema::{FieldKind, FieldSpec, MetaInfSchema};
use crate::value::{MetaValue, ParsedMetaInf};

static FIELD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<key>[^:]+?)\s*:\s*(?P<value>.*)$").unwrap());

/// Normalize a field name: trimmed, lower-case, spaces replaced by underscores.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

/// Parse a raw metainf block against `schema`.
///
/// Every schema field is present in the result, defaulted when the block
/// does not set it.
///
/// # Errors
///
/// - [`MetaInfFieldError::UnknownField`] for fields outside the schema when
///   custom fields are disabled
/// - [`MetaInfFieldError::EmptyValue`] for fields with nothing after the colon
/// - [`MetaInfFieldError::InvalidValue`] when a value does not fit the field type
/// - [`MetaInfFieldError::Malformed`] for lines that are not `key: value`
pub fn parse(schema: &MetaInfSchema, raw: &str) -> Result<ParsedMetaInf, MetaInfFieldError> {
    let mut meta = ParsedMetaInf::defaults(schema);

    for block in field_blocks(raw) {
        let joined = block
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(" ");

        let Some(caps) = FIELD_PATTERN.captures(&joined) else {
            return Err(MetaInfFieldError::Malformed { line: joined });
        };

        let key = normalize_key(&caps["key"]);
        let value = caps["value"].trim();
        if value.is_empty() {
            return Err(MetaInfFieldError::EmptyValue { field: key });
        }

        match schema.field(&key) {
            Some(spec) => meta.set(spec.name, cast(spec, value)?),
            None if schema.allows_custom_fields() => {
                tracing::debug!(schema = schema.name(), field = %key, "Accepted custom metainf field");
                meta.set_custom(key, value.to_owned());
            }
            None => return Err(MetaInfFieldError::UnknownField { field: key }),
        }
    }

    Ok(meta)
}

/// Group lines into field blocks, dropping blank and comment lines.
fn field_blocks(raw: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();

    for line in raw.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let continues = line.starts_with(char::is_whitespace);
        match blocks.last_mut() {
            Some(block) if continues => block.push(line),
            _ => blocks.push(vec![line]),
        }
    }

    blocks
}

/// Cast a raw value to the declared field type.
fn cast(spec: &FieldSpec, value: &str) -> Result<MetaValue, MetaInfFieldError> {
    let invalid = || MetaInfFieldError::InvalidValue {
        field: spec.name.to_owned(),
        kind: spec.kind.as_str(),
        value: value.to_owned(),
    };

    match spec.kind {
        FieldKind::Int => value.parse().map(MetaValue::Int).map_err(|_| invalid()),
        FieldKind::Date => parse_date(value).map(MetaValue::Date).ok_or_else(invalid),
        FieldKind::Bool => Ok(MetaValue::Bool(value.eq_ignore_ascii_case("true"))),
        FieldKind::Text => Ok(MetaValue::Text(value.to_owned())),
    }
}
