//! JSON representers with optional hypermedia links
//!
//! A [`Representer`] is an ordered list of properties. Rendering walks the
//! list against any [`Fields`] object and emits keys in declaration order;
//! parsing walks the same list and writes matching keys back, creating
//! nested objects on demand. Links are render-only and land in a trailing
//! `_links` object:
//!
//! ```ignore
//! let representer = Representer::infer(&schema)
//!     .link("self", |album| format!("//album/{}", text(album, "title")));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::contract::ContractSchema;
use crate::fields::{Fields, Slot};
use crate::params::Params;
use crate::{Error, Result};

/// JSON key holding hypermedia links
pub const LINKS_KEY: &str = "_links";

type Getter = Arc<dyn Fn(&dyn Fields) -> Value + Send + Sync>;
type HrefTemplate = Arc<dyn Fn(&dyn Fields) -> String + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════════
// LINKS
// ═══════════════════════════════════════════════════════════════════════════

/// A rendered hypermedia link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Link relation (e.g. "self"); the key under `_links`
    pub rel: String,
    /// Target URL
    pub href: String,
}

/// A named link whose href is computed from the represented object
#[derive(Clone)]
pub struct LinkTemplate {
    rel: String,
    href: HrefTemplate,
}

impl LinkTemplate {
    /// Evaluate the template against `represented`.
    #[must_use]
    pub fn resolve(&self, represented: &dyn Fields) -> Link {
        Link {
            rel: self.rel.clone(),
            href: (self.href)(represented),
        }
    }
}

impl fmt::Debug for LinkTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkTemplate").field("rel", &self.rel).finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
enum PropertyKind {
    Field,
    Nested(Representer),
    Getter(Getter),
}

/// One declared property
#[derive(Clone)]
pub struct Property {
    name: String,
    kind: PropertyKind,
}

impl Property {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, represented: &dyn Fields) -> Option<Value> {
        match (&self.kind, represented.read(&self.name)) {
            (PropertyKind::Getter(getter), _) => Some(getter(represented)),
            (_, Slot::Empty | Slot::Value(Value::Null)) => None,
            (PropertyKind::Nested(representer), Slot::Nested(child)) => {
                Some(representer.to_value(child, &RenderOptions::default()))
            }
            (PropertyKind::Field, Slot::Nested(child)) => {
                tracing::debug!(
                    property = %self.name,
                    type_name = child.type_name(),
                    "skipping nested object declared as plain property"
                );
                None
            }
            (_, Slot::Value(value)) => Some(value),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            PropertyKind::Field => "field",
            PropertyKind::Nested(_) => "nested",
            PropertyKind::Getter(_) => "getter",
        };
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RENDER OPTIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Options accepted by `to_json`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// When set, only these top-level keys are rendered
    pub include: Option<Vec<String>>,
}

impl RenderOptions {
    /// Restrict output to the given keys.
    #[must_use]
    pub fn include<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            include: Some(keys.into_iter().map(Into::into).collect()),
        }
    }

    /// Read options from operation params (`include` as an array of strings).
    pub fn from_params(params: &Params) -> Result<Self> {
        match params.get("include") {
            None | Some(Value::Null) => Ok(Self::default()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| Error::invalid_value("include", "an array of strings"))
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::include),
            Some(_) => Err(Error::invalid_value("include", "an array of strings")),
        }
    }

    fn allows(&self, key: &str) -> bool {
        self.include
            .as_ref()
            .map_or(true, |keys| keys.iter().any(|k| k == key))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// REPRESENTER
// ═══════════════════════════════════════════════════════════════════════════

/// Declarative JSON mapping for a represented object
#[derive(Debug, Clone, Default)]
pub struct Representer {
    properties: Vec<Property>,
    links: Vec<LinkTemplate>,
}

impl Representer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a representer with one property per contract field.
    ///
    /// Nested contract fields become nested representers.
    #[must_use]
    pub fn infer(schema: &ContractSchema) -> Self {
        schema
            .fields()
            .iter()
            .fold(Self::new(), |representer, field| match &field.nested {
                Some(nested) => representer.nested(&field.name, Self::infer(nested)),
                None => representer.property(&field.name),
            })
    }

    /// Declare a plain property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(Property {
            name: name.into(),
            kind: PropertyKind::Field,
        });
        self
    }

    /// Declare a nested object property with its own representer.
    #[must_use]
    pub fn nested(mut self, name: impl Into<String>, representer: Self) -> Self {
        self.properties.push(Property {
            name: name.into(),
            kind: PropertyKind::Nested(representer),
        });
        self
    }

    /// Declare a render-only property computed from the represented object.
    #[must_use]
    pub fn getter<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&dyn Fields) -> Value + Send + Sync + 'static,
    {
        self.properties.push(Property {
            name: name.into(),
            kind: PropertyKind::Getter(Arc::new(getter)),
        });
        self
    }

    /// Add a hypermedia link rendered under `_links`.
    #[must_use]
    pub fn link<F>(mut self, rel: impl Into<String>, href: F) -> Self
    where
        F: Fn(&dyn Fields) -> String + Send + Sync + 'static,
    {
        self.links.push(LinkTemplate {
            rel: rel.into(),
            href: Arc::new(href),
        });
        self
    }

    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Resolve every link against `represented`, in declaration order.
    #[must_use]
    pub fn resolve_links(&self, represented: &dyn Fields) -> Vec<Link> {
        self.links.iter().map(|l| l.resolve(represented)).collect()
    }

    /// Render `represented` into a JSON object.
    #[must_use]
    pub fn to_value(&self, represented: &dyn Fields, options: &RenderOptions) -> Value {
        let mut object: Map<String, Value> = self
            .properties
            .iter()
            .filter(|p| options.allows(&p.name))
            .filter_map(|p| p.render(represented).map(|v| (p.name.clone(), v)))
            .collect();

        if !self.links.is_empty() && options.allows(LINKS_KEY) {
            let links: Map<String, Value> = self
                .resolve_links(represented)
                .into_iter()
                .map(|link| (link.rel, serde_json::json!({ "href": link.href })))
                .collect();
            object.insert(LINKS_KEY.to_string(), Value::Object(links));
        }

        Value::Object(object)
    }

    /// Render `represented` into a compact JSON string.
    pub fn render(&self, represented: &dyn Fields, options: &RenderOptions) -> Result<String> {
        let value = self.to_value(represented, options);
        tracing::debug!(type_name = represented.type_name(), "rendered representation");
        serde_json::to_string(&value).map_err(|e| Error::Serialize(e.to_string()))
    }

    /// Parse a JSON document into `target`.
    pub fn parse(&self, raw: &str, target: &mut dyn Fields) -> Result<()> {
        let value: Value = serde_json::from_str(raw)?;
        self.parse_value(&value, target)
    }

    /// Bind an already-decoded JSON object into `target`.
    ///
    /// Undeclared keys, `_links` included, are ignored. Getter properties
    /// are never written.
    pub fn parse_value(&self, value: &Value, target: &mut dyn Fields) -> Result<()> {
        let object = value.as_object().ok_or_else(|| {
            Error::Parse(format!(
                "expected a JSON object for {}, got {}",
                target.type_name(),
                json_kind(value)
            ))
        })?;

        for property in &self.properties {
            let Some(incoming) = object.get(&property.name) else {
                continue;
            };
            match &property.kind {
                PropertyKind::Field => target.write(&property.name, incoming.clone())?,
                PropertyKind::Nested(_) if incoming.is_null() => {}
                PropertyKind::Nested(representer) => {
                    representer.parse_value(incoming, target.nested_mut(&property.name)?)?;
                }
                PropertyKind::Getter(_) => {}
            }
        }

        tracing::debug!(type_name = target.type_name(), "parsed representation");
        Ok(())
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::contract::FieldContract;
    use crate::fields::fixtures::{Album, Song};
    use crate::fields::text;

    fn album_schema() -> ContractSchema {
        ContractSchema::builder("AlbumContract")
            .field(FieldContract::builder("title").required().build())
            .field(
                FieldContract::builder("artist")
                    .nested(ContractSchema::builder("ArtistContract").property("name").build())
                    .build(),
            )
            .build()
    }

    fn hypermedia() -> Representer {
        Representer::infer(&album_schema())
            .link("self", |album| format!("//album/{}", text(album, "title")))
    }

    #[test]
    fn test_render_in_declaration_order() -> Result<()> {
        let json = Representer::infer(&album_schema())
            .render(&Album::new("After The War", "Gary Moore"), &RenderOptions::default())?;
        assert_eq!(json, r#"{"title":"After The War","artist":{"name":"Gary Moore"}}"#);
        Ok(())
    }

    #[test]
    fn test_infer_declares_one_property_per_contract_field() {
        let representer = Representer::infer(&album_schema()).getter("class", |_| json!("x"));
        let names: Vec<&str> = representer.properties().iter().map(Property::name).collect();
        assert_eq!(names, vec!["title", "artist", "class"]);
    }

    #[test]
    fn test_render_skips_absent_fields() -> Result<()> {
        let json = Representer::infer(&album_schema())
            .render(&Album::default(), &RenderOptions::default())?;
        assert_eq!(json, "{}");
        Ok(())
    }

    #[test]
    fn test_render_appends_links() -> Result<()> {
        let json = hypermedia().render(
            &Album::new("After The War", "Gary Moore"),
            &RenderOptions::default(),
        )?;
        assert_eq!(
            json,
            r#"{"title":"After The War","artist":{"name":"Gary Moore"},"_links":{"self":{"href":"//album/After The War"}}}"#
        );
        Ok(())
    }

    #[test]
    fn test_getter_renders_type_name() -> Result<()> {
        let representer = Representer::new()
            .getter("class", |r| Value::from(r.type_name()))
            .property("id");
        let json = representer.render(&Song { id: Some(1) }, &RenderOptions::default())?;
        assert_eq!(json, r#"{"class":"Song","id":1}"#);
        Ok(())
    }

    #[test]
    fn test_include_restricts_keys() -> Result<()> {
        let representer = Representer::new()
            .getter("class", |r| Value::from(r.type_name()))
            .property("id");
        let json = representer.render(&Song { id: Some(1) }, &RenderOptions::include(["id"]))?;
        assert_eq!(json, r#"{"id":1}"#);
        Ok(())
    }

    #[test]
    fn test_include_can_drop_links() {
        let value = hypermedia().to_value(
            &Album::new("After The War", "Gary Moore"),
            &RenderOptions::include(["title"]),
        );
        assert_eq!(value, json!({"title": "After The War"}));
    }

    #[test]
    fn test_parse_populates_nested_object() -> Result<()> {
        let mut album = Album::default();
        Representer::infer(&album_schema()).parse(
            r#"{"title":"Run For Cover","artist":{"name":"Gary Moore"}}"#,
            &mut album,
        )?;
        assert_eq!(album, Album::new("Run For Cover", "Gary Moore"));
        Ok(())
    }

    #[test]
    fn test_parse_ignores_links_and_unknown_keys() -> Result<()> {
        let mut album = Album::default();
        hypermedia().parse(
            r#"{"title":"After The War","year":1989,"_links":{"self":{"href":"//album/x"}}}"#,
            &mut album,
        )?;
        assert_eq!(album.title.as_deref(), Some("After The War"));
        assert_eq!(album.artist, None);
        Ok(())
    }

    #[test]
    fn test_parse_null_nested_leaves_object_absent() -> Result<()> {
        let mut album = Album::default();
        Representer::infer(&album_schema()).parse(r#"{"artist":null}"#, &mut album)?;
        assert_eq!(album.artist, None);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let mut album = Album::default();
        let result = Representer::infer(&album_schema()).parse("{\"title\":", &mut album);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let mut album = Album::default();
        let result = Representer::infer(&album_schema()).parse("[1,2]", &mut album);
        assert!(matches!(result, Err(Error::Parse(msg)) if msg.contains("an array")));
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        let mut album = Album::default();
        let result = Representer::infer(&album_schema()).parse(r#"{"title":5}"#, &mut album);
        assert_eq!(result, Err(Error::invalid_value("title", "a string")));
    }

    #[test]
    fn test_render_options_from_params() -> Result<()> {
        let params = Params::from_value(json!({"include": ["id"]}))?;
        assert_eq!(RenderOptions::from_params(&params)?, RenderOptions::include(["id"]));

        let params = Params::from_value(json!({"include": "id"}))?;
        assert!(RenderOptions::from_params(&params).is_err());
        Ok(())
    }
}
