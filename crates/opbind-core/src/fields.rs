//! Named field access for represented objects
//!
//! Representers and contracts never know the concrete model type. They go
//! through [`Fields`], which a model implements once by hand:
//!
//! ```ignore
//! impl Fields for Artist {
//!     fn type_name(&self) -> &str { "Artist" }
//!
//!     fn read(&self, name: &str) -> Slot<'_> {
//!         match name {
//!             "name" => Slot::text(self.name.as_deref()),
//!             _ => Slot::Empty,
//!         }
//!     }
//!
//!     fn write(&mut self, name: &str, value: Value) -> Result<()> {
//!         match name {
//!             "name" => text_value(name, value).map(|v| self.name = v),
//!             _ => Err(Error::unknown_field(self.type_name(), name)),
//!         }
//!     }
//! }
//! ```

use serde_json::Value;

use crate::{Error, Result};

/// The current content of one field
#[derive(Debug, Clone)]
pub enum Slot<'a> {
    /// A scalar (or any plain JSON) value
    Value(Value),
    /// An owned-elsewhere nested object
    Nested(&'a dyn Fields),
    /// No value; skipped on render, blank for presence checks
    Empty,
}

impl<'a> Slot<'a> {
    /// Wrap an optional nested object.
    #[must_use]
    pub fn nested<T: Fields>(value: Option<&'a T>) -> Self {
        value.map_or(Self::Empty, |v| Self::Nested(v))
    }

    /// Wrap an optional string field.
    #[must_use]
    pub fn text(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, |v| Self::Value(Value::from(v)))
    }

    /// Wrap an optional integer field.
    #[must_use]
    pub fn integer(value: Option<i64>) -> Self {
        value.map_or(Self::Empty, |v| Self::Value(Value::from(v)))
    }

    /// True when the slot holds nothing worth rendering or validating.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty | Self::Value(Value::Null) => true,
            Self::Value(Value::String(s)) => s.trim().is_empty(),
            Self::Value(_) | Self::Nested(_) => false,
        }
    }

    /// String content of a scalar slot, if it is a JSON string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Field-level access to a model, a contract twin, or any represented object
pub trait Fields: std::fmt::Debug {
    /// Name rendered for the `class` getter and used in error messages.
    fn type_name(&self) -> &str;

    /// Read a field by name. Unknown names read as [`Slot::Empty`].
    fn read(&self, name: &str) -> Slot<'_>;

    /// Write a scalar field from a JSON value.
    fn write(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(Error::unknown_field(self.type_name(), name))
    }

    /// Borrow a nested object for writing, creating it when absent.
    fn nested_mut(&mut self, name: &str) -> Result<&mut dyn Fields> {
        Err(Error::unknown_field(self.type_name(), name))
    }
}

/// Convert a JSON value into an optional string field.
///
/// `null` clears the field.
pub fn text_value(field: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(Error::invalid_value(field, "a string")),
    }
}

/// Convert a JSON value into an optional integer field.
pub fn integer_value(field: &str, value: Value) -> Result<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| Error::invalid_value(field, "an integer")),
        _ => Err(Error::invalid_value(field, "an integer")),
    }
}

/// Read a field as display text, empty when absent.
///
/// Link templates use this to interpolate fields into URLs.
#[must_use]
pub fn text(target: &dyn Fields, name: &str) -> String {
    match target.read(name) {
        Slot::Value(Value::String(s)) => s,
        Slot::Value(Value::Null) | Slot::Empty | Slot::Nested(_) => String::new(),
        Slot::Value(other) => other.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Album/Artist/Song models shared by the unit tests.

    use serde_json::Value;

    use super::{integer_value, text_value, Fields, Slot};
    use crate::{Error, Result};

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Artist {
        pub name: Option<String>,
    }

    impl Fields for Artist {
        fn type_name(&self) -> &str {
            "Artist"
        }

        fn read(&self, name: &str) -> Slot<'_> {
            match name {
                "name" => Slot::text(self.name.as_deref()),
                _ => Slot::Empty,
            }
        }

        fn write(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "name" => text_value(name, value).map(|v| self.name = v),
                _ => Err(Error::unknown_field(self.type_name(), name)),
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Album {
        pub title: Option<String>,
        pub artist: Option<Artist>,
    }

    impl Album {
        pub fn new(title: &str, artist: &str) -> Self {
            Self {
                title: Some(title.to_string()),
                artist: Some(Artist {
                    name: Some(artist.to_string()),
                }),
            }
        }
    }

    impl Fields for Album {
        fn type_name(&self) -> &str {
            "Album"
        }

        fn read(&self, name: &str) -> Slot<'_> {
            match name {
                "title" => Slot::text(self.title.as_deref()),
                "artist" => Slot::nested(self.artist.as_ref()),
                _ => Slot::Empty,
            }
        }

        fn write(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "title" => text_value(name, value).map(|v| self.title = v),
                _ => Err(Error::unknown_field(self.type_name(), name)),
            }
        }

        fn nested_mut(&mut self, name: &str) -> Result<&mut dyn Fields> {
            match name {
                "artist" => Ok(self.artist.get_or_insert_with(Artist::default)),
                _ => Err(Error::unknown_field(self.type_name(), name)),
            }
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Song {
        pub id: Option<i64>,
    }

    impl Fields for Song {
        fn type_name(&self) -> &str {
            "Song"
        }

        fn read(&self, name: &str) -> Slot<'_> {
            match name {
                "id" => Slot::integer(self.id),
                _ => Slot::Empty,
            }
        }

        fn write(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "id" => integer_value(name, value).map(|v| self.id = v),
                _ => Err(Error::unknown_field(self.type_name(), name)),
            }
        }
    }
}
