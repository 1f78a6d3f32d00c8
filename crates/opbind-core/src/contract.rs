//! Contracts: declared fields, constraints, and the validated twin
//!
//! A [`ContractSchema`] lists the fields a form accepts, in declaration
//! order, each with its constraints and an optional nested schema. A
//! [`Contract`] pairs a schema with a private copy (the twin) of a model:
//! input is written into the twin, validated, and only synced back to a
//! model on request.

use std::ops::Deref;
use std::sync::Arc;

use im::Vector;
use itertools::Itertools;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::fields::{Fields, Slot};
use crate::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════
// CONSTRAINTS
// ═══════════════════════════════════════════════════════════════════════════

/// Validation constraints
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Value must not be absent, null, or blank
    Presence,

    /// Length constraint on string values
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },

    /// String value must match the pattern
    Pattern(Regex),
}

impl Constraint {
    /// Check a field slot, returning the error message on failure.
    ///
    /// Only [`Constraint::Presence`] fails on a blank slot; the others
    /// skip it so optional fields stay optional.
    #[must_use]
    pub fn check(&self, slot: &Slot<'_>) -> Option<String> {
        match self {
            Self::Presence => slot.is_blank().then(|| "can't be blank".to_string()),
            Self::Length { min, max } => {
                let len = slot.as_str()?.chars().count();
                if let Some(min_len) = min.filter(|m| len < *m) {
                    return Some(format!(
                        "is too short (minimum is {min_len} characters)"
                    ));
                }
                max.filter(|m| len > *m)
                    .map(|max_len| format!("is too long (maximum is {max_len} characters)"))
            }
            Self::Pattern(re) => {
                let value = slot.as_str()?;
                (!re.is_match(value)).then(|| "is invalid".to_string())
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════

/// Per-field validation messages keyed by dotted field path
///
/// Paths keep the order they were first recorded in, which for a validated
/// contract is the schema's declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Errors(Vector<(String, Vec<String>)>);

impl Errors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field path.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        let path = path.into();
        let message = message.into();
        match self.0.iter().position(|(recorded, _)| *recorded == path) {
            Some(index) => {
                if let Some((_, messages)) = self.0.get_mut(index) {
                    messages.push(message);
                }
            }
            None => self.0.push_back((path, vec![message])),
        }
    }

    /// Messages recorded for a field path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(recorded, _)| recorded == path)
            .map(|(_, messages)| messages.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Every message as `"<path> <message>"`, in recording order.
    #[must_use]
    pub fn full_messages(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|(path, messages)| messages.iter().map(move |m| format!("{path} {m}")))
            .collect()
    }
}

impl Serialize for Errors {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(path, messages)| (path, messages)))
    }
}

impl std::fmt::Display for Errors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().iter().join(", "))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SCHEMA
// ═══════════════════════════════════════════════════════════════════════════

/// The declared shape of a contract
#[derive(Debug, Clone)]
pub struct ContractSchema {
    name: String,
    fields: Vec<FieldContract>,
}

/// A contract for a specific field
#[derive(Debug, Clone)]
pub struct FieldContract {
    /// Field name, also the JSON key an inferred representer uses
    pub name: String,

    /// Constraints for this field
    pub constraints: Vec<Constraint>,

    /// Sub-contract for a nested object field
    pub nested: Option<ContractSchema>,
}

impl ContractSchema {
    /// Create a builder for constructing contract schemas
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ContractSchemaBuilder {
        ContractSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Type name the contract reports when it is the represented object.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldContract] {
        &self.fields
    }

    /// Run every constraint against `target`.
    ///
    /// Nested schemas are checked only when the nested object exists.
    #[must_use]
    pub fn validate(&self, target: &dyn Fields) -> Errors {
        let mut errors = Errors::new();
        self.validate_into(target, "", &mut errors);
        errors
    }

    fn validate_into(&self, target: &dyn Fields, prefix: &str, errors: &mut Errors) {
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.clone()
            } else {
                format!("{prefix}.{}", field.name)
            };
            let slot = target.read(&field.name);

            field
                .constraints
                .iter()
                .filter_map(|c| c.check(&slot))
                .for_each(|message| errors.add(path.clone(), message));

            if let (Some(nested), Slot::Nested(child)) = (&field.nested, &slot) {
                nested.validate_into(*child, &path, errors);
            }
        }
    }
}

impl FieldContract {
    /// Create a builder for field contracts
    #[must_use]
    pub fn builder(name: impl Into<String>) -> FieldContractBuilder {
        FieldContractBuilder {
            name: name.into(),
            constraints: Vec::new(),
            nested: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILDERS
// ═══════════════════════════════════════════════════════════════════════════

pub struct ContractSchemaBuilder {
    name: String,
    fields: Vec<FieldContract>,
}

impl ContractSchemaBuilder {
    /// Add a field to the schema.
    #[must_use]
    pub fn field(mut self, field: FieldContract) -> Self {
        self.fields.push(field);
        self
    }

    /// Add an unconstrained field.
    #[must_use]
    pub fn property(self, name: impl Into<String>) -> Self {
        self.field(FieldContract::builder(name).build())
    }

    #[must_use]
    pub fn build(self) -> ContractSchema {
        ContractSchema {
            name: self.name,
            fields: self.fields,
        }
    }
}

pub struct FieldContractBuilder {
    name: String,
    constraints: Vec<Constraint>,
    nested: Option<ContractSchema>,
}

impl FieldContractBuilder {
    /// Mark the field as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.constraints.push(Constraint::Presence);
        self
    }

    /// Add a constraint to the field.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Constrain string values to a regex pattern.
    pub fn pattern(self, pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(|re| self.constraint(Constraint::Pattern(re)))
            .map_err(|e| Error::InvalidConfig(format!("Invalid regex pattern: {e}")))
    }

    /// Declare the field as a nested object with its own contract.
    #[must_use]
    pub fn nested(mut self, schema: ContractSchema) -> Self {
        self.nested = Some(schema);
        self
    }

    #[must_use]
    pub fn build(self) -> FieldContract {
        FieldContract {
            name: self.name,
            constraints: self.constraints,
            nested: self.nested,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONTRACT
// ═══════════════════════════════════════════════════════════════════════════

/// A validated form over a twin of model `M`
///
/// Derefs to the twin, so `contract.title` reads what was parsed.
#[derive(Debug, Clone)]
pub struct Contract<M> {
    schema: Arc<ContractSchema>,
    twin: M,
    errors: Errors,
}

impl<M: Fields> Contract<M> {
    /// Wrap a model. The contract starts with no errors.
    #[must_use]
    pub fn new(schema: Arc<ContractSchema>, model: M) -> Self {
        Self {
            schema,
            twin: model,
            errors: Errors::new(),
        }
    }

    #[must_use]
    pub const fn errors(&self) -> &Errors {
        &self.errors
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Validate the twin, replacing any previous errors.
    pub fn validate(&mut self) -> bool {
        self.errors = self.schema.validate(&self.twin);
        if self.errors.is_empty() {
            tracing::debug!(contract = %self.schema.name, "contract valid");
        } else {
            tracing::warn!(contract = %self.schema.name, errors = %self.errors, "contract invalid");
        }
        self.errors.is_empty()
    }

    /// Copy the twin's values into `model`.
    pub fn sync(&self, model: &mut M)
    where
        M: Clone,
    {
        model.clone_from(&self.twin);
    }
}

impl<M> Deref for Contract<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.twin
    }
}

impl<M: Fields> Fields for Contract<M> {
    fn type_name(&self) -> &str {
        &self.schema.name
    }

    fn read(&self, name: &str) -> Slot<'_> {
        self.twin.read(name)
    }

    fn write(&mut self, name: &str, value: serde_json::Value) -> Result<()> {
        self.twin.write(name, value)
    }

    fn nested_mut(&mut self, name: &str) -> Result<&mut dyn Fields> {
        self.twin.nested_mut(name)
    }
}
