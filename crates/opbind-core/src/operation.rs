//! Operations: populate a contract from input, validate, render
//!
//! An [`OperationConfig`] is built once per kind of request and shared via
//! `Arc`. It carries the contract schema, the representer (explicit or
//! inferred from the schema), which object is represented, the processing
//! step, and the model builder used by [`OperationConfig::present`].
//! Each call to [`OperationConfig::run`] creates a fresh [`Operation`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

use crate::contract::{Contract, ContractSchema, Errors};
use crate::fields::Fields;
use crate::params::Params;
use crate::representer::{RenderOptions, Representer};
use crate::{Error, Result};

type ModelBuilder<M> = Arc<dyn Fn(&Params) -> Result<M> + Send + Sync>;
type RepresenterExtension = Box<dyn FnOnce(Representer) -> Representer>;

/// Which object an operation renders
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Represented {
    /// The domain model
    #[default]
    Model,
    /// The contract twin
    Contract,
}

/// The per-operation processing step
pub trait Process<M>: Send + Sync {
    /// Run once per operation instance with the request params.
    fn process(&self, op: &mut Operation<M>, params: &Params) -> Result<()>;
}

impl<M, F> Process<M> for F
where
    F: Fn(&mut Operation<M>, &Params) -> Result<()> + Send + Sync,
{
    fn process(&self, op: &mut Operation<M>, params: &Params) -> Result<()> {
        self(op, params)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════

/// Immutable description of one kind of operation
pub struct OperationConfig<M> {
    name: String,
    schema: Arc<ContractSchema>,
    representer: Representer,
    represented: Represented,
    process: Arc<dyn Process<M>>,
    model: ModelBuilder<M>,
}

impl<M> fmt::Debug for OperationConfig<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationConfig")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("representer", &self.representer)
            .field("represented", &self.represented)
            .finish_non_exhaustive()
    }
}

impl<M> OperationConfig<M>
where
    M: Fields + Clone + Default + 'static,
{
    /// Create a new config builder.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> OperationConfigBuilder<M> {
        OperationConfigBuilder {
            name: name.into(),
            schema: None,
            representer: None,
            extensions: Vec::new(),
            represented: Represented::default(),
            process: None,
            model: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn schema(&self) -> &ContractSchema {
        &self.schema
    }

    #[must_use]
    pub const fn representer(&self) -> &Representer {
        &self.representer
    }

    #[must_use]
    pub const fn represented(&self) -> Represented {
        self.represented
    }

    /// Build the model for `params` with the configured model builder.
    pub fn build_model(&self, params: &Params) -> Result<M> {
        (self.model)(params)
    }

    /// Create an operation, run its processing step, and report the result.
    ///
    /// A failed validation is `Ok((false, op))`; only unbindable input or a
    /// failing processing step is an `Err`.
    pub fn run(self: &Arc<Self>, params: Params) -> Result<(bool, Operation<M>)> {
        tracing::debug!(operation = %self.name, "running operation");
        let mut op = Operation::new(Arc::clone(self), params.clone());
        self.process.process(&mut op, &params)?;
        tracing::debug!(operation = %self.name, valid = op.valid, "operation finished");
        Ok((op.valid, op))
    }

    /// Create an operation for rendering only: build the model, skip
    /// processing and validation.
    pub fn present(self: &Arc<Self>, params: Params) -> Result<Operation<M>> {
        tracing::debug!(operation = %self.name, "presenting operation");
        let model = self.build_model(&params)?;
        let mut op = Operation::new(Arc::clone(self), params);
        op.set_model(model);
        Ok(op)
    }
}

pub struct OperationConfigBuilder<M> {
    name: String,
    schema: Option<ContractSchema>,
    representer: Option<Representer>,
    extensions: Vec<RepresenterExtension>,
    represented: Represented,
    process: Option<Arc<dyn Process<M>>>,
    model: Option<ModelBuilder<M>>,
}

impl<M> OperationConfigBuilder<M>
where
    M: Fields + Clone + Default + 'static,
{
    /// Set the contract schema.
    #[must_use]
    pub fn contract(mut self, schema: ContractSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Use an explicit representer instead of inferring one from the contract.
    #[must_use]
    pub fn representer(mut self, representer: Representer) -> Self {
        self.representer = Some(representer);
        self
    }

    /// Extend the representer (explicit or inferred) at build time, e.g.
    /// to add hypermedia links.
    #[must_use]
    pub fn extend_representer<F>(mut self, extension: F) -> Self
    where
        F: FnOnce(Representer) -> Representer + 'static,
    {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Choose which object is rendered.
    #[must_use]
    pub const fn represent(mut self, represented: Represented) -> Self {
        self.represented = represented;
        self
    }

    /// Set the processing step. Defaults to doing nothing.
    #[must_use]
    pub fn process<P: Process<M> + 'static>(mut self, process: P) -> Self {
        self.process = Some(Arc::new(process));
        self
    }

    /// Set the model builder used by `present`. Defaults to `M::default()`.
    #[must_use]
    pub fn model<F>(mut self, model: F) -> Self
    where
        F: Fn(&Params) -> Result<M> + Send + Sync + 'static,
    {
        self.model = Some(Arc::new(model));
        self
    }

    /// Build the configuration, returning an error if validation fails.
    pub fn build(self) -> Result<Arc<OperationConfig<M>>> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConfig("operation name cannot be empty".into()));
        }

        let schema = self
            .schema
            .unwrap_or_else(|| ContractSchema::builder(format!("{}::Contract", self.name)).build());
        let representer = self
            .extensions
            .into_iter()
            .fold(
                self.representer.unwrap_or_else(|| Representer::infer(&schema)),
                |representer, extend| extend(representer),
            );

        Ok(Arc::new(OperationConfig {
            name: self.name,
            schema: Arc::new(schema),
            representer,
            represented: self.represented,
            process: self
                .process
                .unwrap_or_else(|| Arc::new(|_: &mut Operation<M>, _: &Params| Ok::<(), Error>(()))),
            model: self
                .model
                .unwrap_or_else(|| Arc::new(|_: &Params| Ok::<M, Error>(M::default()))),
        }))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// OPERATION
// ═══════════════════════════════════════════════════════════════════════════

/// One request: params in, model and contract held, JSON out
pub struct Operation<M> {
    config: Arc<OperationConfig<M>>,
    params: Params,
    model: M,
    contract: Contract<M>,
    valid: bool,
}

impl<M: fmt::Debug> fmt::Debug for Operation<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.config.name)
            .field("params", &self.params)
            .field("model", &self.model)
            .field("contract", &self.contract)
            .field("valid", &self.valid)
            .finish()
    }
}

impl<M> Operation<M>
where
    M: Fields + Clone + Default + 'static,
{
    fn new(config: Arc<OperationConfig<M>>, params: Params) -> Self {
        let contract = Contract::new(Arc::clone(&config.schema), M::default());
        Self {
            config,
            params,
            model: M::default(),
            contract,
            valid: true,
        }
    }

    #[must_use]
    pub fn config(&self) -> &OperationConfig<M> {
        &self.config
    }

    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub const fn contract(&self) -> &Contract<M> {
        &self.contract
    }

    #[must_use]
    pub fn errors(&self) -> &Errors {
        self.contract.errors()
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Assign the model without validating; the contract becomes an
    /// unvalidated twin of it.
    pub fn set_model(&mut self, model: M) {
        self.contract = Contract::new(Arc::clone(&self.config.schema), model.clone());
        self.model = model;
    }

    /// Parse a JSON document into a contract over `model` and validate it.
    pub fn validate(&mut self, raw: &str, model: M) -> Result<bool> {
        let value: Value = serde_json::from_str(raw)?;
        self.validate_value(&value, model)
    }

    /// Like [`Operation::validate`], for a params value that is either a
    /// JSON-encoded string or an already-decoded object.
    pub fn validate_params(&mut self, input: &Value, model: M) -> Result<bool> {
        match input {
            Value::String(raw) => self.validate(raw, model),
            decoded => self.validate_value(decoded, model),
        }
    }

    fn validate_value(&mut self, value: &Value, model: M) -> Result<bool> {
        let mut contract = Contract::new(Arc::clone(&self.config.schema), model.clone());
        self.config.representer.parse_value(value, &mut contract)?;
        self.valid = contract.validate();
        self.model = model;
        self.contract = contract;
        Ok(self.valid)
    }

    /// The object the representer reads from.
    #[must_use]
    pub fn represented(&self) -> &dyn Fields {
        match self.config.represented {
            Represented::Model => &self.model,
            Represented::Contract => &self.contract,
        }
    }

    /// Render the represented object with the configured representer.
    pub fn to_json(&self) -> Result<String> {
        self.to_json_with(&RenderOptions::default())
    }

    /// Render with options such as `include`.
    pub fn to_json_with(&self, options: &RenderOptions) -> Result<String> {
        self.config.representer.render(self.represented(), options)
    }

    /// Render into a JSON value instead of a string.
    #[must_use]
    pub fn to_value(&self, options: &RenderOptions) -> Value {
        self.config.representer.to_value(self.represented(), options)
    }

    /// Write the contract's current values back into the model.
    pub fn sync(&mut self) {
        self.contract.sync(&mut self.model);
    }
}
