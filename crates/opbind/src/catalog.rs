//! Album and song operations
//!
//! The concrete models and operation configurations the CLI exposes. Each
//! entry of [`CatalogOperation`] maps to one configured operation and knows
//! whether it runs (processing step, possibly validating input) or only
//! presents (builds its model and renders).

use std::sync::Arc;

use anyhow::Result;
use opbind_core::{
    integer_value, text, text_value, ContractSchema, Error, Errors, FieldContract, Fields,
    Operation, OperationConfig, Params, RenderOptions, Represented, Representer, Slot,
};
use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

// ═══════════════════════════════════════════════════════════════════════════
// MODELS
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artist {
    pub name: Option<String>,
}

impl Artist {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
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

    fn write(&mut self, name: &str, value: Value) -> opbind_core::Result<()> {
        match name {
            "name" => text_value(name, value).map(|v| self.name = v),
            _ => Err(Error::unknown_field(self.type_name(), name)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Album {
    pub title: Option<String>,
    pub artist: Option<Artist>,
}

impl Album {
    #[must_use]
    pub fn new(title: impl Into<String>, artist: Artist) -> Self {
        Self {
            title: Some(title.into()),
            artist: Some(artist),
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

    fn write(&mut self, name: &str, value: Value) -> opbind_core::Result<()> {
        match name {
            "title" => text_value(name, value).map(|v| self.title = v),
            _ => Err(Error::unknown_field(self.type_name(), name)),
        }
    }

    fn nested_mut(&mut self, name: &str) -> opbind_core::Result<&mut dyn Fields> {
        match name {
            "artist" => Ok(self.artist.get_or_insert_with(Artist::default)),
            _ => Err(Error::unknown_field(self.type_name(), name)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
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

    fn write(&mut self, name: &str, value: Value) -> opbind_core::Result<()> {
        match name {
            "id" => integer_value(name, value).map(|v| self.id = v),
            _ => Err(Error::unknown_field(self.type_name(), name)),
        }
    }
}

fn after_the_war() -> Album {
    Album::new("After The War", Artist::new("Gary Moore"))
}

// ═══════════════════════════════════════════════════════════════════════════
// OPERATIONS
// ═══════════════════════════════════════════════════════════════════════════

/// Album contract: required title, nested artist with a required name.
#[must_use]
pub fn album_contract() -> ContractSchema {
    ContractSchema::builder("AlbumContract")
        .field(FieldContract::builder("title").required().build())
        .field(
            FieldContract::builder("artist")
                .nested(
                    ContractSchema::builder("ArtistContract")
                        .field(FieldContract::builder("name").required().build())
                        .build(),
                )
                .build(),
        )
        .build()
}

fn validate_album(op: &mut Operation<Album>, params: &Params) -> opbind_core::Result<()> {
    let input = params.require("album")?.clone();
    op.validate_params(&input, Album::default()).map(drop)
}

fn show_album(op: &mut Operation<Album>, _params: &Params) -> opbind_core::Result<()> {
    op.set_model(after_the_war());
    Ok(())
}

fn self_link(representer: Representer) -> Representer {
    representer.link("self", |album| format!("//album/{}", text(album, "title")))
}

fn class_getter(represented: &dyn Fields) -> Value {
    Value::from(represented.type_name())
}

/// Parses `params["album"]` into the album contract and validates it.
pub fn create_album() -> opbind_core::Result<Arc<OperationConfig<Album>>> {
    OperationConfig::builder("CreateAlbum")
        .contract(album_contract())
        .process(validate_album)
        .build()
}

/// Renders a fixed album through the representer inferred from the contract.
pub fn show_album_op() -> opbind_core::Result<Arc<OperationConfig<Album>>> {
    OperationConfig::builder("ShowAlbum")
        .contract(album_contract())
        .process(show_album)
        .build()
}

/// [`create_album`] with a HAL `self` link added to the inferred representer.
pub fn hypermedia_create_album() -> opbind_core::Result<Arc<OperationConfig<Album>>> {
    OperationConfig::builder("HypermediaCreateAlbum")
        .contract(album_contract())
        .extend_representer(self_link)
        .process(validate_album)
        .build()
}

/// [`show_album_op`] with a HAL `self` link.
pub fn hypermedia_show_album() -> opbind_core::Result<Arc<OperationConfig<Album>>> {
    OperationConfig::builder("HypermediaShowAlbum")
        .contract(album_contract())
        .extend_representer(self_link)
        .process(show_album)
        .build()
}

/// Wire format declared independently of the contract: title only.
#[must_use]
pub fn album_representer() -> Representer {
    Representer::new().property("title")
}

fn title_contract() -> ContractSchema {
    ContractSchema::builder("AlbumTitleContract")
        .property("title")
        .build()
}

/// Parses with the explicit [`album_representer`].
pub fn json_api_create_album() -> opbind_core::Result<Arc<OperationConfig<Album>>> {
    OperationConfig::builder("JsonApiCreateAlbum")
        .contract(title_contract())
        .representer(album_representer())
        .process(validate_album)
        .build()
}

/// Renders with the explicit [`album_representer`].
pub fn json_api_show_album() -> opbind_core::Result<Arc<OperationConfig<Album>>> {
    OperationConfig::builder("JsonApiShowAlbum")
        .contract(title_contract())
        .representer(album_representer())
        .process(show_album)
        .build()
}

/// Presents a new song, rendering the represented object's type name.
pub fn show_song() -> opbind_core::Result<Arc<OperationConfig<Song>>> {
    OperationConfig::builder("ShowSong")
        .representer(Representer::new().getter("class", class_getter))
        .build()
}

/// [`show_song`], representing the contract instead of the model.
pub fn show_song_contract() -> opbind_core::Result<Arc<OperationConfig<Song>>> {
    OperationConfig::builder("ShowSongContract")
        .representer(Representer::new().getter("class", class_getter))
        .represent(Represented::Contract)
        .build()
}

/// Presents song 1; render options come from the params.
pub fn options_show_song() -> opbind_core::Result<Arc<OperationConfig<Song>>> {
    OperationConfig::builder("OptionsShowSong")
        .representer(
            Representer::new()
                .getter("class", class_getter)
                .property("id"),
        )
        .model(|_: &Params| Ok(Song { id: Some(1) }))
        .build()
}

// ═══════════════════════════════════════════════════════════════════════════
// DISPATCH
// ═══════════════════════════════════════════════════════════════════════════

/// Every operation the CLI can run, by its command-line name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CatalogOperation {
    CreateAlbum,
    ShowAlbum,
    HypermediaCreateAlbum,
    HypermediaShowAlbum,
    JsonApiCreateAlbum,
    JsonApiShowAlbum,
    ShowSong,
    ShowSongContract,
    OptionsShowSong,
}

/// Result of executing a catalog operation
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub operation: String,
    pub data: Value,
    /// The contract twin, rendered for operations that parse input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract: Option<Value>,
    #[serde(skip_serializing_if = "Errors::is_empty")]
    pub errors: Errors,
}

impl CatalogOperation {
    /// All operations in declaration order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// One-line description for `opbind list`.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::CreateAlbum => "Parse an album from --param album=<json> and validate it",
            Self::ShowAlbum => "Render a fixed album with the inferred representer",
            Self::HypermediaCreateAlbum => "Create album; representer carries a self link",
            Self::HypermediaShowAlbum => "Render a fixed album with a HAL self link",
            Self::JsonApiCreateAlbum => "Parse an album with an explicit title-only representer",
            Self::JsonApiShowAlbum => "Render a fixed album with an explicit title-only representer",
            Self::ShowSong => "Present a new song, rendering its type name",
            Self::ShowSongContract => "Present a new song, rendering the contract's type name",
            Self::OptionsShowSong => "Present song 1; --include restricts the rendered keys",
        }
    }

    /// True for operations that take an `album` param to parse.
    #[must_use]
    pub const fn parses_input(self) -> bool {
        matches!(
            self,
            Self::CreateAlbum | Self::HypermediaCreateAlbum | Self::JsonApiCreateAlbum
        )
    }

    /// Run (or present) the operation and render its represented object.
    ///
    /// Explicit `options` win; otherwise options are read from `params`.
    pub fn execute(self, params: Params, options: Option<&RenderOptions>) -> Result<Outcome> {
        let echo = self.parses_input();
        match self {
            Self::CreateAlbum => run(&create_album()?, params, options, echo),
            Self::ShowAlbum => run(&show_album_op()?, params, options, echo),
            Self::HypermediaCreateAlbum => run(&hypermedia_create_album()?, params, options, echo),
            Self::HypermediaShowAlbum => run(&hypermedia_show_album()?, params, options, echo),
            Self::JsonApiCreateAlbum => run(&json_api_create_album()?, params, options, echo),
            Self::JsonApiShowAlbum => run(&json_api_show_album()?, params, options, echo),
            Self::ShowSong => present(&show_song()?, params, options),
            Self::ShowSongContract => present(&show_song_contract()?, params, options),
            Self::OptionsShowSong => present(&options_show_song()?, params, options),
        }
    }
}

fn run<M>(
    config: &Arc<OperationConfig<M>>,
    params: Params,
    options: Option<&RenderOptions>,
    echo_contract: bool,
) -> Result<Outcome>
where
    M: Fields + Clone + Default + 'static,
{
    let (success, op) = config.run(params)?;
    outcome(success, &op, options, echo_contract)
}

fn present<M>(
    config: &Arc<OperationConfig<M>>,
    params: Params,
    options: Option<&RenderOptions>,
) -> Result<Outcome>
where
    M: Fields + Clone + Default + 'static,
{
    let op = config.present(params)?;
    outcome(true, &op, options, false)
}

fn outcome<M>(
    success: bool,
    op: &Operation<M>,
    options: Option<&RenderOptions>,
    echo_contract: bool,
) -> Result<Outcome>
where
    M: Fields + Clone + Default + 'static,
{
    let options = match options {
        Some(options) => options.clone(),
        None => RenderOptions::from_params(op.params())?,
    };
    Ok(Outcome {
        success,
        operation: op.config().name().to_string(),
        data: op.to_value(&options),
        contract: echo_contract.then(|| {
            op.config()
                .representer()
                .to_value(op.contract(), &RenderOptions::default())
        }),
        errors: op.errors().clone(),
    })
}
