//! Errors raised while assembling the scene.
//!
//! Everything here happens before the first frame; once a [`crate::game::Game`]
//! exists, per-frame operations cannot fail.

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("layer '{0}' is already registered")]
    DuplicateLayer(String),

    #[error("no layer named '{0}'")]
    UnknownLayer(String),

    #[error("layer '{0}' has no frames")]
    EmptyLayer(String),

    /// Recycling would never make progress if a tile is not wider than the overlap
    #[error("layer '{layer}': tile '{frame}' is {width} wide, must exceed the {overlap} overlap")]
    TileTooNarrow {
        layer: String,
        frame: String,
        width: f32,
        overlap: f32,
    },

    #[error("obstacle catalog is empty")]
    EmptyCatalog,
}
