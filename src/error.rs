use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading, resolving or saving a world.
#[derive(Debug, Error)]
pub enum MapError {
    /// Metadata was missing or did not have the documented shape.
    #[error("malformed metadata in {source_name}: {message}")]
    Format {
        /// Image or file the metadata came from.
        source_name: String,
        /// What was wrong with it.
        message: String,
    },
    /// Metadata was not valid JSON.
    #[error("failed to parse JSON in {source_name}: {source}")]
    Json {
        /// Image or file the metadata came from.
        source_name: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A catalog lookup for an undefined tile.
    #[error("tile ({x},{y}) is not defined in tileset {image}")]
    TileNotFound {
        /// Tileset image id.
        image: String,
        /// Source x in the tileset image.
        x: i32,
        /// Source y in the tileset image.
        y: i32,
    },
    /// A placed tile points at a catalog entry that does not exist.
    #[error("tile at ({gx},{gy},{gz}) references ({x},{y}) in {image}, which is not defined")]
    UnresolvedTile {
        /// Tileset image id of the reference.
        image: String,
        /// Referenced source x.
        x: i32,
        /// Referenced source y.
        y: i32,
        /// Grid column of the placement.
        gx: i32,
        /// Grid row of the placement.
        gy: i32,
        /// Elevation of the placement.
        gz: i32,
    },
    /// A backing image or document could not be read.
    #[error("resource {name} not found: {source}")]
    ResourceNotFound {
        /// Resource name as requested.
        name: String,
        /// Where it was looked up, if on disk.
        path: Option<PathBuf>,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The PNG container could not be decoded.
    #[error("failed to decode PNG {name}: {source}")]
    Png {
        /// Resource name as requested.
        name: String,
        /// Underlying decoder error.
        #[source]
        source: png::DecodingError,
    },
}

impl MapError {
    pub(crate) fn format(source_name: &str, message: impl Into<String>) -> Self {
        MapError::Format {
            source_name: source_name.to_owned(),
            message: message.into(),
        }
    }
}
