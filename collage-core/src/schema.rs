//! Persisted document shape.
//!
//! The document is the full externally-visible state: the board's id
//! sequence and block map, per-device webcam settings, and the camera
//! preview flag. Keys are camelCase on the wire. The camera transform and
//! the selection are session-local and never persist.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::block::{Block, BlockId, WebcamSettings};
use crate::board::Board;
use crate::editor::Editor;
use crate::error::CoreResult;

fn default_show_camera() -> bool {
    true
}

/// Everything that persists across sessions, JSON round-trippable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    /// Block ids in creation order; the authority for iteration order.
    pub block_sequence: Vec<BlockId>,
    /// Blocks by id.
    pub block_map: HashMap<BlockId, Block>,
    /// Per-device webcam feed settings.
    #[serde(default)]
    pub webcam_settings: HashMap<String, WebcamSettings>,
    /// Whether the live camera preview is shown.
    #[serde(default = "default_show_camera")]
    pub show_camera: bool,
}

impl BoardDocument {
    /// Snapshot an editor's persistable state.
    #[must_use]
    pub fn capture(editor: &Editor) -> Self {
        let board = editor.board();
        let block_map = board
            .ids()
            .iter()
            .filter_map(|&id| board.get(id).map(|b| (id, b.clone())))
            .collect();
        Self {
            block_sequence: board.ids().to_vec(),
            block_map,
            webcam_settings: editor.webcam_settings_map().clone(),
            show_camera: editor.show_camera(),
        }
    }

    /// Rebuild editor state from this document.
    ///
    /// The sequence is the authority: map entries it never names are
    /// dropped, and sequence ids missing from the map are skipped with a
    /// warning.
    pub fn restore_into(mut self, editor: &mut Editor) {
        let mut board = Board::new();
        for id in &self.block_sequence {
            match self.block_map.remove(id) {
                Some(block) => board.insert(block),
                None => warn!(%id, "document sequence references a missing block"),
            }
        }
        editor.restore(board, self.webcam_settings, self.show_camera);
    }

    /// Serialize to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Serialization`] if the JSON does not
    /// match the document shape.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the document to a file as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Serialization`] on encoding failure or
    /// [`crate::CoreError::Io`] on a write failure.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a document back from a file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::Io`] if the file cannot be read or
    /// [`crate::CoreError::Serialization`] if it does not parse.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
