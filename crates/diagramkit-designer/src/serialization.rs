//! Save/load of design files.
//!
//! Designs are JSON documents holding the object collection as type-tagged
//! records. Connectors reference their endpoints by `ObjectId`, resolved
//! against the loaded collection.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::DiagramObject;
use crate::store::ObjectStore;
use crate::viewport::Viewport;

/// Design file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete design file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignFile {
    pub version: String,
    pub metadata: DesignMetadata,
    pub viewport: ViewportState,
    #[serde(default)]
    pub next_id: u64,
    pub objects: Vec<DiagramObject>,
}

/// Design metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

/// Viewport state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::from(Viewport::default())
    }
}

impl From<Viewport> for ViewportState {
    fn from(v: Viewport) -> Self {
        Self {
            zoom: v.zoom,
            pan_x: v.pan_x,
            pan_y: v.pan_y,
        }
    }
}

impl From<ViewportState> for Viewport {
    fn from(v: ViewportState) -> Self {
        Viewport::new(v.zoom, v.pan_x, v.pan_y)
    }
}

impl DesignFile {
    /// Create a new empty design file
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DesignMetadata {
                name: name.into(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            viewport: ViewportState::default(),
            next_id: 1,
            objects: Vec::new(),
        }
    }

    /// Captures a document.
    pub fn from_document(name: impl Into<String>, store: &ObjectStore, viewport: &Viewport) -> Self {
        let mut design = Self::new(name);
        design.viewport = ViewportState::from(*viewport);
        design.next_id = store.next_id();
        design.objects = store.objects().to_vec();
        design
    }

    /// Rebuilds the object store.
    ///
    /// The id counter is raised past every loaded id, and connector
    /// references that do not resolve are dropped.
    pub fn to_document(&self) -> (ObjectStore, Viewport) {
        let mut store = ObjectStore::new();
        let mut highest = 0;
        for obj in &self.objects {
            highest = highest.max(obj.id.0);
            store.insert(obj.clone());
        }
        store.reserve_ids_through(self.next_id.max(highest + 1));
        let detached = store.detach_dangling();
        if detached > 0 {
            tracing::warn!("Detached {} dangling connector reference(s)", detached);
        }
        (store, Viewport::from(self.viewport))
    }

    /// Save design to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize design")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        tracing::info!("Saved design with {} objects to {}", self.objects.len(), path.display());
        Ok(())
    }

    /// Load design from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let design = Self::from_json(&content)
            .with_context(|| format!("Failed to parse design file: {}", path.display()))?;

        tracing::info!("Loaded design with {} objects from {}", design.objects.len(), path.display());
        Ok(design)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let design: DesignFile = serde_json::from_str(json)?;
        let mut seen = std::collections::HashSet::new();
        for obj in &design.objects {
            if !seen.insert(obj.id) {
                bail!("Duplicate object id {}", obj.id);
            }
        }
        Ok(design)
    }

    /// Updates the modified timestamp
    pub fn touch(&mut self) {
        self.metadata.modified = Utc::now();
    }
}
