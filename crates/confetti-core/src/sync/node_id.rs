// Node identity on the data layer
// Format: "confetti-<uuid>"

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use super::types::SyncError;

const NODE_ID_FILE: &str = "node_id.txt";
const NODE_ID_PREFIX: &str = "confetti-";

/// Identifier of one device on the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Fresh random node ID.
    pub fn generate() -> Self {
        Self(format!("{}{}", NODE_ID_PREFIX, Uuid::new_v4()))
    }

    /// Parse and validate a node ID string.
    pub fn parse(value: &str) -> Result<Self, SyncError> {
        let value = value.trim();
        let rest = value
            .strip_prefix(NODE_ID_PREFIX)
            .ok_or_else(|| SyncError::InvalidNodeId(value.to_string()))?;
        Uuid::parse_str(rest).map_err(|_| SyncError::InvalidNodeId(value.to_string()))?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NodeId {
    type Error = SyncError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Get or create the local node ID stored in `path`.
/// Creates the directory and the ID file if they don't exist.
pub fn get_or_create_node_id_at(path: &Path) -> Result<NodeId, SyncError> {
    let node_id_path = path.join(NODE_ID_FILE);

    if node_id_path.exists() {
        let content = fs::read_to_string(&node_id_path)?;
        return NodeId::parse(&content);
    }

    let node_id = NodeId::generate();

    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let mut file = fs::File::create(&node_id_path)?;
    writeln!(file, "{}", node_id)?;
    tracing::info!(node_id = %node_id, "created local node id");

    Ok(node_id)
}
