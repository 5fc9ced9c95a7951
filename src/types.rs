//! Wire types for the build service API.
//!
//! Every batch endpoint answers with an envelope pairing the resolved
//! payloads with a list of per-item errors. Blueprint payloads are kept
//! as raw [`serde_json::Value`]s: structured output passes them through
//! with their original field names, and TOML export encodes them whole.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One identifier the service could not resolve. `id` is the service's
/// error tag (or the identifier itself); `msg` conventionally starts
/// with the offending identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub id: String,
    pub msg: String,
}

/// A `name`/`version` pair as it appears in package and module lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameVersion {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Change tracking entry returned alongside blueprint payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintChange {
    pub name: String,
    pub changed: bool,
}

/// Envelope for `GET /blueprints/info/<names>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlueprintsResponse {
    #[serde(default)]
    pub blueprints: Vec<Value>,
    #[serde(default)]
    pub changes: Vec<BlueprintChange>,
    #[serde(default)]
    pub errors: Vec<ItemError>,
    /// Request path, attached by the client for structured output.
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty", default)]
    pub path: String,
}

/// One entry of a frozen-blueprints envelope. The service wraps each
/// depsolved blueprint in its own object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrozenEntry {
    #[serde(default)]
    pub blueprint: Value,
}

/// Envelope for `GET /blueprints/freeze/<names>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrozenResponse {
    #[serde(default)]
    pub blueprints: Vec<FrozenEntry>,
    #[serde(default)]
    pub errors: Vec<ItemError>,
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty", default)]
    pub path: String,
}

/// Blueprint summary embedded in a compose record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeBlueprint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub packages: Vec<NameVersion>,
    #[serde(default)]
    pub modules: Vec<NameVersion>,
}

/// A fully pinned dependency of a compose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyPackage {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub release: String,
    #[serde(default)]
    pub arch: String,
}

/// Depsolve results embedded in a compose record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeDeps {
    #[serde(default)]
    pub packages: Vec<DependencyPackage>,
}

/// Envelope for `GET /compose/info/<uuid>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeInfoResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub queue_status: String,
    #[serde(default)]
    pub blueprint: ComposeBlueprint,
    #[serde(default)]
    pub compose_type: String,
    #[serde(default)]
    pub image_size: u64,
    #[serde(default)]
    pub deps: ComposeDeps,
    #[serde(default)]
    pub errors: Vec<ItemError>,
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty", default)]
    pub path: String,
}

/// Detailed module record returned by `GET /modules/info/<names>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub builds: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Envelope for `GET /modules/info/<names>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModulesResponse {
    #[serde(default)]
    pub modules: Vec<ModuleInfo>,
    #[serde(default)]
    pub errors: Vec<ItemError>,
    #[serde(skip_deserializing, skip_serializing_if = "String::is_empty", default)]
    pub path: String,
}

/// Error-only envelope some endpoints answer with on a failed request.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ItemError>,
}

/// A downloaded compose artifact, or the per-item errors explaining why
/// there is none. The archive bytes are opaque to this tool.
#[derive(Debug, Clone, Default)]
pub struct ArtifactResponse {
    pub content: Vec<u8>,
    pub errors: Vec<ItemError>,
}
