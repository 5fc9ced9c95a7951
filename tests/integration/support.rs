//! Shared fixtures for command-flow tests: a canned-response client and
//! a working-directory guard for save tests.

use async_trait::async_trait;
use kiln::cli::RunContext;
use kiln::client::{ApiClient, ComposeArtifact};
use kiln::error::ClientError;
use kiln::render::OutputMode;
use kiln::types::{
    ArtifactResponse, BlueprintsResponse, ComposeInfoResponse, FrozenResponse, ItemError,
    ModulesResponse,
};
use std::sync::{Arc, Mutex};

/// Gateway fixture: answers every fetch with a canned envelope and
/// records the requests it saw.
#[derive(Default)]
pub struct MockClient {
    pub blueprints: Option<BlueprintsResponse>,
    pub blueprints_toml: Option<String>,
    pub frozen: Option<FrozenResponse>,
    pub frozen_toml: Option<String>,
    pub compose: Option<ComposeInfoResponse>,
    pub artifact: Option<ArtifactResponse>,
    pub modules: Option<ModulesResponse>,
    pub requests: Mutex<Vec<String>>,
}

impl MockClient {
    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }

    pub fn seen_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn missing(what: &str) -> ClientError {
    ClientError::Request(format!("no canned {} response", what))
}

#[async_trait]
impl ApiClient for MockClient {
    async fn blueprints_info(&self, names: &[String]) -> Result<BlueprintsResponse, ClientError> {
        self.record(format!("blueprints_info:{}", names.join(",")));
        self.blueprints.clone().ok_or_else(|| missing("blueprints"))
    }

    async fn blueprints_toml(&self, names: &[String]) -> Result<String, ClientError> {
        self.record(format!("blueprints_toml:{}", names.join(",")));
        self.blueprints_toml
            .clone()
            .ok_or_else(|| missing("blueprints TOML"))
    }

    async fn blueprints_freeze(&self, names: &[String]) -> Result<FrozenResponse, ClientError> {
        self.record(format!("blueprints_freeze:{}", names.join(",")));
        self.frozen.clone().ok_or_else(|| missing("frozen"))
    }

    async fn blueprints_freeze_toml(&self, names: &[String]) -> Result<String, ClientError> {
        self.record(format!("blueprints_freeze_toml:{}", names.join(",")));
        self.frozen_toml
            .clone()
            .ok_or_else(|| missing("frozen TOML"))
    }

    async fn compose_info(&self, uuid: &str) -> Result<ComposeInfoResponse, ClientError> {
        self.record(format!("compose_info:{}", uuid));
        self.compose.clone().ok_or_else(|| missing("compose"))
    }

    async fn compose_artifact(
        &self,
        uuid: &str,
        kind: ComposeArtifact,
    ) -> Result<ArtifactResponse, ClientError> {
        self.record(format!("compose_{}:{}", kind.path_segment(), uuid));
        self.artifact.clone().ok_or_else(|| missing("artifact"))
    }

    async fn modules_info(
        &self,
        names: &[String],
        distro: Option<&str>,
    ) -> Result<ModulesResponse, ClientError> {
        self.record(format!(
            "modules_info:{}:distro={}",
            names.join(","),
            distro.unwrap_or("")
        ));
        self.modules.clone().ok_or_else(|| missing("modules"))
    }
}

/// Build a run context around a shared mock so tests can still inspect
/// the recorded requests afterwards.
pub fn context(client: &Arc<MockClient>, mode: OutputMode) -> RunContext {
    let client: Arc<dyn ApiClient> = client.clone();
    RunContext::new(client, mode)
}

pub fn item_error(id: &str, msg: &str) -> ItemError {
    ItemError {
        id: id.to_string(),
        msg: msg.to_string(),
    }
}

/// The depsolved blueprint the service fixtures use throughout.
pub fn frozen_fixture() -> FrozenResponse {
    serde_json::from_str(
        r#"{
            "blueprints": [
                {
                    "blueprint": {
                        "description": "Install tmux",
                        "distro": "",
                        "groups": [],
                        "modules": [],
                        "name": "cli-test-bp-1",
                        "packages": [
                            {"name": "tmux", "version": "3.1c-2.fc34.x86_64"}
                        ],
                        "version": "0.0.3"
                    }
                }
            ],
            "errors": [
                {"id": "UnknownBlueprint", "msg": "test-no-bp: blueprint not found"}
            ]
        }"#,
    )
    .unwrap()
}

/// The plain blueprint fixture used by the save tests.
pub fn simple_blueprints_fixture() -> BlueprintsResponse {
    serde_json::from_str(
        r#"{
            "blueprints": [
                {
                    "description": "simple blueprint",
                    "groups": [],
                    "modules": [],
                    "name": "simple",
                    "packages": [
                        {"name": "bash", "version": "*"}
                    ],
                    "version": "0.1.0"
                }
            ],
            "changes": [
                {"changed": false, "name": "simple"}
            ],
            "errors": []
        }"#,
    )
    .unwrap()
}

// Serializes tests that change the process working directory.
static CWD_MUTEX: Mutex<()> = Mutex::new(());

/// Run `f` with the current directory switched to a fresh tempdir.
pub fn with_temp_cwd<F: FnOnce()>(f: F) {
    let _guard = CWD_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let prev = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    f();
    std::env::set_current_dir(prev).unwrap();
}

/// Block on a command future from inside a `with_temp_cwd` guard.
pub fn run_blocking<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Runtime::new().unwrap().block_on(future)
}
