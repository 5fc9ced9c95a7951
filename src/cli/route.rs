//! CLI route: single route table and run context. Dispatches to the
//! remote client, then hands the partitioned result to the renderer
//! and persistence adapter.

use crate::batch::{comma_args, fold_degraded, report_item_errors, verify_batch_coverage};
use crate::client::{ApiClient, ComposeArtifact};
use crate::error::{CommandError, ItemFailure, ProjectionError, SaveError};
use crate::render::{self, FrozenParts, OutputMode};
use crate::save;
use crate::types::FrozenEntry;
use serde_json::{json, Value};
use std::io::{self, Write};
use std::sync::Arc;

use crate::cli::parse::{
    BlueprintCommands, Commands, ComposeCommands, FreezeCommands, ModuleCommands,
};

/// Runtime context for CLI execution: the service client and the output
/// mode resolved once from the global flag.
pub struct RunContext {
    client: Arc<dyn ApiClient>,
    mode: OutputMode,
}

/// Map an all-or-nothing failure count to the command outcome.
fn finish(failures: usize) -> Result<(), CommandError> {
    if failures == 0 {
        Ok(())
    } else {
        Err(CommandError::Degraded { failures })
    }
}

fn blueprint_names(blueprints: &[Value]) -> Vec<&str> {
    blueprints
        .iter()
        .filter_map(|bp| bp.get("name").and_then(Value::as_str))
        .collect()
}

fn frozen_names(entries: &[FrozenEntry]) -> Vec<&str> {
    entries
        .iter()
        .filter_map(|e| e.blueprint.get("name").and_then(Value::as_str))
        .collect()
}

/// TOML-encode one blueprint payload and write it next to the user.
fn save_blueprint_toml(blueprint: &Value, suffix: &str) -> Result<(), ItemFailure> {
    let name = blueprint
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ProjectionError::MissingField("name"))?;
    let content =
        toml::to_string_pretty(blueprint).map_err(|e| SaveError::Encode(e.to_string()))?;
    save::save_artifact(name, suffix, content.as_bytes())?;
    Ok(())
}

impl RunContext {
    pub fn new(client: Arc<dyn ApiClient>, mode: OutputMode) -> Self {
        Self { client, mode }
    }

    /// Execute a CLI command via the single route table.
    ///
    /// Successes go to `out`, item-level errors to `err`. A partially
    /// failed batch still renders and saves everything that resolved,
    /// then reports `CommandError::Degraded`; only a client failure
    /// aborts with no output.
    pub async fn execute(
        &self,
        command: &Commands,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        match command {
            Commands::Blueprints { command } => {
                self.handle_blueprint_command(command, out, err).await
            }
            Commands::Compose { command } => self.handle_compose_command(command, out, err).await,
            Commands::Modules { command } => self.handle_module_command(command, out, err).await,
        }
    }

    async fn handle_blueprint_command(
        &self,
        command: &BlueprintCommands,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        match command {
            BlueprintCommands::Show { blueprints } => self.blueprints_show(blueprints, out).await,
            BlueprintCommands::Save { blueprints } => {
                self.blueprints_save(blueprints, out, err).await
            }
            BlueprintCommands::Freeze(args) => match &args.command {
                Some(FreezeCommands::Show { blueprints }) => {
                    self.freeze_show(blueprints, out).await
                }
                Some(FreezeCommands::Save { blueprints }) => {
                    self.freeze_save(blueprints, out, err).await
                }
                None => self.freeze_list(&args.blueprints, out, err).await,
            },
        }
    }

    async fn handle_compose_command(
        &self,
        command: &ComposeCommands,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        match command {
            ComposeCommands::Info { uuid } => self.compose_info(uuid, out, err).await,
            ComposeCommands::Logs { uuid } => {
                self.compose_artifact(uuid, ComposeArtifact::Logs, out, err)
                    .await
            }
            ComposeCommands::Metadata { uuid } => {
                self.compose_artifact(uuid, ComposeArtifact::Metadata, out, err)
                    .await
            }
        }
    }

    async fn handle_module_command(
        &self,
        command: &ModuleCommands,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        match command {
            ModuleCommands::Info { distro, modules } => {
                self.modules_info(modules, distro.as_deref(), out, err).await
            }
        }
    }

    /// Build the identifier set for a batch command.
    fn identifiers(&self, args: &[String]) -> Result<Vec<String>, CommandError> {
        let names = comma_args(args);
        if names.is_empty() {
            return Err(CommandError::Usage(
                "at least one name is required".to_string(),
            ));
        }
        Ok(names)
    }

    async fn blueprints_show(
        &self,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let names = self.identifiers(args)?;
        match self.mode {
            OutputMode::Structured => {
                let resp = self.client.blueprints_info(&names).await?;
                verify_batch_coverage(&names, &blueprint_names(&resp.blueprints), &resp.errors)?;
                render::write_structured(&resp, out)?;
                finish(resp.errors.len())
            }
            OutputMode::Formatted => {
                let doc = self.client.blueprints_toml(&names).await?;
                render::write_passthrough(&doc, out)?;
                Ok(())
            }
        }
    }

    async fn blueprints_save(
        &self,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let names = self.identifiers(args)?;
        let resp = self.client.blueprints_info(&names).await?;
        verify_batch_coverage(&names, &blueprint_names(&resp.blueprints), &resp.errors)?;

        // Structured mode keeps stderr clean; failures still count
        // toward the exit status.
        let mut sink = io::sink();
        let item_err: &mut dyn Write = match self.mode {
            OutputMode::Structured => &mut sink,
            OutputMode::Formatted => &mut *err,
        };

        let mut failures = match self.mode {
            OutputMode::Structured => {
                render::write_structured(&resp, out)?;
                resp.errors.len()
            }
            OutputMode::Formatted => report_item_errors(&resp.errors, &mut *item_err),
        };
        failures += fold_degraded(&resp.blueprints, &mut *item_err, |bp| {
            save_blueprint_toml(bp, save::TOML_SUFFIX)
        });
        finish(failures)
    }

    async fn freeze_list(
        &self,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let names = self.identifiers(args)?;
        let resp = self.client.blueprints_freeze(&names).await?;
        verify_batch_coverage(&names, &frozen_names(&resp.blueprints), &resp.errors)?;
        match self.mode {
            OutputMode::Structured => {
                render::write_structured(&resp, out)?;
                finish(resp.errors.len())
            }
            OutputMode::Formatted => {
                let mut failures = report_item_errors(&resp.errors, &mut *err);
                failures += fold_degraded(&resp.blueprints, &mut *err, |entry| {
                    let parts = FrozenParts::from_value(&entry.blueprint)?;
                    render::write_frozen_parts(&parts, &mut *out)?;
                    Ok(())
                });
                finish(failures)
            }
        }
    }

    async fn freeze_show(&self, args: &[String], out: &mut dyn Write) -> Result<(), CommandError> {
        let names = self.identifiers(args)?;
        match self.mode {
            OutputMode::Structured => {
                let resp = self.client.blueprints_freeze(&names).await?;
                verify_batch_coverage(&names, &frozen_names(&resp.blueprints), &resp.errors)?;
                render::write_structured(&resp, out)?;
                finish(resp.errors.len())
            }
            OutputMode::Formatted => {
                let doc = self.client.blueprints_freeze_toml(&names).await?;
                render::write_passthrough(&doc, out)?;
                Ok(())
            }
        }
    }

    async fn freeze_save(
        &self,
        args: &[String],
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let names = self.identifiers(args)?;
        let resp = self.client.blueprints_freeze(&names).await?;
        verify_batch_coverage(&names, &frozen_names(&resp.blueprints), &resp.errors)?;

        let mut sink = io::sink();
        let item_err: &mut dyn Write = match self.mode {
            OutputMode::Structured => &mut sink,
            OutputMode::Formatted => &mut *err,
        };

        let mut failures = match self.mode {
            OutputMode::Structured => {
                render::write_structured(&resp, out)?;
                resp.errors.len()
            }
            OutputMode::Formatted => report_item_errors(&resp.errors, &mut *item_err),
        };
        failures += fold_degraded(&resp.blueprints, &mut *item_err, |entry| {
            save_blueprint_toml(&entry.blueprint, save::FROZEN_TOML_SUFFIX)
        });
        finish(failures)
    }

    async fn compose_info(
        &self,
        uuid: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let resp = self.client.compose_info(uuid).await?;
        if self.mode.is_structured() {
            render::write_structured(&resp, out)?;
            return finish(resp.errors.len());
        }
        if !resp.errors.is_empty() {
            return finish(report_item_errors(&resp.errors, err));
        }
        render::write_compose_info(&resp, out)?;
        Ok(())
    }

    async fn compose_artifact(
        &self,
        uuid: &str,
        kind: ComposeArtifact,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let resp = self.client.compose_artifact(uuid, kind).await?;
        if !resp.errors.is_empty() {
            let failures = match self.mode {
                OutputMode::Structured => resp.errors.len(),
                OutputMode::Formatted => report_item_errors(&resp.errors, err),
            };
            return finish(failures);
        }
        match save::save_artifact(uuid, kind.suffix(), &resp.content) {
            Ok(path) => {
                match self.mode {
                    OutputMode::Formatted => writeln!(out, "{}", path.display())?,
                    OutputMode::Structured => {
                        render::write_structured(&json!({ "filename": path }), out)?;
                    }
                }
                Ok(())
            }
            Err(e) => {
                if self.mode == OutputMode::Formatted {
                    writeln!(err, "ERROR: {}", e)?;
                }
                finish(1)
            }
        }
    }

    async fn modules_info(
        &self,
        args: &[String],
        distro: Option<&str>,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let names = self.identifiers(args)?;
        let resp = self.client.modules_info(&names, distro).await?;
        let resolved: Vec<&str> = resp.modules.iter().map(|m| m.name.as_str()).collect();
        verify_batch_coverage(&names, &resolved, &resp.errors)?;
        if self.mode.is_structured() {
            render::write_structured(&resp, out)?;
            return finish(resp.errors.len());
        }
        let failures = report_item_errors(&resp.errors, err);
        for module in &resp.modules {
            render::write_module_info(module, out)?;
        }
        finish(failures)
    }
}
