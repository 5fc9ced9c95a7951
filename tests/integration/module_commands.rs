//! Command-flow tests for the module subcommands.

use crate::integration::support::{context, item_error, MockClient};
use kiln::cli::{Commands, ModuleCommands};
use kiln::error::CommandError;
use kiln::render::OutputMode;
use kiln::types::{ModuleInfo, ModulesResponse};
use std::sync::Arc;

fn info_command(modules: &[&str], distro: Option<&str>) -> Commands {
    Commands::Modules {
        command: ModuleCommands::Info {
            distro: distro.map(str::to_string),
            modules: modules.iter().map(|s| s.to_string()).collect(),
        },
    }
}

fn tmux_module() -> ModuleInfo {
    ModuleInfo {
        name: "tmux".to_string(),
        summary: "A terminal multiplexer".to_string(),
        homepage: "https://tmux.github.io".to_string(),
        description: "tmux is a terminal multiplexer: it enables a number of terminals \
                      to be created, accessed, and controlled from a single screen."
            .to_string(),
        builds: vec!["3.1c-2.fc34.x86_64 at 2021-02-09T14:10:04 changed 2021-02-09T14:10:04"
            .to_string()],
        dependencies: vec!["libevent".to_string(), "ncurses".to_string()],
    }
}

#[tokio::test]
async fn test_modules_info_formatted_fields() {
    let client = Arc::new(MockClient {
        modules: Some(ModulesResponse {
            modules: vec![tmux_module()],
            errors: vec![],
            path: String::new(),
        }),
        ..Default::default()
    });
    let ctx = context(&client, OutputMode::Formatted);

    let mut out = Vec::new();
    let mut err = Vec::new();
    ctx.execute(&info_command(&["tmux"], None), &mut out, &mut err)
        .await
        .unwrap();

    let stdout = String::from_utf8(out).unwrap();
    assert!(stdout.contains("Name: tmux"));
    assert!(stdout.contains("Summary: A terminal multiplexer"));
    assert!(stdout.contains("Builds:\n    3.1c-2.fc34.x86_64"));
    assert!(stdout.contains("Dependencies:\n    libevent\n    ncurses"));
    for line in stdout.lines() {
        assert!(line.len() <= 80, "line exceeds wrap width: {:?}", line);
    }
    assert!(err.is_empty());
}

#[tokio::test]
async fn test_modules_info_passes_distro_filter() {
    let client = Arc::new(MockClient {
        modules: Some(ModulesResponse {
            modules: vec![tmux_module()],
            errors: vec![],
            path: String::new(),
        }),
        ..Default::default()
    });
    let ctx = context(&client, OutputMode::Formatted);

    let mut out = Vec::new();
    let mut err = Vec::new();
    ctx.execute(
        &info_command(&["tmux"], Some("fedora-34")),
        &mut out,
        &mut err,
    )
    .await
    .unwrap();

    assert_eq!(
        client.seen_requests(),
        ["modules_info:tmux:distro=fedora-34"]
    );
}

#[tokio::test]
async fn test_modules_info_partial_failure() {
    let client = Arc::new(MockClient {
        modules: Some(ModulesResponse {
            modules: vec![tmux_module()],
            errors: vec![item_error(
                "UnknownModule",
                "no-such-module: module not found",
            )],
            path: String::new(),
        }),
        ..Default::default()
    });
    let ctx = context(&client, OutputMode::Formatted);

    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = ctx
        .execute(
            &info_command(&["tmux,no-such-module"], None),
            &mut out,
            &mut err,
        )
        .await;

    assert!(String::from_utf8(out).unwrap().contains("Name: tmux"));
    assert!(String::from_utf8(err)
        .unwrap()
        .contains("UnknownModule: no-such-module: module not found"));
    assert!(matches!(
        result,
        Err(CommandError::Degraded { failures: 1 })
    ));
}

#[tokio::test]
async fn test_modules_info_structured_document() {
    let client = Arc::new(MockClient {
        modules: Some(ModulesResponse {
            modules: vec![tmux_module()],
            errors: vec![],
            path: "/modules/info/tmux".to_string(),
        }),
        ..Default::default()
    });
    let ctx = context(&client, OutputMode::Structured);

    let mut out = Vec::new();
    let mut err = Vec::new();
    ctx.execute(&info_command(&["tmux"], None), &mut out, &mut err)
        .await
        .unwrap();

    let stdout = String::from_utf8(out).unwrap();
    assert!(stdout.contains("\"name\": \"tmux\""));
    assert!(stdout.contains("\"path\": \"/modules/info/tmux\""));
    assert!(err.is_empty());
}
