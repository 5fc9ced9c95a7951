//! Command-flow tests for the compose subcommands: info projection and
//! artifact downloads.

use crate::integration::support::{context, item_error, run_blocking, with_temp_cwd, MockClient};
use kiln::cli::{Commands, ComposeCommands};
use kiln::error::CommandError;
use kiln::render::OutputMode;
use kiln::types::{
    ArtifactResponse, ComposeBlueprint, ComposeDeps, ComposeInfoResponse, DependencyPackage,
    NameVersion,
};
use std::sync::Arc;

const UUID: &str = "c30b7d80-523b-4a23-ad52-b5e8a74895b5";

fn compose_fixture() -> ComposeInfoResponse {
    ComposeInfoResponse {
        id: UUID.to_string(),
        queue_status: "FINISHED".to_string(),
        blueprint: ComposeBlueprint {
            name: "simple".to_string(),
            version: "0.1.0".to_string(),
            packages: vec![NameVersion {
                name: "bash".to_string(),
                version: "5.1".to_string(),
            }],
            modules: vec![],
        },
        compose_type: "qcow2".to_string(),
        image_size: 2147483648,
        deps: ComposeDeps {
            packages: vec![DependencyPackage {
                name: "glibc".to_string(),
                version: "2.33".to_string(),
                release: "5.fc34".to_string(),
                arch: "x86_64".to_string(),
            }],
        },
        errors: vec![],
        path: String::new(),
    }
}

#[tokio::test]
async fn test_compose_info_formatted_sections() {
    let client = Arc::new(MockClient {
        compose: Some(compose_fixture()),
        ..Default::default()
    });
    let ctx = context(&client, OutputMode::Formatted);

    let command = Commands::Compose {
        command: ComposeCommands::Info {
            uuid: UUID.to_string(),
        },
    };
    let mut out = Vec::new();
    let mut err = Vec::new();
    ctx.execute(&command, &mut out, &mut err).await.unwrap();

    let stdout = String::from_utf8(out).unwrap();
    let summary = stdout.lines().next().unwrap();
    assert!(summary.starts_with(UUID));
    assert!(summary.contains("FINISHED"));
    assert!(summary.contains("qcow2"));
    assert!(summary.contains("2147483648"));
    assert!(stdout.contains("Packages:\n    bash-5.1\n"));
    assert!(stdout.contains("Dependencies:\n    glibc-2.33-5.fc34.x86_64\n"));
    assert!(err.is_empty());
}

#[tokio::test]
async fn test_compose_info_unknown_uuid_degrades() {
    let client = Arc::new(MockClient {
        compose: Some(ComposeInfoResponse {
            errors: vec![item_error("UnknownUUID", "a0000000 is not a valid build uuid")],
            ..Default::default()
        }),
        ..Default::default()
    });
    let ctx = context(&client, OutputMode::Formatted);

    let command = Commands::Compose {
        command: ComposeCommands::Info {
            uuid: "a0000000".to_string(),
        },
    };
    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = ctx.execute(&command, &mut out, &mut err).await;

    assert!(out.is_empty());
    assert!(String::from_utf8(err)
        .unwrap()
        .contains("UnknownUUID: a0000000 is not a valid build uuid"));
    assert!(matches!(result, Err(CommandError::Degraded { .. })));
}

#[test]
fn test_compose_logs_saves_archive_and_prints_filename() {
    with_temp_cwd(|| {
        let client = Arc::new(MockClient {
            artifact: Some(ArtifactResponse {
                content: b"tar archive bytes".to_vec(),
                errors: vec![],
            }),
            ..Default::default()
        });
        let ctx = context(&client, OutputMode::Formatted);

        let command = Commands::Compose {
            command: ComposeCommands::Logs {
                uuid: UUID.to_string(),
            },
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        run_blocking(ctx.execute(&command, &mut out, &mut err)).unwrap();

        let filename = format!("{}-logs.tar", UUID);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", filename));
        assert!(err.is_empty());
        assert_eq!(std::fs::read(&filename).unwrap(), b"tar archive bytes");
        assert_eq!(client.seen_requests(), [format!("compose_logs:{}", UUID)]);
    });
}

#[test]
fn test_compose_metadata_structured_emits_filename_document() {
    with_temp_cwd(|| {
        let client = Arc::new(MockClient {
            artifact: Some(ArtifactResponse {
                content: b"metadata".to_vec(),
                errors: vec![],
            }),
            ..Default::default()
        });
        let ctx = context(&client, OutputMode::Structured);

        let command = Commands::Compose {
            command: ComposeCommands::Metadata {
                uuid: UUID.to_string(),
            },
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        run_blocking(ctx.execute(&command, &mut out, &mut err)).unwrap();

        let filename = format!("{}-metadata.tar", UUID);
        let stdout = String::from_utf8(out).unwrap();
        assert!(stdout.contains(&format!("\"filename\": \"{}\"", filename)));
        assert!(err.is_empty());
        assert!(std::path::Path::new(&filename).exists());
    });
}

#[tokio::test]
async fn test_compose_logs_unknown_uuid_degrades() {
    let client = Arc::new(MockClient {
        artifact: Some(ArtifactResponse {
            content: vec![],
            errors: vec![item_error("UnknownUUID", "no compose with that uuid")],
        }),
        ..Default::default()
    });
    let ctx = context(&client, OutputMode::Formatted);

    let command = Commands::Compose {
        command: ComposeCommands::Logs {
            uuid: "a0000000".to_string(),
        },
    };
    let mut out = Vec::new();
    let mut err = Vec::new();
    let result = ctx.execute(&command, &mut out, &mut err).await;

    assert!(out.is_empty());
    assert!(String::from_utf8(err).unwrap().contains("UnknownUUID"));
    assert!(matches!(result, Err(CommandError::Degraded { .. })));
}
