// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use super::*;
use crate::HostOs;
use crate::testing::MockTransport;

struct Bench {
    tmp: TempDir,
    transport: Arc<MockTransport>,
    bench: EnvBench,
}

fn bench(connectivity: Connectivity) -> Bench {
    let tmp = TempDir::new().unwrap();
    let transport = MockTransport::new();
    let bench = EnvBench::with_platform(
        Config::rooted_at(tmp.path()),
        transport.clone(),
        connectivity,
        Platform::new(HostOs::Linux, "x64"),
    );
    bench.store().ensure_root().unwrap();
    Bench {
        tmp,
        transport,
        bench,
    }
}

fn request(name: &str, version: &str) -> CreateRequest {
    CreateRequest {
        name: name.to_string(),
        version: SymbolicVersion::parse(version),
        ..Default::default()
    }
}

/// Shell script that records its arguments, one per line, into `record`.
#[cfg(unix)]
fn recorder(record: &std::path::Path) -> String {
    format!("#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\n", record.display())
}

#[rstest]
#[tokio::test]
async fn test_create_downloads_and_writes_descriptor() {
    let b = bench(Connectivity::Online);
    b.transport.publish(&[("v4.12.0", false)]);
    b.transport.serve_artifact(b.bench.cache().platform(), "4.12.0");

    let descriptor = b
        .bench
        .create_environment(&CreateRequest {
            launch_args: vec!["--no-sandbox".to_string()],
            ..request("dev", "latest")
        })
        .await
        .unwrap();

    assert_eq!(b.bench.environment("dev").unwrap(), descriptor);
    assert_eq!(descriptor.tool_version, SymbolicVersion::Latest);
    assert_eq!(descriptor.launch_args, Some(vec!["--no-sandbox".to_string()]));
    assert!(b.bench.cache().is_installed(&ResolvedVersion::new("4.12.0")));
}

#[rstest]
#[tokio::test]
async fn test_create_collision_fails_before_any_network() {
    let b = bench(Connectivity::Online);
    b.bench
        .store()
        .create("dev", &Descriptor::new("dev", SymbolicVersion::Latest), false)
        .unwrap();

    let err = b
        .bench
        .create_environment(&request("dev", "4.12.0"))
        .await
        .expect_err("Should not overwrite");

    assert!(matches!(err, Error::AlreadyExists(_)));
    assert!(b.transport.requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_forced_create_keeps_old_environment_when_version_is_invalid() {
    let b = bench(Connectivity::Online);
    b.transport.publish(&[("v4.12.0", false)]);
    let old = Descriptor::new("dev", SymbolicVersion::parse("4.12.0"));
    b.bench.store().create("dev", &old, false).unwrap();

    let err = b
        .bench
        .create_environment(&CreateRequest {
            force: true,
            ..request("dev", "4.99.0")
        })
        .await
        .expect_err("Unpublished version");

    assert!(matches!(err, Error::InvalidVersion(ref v) if v == "4.99.0"));
    assert_eq!(b.bench.environment("dev").unwrap(), old);
}

#[rstest]
#[tokio::test]
async fn test_forced_create_replaces_environment() {
    let b = bench(Connectivity::Online);
    b.transport.publish(&[("v4.12.0", false), ("v4.11.0", false)]);
    b.transport.serve_artifact(b.bench.cache().platform(), "4.11.0");
    b.bench
        .store()
        .create("dev", &Descriptor::new("dev", SymbolicVersion::Latest), false)
        .unwrap();
    let leftover = b.bench.store().environment_dir("dev").join("settings.json");
    std::fs::write(&leftover, "{}").unwrap();

    b.bench
        .create_environment(&CreateRequest {
            force: true,
            ..request("dev", "4.11.0")
        })
        .await
        .unwrap();

    assert_eq!(
        b.bench.environment("dev").unwrap().tool_version,
        SymbolicVersion::parse("4.11.0")
    );
    assert!(!leftover.exists());
}

#[rstest]
#[case(".hidden", &[])]
#[case("dev", &["--userData", "/tmp/elsewhere"])]
#[tokio::test]
async fn test_create_rejects_invalid_input(#[case] name: &str, #[case] args: &[&str]) {
    let b = bench(Connectivity::Online);

    let result = b
        .bench
        .create_environment(&CreateRequest {
            launch_args: args.iter().map(ToString::to_string).collect(),
            ..request(name, "latest")
        })
        .await;

    assert!(matches!(
        result,
        Err(Error::InvalidName { .. } | Error::IsolationFlag)
    ));
    assert!(b.transport.requests().is_empty());
    assert_eq!(b.bench.store().exists(name), EnvironmentState::Absent);
}

#[rstest]
#[tokio::test]
async fn test_create_rejects_versions_below_minimum() {
    let b = bench(Connectivity::Online);

    let err = b
        .bench
        .create_environment(&request("old", "4.9.1"))
        .await
        .expect_err("Too old to isolate");

    assert!(matches!(err, Error::InvalidVersion(_)));
    assert_eq!(b.bench.store().exists("old"), EnvironmentState::Absent);
}

#[rstest]
#[tokio::test]
async fn test_offline_create_uses_cached_build_only() {
    let b = bench(Connectivity::Offline);
    let cached = b.bench.cache().path_for(&ResolvedVersion::new("4.11.0"));
    std::fs::create_dir_all(b.bench.cache().root()).unwrap();
    std::fs::write(&cached, "build").unwrap();

    b.bench
        .create_environment(&request("cached", "4.11.0"))
        .await
        .unwrap();
    let err = b
        .bench
        .create_environment(&request("missing", "4.12.0"))
        .await
        .expect_err("Cannot download offline");

    assert!(matches!(err, Error::Offline(_)));
    assert_eq!(b.bench.store().exists("missing"), EnvironmentState::Absent);
    assert!(b.transport.requests().is_empty());
}

#[cfg(unix)]
#[rstest]
#[tokio::test]
async fn test_launch_uses_cached_build_with_stored_then_extra_args() {
    let b = bench(Connectivity::Online);
    let record = b.tmp.path().join("argv");
    let version = ResolvedVersion::new("4.11.0");
    b.transport.respond(
        &b.bench.cache().platform().download_url(&version),
        200,
        recorder(&record),
    );
    let descriptor = Descriptor::new("dev", SymbolicVersion::parse("4.11.0"))
        .with_launch_args(vec!["--no-sandbox".to_string()]);
    b.bench.store().create("dev", &descriptor, false).unwrap();

    b.bench
        .launch_environment("dev", &["--dev".to_string()])
        .await
        .unwrap();

    let data_dir = b.bench.store().environment_dir("dev");
    let argv = std::fs::read_to_string(&record).unwrap();
    assert_eq!(
        argv.lines().collect::<Vec<_>>(),
        vec![
            "--userData",
            data_dir.to_str().unwrap(),
            "--no-sandbox",
            "--dev"
        ]
    );
}

#[cfg(unix)]
#[rstest]
#[tokio::test]
async fn test_launch_prefers_system_install_for_latest() {
    use std::os::unix::fs::PermissionsExt;

    let b = bench(Connectivity::Online);
    b.transport.publish(&[("v4.12.0", false)]);
    let record = b.tmp.path().join("argv");
    let system = &b.bench.config().executable_path;
    std::fs::create_dir_all(system.parent().unwrap()).unwrap();
    std::fs::write(system, recorder(&record)).unwrap();
    std::fs::set_permissions(system, std::fs::Permissions::from_mode(0o755)).unwrap();
    b.bench
        .store()
        .create("dev", &Descriptor::new("dev", SymbolicVersion::Latest), false)
        .unwrap();

    b.bench.launch_environment("dev", &[]).await.unwrap();

    assert!(record.is_file());
    assert!(b.bench.installed_versions().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_launch_rejects_isolation_flag_in_extra_args() {
    let b = bench(Connectivity::Online);
    b.bench
        .store()
        .create("dev", &Descriptor::new("dev", SymbolicVersion::Latest), false)
        .unwrap();

    let err = b
        .bench
        .launch_environment("dev", &["--userData".to_string()])
        .await
        .expect_err("Should refuse");

    assert!(matches!(err, Error::IsolationFlag));
    assert!(b.transport.requests().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_launch_missing_environment_is_not_found() {
    let b = bench(Connectivity::Online);

    let err = b
        .bench
        .launch_environment("ghost", &[])
        .await
        .expect_err("Nothing to launch");

    assert!(matches!(err, Error::NotFound(_)));
}

#[rstest]
#[tokio::test]
async fn test_modify_applies_changes_then_renames() {
    let b = bench(Connectivity::Online);
    b.transport.publish(&[("v5.0.0-beta.1", true), ("v4.12.0", false)]);
    b.bench
        .store()
        .create("dev", &Descriptor::new("dev", SymbolicVersion::Latest), false)
        .unwrap();

    let modified = b
        .bench
        .modify_environment(
            "dev",
            &Modification {
                version: Some(SymbolicVersion::Beta),
                launch_args: Some(vec!["--dev".to_string()]),
                rename: Some("beta-dev".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(b.bench.store().exists("dev"), EnvironmentState::Absent);
    let stored = b.bench.environment("beta-dev").unwrap();
    assert_eq!(stored, modified);
    assert_eq!(stored.name, "beta-dev");
    assert_eq!(stored.tool_version, SymbolicVersion::Beta);
    assert_eq!(stored.launch_args, Some(vec!["--dev".to_string()]));
}

#[rstest]
#[tokio::test]
async fn test_modify_with_invalid_version_changes_nothing() {
    let b = bench(Connectivity::Online);
    b.transport.publish(&[("v4.12.0", false)]);
    let before = Descriptor::new("dev", SymbolicVersion::Latest);
    b.bench.store().create("dev", &before, false).unwrap();

    let err = b
        .bench
        .modify_environment(
            "dev",
            &Modification {
                version: Some(SymbolicVersion::parse("4.99.0")),
                launch_args: Some(vec!["--dev".to_string()]),
                ..Default::default()
            },
        )
        .await
        .expect_err("Unpublished version");

    assert!(matches!(err, Error::InvalidVersion(_)));
    assert_eq!(b.bench.environment("dev").unwrap(), before);
}

#[rstest]
#[tokio::test]
async fn test_modify_onto_taken_name_changes_nothing() {
    let b = bench(Connectivity::Online);
    let before = Descriptor::new("dev", SymbolicVersion::Latest);
    b.bench.store().create("dev", &before, false).unwrap();
    b.bench
        .store()
        .create("taken", &Descriptor::new("taken", SymbolicVersion::Beta), false)
        .unwrap();
    let raw = std::fs::read_to_string(b.bench.store().descriptor_path("dev")).unwrap();

    let err = b
        .bench
        .modify_environment(
            "dev",
            &Modification {
                launch_args: Some(vec!["--dev".to_string()]),
                rename: Some("taken".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect_err("Target name is taken");

    assert!(matches!(err, Error::AlreadyExists(ref name) if name == "taken"));
    assert_eq!(b.bench.environment("dev").unwrap(), before);
    assert_eq!(
        std::fs::read_to_string(b.bench.store().descriptor_path("dev")).unwrap(),
        raw
    );
}

#[cfg(unix)]
#[rstest]
#[tokio::test]
async fn test_quicklaunch_keeps_a_hidden_environment() {
    let b = bench(Connectivity::Online);
    let record = b.tmp.path().join("argv");
    b.transport.publish(&[("v4.11.0", false)]);
    b.transport.respond(
        &b.bench
            .cache()
            .platform()
            .download_url(&ResolvedVersion::new("4.11.0")),
        200,
        recorder(&record),
    );
    let version = SymbolicVersion::parse("4.11.0");
    let name = quicklaunch_name(&version);

    b.bench.quicklaunch(&version, false, &[]).await.unwrap();
    let marker = b.bench.store().environment_dir(&name).join("recent.json");
    std::fs::write(&marker, "[]").unwrap();
    b.bench.quicklaunch(&version, false, &[]).await.unwrap();

    assert_eq!(name, ".quicklaunch-4.11.0");
    assert!(marker.is_file());
    assert!(b.bench.environments().is_empty());
    assert_eq!(b.bench.environment(&name).unwrap().name, name);

    b.bench.quicklaunch(&version, true, &[]).await.unwrap();

    assert!(!marker.exists());
    assert_eq!(b.bench.store().exists(&name), EnvironmentState::Complete);
}

#[rstest]
#[tokio::test]
async fn test_prune_through_context() {
    let b = bench(Connectivity::Online);
    b.bench
        .store()
        .create("a", &Descriptor::new("a", SymbolicVersion::parse("4.11.0")), false)
        .unwrap();
    std::fs::create_dir_all(b.bench.cache().root()).unwrap();
    for version in ["4.10.0", "4.11.0"] {
        std::fs::write(
            b.bench.cache().path_for(&ResolvedVersion::new(version)),
            "build",
        )
        .unwrap();
    }

    let live = b.bench.live_versions().await;
    let removed = b.bench.prune().await.unwrap();

    assert_eq!(live.into_iter().collect::<Vec<_>>(), vec![ResolvedVersion::new("4.11.0")]);
    assert_eq!(removed, vec![ResolvedVersion::new("4.10.0")]);
    assert_eq!(
        b.bench.installed_versions().into_iter().collect::<Vec<_>>(),
        vec![ResolvedVersion::new("4.11.0")]
    );
}
