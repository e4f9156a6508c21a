// Copyright (c) Contributors to the EnvBench project.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::ffi::OsString;

use rstest::rstest;

use super::*;

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
    let vars: HashMap<String, OsString> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), OsString::from(v)))
        .collect();
    move |key| vars.get(key).cloned()
}

#[rstest]
fn test_overrides_are_used_verbatim() {
    let config = Config::from_lookup(lookup_from(&[
        (BLOCKBENCH_PATH_VAR, "/opt/bb/blockbench"),
        (DEFAULT_USER_DATA_VAR, "/data/bb"),
        (STORAGE_FOLDER_VAR, "/data/envs"),
        (ENVIRONMENT_FILE_VAR, "env.json"),
        (PORTABLES_CACHE_VAR, "/cache/bb"),
    ]))
    .expect("Should build config");

    assert_eq!(config.executable_path, PathBuf::from("/opt/bb/blockbench"));
    assert_eq!(config.default_user_data, PathBuf::from("/data/bb"));
    assert_eq!(config.storage_root, PathBuf::from("/data/envs"));
    assert_eq!(config.descriptor_filename, "env.json");
    assert_eq!(config.cache_root, PathBuf::from("/cache/bb"));
}

#[rstest]
fn test_cache_defaults_under_storage_root() {
    let config = Config::from_lookup(lookup_from(&[(STORAGE_FOLDER_VAR, "/data/envs")]))
        .expect("Should build config");

    assert_eq!(config.cache_root, PathBuf::from("/data/envs/.portables"));
    assert_eq!(config.descriptor_filename, DEFAULT_DESCRIPTOR_FILENAME);
}

#[rstest]
fn test_empty_values_fall_back_to_defaults() {
    let config = Config::from_lookup(lookup_from(&[
        (STORAGE_FOLDER_VAR, "/data/envs"),
        (ENVIRONMENT_FILE_VAR, ""),
    ]))
    .expect("Should build config");

    assert_eq!(config.descriptor_filename, DEFAULT_DESCRIPTOR_FILENAME);
}

#[rstest]
fn test_rooted_at_keeps_everything_inside() {
    let config = Config::rooted_at("/tmp/envbench-test");

    assert!(config.storage_root.starts_with("/tmp/envbench-test"));
    assert!(config.cache_root.starts_with(&config.storage_root));
    assert!(config.executable_path.starts_with("/tmp/envbench-test"));
}
