//! Architecture contract tests.

mod support;

use support::architecture::{
    find_lines_containing, find_lines_containing_outside, find_non_export_lines_in_mod_files,
    path_exists, read_relative,
};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = find_lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
            "diesel::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn ports_depend_only_on_domain() {
    let hits = find_lines_containing(
        "src/port",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "reqwest::",
            "diesel::",
        ],
    );

    assert!(hits.is_empty(), "found outer-layer imports in ports: {hits:#?}");
}

#[test]
fn application_is_adapter_agnostic() {
    let hits = find_lines_containing(
        "src/application",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "reqwest::",
            "diesel::",
        ],
    );

    assert!(
        hits.is_empty(),
        "application layer should reach collaborators through ports: {hits:#?}"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations = find_non_export_lines_in_mod_files("src");
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn production_code_propagates_errors() {
    let hits = find_lines_containing_outside("src", &[".unwrap()", ".expect("], &["src/testkit"]);
    assert!(
        hits.is_empty(),
        "found unwrap/expect outside tests: {hits:#?}"
    );
}

#[test]
fn store_contract_lives_in_outbound_port() {
    assert!(
        path_exists("src/port/outbound/store.rs"),
        "sentiment store trait should live under port/outbound"
    );

    let sqlite = read_relative("src/adapter/outbound/sqlite/store.rs");
    assert!(
        sqlite.contains("impl SentimentStore for SqliteSentimentStore"),
        "sqlite adapter should implement the store port"
    );
    let memory = read_relative("src/adapter/outbound/memory.rs");
    assert!(
        memory.contains("impl SentimentStore for MemorySentimentStore"),
        "memory adapter should implement the store port"
    );
}

#[test]
fn classifier_adapters_implement_ports() {
    let hosted = read_relative("src/adapter/outbound/classifier/huggingface.rs");
    assert!(hosted.contains("impl TextClassifier for HuggingFace"));

    let lexicon = read_relative("src/adapter/outbound/classifier/vader.rs");
    assert!(lexicon.contains("impl PolarityScorer for Vader"));
}

#[test]
fn secrets_are_not_configurable_from_file() {
    let settings = read_relative("src/infrastructure/config/settings.rs");
    assert!(
        !settings.contains("pub api_token") && !settings.contains("pub token"),
        "classifier token must come from the environment only"
    );
}
