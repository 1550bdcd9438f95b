// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/stealth-pnginfo

//! Metadata extraction tests against realistic safetensors header text.

use stealth_pnginfo::{MetaError, extract_metadata};

/// A trimmed-down LoRA header: `__metadata__` first, tensor entries after,
/// double-encoded trainer keys inside.
fn lora_header() -> String {
    concat!(
        r#"{"__metadata__":{"#,
        r#""ss_network_dim":"8","#,
        r#""ss_network_args":"{\"conv_dim\":\"4\",\"conv_alpha\":\"1\"}","#,
        r#""ss_tag_frequency":"{\"dataset\":{\"1girl\":120,\"solo\":98}}","#,
        r#""ss_bucket_info":"{\"buckets\":{\"0\":{\"resolution\":[512,512],\"count\":40}}}","#,
        r#""ss_epoch":"10"},"#,
        r#""lora_unet_down.weight":{"dtype":"F16","shape":[8,320],"data_offsets":[0,5120]}}"#,
    )
    .to_string()
}

#[test]
fn lora_header_extraction() {
    let record = extract_metadata(&lora_header()).unwrap();

    // Plain string values stay strings.
    assert_eq!(record["ss_network_dim"], "8");
    assert_eq!(record["ss_epoch"], "10");

    // Double-encoded keys come back as structures.
    assert_eq!(record["ss_network_args"]["conv_dim"], "4");
    assert_eq!(record["ss_tag_frequency"]["dataset"]["1girl"], 120);
    assert_eq!(
        record["ss_bucket_info"]["buckets"]["0"]["resolution"][0],
        512
    );
}

#[test]
fn tensor_entries_after_metadata_ignored() {
    let record = extract_metadata(&lora_header()).unwrap();
    assert!(!record.contains_key("lora_unet_down.weight"));
}

#[test]
fn extraction_is_idempotent() {
    let first = extract_metadata(&lora_header()).unwrap();
    let second = extract_metadata(&lora_header()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn single_quote_header_variant() {
    // Python-repr style punctuation after the marker, same fixed skip.
    let content = r#"junk before __metadata__':{"a":1,"ss_tag_frequency":"{\"x\":2}"} junk after"#;
    let record = extract_metadata(content).unwrap();
    assert_eq!(record["a"], 1);
    assert_eq!(record["ss_tag_frequency"]["x"], 2);
}

#[test]
fn deeply_nested_braces_balance() {
    let content = r#"__metadata__':{"a":{"b":{"c":{"d":1}}},"e":{"f":2}}"#;
    let record = extract_metadata(content).unwrap();
    assert_eq!(record["a"]["b"]["c"]["d"], 1);
    assert_eq!(record["e"]["f"], 2);
}

#[test]
fn header_without_metadata_block() {
    let content = r#"{"weight":{"dtype":"F32","shape":[2,2],"data_offsets":[0,16]}}"#;
    assert!(matches!(
        extract_metadata(content),
        Err(MetaError::MarkerNotFound)
    ));
}

#[test]
fn truncated_header_reported() {
    let full = lora_header();
    let truncated = &full[..full.len() / 2];
    assert!(matches!(
        extract_metadata(truncated),
        Err(MetaError::PrematureEnd)
    ));
}

#[test]
fn errors_display_without_panicking() {
    let errors = [
        extract_metadata("no marker here").unwrap_err(),
        extract_metadata("__metadata__':{").unwrap_err(),
    ];
    for e in errors {
        assert!(!e.to_string().is_empty());
    }
}
