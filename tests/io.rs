use extended_em::config::fit::load_config;
use extended_em::io::{dataset_from_json_str, load_dataset, write_json_file};
use extended_em::{ExtendedEm, Initialization, Value};
use std::fs;

const POINTS: &str = r#"{
  "name": "points",
  "attributes": [
    { "name": "x", "kind": "numeric" },
    { "name": "colour", "kind": { "nominal": { "num_values": 2 } } }
  ],
  "rows": [
    { "values": [1.0, 0] },
    { "values": [1.0, 0] },
    { "values": [2.0, null] },
    { "values": [8.0, 1] },
    { "values": [9.0, 1] },
    { "values": [9.0, 1], "weight": 2.0 }
  ]
}"#;

#[test]
fn dataset_json_builds_typed_rows() {
    let data = dataset_from_json_str(POINTS).expect("valid dataset");
    assert_eq!(data.name(), "points");
    assert_eq!(data.num_instances(), 6);
    assert!(data.attribute(1).expect("attr").is_nominal());
    assert_eq!(data.instances()[2].get(1), Some(&Value::Missing));
    assert_eq!(data.instances()[3].get(1), Some(&Value::Nominal(1)));
    assert_eq!(data.instances()[5].weight(), 2.0);
    assert!((data.total_weight() - 7.0).abs() < 1e-12);
}

#[test]
fn bad_cells_are_reported_with_their_row() {
    let bad_code = POINTS.replace("[8.0, 1]", "[8.0, 5]");
    let err = dataset_from_json_str(&bad_code).expect_err("code out of range");
    assert!(err.contains("row 3"), "{err}");

    let short_row = POINTS.replace("[8.0, 1]", "[8.0]");
    let err = dataset_from_json_str(&short_row).expect_err("arity");
    assert!(err.contains("row 3"), "{err}");
}

#[test]
fn config_drives_a_fit_and_writes_the_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let points = dir.path().join("points.json");
    fs::write(&points, POINTS).expect("write dataset");
    let out = dir.path().join("out").join("fit.json");
    let config_json = format!(
        r#"{{
  "input": {input:?},
  "em": {{ "num_clusters": 2, "max_iterations": 50 }},
  "centers": [[1.5, null], [8.5, null]],
  "sizes": [3, 3],
  "output": {{ "result_json": {out:?}, "include_assignments": true }}
}}"#,
        input = points.display().to_string(),
        out = out.display().to_string(),
    );
    let config_path = dir.path().join("fit.json");
    fs::write(&config_path, config_json).expect("write config");

    let config = load_config(&config_path).expect("valid config");
    assert_eq!(config.em.num_clusters, 2);
    assert_eq!(config.em.seed, 100);
    let data = load_dataset(&config.input).expect("dataset loads");
    let init = config.initialization(&data).expect("centers parse");
    assert!(matches!(init, Initialization::Centers { .. }));

    let fitted = ExtendedEm::new(config.em.clone())
        .fit(&data, &init)
        .expect("fit succeeds");
    let summary = fitted.summary(config.output.include_assignments);
    let path = config.output.result_json.as_ref().expect("output path");
    write_json_file(path, &summary).expect("summary written");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).expect("read back")).expect("json");
    assert_eq!(written["clusters"].as_array().map(Vec::len), Some(2));
    assert_eq!(written["assignments"].as_array().map(Vec::len), Some(6));
    assert_eq!(written["report"]["finalClusters"], 2);
}

#[test]
fn omitted_centers_select_random_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("fit.json");
    fs::write(&config_path, r#"{ "input": "points.json" }"#).expect("write config");
    let config = load_config(&config_path).expect("valid config");
    let data = dataset_from_json_str(POINTS).expect("valid dataset");
    assert!(matches!(
        config.initialization(&data),
        Ok(Initialization::RandomRows)
    ));
    assert!(config.output.result_json.is_none());
}

#[test]
fn mismatched_sizes_are_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("fit.json");
    fs::write(
        &config_path,
        r#"{ "input": "points.json", "centers": [[1.0, 0], [9.0, 1]], "sizes": [1] }"#,
    )
    .expect("write config");
    let config = load_config(&config_path).expect("valid config");
    let data = dataset_from_json_str(POINTS).expect("valid dataset");
    assert!(config.initialization(&data).is_err());
}
