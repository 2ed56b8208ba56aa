use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const IRIS: &str = "petal_length,petal_width,species
1.0,0.1,a
2.0,0.2,a
3.0,0.3,a
4.0,0.4,a
5.0,0.5,a
2.0,1.0,b
2.5,1.2,b
3.0,1.4,b
3.5,1.6,b
6.9,1.8,b
";

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_petalplot"))
}

fn workdir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("iris.csv"), IRIS).unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(bin_path())
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn stdout(out: &Output) -> String {
    String::from_utf8(out.stdout.clone()).unwrap()
}

fn stderr(out: &Output) -> String {
    String::from_utf8(out.stderr.clone()).unwrap()
}

fn files(dir: &Path) -> Vec<String> {
    let mut names = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    names
}

fn summary_json(out: &Output) -> Vec<serde_json::Value> {
    assert!(out.status.success(), "stderr: {}", stderr(out));
    serde_json::from_str(&stdout(out)).unwrap()
}

#[test]
fn all_writes_two_files() {
    let dir = workdir();
    let out = run(dir.path(), &["all", "iris.csv", "iris.v2"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    assert_eq!(
        files(dir.path()),
        vec!["iris.csv", "iris.v2-boxplot.svg", "iris.v2-scatter.svg"]
    );
    let scatter = std::fs::read_to_string(dir.path().join("iris.v2-scatter.svg")).unwrap();
    let boxplot = std::fs::read_to_string(dir.path().join("iris.v2-boxplot.svg")).unwrap();
    assert_eq!(scatter.matches("<circle").count(), 10);
    assert_eq!(boxplot.matches("<rect").count(), 2);
}

#[test]
fn all_html() {
    let dir = workdir();
    let out = run(dir.path(), &["all", "iris.csv", "charts", "--format", "html"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let boxplot = std::fs::read_to_string(dir.path().join("charts-boxplot.html")).unwrap();
    assert!(boxplot.contains(r#"<div id="boxplot">"#));
    let scatter = std::fs::read_to_string(dir.path().join("charts-scatter.html")).unwrap();
    assert!(scatter.contains(r#"<div id="scatterplot">"#));
}

#[test]
fn all_missing_data_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["all", "nowhere.csv", "iris"]);

    assert!(!out.status.success());
    assert!(files(dir.path()).is_empty());
    // each chart tries on its own and reports its own failure
    assert_eq!(stderr(&out).matches("ERROR").count(), 2, "stderr: {}", stderr(&out));
}

#[test]
fn missing_data_fails_once() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(dir.path(), &["boxplot", "nowhere.csv", "-o", "box.svg"]);

    assert!(!out.status.success());
    assert!(files(dir.path()).is_empty());
    assert!(stdout(&out).is_empty());
    assert_eq!(stderr(&out).matches("ERROR").count(), 1, "stderr: {}", stderr(&out));
}

#[test]
fn output_file_or_stdout() {
    let dir = workdir();

    let out = run(dir.path(), &["scatter"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).starts_with("<svg"));
    assert_eq!(stdout(&out).matches("<circle").count(), 10);

    let out = run(dir.path(), &["scatter", "iris.csv", "-o", "scatter.svg"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).is_empty());
    let text = std::fs::read_to_string(dir.path().join("scatter.svg")).unwrap();
    assert!(text.starts_with("<svg"));
}

#[test]
fn success_is_logged() {
    let dir = workdir();
    let out = run(dir.path(), &["boxplot", "iris.csv", "-o", "box.svg"]);
    assert!(out.status.success());
    assert!(stderr(&out).contains("loaded data"));
    assert!(!stderr(&out).contains("ERROR"));
}

#[test]
fn summary_flags() {
    let dir = workdir();

    let plain = summary_json(&run(dir.path(), &["summary", "--json"]));
    assert_eq!(plain.len(), 2);
    assert_eq!(plain[0]["group"], "a");
    assert_eq!(plain[1]["median"], 3.0);
    assert_eq!(plain[1]["whiskers"]["upper"], 5.0);
    assert!(plain[1]["outliers"].as_array().unwrap().is_empty());

    let clipped = summary_json(&run(dir.path(), &["summary", "--json", "--clip"]));
    assert_eq!(clipped[1]["whiskers"]["upper"], 3.5);
    assert_eq!(clipped[1]["outliers"], serde_json::json!([6.9]));

    let width = summary_json(&run(dir.path(), &["summary", "--json", "--field", "width"]));
    assert_eq!(width[0]["median"], 0.3);
    assert_eq!(width[1]["median"], 1.4);
}

#[test]
fn summary_table() {
    let dir = workdir();
    let out = run(dir.path(), &["summary"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Median"));
    assert!(text.contains("3.000"));
}

#[test]
fn group_filter_flags() {
    let dir = workdir();
    let out = run(dir.path(), &["summary", "--json", "--exclude-group-regex", "^a$"]);
    let groups = summary_json(&out);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["group"], "b");

    let out = run(dir.path(), &["summary", "--include-group-regex", "("]);
    assert!(!out.status.success());
}

#[test]
fn flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("iris.csv"),
        IRIS.replacen("petal_length,petal_width,species", "PetalLength,PetalWidth,Species", 1),
    )
    .unwrap();
    std::fs::write(
        dir.path().join(".petalplot-config"),
        r#"{
            "schema": {
                "length_column": "PetalLength",
                "width_column": "PetalWidth",
                "group_column": "Species"
            },
            "boxplot": { "field": "width", "clip_to_observed_range": false }
        }"#,
    )
    .unwrap();

    let from_config = summary_json(&run(dir.path(), &["summary", "--json"]));
    assert_eq!(from_config[1]["median"], 1.4);

    let overridden = summary_json(&run(
        dir.path(),
        &["summary", "--json", "--field", "length", "--clip"],
    ));
    assert_eq!(overridden[1]["median"], 3.0);
    assert_eq!(overridden[1]["outliers"], serde_json::json!([6.9]));
}

#[test]
fn explicit_config_path() {
    let dir = workdir();
    std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    let out = run(dir.path(), &["--config", "broken.json", "summary"]);
    assert!(!out.status.success());
    assert!(stdout(&out).is_empty());
}
