use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn network(name: &str) -> PathBuf {
    workspace_root().join("fixtures").join("networks").join(name)
}

fn cli() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo_bin!("metromap-cli"))
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("layout prints JSON")
}

#[test]
fn validate_prints_a_summary() {
    let out = cli()
        .args(["validate"])
        .arg(network("hub.json"))
        .assert()
        .success()
        .get_output()
        .clone();
    let text = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        text.trim(),
        "ok: 7 platforms, 5 stations, 4 spans, 3 transfers, 2 routes, 1 interchange cluster"
    );
}

#[test]
fn dangling_references_fail_with_exit_code_1() {
    let out = cli()
        .arg("validate")
        .arg(network("dangling.json"))
        .assert()
        .code(1)
        .get_output()
        .clone();
    let err = String::from_utf8_lossy(&out.stderr);
    assert!(err.contains("Dangling reference"), "stderr: {err}");
}

#[test]
fn unknown_flags_are_usage_errors() {
    let out = cli().args(["layout", "--frobnicate"]).assert().code(2).get_output().clone();
    assert!(String::from_utf8_lossy(&out.stderr).contains("USAGE:"));
}

#[test]
fn layout_at_zoom_13_reports_the_hub_cluster() {
    let out = cli()
        .args(["layout", "--zoom", "13"])
        .arg(network("hub.json"))
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&out);
    assert_eq!(json["tier"], "detailed");
    assert_eq!(json["model"]["clusters"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["model"]["markers"].as_array().map(Vec::len), Some(7));
    assert!(json["frame"]["width"].as_f64().unwrap_or_default() > 0.0);
}

#[test]
fn layout_below_zoom_10_is_empty() {
    let out = cli()
        .args(["layout", "--zoom", "9"])
        .arg(network("hub.json"))
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&out);
    assert_eq!(json["tier"], "hidden");
    assert_eq!(json["model"]["markers"].as_array().map(Vec::len), Some(0));
}

#[test]
fn layout_reads_stdin() {
    let feed = std::fs::read_to_string(network("triangle.json")).expect("fixture");
    let out = cli()
        .args(["layout", "--zoom", "11", "-"])
        .write_stdin(feed)
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&out);
    assert_eq!(json["tier"], "simplified");
    assert_eq!(json["model"]["markers"].as_array().map(Vec::len), Some(2));
}

#[test]
fn yaml_config_overrides_hit_radius() {
    let config = workspace_root().join("fixtures").join("config").join("overlay.yaml");
    let out = cli()
        .arg("layout")
        .arg("--config")
        .arg(&config)
        .arg(network("hub.json"))
        .assert()
        .success()
        .get_output()
        .clone();
    let json = stdout_json(&out);
    assert_eq!(json["zoom"], 13.0);
    let radius = json["model"]["style"]["circle_radius"]
        .as_f64()
        .expect("detailed style");
    let regions = json["model"]["hit_regions"].as_array().expect("hit regions");
    assert!(!regions.is_empty());
    for region in regions {
        let r = region["radius"].as_f64().expect("radius");
        assert!((r - 2.5 * radius).abs() < 1e-9);
    }
}

#[test]
fn render_svg_to_stdout() {
    let out = cli()
        .args(["render", "--zoom", "13"])
        .arg(network("hub.json"))
        .assert()
        .success()
        .get_output()
        .clone();
    let svg = String::from_utf8_lossy(&out.stdout);
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"<g id="paths">"#));
    assert!(svg.contains(r#"data-tier="detailed""#));
}

#[test]
fn render_png_to_explicit_out_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out_path = dir.path().join("hub.png");
    cli()
        .args(["render", "--format", "png", "--zoom", "13", "--background", "white"])
        .arg("--out")
        .arg(&out_path)
        .arg(network("hub.json"))
        .assert()
        .success();

    let bytes = std::fs::read(&out_path).expect("png written");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn render_png_defaults_next_to_the_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("triangle.json");
    std::fs::copy(network("triangle.json"), &input).expect("copy fixture");

    cli()
        .args(["render", "--format", "png", "--zoom", "14"])
        .arg(&input)
        .assert()
        .success();

    let bytes = std::fs::read(dir.path().join("triangle.png")).expect("png written");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn invalid_background_fails() {
    cli()
        .args(["render", "--format", "png", "--background", "not-a-color", "--out"])
        .arg(tempfile::tempdir().expect("tempdir").path().join("x.png"))
        .arg(network("hub.json"))
        .assert()
        .code(1);
}
