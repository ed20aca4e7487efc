// Allow deprecated APIs (assert_cmd::cargo_bin is deprecated but still works)
#![allow(deprecated)]

use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*; // Used for writing assertions
use rstest::rstest;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const GAUGE_ICON: &str = r##"
{
    "name": "cpu",
    "size": {"width": 96, "height": 48},
    "layers": [
        {"kind": "srect", "data": [
            {"id": "srect_fill", "value": "#202830"},
            {"id": "srect_radius", "value": "6"}
        ]},
        {"kind": "gauge", "data": [
            {"id": "gauge_value", "value": "40"},
            {"id": "gauge_color", "value": "#e53935"}
        ]},
        {"kind": "cticks", "data": [
            {"id": "cticks_majTicksCount", "value": "8"}
        ]}
    ]
}
"##;

fn write_input(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("icons.json");
    fs::write(&path, contents).unwrap();
    path
}

fn png_size(path: &Path) -> (u32, u32) {
    let decoder = png::Decoder::new(fs::File::open(path).unwrap());
    let reader = decoder.read_info().unwrap();
    let info = reader.info();
    (info.width, info.height)
}

#[test]
fn test_render_single_icon() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), GAUGE_ICON);
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("icon-compositor")?;
    cmd.arg("--input").arg(&input).arg("--output-dir").arg(&out);
    cmd.assert().success();

    let path = out.join("cpu.png");
    assert!(path.exists());
    assert_eq!(png_size(&path), (96, 48));
    Ok(())
}

#[rstest]
#[case("2x1", &["cpu_1_1", "cpu_2_1"], (48, 48))]
#[case("1x2", &["cpu_1_1", "cpu_1_2"], (96, 24))]
#[case("3x1", &["cpu_1_1", "cpu_2_1", "cpu_3_1"], (32, 48))]
fn test_render_tiles(
    #[case] tiles: &str,
    #[case] ids: &[&str],
    #[case] first_size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), GAUGE_ICON);
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("icon-compositor")?;
    cmd.arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("--tiles")
        .arg(tiles);
    cmd.assert().success();

    for id in ids {
        assert!(out.join(format!("{id}.png")).exists(), "missing {id}");
    }
    assert!(!out.join("cpu.png").exists());
    assert_eq!(png_size(&out.join(format!("{}.png", ids[0]))), first_size);
    Ok(())
}

#[test]
fn test_render_array_with_settings() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_input(
        dir.path(),
        r#"[
            {"name": "a", "layers": [{"kind": "srect"}]},
            {"name": "b", "size": {"width": 16, "height": 16}, "layers": []}
        ]"#,
    );
    let settings = dir.path().join("settings.json");
    fs::write(
        &settings,
        r#"{"default_icon_size": {"width": 40, "height": 20}, "load_system_fonts": false}"#,
    )?;
    let out = dir.path().join("out");

    let mut cmd = Command::cargo_bin("icon-compositor")?;
    cmd.arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .arg("-s")
        .arg(&settings)
        .arg("-c")
        .arg("9");
    cmd.assert().success();

    assert_eq!(png_size(&out.join("a.png")), (40, 20));
    assert_eq!(png_size(&out.join("b.png")), (16, 16));
    Ok(())
}

#[test]
fn test_missing_input() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("icon-compositor")?;
    cmd.arg("-i")
        .arg(dir.path().join("nope.json"))
        .arg("-o")
        .arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read input file"));
    Ok(())
}

#[rstest]
#[case("--tiles", "0x1", "Invalid tile grid")]
#[case("--compression-level", "12", "Compression level")]
fn test_invalid_overrides(
    #[case] flag: &str,
    #[case] value: &str,
    #[case] message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_input(dir.path(), GAUGE_ICON);
    let mut cmd = Command::cargo_bin("icon-compositor")?;
    cmd.arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg(flag)
        .arg(value);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(message));
    Ok(())
}

#[test]
fn test_tiles_too_fine_for_icon() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = write_input(
        dir.path(),
        r#"{"name": "tiny", "size": {"width": 2, "height": 2}, "layers": []}"#,
    );
    let mut cmd = Command::cargo_bin("icon-compositor")?;
    cmd.arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg("--tiles")
        .arg("3x1");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No icons were rendered"));
    Ok(())
}
