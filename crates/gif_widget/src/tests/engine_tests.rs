use super::*;

use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    std::env::temp_dir().join(format!("gif_widget_{label}_{suffix}"))
}

/// Stand-in for ffmpeg: answers `-version` and copies `-i <input>` to the last
/// argument.
#[cfg(unix)]
fn fake_ffmpeg(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
  echo "ffmpeg version fake"
  exit 0
fi
input=""
output=""
while [ $# -gt 0 ]; do
  case "$1" in
    -i) input="$2"; shift 2 ;;
    -vf|-loop) shift 2 ;;
    -y) shift ;;
    *) output="$1"; shift ;;
  esac
done
cp "$input" "$output"
"#;
    std::fs::create_dir_all(dir).expect("bin dir");
    let path = dir.join("ffmpeg");
    std::fs::write(&path, script).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod");
    path
}

#[test]
fn gif_args_use_fixed_filter_chain() {
    assert_eq!(
        gif_args("input-a.mp4", "output-a.gif"),
        vec![
            "-i",
            "input-a.mp4",
            "-vf",
            "fps=10,scale=320:-1:flags=lanczos",
            "-loop",
            "0",
            "output-a.gif",
        ]
    );
}

#[tokio::test]
async fn scratch_access_requires_loading() {
    let engine = FfmpegEngine::new("ffmpeg", temp_dir("unloaded"));
    assert!(!engine.is_loaded());
    let err = engine
        .write_file("input.mp4", b"data")
        .await
        .expect_err("should fail");
    assert!(matches!(err, WidgetError::EngineNotLoaded));
    let err = engine.run(&[]).await.expect_err("should fail");
    assert!(matches!(err, WidgetError::EngineNotLoaded));
}

#[tokio::test]
async fn missing_binary_fails_to_load() {
    let engine = FfmpegEngine::new(
        temp_dir("nobin").join("no-such-ffmpeg"),
        temp_dir("nobin_work"),
    );
    let err = engine.ensure_loaded().await.expect_err("should fail");
    assert!(matches!(err, WidgetError::Transcode(_)));
    assert!(!engine.is_loaded());
}

#[cfg(unix)]
#[tokio::test]
async fn stages_runs_and_reads_back_inside_work_dir() {
    let root = temp_dir("fake");
    let ffmpeg = fake_ffmpeg(&root.join("bin"));
    let engine = FfmpegEngine::new(ffmpeg, root.join("work"));

    engine.ensure_loaded().await.expect("load");
    engine.ensure_loaded().await.expect("second load is a no-op");
    assert!(engine.is_loaded());
    assert!(engine.work_dir().exists());

    engine
        .write_file("input-t.mp4", b"frames")
        .await
        .expect("write");
    engine
        .run(&gif_args("input-t.mp4", "output-t.gif"))
        .await
        .expect("run");
    let produced = engine.read_file("output-t.gif").await.expect("read");
    assert_eq!(produced, b"frames");

    engine.remove_file("output-t.gif").await.expect("remove");
    assert!(engine.read_file("output-t.gif").await.is_err());

    for bad in ["../escape.gif", "nested/out.gif", "", ".."] {
        let err = engine.write_file(bad, b"x").await.expect_err("bad name");
        assert!(matches!(err, WidgetError::InvalidFileName(_)), "{bad}");
    }

    std::fs::remove_dir_all(root).expect("cleanup");
}
