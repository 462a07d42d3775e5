use std::error::Error;

use notify::RecursiveMode;
use wasm_pack_watch::watch::path_utils::relative_to;
use wasm_pack_watch::watch::{WATCH_GLOBS, WatchSet};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn matches_sources_manifest_and_lock_file() -> TestResult {
    let set = WatchSet::for_crate("/work/app")?;

    assert!(set.matches("src/lib.rs"));
    assert!(set.matches("src/components/button/mod.rs"));
    assert!(set.matches("src/index.html"));
    assert!(set.matches("Cargo.toml"));
    assert!(set.matches("Cargo.lock"));
    Ok(())
}

#[test]
fn ignores_everything_outside_the_globs() -> TestResult {
    let set = WatchSet::for_crate("/work/app")?;

    assert!(!set.matches("target/debug/build/out.rs"));
    assert!(!set.matches("pkg/app.js"));
    assert!(!set.matches("tests/it.rs"));
    assert!(!set.matches("README.md"));
    assert!(!set.matches("crates/other/Cargo.toml"));
    Ok(())
}

#[test]
fn globs_are_anchored_at_the_crate_root() -> TestResult {
    let dir = tempfile::tempdir()?;
    let set = WatchSet::for_crate(dir.path())?;
    let root = set.root().to_path_buf();

    assert_eq!(WATCH_GLOBS, ["src/**", "Cargo.toml", "Cargo.lock"]);
    assert_eq!(
        set.absolute_globs(),
        vec![
            root.join("src/**"),
            root.join("Cargo.toml"),
            root.join("Cargo.lock")
        ]
    );
    assert_eq!(
        set.watch_roots(),
        vec![
            (root.join("src"), RecursiveMode::Recursive),
            (root.clone(), RecursiveMode::NonRecursive),
        ]
    );
    Ok(())
}

#[test]
fn relative_paths_use_forward_slashes() -> TestResult {
    let dir = tempfile::tempdir()?;
    let nested = dir.path().join("src").join("a").join("b.rs");

    assert_eq!(relative_to(dir.path(), &nested).as_deref(), Some("src/a/b.rs"));
    Ok(())
}

#[test]
fn paths_outside_root_have_no_relative_form() -> TestResult {
    let root = tempfile::tempdir()?;
    let other = tempfile::tempdir()?;
    let file = other.path().join("x.rs");
    std::fs::write(&file, "")?;

    assert_eq!(relative_to(root.path(), &file), None);
    Ok(())
}
