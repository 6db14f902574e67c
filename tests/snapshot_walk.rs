use std::error::Error;
use std::sync::Arc;

use tempfile::tempdir;

use simple_file_watch::errors::WatchError;
use simple_file_watch::fs::RealFileSystem;
use simple_file_watch::watch::{ExclusionRules, SnapshotBuilder};
use simple_file_watch_test_utils::builders::write_sized;
use simple_file_watch_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn real_builder(root: &std::path::Path, rules: ExclusionRules) -> SnapshotBuilder {
    SnapshotBuilder::new(Arc::new(RealFileSystem), root, &rules).unwrap()
}

#[test]
fn records_absolute_paths_and_byte_sizes() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_sized(dir.path().join("a.txt"), 10);
    write_sized(dir.path().join("sub/deeper/b.txt"), 5);
    std::fs::create_dir_all(dir.path().join("empty"))?;

    let builder = real_builder(dir.path(), ExclusionRules::default());
    let root = dir.path().to_path_buf();
    assert_eq!(builder.root(), root.as_path());

    let snap = builder.build()?;
    assert_eq!(snap.len(), 2);
    assert_eq!(snap.size_of(&root.join("a.txt")), Some(10));
    assert_eq!(snap.size_of(&root.join("sub/deeper/b.txt")), Some(5));
    assert!(snap.iter().all(|(p, _)| p.is_absolute()));

    Ok(())
}

#[test]
fn excluded_folder_and_file_names_never_appear() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_sized(dir.path().join("keep/a.txt"), 1);
    write_sized(dir.path().join("keep/.DS_Store"), 1);
    write_sized(dir.path().join("ignored/x.txt"), 1);
    write_sized(dir.path().join("ignored/nested/y.txt"), 1);
    // Same name deeper down is a different relative path.
    write_sized(dir.path().join("keep/ignored/z.txt"), 1);

    let rules = ExclusionRules::new(["ignored"], [".DS_Store"]);
    let snap = real_builder(dir.path(), rules).build()?;

    let root = dir.path();
    let mut paths: Vec<_> = snap
        .iter()
        .map(|(p, _)| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    paths.sort();
    assert_eq!(paths, vec!["keep/a.txt", "keep/ignored/z.txt"]);

    Ok(())
}

#[test]
fn excluded_folder_may_be_prefixed_with_the_watch_folder() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    write_sized(dir.path().join("build/out.o"), 1);
    write_sized(dir.path().join("src/main.c"), 1);

    let prefixed = format!("{}/build", dir.path().display());
    let rules = ExclusionRules::new([prefixed], Vec::<String>::new());
    let snap = real_builder(dir.path(), rules).build()?;

    assert_eq!(snap.len(), 1);
    assert!(snap.contains(&dir.path().join("src/main.c")));

    Ok(())
}

#[test]
fn missing_watch_folder_is_a_root_error() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let missing = dir.path().join("does-not-exist");
    let res = SnapshotBuilder::new(Arc::new(RealFileSystem), &missing, &ExclusionRules::default());

    match res {
        Err(WatchError::RootUnreadable { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected RootUnreadable, got {other:?}"),
    }

    Ok(())
}

#[test]
fn root_removed_after_startup_fails_the_scan() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let root = dir.path().join("w");
    write_sized(root.join("a.txt"), 1);

    let builder = real_builder(&root, ExclusionRules::default());
    std::fs::remove_dir_all(&root)?;

    assert!(matches!(builder.build(), Err(WatchError::RootUnreadable { .. })));

    Ok(())
}

#[cfg(unix)]
#[test]
fn symlinked_watch_folder_keeps_the_typed_path() -> TestResult {
    use std::os::unix::fs::symlink;

    init_tracing();

    let dir = tempdir()?;
    let target = dir.path().join("target");
    write_sized(target.join("a.txt"), 4);
    let link = dir.path().join("link");
    symlink(&target, &link)?;

    let rules = ExclusionRules::new([target.join("skip")], Vec::<String>::new());
    write_sized(target.join("skip/x.txt"), 1);

    let builder = real_builder(&link, rules);
    assert_eq!(builder.root(), link.as_path());
    assert_eq!(builder.rules().folders().collect::<Vec<_>>(), vec!["skip"]);

    let snap = builder.build()?;
    assert_eq!(snap.len(), 1);
    assert_eq!(snap.size_of(&link.join("a.txt")), Some(4));

    Ok(())
}

#[cfg(unix)]
#[test]
fn dangling_symlink_is_left_out_of_the_snapshot() -> TestResult {
    use std::os::unix::fs::symlink;

    init_tracing();

    let dir = tempdir()?;
    write_sized(dir.path().join("a.txt"), 2);
    symlink(dir.path().join("gone"), dir.path().join("dangling"))?;

    let snap = real_builder(dir.path(), ExclusionRules::default()).build()?;

    assert_eq!(snap.len(), 1);
    assert!(snap.contains(&dir.path().join("a.txt")));

    Ok(())
}
