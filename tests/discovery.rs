// tests/discovery.rs

use std::path::{Path, PathBuf};

use simbatch::discovery::{discover_targets, is_testbench_makefile};
use simbatch::fs::RealFileSystem;
use simbatch::fs::mock::MockFileSystem;
use simbatch_test_utils::builders::{PLAIN_MAKEFILE, TESTBENCH_MAKEFILE, TestbenchTreeBuilder};
use simbatch_test_utils::init_tracing;

#[test]
fn marker_line_detection() {
    assert!(is_testbench_makefile(TESTBENCH_MAKEFILE));
    assert!(is_testbench_makefile("include viv_sim_preamble.mak\n"));
    assert!(is_testbench_makefile("-include $(TOOLS)/viv_sim_preamble.mak # sim\n"));
    assert!(!is_testbench_makefile(PLAIN_MAKEFILE));
    assert!(!is_testbench_makefile("# viv_sim_preamble.mak is not included here\n"));
    assert!(!is_testbench_makefile(""));
}

#[test]
fn finds_qualifying_directories_in_mock_tree() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/base/a/tb/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/b/tb/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/c/Makefile", PLAIN_MAKEFILE);
    fs.add_file("/base/d/makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/e/README", "include viv_sim_preamble.mak");

    let targets = discover_targets(&fs, Path::new("/base"));

    let names: Vec<_> = targets.keys().cloned().collect();
    assert_eq!(names, vec!["a/tb".to_string(), "b/tb".to_string()]);
    assert_eq!(targets["a/tb"], PathBuf::from("/base/a/tb"));
    assert_eq!(targets["b/tb"], PathBuf::from("/base/b/tb"));
}

#[test]
fn qualification_does_not_stop_descent() {
    let fs = MockFileSystem::new();
    fs.add_file("/base/outer/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/outer/inner/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/plain/nested/tb/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/plain/Makefile", PLAIN_MAKEFILE);

    let targets = discover_targets(&fs, Path::new("/base"));

    let names: Vec<_> = targets.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["outer", "outer/inner", "plain/nested/tb"]);
}

#[test]
fn base_directory_itself_can_qualify() {
    let fs = MockFileSystem::new();
    fs.add_file("/base/Makefile", TESTBENCH_MAKEFILE);

    let targets = discover_targets(&fs, Path::new("/base"));

    assert_eq!(targets.len(), 1);
    assert_eq!(targets["."], PathBuf::from("/base"));
}

#[test]
fn hidden_directories_inside_a_testbench_are_not_entered() {
    let fs = MockFileSystem::new();
    fs.add_file("/base/tb/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/tb/.Xil/copy/Makefile", TESTBENCH_MAKEFILE);

    let targets = discover_targets(&fs, Path::new("/base"));

    assert_eq!(targets.keys().collect::<Vec<_>>(), vec!["tb"]);
}

#[test]
fn testbenches_under_hidden_directories_are_found() {
    let fs = MockFileSystem::new();
    fs.add_file("/base/.ci/tb/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/a/tb/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/.cache/notes.txt", "nothing here");

    let targets = discover_targets(&fs, Path::new("/base"));

    let names: Vec<_> = targets.keys().map(String::as_str).collect();
    assert_eq!(names, vec![".ci/tb", "a/tb"]);
    assert_eq!(targets[".ci/tb"], PathBuf::from("/base/.ci/tb"));
}

#[test]
fn unreadable_entries_are_skipped() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/base/ok/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/locked/tb/Makefile", TESTBENCH_MAKEFILE);
    fs.add_file("/base/badfile/Makefile", TESTBENCH_MAKEFILE);
    fs.mark_unreadable("/base/locked");
    fs.mark_unreadable("/base/badfile/Makefile");

    let targets = discover_targets(&fs, Path::new("/base"));

    assert_eq!(targets.keys().collect::<Vec<_>>(), vec!["ok"]);
}

#[test]
fn missing_base_yields_empty_map() {
    let fs = MockFileSystem::new();
    assert!(discover_targets(&fs, Path::new("/nowhere")).is_empty());
}

#[test]
fn finds_testbenches_on_disk() -> anyhow::Result<()> {
    init_tracing();
    let tree = TestbenchTreeBuilder::new()?
        .testbench("a/tb")?
        .testbench("b/tb")?
        .testbench("lib/fifo/sim")?
        .plain("top/x300")?
        .build();

    let root = tree.canonical_root();
    let targets = discover_targets(&RealFileSystem, &root);

    let names: Vec<_> = targets.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["a/tb", "b/tb", "lib/fifo/sim"]);
    for (name, path) in &targets {
        assert!(path.is_absolute());
        assert_eq!(path, &root.join(name));
    }
    Ok(())
}
