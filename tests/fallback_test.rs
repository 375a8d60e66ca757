use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let requests = common::csv_file(common::REQUEST_HEADER, &["1,single,,,,,"]);

    let mut cmd = Command::new(cargo_bin!("course-checkout"));
    cmd.arg("quote")
        .arg(requests.path())
        .arg("--db-path")
        .arg("some_db");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."))
        .stdout(predicate::str::contains("1,single,1,3000,0,3000,C26_1_"));
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let requests = common::csv_file(common::REQUEST_HEADER, &["1,single,,,,,"]);

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("course-checkout"));
    cmd.arg("quote")
        .arg(requests.path())
        .arg("--db-path")
        .arg(&db_path);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("WARNING").not());
}
