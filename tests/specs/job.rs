use crate::prelude::*;

#[test]
fn add_list_delete_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let vigil = Vigil::new(dir.path());

    let spec_path = dir.path().join("job.json");
    std::fs::write(&spec_path, detect_spec_json("7f1c3a9e-j1")).unwrap();

    vigil
        .run(&["job", "add", spec_path.to_str().unwrap()])
        .passes()
        .stdout_has("added job 7f1c3a9e-j1")
        .stdout_has("detect");

    vigil
        .run(&["job", "list"])
        .passes()
        .stdout_has("7f1c3a9e-j1")
        .stdout_has("detect")
        .stdout_has("2024-01-01");

    vigil
        .run(&["job", "delete", "7f1c3a9e-j1"])
        .passes()
        .stdout_has("deleted job 7f1c3a9e-j1");

    vigil
        .run(&["job", "list"])
        .passes()
        .stdout_has("no jobs")
        .stdout_lacks("7f1c3a9e-j1");
}

#[test]
fn add_rejects_mismatched_option_block() {
    let dir = tempfile::tempdir().unwrap();
    let vigil = Vigil::new(dir.path());

    let spec_path = dir.path().join("job.json");
    std::fs::write(&spec_path, mismatched_spec_json("bad-1")).unwrap();

    vigil
        .run(&["job", "add", spec_path.to_str().unwrap()])
        .fails()
        .stderr_has("option block");
}

#[test]
fn add_rejects_unreadable_spec_file() {
    let dir = tempfile::tempdir().unwrap();
    Vigil::new(dir.path())
        .run(&["job", "add", "does-not-exist.json"])
        .fails();
}

#[test]
fn delete_unknown_job_fails() {
    let dir = tempfile::tempdir().unwrap();
    Vigil::new(dir.path())
        .run(&["job", "delete", "missing-uuid"])
        .fails()
        .stderr_has("not found");
}

#[test]
fn add_updates_existing_job_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let vigil = Vigil::new(dir.path());

    let spec_path = dir.path().join("job.json");
    std::fs::write(&spec_path, detect_spec_json("j1")).unwrap();
    vigil.run(&["job", "add", spec_path.to_str().unwrap()]).passes();
    vigil.run(&["job", "add", spec_path.to_str().unwrap()]).passes();

    let listed = Vigil::new(dir.path()).run(&["job", "list"]).passes();
    let stdout = listed.stdout();
    assert_eq!(stdout.matches("j1").count(), 1, "stdout: {stdout}");
}
