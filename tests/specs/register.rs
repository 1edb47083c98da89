use crate::prelude::*;

#[test]
fn register_fails_on_missing_info_file() {
    let dir = tempfile::tempdir().unwrap();
    Vigil::new(dir.path())
        .run(&["register", "does-not-exist.json"])
        .fails()
        .stderr_has("does-not-exist.json");
}

#[test]
fn register_fails_on_malformed_info_file() {
    let dir = tempfile::tempdir().unwrap();
    let info = dir.path().join("info.json");
    std::fs::write(&info, "{not json").unwrap();

    Vigil::new(dir.path())
        .run(&["register", info.to_str().unwrap()])
        .fails();
}

#[test]
fn unregister_fails_when_never_registered() {
    let dir = tempfile::tempdir().unwrap();
    Vigil::new(dir.path())
        .run(&["unregister"])
        .fails()
        .stderr_has("not registered");
}
