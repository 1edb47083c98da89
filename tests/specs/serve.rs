use crate::prelude::*;

#[test]
fn serve_fails_fatally_without_device_identity() {
    let dir = tempfile::tempdir().unwrap();
    Vigil::new(dir.path())
        .run(&["serve"])
        .fails()
        .stderr_has("not registered");
}

#[test]
fn serve_creates_the_on_disk_layout_before_failing() {
    let dir = tempfile::tempdir().unwrap();
    Vigil::new(dir.path()).run(&["serve"]).fails();

    // <workDir>/data holds the store, <workDir>/job the work dirs.
    assert!(dir.path().join("data").join("meta.redb").exists());
    assert!(dir.path().join("job").is_dir());
    assert!(dir.path().join("vigil.lock").exists());
}
