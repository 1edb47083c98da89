use crate::prelude::*;

#[test]
fn help_lists_subcommands() {
    let dir = tempfile::tempdir().unwrap();
    Vigil::new(dir.path())
        .run(&["--help"])
        .passes()
        .stdout_has("serve")
        .stdout_has("register")
        .stdout_has("job");
}

#[test]
fn unknown_subcommand_fails() {
    let dir = tempfile::tempdir().unwrap();
    Vigil::new(dir.path()).run(&["frobnicate"]).fails();
}
