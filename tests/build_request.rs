use wasm_pack_watch::build::{BuildRequest, DEFAULT_ARGS, DEFAULT_PROGRAM};

#[test]
fn absent_command_uses_wasm_pack_dev_build() {
    let request = BuildRequest::from_command(None);

    assert_eq!(request.program, "wasm-pack");
    assert_eq!(request.args, vec!["build", "--dev"]);
    assert_eq!(request, BuildRequest::default());
    assert_eq!(DEFAULT_PROGRAM, "wasm-pack");
    assert_eq!(DEFAULT_ARGS, &["build", "--dev"]);
}

#[test]
fn first_token_is_the_executable() {
    let request = BuildRequest::from_command(Some("cargo check"));

    assert_eq!(request.program, "cargo");
    assert_eq!(request.args, vec!["check"]);
}

#[test]
fn single_token_has_no_args() {
    let request = BuildRequest::from_command(Some("make"));

    assert_eq!(request.program, "make");
    assert!(request.args.is_empty());
}

#[test]
fn runs_of_whitespace_do_not_produce_empty_args() {
    let request =
        BuildRequest::from_command(Some("  wasm-pack   build\t--release  --target web "));

    assert_eq!(request.program, "wasm-pack");
    assert_eq!(request.args, vec!["build", "--release", "--target", "web"]);
}

#[test]
fn blank_command_falls_back_to_default() {
    assert_eq!(BuildRequest::from_command(Some("")), BuildRequest::default());
    assert_eq!(BuildRequest::from_command(Some(" \t ")), BuildRequest::default());
}

#[test]
fn display_joins_program_and_args() {
    let request = BuildRequest::from_command(Some("cargo  build   --lib"));
    assert_eq!(request.to_string(), "cargo build --lib");
    assert_eq!(BuildRequest::default().to_string(), "wasm-pack build --dev");
}
