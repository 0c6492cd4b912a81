//! Integration tests for the aur-cli binary.

use std::fs;
use std::process::{Command, Output};

use flate2::Compression;
use flate2::write::GzEncoder;
use mockito::{Matcher, Server, ServerGuard};
use tempfile::TempDir;

const YAY: &str = r#"{"version":5,"type":"multiinfo","resultcount":1,"results":[{"ID":1,"Name":"yay","PackageBase":"yay","Version":"12.4.2-1","Description":"Yet another yogurt","NumVotes":2143,"Maintainer":"jguer","URLPath":"/cgit/aur.git/snapshot/yay.tar.gz","Depends":["pacman","git"],"License":["GPL-3.0-or-later"]}]}"#;

/// Test context pointing the binary at a local mock server
struct TestContext {
    server: ServerGuard,
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            server: Server::new(),
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn aur_cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_aur"));
        cmd.env_remove("AUR_RPC_VERSION")
            .env("NO_COLOR", "1")
            .env("AUR_DOMAIN", self.server.host_with_port())
            .env("AUR_INSECURE", "1")
            .current_dir(self.temp_dir.path());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.aur_cmd().args(args).output().expect("failed to run aur")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn snapshot_tarball() -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let data = b"pkgname=yay\npkgver=12.4.2\n";
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "yay/PKGBUILD", &data[..])
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap()
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Usage:"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    let output = ctx.run(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("aur"));
}

#[test]
fn test_action_requires_terms() {
    let ctx = TestContext::new();
    let output = ctx.run(&["info"]);
    assert!(!output.status.success());
}

#[test]
fn test_multiinfo_prints_package() {
    let mut ctx = TestContext::new();
    let mock = ctx
        .server
        .mock("GET", "/rpc.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("v".into(), "5".into()),
            Matcher::UrlEncoded("type".into(), "multiinfo".into()),
            Matcher::UrlEncoded("arg[]".into(), "yay".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(YAY)
        .create();

    let output = ctx.run(&["multiinfo", "yay"]);
    mock.assert();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("yay"));
    assert!(out.contains("12.4.2-1"));
    assert!(out.contains("pacman  git"));
    assert!(out.contains("jguer"));
}

#[test]
fn test_custom_format() {
    let mut ctx = TestContext::new();
    let _mock = ctx
        .server
        .mock("GET", "/rpc.php")
        .match_query(Matcher::UrlEncoded("type".into(), "search".into()))
        .with_status(200)
        .with_body(YAY)
        .create();

    let output = ctx.run(&["--format", "%n|%v|%o|%D\\n", "search", "yogurt"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "yay|12.4.2-1|2143|pacman git\n");
}

#[test]
fn test_info_one_request_per_term() {
    let mut ctx = TestContext::new();
    let mock = ctx
        .server
        .mock("GET", "/rpc.php")
        .match_query(Matcher::UrlEncoded("type".into(), "info".into()))
        .with_status(200)
        .with_body(YAY)
        .expect(2)
        .create();

    let output = ctx.run(&["--format", "%n\\n", "info", "yay", "yay-bin"]);
    mock.assert();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "yay\nyay\n");
}

#[test]
fn test_bad_json_is_reported_and_run_continues() {
    let mut ctx = TestContext::new();
    let _mock = ctx
        .server
        .mock("GET", "/rpc.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>oops</html>")
        .create();

    let output = ctx.run(&["search", "yay"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("failed to decode"));
}

#[test]
fn test_no_results() {
    let mut ctx = TestContext::new();
    let _mock = ctx
        .server
        .mock("GET", "/rpc.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"version":5,"type":"search","resultcount":0,"results":[]}"#)
        .create();

    let output = ctx.run(&["search", "nothing-matches"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("no results for nothing-matches"));
}

#[test]
fn test_download_extracts_snapshot() {
    let mut ctx = TestContext::new();
    let _lookup = ctx
        .server
        .mock("GET", "/rpc.php")
        .match_query(Matcher::UrlEncoded("type".into(), "multiinfo".into()))
        .with_status(200)
        .with_body(YAY)
        .create();
    let tarball = ctx
        .server
        .mock("GET", "/cgit/aur.git/snapshot/yay.tar.gz")
        .with_status(200)
        .with_header("content-type", "application/x-gzip")
        .with_body(snapshot_tarball())
        .create();

    let dest = ctx.temp_dir.path().join("build");
    let output = ctx.run(&["download", "yay", "--dest", dest.to_str().unwrap()]);
    tarball.assert();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        fs::read_to_string(dest.join("yay/PKGBUILD")).unwrap(),
        "pkgname=yay\npkgver=12.4.2\n"
    );
}

#[test]
fn test_download_aborts_on_bad_tarball() {
    let mut ctx = TestContext::new();
    let _lookup = ctx
        .server
        .mock("GET", "/rpc.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(YAY)
        .create();
    let _tarball = ctx
        .server
        .mock("GET", "/cgit/aur.git/snapshot/yay.tar.gz")
        .with_status(200)
        .with_body("not a tarball")
        .create();

    let output = ctx.run(&["download", "yay"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to extract yay"));
}
