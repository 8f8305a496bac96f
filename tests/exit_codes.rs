use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

fn mounttool(args: &[&str], env: &[(&str, &std::ffi::OsStr)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mounttool"));
    cmd.args(args)
        .env("MOUNTTOOL_DIALOG", "terminal")
        .env_remove("RUST_LOG")
        .stdin(std::process::Stdio::null());
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().unwrap()
}

fn script(dir: &Path, name: &str, body: &str) -> std::ffi::OsString {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.into_os_string()
}

#[test]
fn wrong_arity_prints_usage_and_fails() {
    for args in [
        &[][..],
        &["/enc"][..],
        &["-o", "/enc"][..],
        &["-i", "5", "/a", "/b", "/c"][..],
        &["-z", "/a", "/b"][..],
    ] {
        let out = mounttool(args, &[]);
        assert_eq!(out.status.code(), Some(1), "{args:?}");
        let stdout = String::from_utf8_lossy(&out.stdout);
        assert!(stdout.starts_with("usage: mounttool"), "{args:?}: {stdout}");
    }
}

#[test]
fn help_exits_zero() {
    let out = mounttool(&["--help"], &[]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn missing_tool_fails() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("plain");
    let out = mounttool(
        &["/", target.to_str().unwrap()],
        &[("MOUNTTOOL_CRYPT", std::ffi::OsStr::new("no-such-crypt-tool-installed"))],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("no-such-crypt-tool-installed"));
    assert!(!target.exists());
}

#[test]
fn invalid_source_fails_without_mounting() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("mount-called");
    let crypt = script(
        dir.path(),
        "crypt",
        &format!(
            "[ \"$1\" = -info ] && {{ echo \"Cannot open gocryptfs.conf\"; exit 23; }}\ntouch {}",
            marker.display()
        ),
    );
    let source = dir.path().join("cipher");
    let target = dir.path().join("plain");
    let out = mounttool(
        &[source.to_str().unwrap(), target.to_str().unwrap()],
        &[("MOUNTTOOL_CRYPT", crypt.as_os_str())],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(!marker.exists());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Cannot open gocryptfs.conf"));
}

#[test]
fn cancelled_password_exits_zero_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let crypt = script(dir.path(), "crypt", "exit 0");
    let source = dir.path().join("cipher");
    std::fs::create_dir(&source).unwrap();
    let target = dir.path().join("plain");
    // stdin is /dev/null, so the terminal prompt sees EOF straight away.
    let out = mounttool(
        &["-o", source.to_str().unwrap(), target.to_str().unwrap()],
        &[("MOUNTTOOL_CRYPT", crypt.as_os_str())],
    );
    assert_eq!(out.status.code(), Some(0));
    assert!(!target.exists());
}
