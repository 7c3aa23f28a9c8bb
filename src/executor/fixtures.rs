//! Fake test executables for unit tests

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `name` into `dir`
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Script that lists `t1` and `t2`; `t1` passes with stderr `ok`, `t2` fails with `fail`
pub fn two_case_script() -> &'static str {
    r#"case "$1" in
  --list_tests) echo t1; echo; echo t2 ;;
  --filter=t1) printf ok >&2; exit 0 ;;
  --filter=t2) printf fail >&2; exit 1 ;;
  *) exit 64 ;;
esac"#
}
