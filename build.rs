use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    println!("cargo:rerun-if-env-changed=PKGCOPY_RUN_CROSS_WINDOWS_TESTS");
    println!("cargo::rustc-check-cfg=cfg(pkgcopy_skip_cross_windows_tests)");

    if skip_cross_windows_tests() {
        println!("cargo:rustc-cfg=pkgcopy_skip_cross_windows_tests");
    }

    let version = git_version().unwrap_or_else(|| format!("0.0.0-dev-{}", timestamp()));
    println!("cargo:rustc-env=PKGCOPY_VERSION={}", version);
}

/// Symlink tests need a real Windows host, not just a Windows target.
fn skip_cross_windows_tests() -> bool {
    let host = std::env::var("HOST").unwrap_or_default();
    let target = std::env::var("TARGET").unwrap_or_default();
    std::env::var_os("PKGCOPY_RUN_CROSS_WINDOWS_TESTS").is_none()
        && target.contains("windows")
        && !host.contains("windows")
}

/// `git describe` without the leading `v`; dirty trees get a timestamp suffix.
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    let described = described.trim();
    let version = described.strip_prefix('v').unwrap_or(described);
    match version {
        "" => None,
        v if v.ends_with("-dirty") => Some(format!("{}-{}", v, timestamp())),
        v => Some(v.to_string()),
    }
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
