// LogSift - GPL-3.0-or-later
// Build script to embed the git revision into `--version` output

use std::process::Command;

fn git_output(args: &[&str]) -> Option<Vec<u8>> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| output.stdout)
}

fn main() {
    let revision = git_output(&["rev-parse", "--short", "HEAD"])
        .and_then(|stdout| String::from_utf8(stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string());

    // Uncommitted changes mark the build as dirty
    let is_dirty = git_output(&["status", "--porcelain"]).is_some_and(|stdout| !stdout.is_empty());

    let revision = if is_dirty {
        format!("{revision}-dirty")
    } else {
        revision
    };

    println!("cargo:rustc-env=LOGSIFT_GIT_REVISION={revision}");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
}
