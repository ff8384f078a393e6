//! Embeds the string printed by `docimg --version` as `DOCIMG_VERSION`.
//!
//! A build of a tagged commit reports the crate version. Anything else reports
//! `dev@<short hash>`, or `dev@unknown` outside a git checkout.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let on_release_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();
    let version = if on_release_tag {
        std::env::var("CARGO_PKG_VERSION").unwrap_or_default()
    } else {
        match git(&["rev-parse", "--short", "HEAD"]) {
            Some(hash) if !hash.is_empty() => format!("dev@{hash}"),
            _ => "dev@unknown".to_string(),
        }
    };

    println!("cargo:rustc-env=DOCIMG_VERSION={version}");
}
