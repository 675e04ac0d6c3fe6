//! Stamps the binary with the commit, build date and target triple

use std::process::Command;

fn git_short_sha() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    let sha = String::from_utf8(output.stdout).ok()?;
    let sha = sha.trim();
    (output.status.success() && !sha.is_empty()).then(|| sha.to_string())
}

fn main() {
    let today = chrono::Utc::now().date_naive();
    println!("cargo:rustc-env=BUILD_DATE={}", today.format("%Y-%m-%d"));

    if let Some(sha) = git_short_sha() {
        println!("cargo:rustc-env=GIT_SHA={}", sha);
    }
    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=TARGET={}", target);
    }

    // the workspace root holds .git; this crate sits two levels below it
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}
