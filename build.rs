//! Build script: embeds the crate version from the environment or git.

use std::process::Command;

fn main() {
    // Prefer UTIL_CONFIG_VERSION if set by the release workflow, otherwise
    // fall back to git describe for local builds.
    if let Ok(version) = std::env::var("UTIL_CONFIG_VERSION") {
        println!("cargo:rustc-env=UTIL_CONFIG_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=UTIL_CONFIG_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=UTIL_CONFIG_VERSION");
}
