use std::process::Command;

/// Exposes the short commit hash as `BUILD_HASH`, reported by the home endpoint.
fn main() {
    let build_hash = std::env::var("BUILD_HASH").ok().or_else(|| {
        Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
    });

    println!(
        "cargo:rustc-env=BUILD_HASH={}",
        build_hash.unwrap_or_else(|| "unknown".to_string())
    );
    println!("cargo:rerun-if-env-changed=BUILD_HASH");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
