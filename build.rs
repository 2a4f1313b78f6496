use std::process::Command;

fn git(args: &[&str]) -> Option<std::process::Output> {
    Command::new("git").args(args).output().ok()
}

fn git_describe() -> String {
    match git(&["rev-parse", "--short", "HEAD"]) {
        Some(o) if o.status.success() => {
            let hash = String::from_utf8_lossy(&o.stdout).trim().to_string();
            let dirty = git(&["diff", "--quiet"]).is_some_and(|o| !o.status.success());
            if dirty { format!("{}-dirty", hash) } else { hash }
        }
        _ => "unknown".to_string(),
    }
}

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", git_describe());
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads");
}
