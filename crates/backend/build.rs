//! Кладёт config.toml из корня workspace рядом с бинарником
//! (target/debug или target/release), где его ищет `shared::config`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn target_profile_dir() -> Option<PathBuf> {
    let out_dir = env::var("OUT_DIR").ok()?;
    let profile = env::var("PROFILE").ok()?;
    Path::new(&out_dir)
        .ancestors()
        .find(|p| p.ends_with(&profile))
        .map(Path::to_path_buf)
}

fn main() {
    println!("cargo:rerun-if-changed=../../config.toml");

    let Some(workspace_root) = Path::new(env!("CARGO_MANIFEST_DIR")).ancestors().nth(2) else {
        return;
    };
    let source = workspace_root.join("config.toml");
    if !source.exists() {
        println!("cargo:warning=config.toml not found, embedded defaults will be used");
        return;
    }

    match target_profile_dir() {
        Some(dir) => {
            if let Err(e) = fs::copy(&source, dir.join("config.toml")) {
                println!("cargo:warning=config.toml not copied: {}", e);
            }
        }
        None => println!("cargo:warning=target profile directory not found"),
    }
}
