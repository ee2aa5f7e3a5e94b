use clap::CommandFactory;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[allow(dead_code)]
#[path = "src/cli/args.rs"]
mod args;

use args::Cli;

const BIN_NAME: &str = "abi-wallet";

fn main() {
    emit_build_metadata();

    // Man pages are a convenience for packagers and never fail the build
    let man_dir = man_dir();
    if let Err(err) = write_man_pages(&man_dir) {
        println!(
            "cargo:warning=Skipping {} man pages in {}: {}",
            BIN_NAME,
            man_dir.display(),
            err
        );
    }

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/cli/args.rs");
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
    }
}

/// `GIT_HASH` and `RUSTC_VERSION` are shown in the REPL banner
fn emit_build_metadata() {
    let git_hash = command_stdout("git", &["rev-parse", "--short", "HEAD"])
        .unwrap_or_else(|| "unknown".to_string());
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let rustc_version =
        command_stdout(&rustc, &["--version"]).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=RUSTC_VERSION={}", rustc_version);
}

fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn man_dir() -> PathBuf {
    let out_dir = env::var("OUT_DIR").unwrap_or_else(|_| "target".to_string());
    Path::new(&out_dir).join("man").join("man1")
}

/// One page for the binary and one `abi-wallet-<sub>.1` page per visible subcommand
fn write_man_pages(dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;

    let cmd = Cli::command().name(BIN_NAME).bin_name(BIN_NAME);
    write_page(&cmd, dir, BIN_NAME)?;

    for sub in cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
        let page = format!("{}-{}", BIN_NAME, sub.get_name());
        let sub = sub.clone().name(page.clone());
        write_page(&sub, dir, &page)?;
    }

    Ok(())
}

fn write_page(cmd: &clap::Command, dir: &Path, page: &str) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    fs::write(dir.join(format!("{}.1", page)), buffer)
}
