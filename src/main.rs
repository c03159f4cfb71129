// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! cspforge CLI - Build-Time CSP and SRI Synthesis
//!
//! Drives the library over an already-emitted build directory: digests the
//! bundled assets, scans and rewrites index.html, and injects the policy.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};

use cspforge::{
    default_policy, digest_bytes, inject_meta, integrity_value, synthesize, BundleAsset,
    BundleContext, HashAlgorithm, HashCollection, HtmlProcessor, Policy,
};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cspforge=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    match args[1].as_str() {
        "inject" => {
            if args.len() < 3 {
                eprintln!("Usage: cspforge inject <dist-dir> [--algorithm <alg>] [--policy <file>] [--dry-run]");
                return ExitCode::from(1);
            }
            run(inject_command(&args[2], &args[3..]))
        }
        "policy" => run(policy_command(&args[2..])),
        "hash" => {
            if args.len() < 3 {
                eprintln!("Usage: cspforge hash <file> [--algorithm <alg>]");
                return ExitCode::from(1);
            }
            run(hash_command(&args[2], &args[3..]))
        }
        "--help" | "-h" | "help" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "--version" | "-v" | "version" => {
            println!("cspforge {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            ExitCode::from(1)
        }
    }
}

fn run(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"cspforge - Build-Time CSP and SRI Synthesis for Web Bundles

USAGE:
    cspforge <COMMAND> [OPTIONS]

COMMANDS:
    inject <dist-dir>   Hash bundled assets, rewrite index.html with SRI
                        attributes, and inject the CSP meta tag
    policy              Print the merged policy for the given options
    hash <file>         Print one integrity token for a file
    help                Show this help message
    version             Show version information

OPTIONS:
    --algorithm <alg>   sha256 (default), sha384 or sha512
    --policy <file>     JSON file with per-directive overrides
    --dry-run           Print the rewritten document instead of saving it

EXAMPLES:
    cspforge inject ./dist
    cspforge inject ./dist --algorithm sha384 --policy csp.json
    cspforge hash ./dist/assets/index-B2Yg7jM0.js

For more information, see: https://github.com/bountyyfi/cspforge
"#
    );
}

/// Shared flag parsing for all commands
#[derive(Debug)]
struct CommonFlags {
    algorithm: HashAlgorithm,
    policy_file: Option<PathBuf>,
    dry_run: bool,
}

fn parse_flags(args: &[String]) -> anyhow::Result<CommonFlags> {
    let mut flags = CommonFlags {
        algorithm: HashAlgorithm::Sha256,
        policy_file: None,
        dry_run: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--algorithm" => {
                let value = iter.next().context("--algorithm requires a value")?;
                flags.algorithm = HashAlgorithm::parse(value)
                    .with_context(|| format!("unknown algorithm '{}'", value))?;
            }
            "--policy" => {
                let value = iter.next().context("--policy requires a file path")?;
                flags.policy_file = Some(PathBuf::from(value));
            }
            "--dry-run" => flags.dry_run = true,
            other => bail!("unknown option '{}'", other),
        }
    }

    Ok(flags)
}

fn load_draft_policy(policy_file: Option<&Path>) -> anyhow::Result<Policy> {
    match policy_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading policy file {}", path.display()))?;
            let overrides: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
                .with_context(|| format!("parsing policy file {}", path.display()))?;
            Ok(Policy::merge(&default_policy(), &Policy::from_map(&overrides)))
        }
        None => Ok(default_policy()),
    }
}

fn inject_command(dist: &str, args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args)?;
    let dist = Path::new(dist);
    let index_path = dist.join("index.html");

    let html = std::fs::read_to_string(&index_path)
        .with_context(|| format!("reading {}", index_path.display()))?;

    let bundle = collect_bundle(dist, flags.algorithm)?;
    println!("Hashed {} bundled assets", bundle.len());

    let draft = load_draft_policy(flags.policy_file.as_deref())?;
    let collection = HashCollection::new();

    let processor = HtmlProcessor::new(flags.algorithm, &draft, &collection, Some(&bundle));
    let report = processor
        .process(&html)
        .context("scanning index.html")?;

    for warning in &report.warnings {
        println!("[warning] {}", warning);
    }

    let synthesis = synthesize(&draft, &collection);
    let output = inject_meta(&report.html, &synthesis.header_value)
        .context("injecting policy meta tag")?;

    println!("Policy: {}", synthesis.header_value);

    if flags.dry_run {
        println!("\n{}", output);
    } else {
        std::fs::write(&index_path, output)
            .with_context(|| format!("writing {}", index_path.display()))?;
        println!("Rewrote {}", index_path.display());
    }

    Ok(())
}

fn policy_command(args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args)?;
    let draft = load_draft_policy(flags.policy_file.as_deref())?;
    println!("{}", draft.serialize());
    Ok(())
}

fn hash_command(file: &str, args: &[String]) -> anyhow::Result<()> {
    let flags = parse_flags(args)?;
    let content =
        std::fs::read(file).with_context(|| format!("reading {}", file))?;
    let digest = digest_bytes(&content, flags.algorithm);
    println!("{}", integrity_value(flags.algorithm, &digest));
    Ok(())
}

/// Digest every emitted script/stylesheet under the dist dir, keyed by
/// root-relative path
fn collect_bundle(dist: &Path, algorithm: HashAlgorithm) -> anyhow::Result<BundleContext> {
    let mut bundle = BundleContext::new();
    let mut pending = vec![dist.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("listing {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
                continue;
            }

            let is_asset = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("js") | Some("mjs") | Some("css")
            );
            if !is_asset {
                continue;
            }

            let content = std::fs::read(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let relative = path
                .strip_prefix(dist)
                .expect("asset path is under the dist dir");
            let key = format!("/{}", relative.display().to_string().replace('\\', "/"));

            bundle.insert(
                key,
                BundleAsset {
                    digest: digest_bytes(&content, algorithm),
                    algorithm,
                },
            );
        }
    }

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_collect_bundle_keys_are_root_relative() {
        let dist = tempfile::tempdir().unwrap();
        write(dist.path(), "assets/index-abc.js", "console.log(1)");
        write(dist.path(), "assets/index-abc.css", "body{}");
        write(dist.path(), "favicon.svg", "<svg/>");

        let bundle = collect_bundle(dist.path(), HashAlgorithm::Sha256).unwrap();
        assert_eq!(bundle.len(), 2);
        assert!(bundle.contains_key("/assets/index-abc.js"));
        assert!(bundle.contains_key("/assets/index-abc.css"));
    }

    #[test]
    fn test_inject_command_rewrites_index() {
        let dist = tempfile::tempdir().unwrap();
        write(dist.path(), "assets/app.js", "console.log(1)");
        write(
            dist.path(),
            "index.html",
            r#"<html><head></head><body><script src="/assets/app.js"></script><script>alert(1)</script></body></html>"#,
        );

        inject_command(dist.path().to_str().unwrap(), &[]).unwrap();

        let rewritten = std::fs::read_to_string(dist.path().join("index.html")).unwrap();
        assert!(rewritten.contains("Content-Security-Policy"));
        assert!(rewritten.contains("integrity=\"sha256-"));
        assert!(rewritten.contains("script-src-elem"));
    }

    #[test]
    fn test_dry_run_leaves_index_untouched() {
        let dist = tempfile::tempdir().unwrap();
        let original = "<html><head></head><body></body></html>";
        write(dist.path(), "index.html", original);

        inject_command(
            dist.path().to_str().unwrap(),
            &["--dry-run".to_string()],
        )
        .unwrap();

        let on_disk = std::fs::read_to_string(dist.path().join("index.html")).unwrap();
        assert_eq!(on_disk, original);
    }

    #[test]
    fn test_parse_flags_rejects_unknown_algorithm() {
        let err = parse_flags(&["--algorithm".to_string(), "md5".to_string()]).unwrap_err();
        assert!(err.to_string().contains("md5"));
    }
}
