mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jsxc_codegen::Options;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(name = "jsxc")]
#[command(about = "jsxc — JSX to JavaScript compiler")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile .jsx files to JavaScript
    Build {
        /// Input file or directory
        path: PathBuf,

        /// Output directory (defaults to alongside each input)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Factory invoked per element
        #[arg(long)]
        pragma: Option<String>,

        /// Name used for fragment elements
        #[arg(long)]
        pragma_frag: Option<String>,

        /// Do not prepend "use strict" to the output
        #[arg(long)]
        no_use_strict: bool,

        /// Bound on recursive element tokenization
        #[arg(long)]
        max_recursive_calls: Option<usize>,
    },

    /// Check .jsx files for errors without generating output
    Check {
        /// Input file or directory
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Build {
            path,
            out,
            pragma,
            pragma_frag,
            no_use_strict,
            max_recursive_calls,
        } => {
            let mut options = Options::default();
            if let Some(pragma) = pragma {
                options.pragma = pragma;
            }
            if let Some(pragma_frag) = pragma_frag {
                options.pragma_frag = pragma_frag;
            }
            if no_use_strict {
                options.add_use_strict = false;
            }
            if let Some(limit) = max_recursive_calls {
                options.max_recursive_calls = limit;
            }
            build(&path, out.as_deref(), &options)
        }
        Command::Check { path } => check(&path),
    }
}

fn build(path: &Path, out_dir: Option<&Path>, options: &Options) -> Result<()> {
    let inputs = collect_inputs(path)?;
    if inputs.is_empty() {
        bail!("no .jsx files found under {}", path.display());
    }

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
    }

    for input in &inputs {
        let source = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let js = jsxc_codegen::compile(&source, options)
            .with_context(|| format!("failed to compile {}", input.display()))?;

        let target = output_path(input, out_dir);
        fs::write(&target, js)
            .with_context(|| format!("failed to write {}", target.display()))?;
        info!("compiled {} -> {}", input.display(), target.display());
    }

    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let inputs = collect_inputs(path)?;
    if inputs.is_empty() {
        bail!("no .jsx files found under {}", path.display());
    }

    let mut failures = 0usize;
    for input in &inputs {
        let source = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        match jsxc_codegen::compile(&source, &Options::default()) {
            Ok(_) => debug!("ok: {}", input.display()),
            Err(e) => {
                error!("{}: {e}", input.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} file(s) failed to compile", inputs.len());
    }
    info!("{} file(s) ok", inputs.len());
    Ok(())
}

/// A single file is taken as-is; a directory is walked recursively for
/// `.jsx` files.
fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    let meta = fs::metadata(path)
        .with_context(|| format!("cannot access {}", path.display()))?;
    if meta.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    walk(path, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "jsx") {
            files.push(path);
        }
    }
    Ok(())
}

fn output_path(input: &Path, out_dir: Option<&Path>) -> PathBuf {
    let mut target = input.with_extension("js");
    if let Some(dir) = out_dir {
        if let Some(name) = target.file_name() {
            target = dir.join(name);
        }
    }
    target
}
