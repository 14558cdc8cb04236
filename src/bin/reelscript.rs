use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "reelscript", version)]
struct Cli {
    /// Log pipeline progress to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a script and print a one-line summary per scene.
    Check(CheckArgs),
    /// Compile a script into timed actions and per-frame curves (JSON).
    Compile(CompileArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input movie script.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct CompileArgs {
    /// Input movie script.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Frame rate override, `N` or `NUM/DEN`.
    #[arg(long)]
    fps: Option<String>,

    /// Worker threads for per-scene compilation.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Compile(args) => cmd_compile(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_script(path: &Path) -> anyhow::Result<reelscript::Script> {
    reelscript::Script::from_path(path)
        .with_context(|| format!("parse script '{}'", path.display()))
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let compiled = reelscript::compile_script(script, &reelscript::CompileOptions::default())?;
    for scene in &compiled.scenes {
        println!(
            "scene '{}': {} actions, {} frames",
            scene.name,
            scene.actions.len(),
            scene.total_frames
        );
    }
    println!(
        "ok: '{}' at {} fps, {} frames",
        compiled.name, compiled.fps, compiled.movie_frames
    );
    Ok(())
}

fn cmd_compile(args: CompileArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let fps = args
        .fps
        .as_deref()
        .map(reelscript::Fps::parse)
        .transpose()
        .context("parse --fps")?;
    let opts = reelscript::CompileOptions {
        fps,
        threads: args.threads,
    };
    let compiled = reelscript::compile_script(script, &opts)?;

    match &args.out {
        Some(out) => {
            let f = File::create(out).with_context(|| format!("create '{}'", out.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &compiled).context("write compiled JSON")?;
            w.flush().context("flush compiled JSON")?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, &compiled).context("write compiled JSON")?;
            writeln!(w)?;
        }
    }
    Ok(())
}
