//! Prompthancer CLI binary.
//!
//! Subcommands: `serve` (HTTP server), `enhance` (one prompt), `modify` (apply a change
//! request to an enhanced prompt).

mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cli::{run_enhance, run_modify, service_from_env, write_json_output, Output};
use prompthancer::ModifyInput;

#[derive(Parser, Debug)]
#[command(name = "prompthancer")]
#[command(about = "Prompthancer: enhance and modify prompts with a generative model")]
struct Args {
    #[command(subcommand)]
    cmd: Command,

    /// Print the record as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// When using --json, write output to this file instead of stdout
    #[arg(long, value_name = "PATH", global = true)]
    file: Option<PathBuf>,

    /// When using --json, pretty-print (multi-line)
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP server (POST /api/enhance, POST /api/modify, GET /health)
    Serve(ServeArgs),
    /// Enhance one prompt
    Enhance(EnhanceArgs),
    /// Apply a modification request to an enhanced prompt
    Modify(ModifyArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Listen address (default: SERVE_ADDR or 127.0.0.1:8080)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct EnhanceArgs {
    /// Prompt to enhance (or pass as positional words)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
struct ModifyArgs {
    /// The prompt as the user first wrote it
    #[arg(long, value_name = "TEXT")]
    original: String,
    /// The enhanced prompt to modify
    #[arg(long, value_name = "TEXT")]
    enhanced: String,
    /// What to change
    #[arg(long, value_name = "TEXT")]
    request: String,
}

/// Default max length for the echoed original prompt in text output. 0 means no truncation.
const DEFAULT_MAX_ECHO_LEN: usize = 200;

/// Reads max echo length from `PROMPTHANCER_MAX_ECHO_LEN`. Returns default on missing/invalid.
fn max_echo_len() -> usize {
    std::env::var("PROMPTHANCER_MAX_ECHO_LEN")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_ECHO_LEN)
}

fn enhance_text(args: EnhanceArgs) -> Option<String> {
    args.message
        .or_else(|| (!args.rest.is_empty()).then(|| args.rest.join(" ")))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Err(e) = config::load_and_apply("prompthancer", None) {
        eprintln!("prompthancer: config: {}", e);
    }
    let _log_guard = logging::init(matches!(args.cmd, Command::Serve(_)))?;

    let output = match args.cmd {
        Command::Serve(sa) => {
            if let Err(e) = serve::run_serve(sa.addr.as_deref()).await {
                eprintln!("serve error: {}", e);
                std::process::exit(1);
            }
            return Ok(());
        }
        Command::Enhance(ea) => {
            let Some(prompt) = enhance_text(ea) else {
                eprintln!("prompthancer: provide a prompt via -m/--message or positional args");
                std::process::exit(2);
            };
            let service = service_from_env()?;
            run_enhance(&service, prompt).await
        }
        Command::Modify(ma) => {
            let service = service_from_env()?;
            run_modify(&service, ModifyInput::new(ma.original, ma.enhanced, ma.request)).await
        }
    };

    print_output(&output, args.json, args.file.as_deref(), args.pretty)?;
    if output.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_output(
    output: &Output,
    json: bool,
    file: Option<&std::path::Path>,
    pretty: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        return write_json_output(&output.to_json()?, file, pretty);
    }
    let text = output.render(max_echo_len());
    if output.is_error() {
        eprintln!("{}", text);
    } else {
        println!("{}", text);
    }
    Ok(())
}
