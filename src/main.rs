use clap::{ArgAction, Parser};
use railview::dom::Document;
use railview::options::OptionToggle;
use railview::ready;
use railview::{CommandRenderer, Config, Page};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Decorate macro source blocks in a document with interactive railroad diagrams
#[derive(Parser, Debug)]
#[command(name = "railview")]
#[command(version)]
#[command(about = "Add railroad-diagram views to the macro blocks of a document", long_about = None)]
struct Args {
    /// Input document (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (use "-" for stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Diagram generator program; reads the macro source on stdin
    #[arg(short, long, value_name = "PROGRAM")]
    renderer: String,

    /// Extra argument passed to the generator before the option flags
    #[arg(long = "renderer-arg", value_name = "ARG", allow_hyphen_values = true)]
    renderer_args: Vec<String>,

    /// Path to a config file (TOML or YAML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Toggle an option on an instance, e.g. `0:show_legend=false` (repeatable)
    #[arg(long = "set", value_name = "INDEX:OPTION=BOOL")]
    toggles: Vec<OptionToggle>,

    /// Open the modal of the given instance
    #[arg(long, value_name = "INDEX")]
    open_modal: Option<usize>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: &Path) -> Result<String, String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read input file: {}", e))
    }
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
        None => Config::default(),
    };

    let markup = read_input(&args.input)?;
    let document =
        Document::parse(&markup).map_err(|e| format!("Failed to parse input document: {}", e))?;

    let (signal, readiness) = ready::channel();
    signal.fire(CommandRenderer::new(args.renderer, args.renderer_args));

    let mut page = futures::executor::block_on(Page::load(document, &config, readiness))
        .map_err(|e| e.to_string())?;
    eprintln!("Decorated {} macro block(s)", page.instances().len());

    for toggle in &args.toggles {
        page.set_option(toggle.instance, toggle.key, toggle.value)
            .map_err(|e| e.to_string())?;
    }
    if let Some(index) = args.open_modal {
        page.open_modal(index).map_err(|e| e.to_string())?;
    }

    let output = page.to_markup();
    if args.output.to_str() == Some("-") {
        print!("{}", output);
    } else {
        std::fs::write(&args.output, output)
            .map_err(|e| format!("Failed to write output: {}", e))?;
        eprintln!("Document saved to: {}", args.output.display());
    }

    Ok(())
}
