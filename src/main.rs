//! Temple CLI
//!
//! Usage:
//!   temple [OPTIONS] --template <ID> <TEMPLATES>
//!
//! Options:
//!   -t, --template <ID>    Id of the template to render
//!   -d, --data <FILE>      Data file, JSON or TOML (reads stdin if not provided)
//!   -c, --config <FILE>    Binding attribute configuration (TOML format)
//!       --pretty           Indent the rendered HTML
//!   -v, --verbose          Log engine activity to stderr (repeat for more)
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use temple::{
    render_html, HtmlConfig, TemplateEngine, TemplateError, TemplateRegistry, TempleConfig, Value,
};

#[derive(Parser)]
#[command(name = "temple")]
#[command(about = "Render HTML templates annotated with data bindings")]
struct Cli {
    /// Markup file containing <template id="..."> elements
    templates: PathBuf,

    /// Id of the template to render
    #[arg(short, long)]
    template: String,

    /// Data file; `.toml` files are read as TOML, anything else as JSON
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Binding attribute configuration (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Indent the rendered HTML
    #[arg(long)]
    pretty: bool,

    /// Log engine activity to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => match TempleConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => fail(&format!("Error loading config '{}': {}", path.display(), e)),
        },
        None => TempleConfig::default(),
    };

    let registry = load_templates(&cli.templates);
    debug!(count = registry.len(), "templates loaded");

    let data = match &cli.data {
        Some(path) => match Value::from_file(path) {
            Ok(v) => v,
            Err(e) => fail(&format!("Error loading data '{}': {}", path.display(), e)),
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                fail(&format!("Error reading from stdin: {}", e));
            }
            match Value::from_json(&buffer) {
                Ok(v) => v,
                Err(e) => fail(&format!("Error parsing data from stdin: {}", e)),
            }
        }
    };

    let mut engine = match TemplateEngine::new(&registry, &cli.template) {
        Ok(engine) => engine.with_config(config),
        Err(e) => fail(&format!("Error: {}", e)),
    };

    match engine.render(&data) {
        Ok(output) => {
            let html_config = HtmlConfig::new()
                .with_pretty_print(cli.pretty)
                .with_trim_whitespace_text(cli.pretty);
            println!("{}", render_html(&output, &html_config));
        }
        Err(e) => fail(&format!("Error: {}", e)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Read and collect templates, printing syntax errors with source context
fn load_templates(path: &Path) -> TemplateRegistry {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail(&format!("Error reading file '{}': {}", path.display(), e)),
    };

    match TemplateRegistry::from_markup(&source) {
        Ok(registry) => registry,
        Err(TemplateError::Parse(errors)) => {
            let filename = path.display().to_string();
            for error in &errors {
                eprint!("{}", error.format(&source, &filename));
            }
            process::exit(1);
        }
        Err(e) => fail(&format!("Error loading templates '{}': {}", path.display(), e)),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}
