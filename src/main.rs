//! linemark CLI - Markdown to XHTML

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;

use linemark::source::DEFAULT_ENCODING;
use linemark::Options;

#[derive(Parser)]
#[command(name = "linemark", version, about = "Convert Markdown to XHTML")]
struct Cli {
    /// Input file; stdin when absent or `-`
    file: Option<PathBuf>,

    /// Input character encoding (WHATWG label)
    #[arg(short, long, default_value = DEFAULT_ENCODING)]
    encoding: String,

    /// Escape raw inline HTML instead of passing it through
    #[arg(long)]
    no_html: bool,

    /// Leave reference-style links as literal text
    #[arg(long)]
    no_link_refs: bool,

    /// Write output to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("linemark: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> linemark::Result<()> {
    let text = match &cli.file {
        Some(path) if path.as_os_str() != "-" => linemark::source::read_file(path, &cli.encoding)?,
        _ => linemark::source::read_to_string(io::stdin().lock(), &cli.encoding)?,
    };

    let options = Options {
        allow_html: !cli.no_html,
        allow_link_refs: !cli.no_link_refs,
    };
    let html = linemark::to_html_with_options(&text, &options);
    log::info!("rendered {} bytes of input to {} bytes", text.len(), html.len());

    match &cli.output {
        Some(path) => fs::write(path, html)?,
        None => io::stdout().lock().write_all(html.as_bytes())?,
    }
    Ok(())
}
