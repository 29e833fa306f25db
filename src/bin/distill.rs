//! Reads HTML from stdin and prints the extraction result as JSON.
//!
//! Usage: `distill [--text] [URL] < page.html`
//!
//! Log output goes to stderr and is controlled with `RUST_LOG`.

use std::io::{self, Read};
use std::process::ExitCode;

use rs_distiller::url_utils::parse_document_url;
use rs_distiller::{extract_bytes_with_options, Error, Options};
use tracing_subscriber::EnvFilter;

fn parse_args() -> Result<Options, Error> {
    let mut options = Options::default();
    for arg in std::env::args().skip(1) {
        if arg == "--text" {
            options.text_only = true;
        } else if parse_document_url(Some(&arg)).is_some() {
            options.url = Some(arg);
        } else {
            return Err(Error::InvalidUrl(arg));
        }
    }
    Ok(options)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: distill [--text] [URL] < page.html");
            return ExitCode::from(2);
        }
    };

    let mut html = Vec::new();
    if let Err(err) = io::stdin().read_to_end(&mut html) {
        eprintln!("failed to read stdin: {err}");
        return ExitCode::FAILURE;
    }

    let result = match extract_bytes_with_options(&html, &options) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&result) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            ExitCode::FAILURE
        }
    }
}
