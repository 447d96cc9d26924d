use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use yamlscout::document::parser::{from_str, to_value};
use yamlscout::yamlpath::Path;

/// yamlscout - query YAML documents by structure
#[derive(Parser)]
#[command(name = "yamlscout")]
#[command(version)]
#[command(about = "Query YAML documents by structure", long_about = None)]
struct Cli {
    /// Path expression, e.g. '$.spec.containers[*].image'
    expression: String,

    /// YAML files to query (omit to read from stdin)
    files: Vec<PathBuf>,

    /// Print raw scalar values instead of YAML
    #[arg(short = 'r', long)]
    values: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::init();
    let cli = Cli::parse();

    let path = Path::parse(&cli.expression)
        .with_context(|| format!("cannot compile path '{}'", cli.expression))?;

    let mut matched = false;
    if cli.files.is_empty() {
        if io::stdin().is_terminal() {
            anyhow::bail!("no input: pass YAML files or pipe a document to stdin");
        }
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("cannot read stdin")?;
        matched |= query(&path, &text, cli.values)?;
    } else {
        for file in &cli.files {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            matched |= query(&path, &text, cli.values)
                .with_context(|| format!("cannot query {}", file.display()))?;
        }
    }

    Ok(if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Runs the compiled path against one document; returns whether anything
/// matched.
fn query(path: &Path, text: &str, raw_values: bool) -> Result<bool> {
    let doc = from_str(text)?;
    let found = path.find(&doc);
    for node in &found {
        if raw_values {
            println!("{}", node.value());
        } else {
            let rendered = serde_yaml::to_string(&to_value(node))?;
            print!("{}", rendered.trim_start_matches("---\n"));
        }
    }
    Ok(!found.is_empty())
}
