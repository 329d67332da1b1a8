//! toolstrap CLI.
//!
//! A CI setup step: ensure the requested tool version is present in the
//! local tool cache (downloading and extracting on a miss) and export
//! its bin directory to the rest of the job. Any failure aborts the step
//! with a runner annotation and a nonzero exit.

// CLI binary writes the provision result to stdout - this is intentional.
#![allow(clippy::print_stdout)]

mod cli;
mod logging;
mod runner;

use clap::Parser;
use miette::IntoDiagnostic;

use toolstrap_cache::ToolCache;
use toolstrap_core::{default_sources, resolve_version, ToolSpec};
use toolstrap_provision::{Provisioned, Provisioner};

use cli::{Cli, Output};

#[tokio::main]
async fn main() -> miette::Result<()> {
    let args = Cli::parse();
    logging::init(args.log_level, args.log_format)?;

    match run(&args).await {
        Ok(provisioned) => {
            print_result(&provisioned, args.output)?;
            Ok(())
        }
        Err(err) => {
            runner::report_failure(&err.to_string());
            Err(err.into())
        }
    }
}

async fn run(args: &Cli) -> toolstrap_core::Result<Provisioned> {
    let spec = ToolSpec::builtin(&args.tool)?;
    let sources = default_sources(spec.name, args.tool_version.clone());
    let request = resolve_version(spec, &sources)?;

    let cache = match &args.cache_dir {
        Some(dir) => ToolCache::new(dir.clone()),
        None => ToolCache::default(),
    };

    let provisioned = Provisioner::with_http(cache).provision(&request).await?;
    runner::export_path(&provisioned.bin_dir)?;
    Ok(provisioned)
}

fn print_result(provisioned: &Provisioned, output: Output) -> miette::Result<()> {
    match output {
        Output::Text => println!("{}", provisioned.bin_dir.display()),
        Output::Json => {
            let json = serde_json::to_string_pretty(provisioned).into_diagnostic()?;
            println!("{json}");
        }
    }
    Ok(())
}
