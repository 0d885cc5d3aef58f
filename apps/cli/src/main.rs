// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! dotbim-ifc: convert .bim documents to IFC4.
//!
//! Usage:
//!   dotbim-ifc bim2ifc <input.bim> <output.ifc> [--stats]
//!
//! Conversion settings come from `DOTBIM_*` environment variables, log
//! verbosity from `RUST_LOG`.

use anyhow::{bail, Context, Result};
use dotbim_ifc_core::Document;
use dotbim_ifc_processing::{ConvertConfig, DotbimToIfc, IfcWriter};
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "info,dotbim_ifc_processing=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return Ok(());
    }

    match args[1].as_str() {
        "bim2ifc" => {
            if args.len() < 4 {
                print_usage();
                bail!("bim2ifc needs an input and an output path");
            }
            let mut print_stats = false;
            for flag in &args[4..] {
                match flag.as_str() {
                    "--stats" => print_stats = true,
                    other => {
                        print_usage();
                        bail!("Unknown option: {}", other);
                    }
                }
            }
            bim_to_ifc(Path::new(&args[2]), Path::new(&args[3]), print_stats)
        }
        other => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }
}

fn bim_to_ifc(input: &Path, output: &Path, print_stats: bool) -> Result<()> {
    let config = ConvertConfig::from_env();
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        worker_threads = config.worker_threads,
        property_set = %config.info_pset_name,
        "Converting dotbim to IFC"
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to initialize rayon thread pool")?;

    let start = Instant::now();
    let document = Document::open(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let mut writer = IfcWriter::new();
    let stats = DotbimToIfc::new(&document, &config)
        .execute(&mut writer)
        .context("Conversion failed")?;
    writer
        .write(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        entities = writer.model().len(),
        "Wrote IFC file"
    );

    if print_stats {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: dotbim-ifc <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  bim2ifc <input.bim> <output.ifc> [--stats]");
    eprintln!("      Convert a dotbim document into an IFC4 file");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DOTBIM_PROJECT_NAME   Name of the created project (default: Project)");
    eprintln!("  DOTBIM_SITE_NAME      Name of the created site (default: Site)");
    eprintln!("  DOTBIM_INFO_PSET      Property set holding element info (default: Dotbim_Info)");
    eprintln!("  DOTBIM_WORKER_THREADS Threads used for mesh preparation");
    eprintln!("  RUST_LOG              Log filter (default: info,dotbim_ifc_processing=debug)");
}
