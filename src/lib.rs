extern crate parser;
extern crate logger;

use std::str::FromStr;

use parser::Cli;
use vaf_bootstrap::{BootstrapConfig, BootstrapModel, ResamplingEngine};
use vafboot_io::{TableReader, ResultWriter};

#[macro_use]
extern crate log;

use anyhow::Result;

/// Unpack command line arguments and resample the input variant table.
pub fn run(cli: &Cli) -> Result<()> {
    let args = &cli.boot;
    // ----------------------------- Validate command line arguments.
    let model = BootstrapModel::from_str(&args.model)?;
    args.validate()?;

    // ----------------------------- Parse the input variant table.
    info!("Parsing variant table {}...", args.input.display());
    let mut reader = TableReader::new(&args.cluster_col, args.vaf_cols.clone())
        .vaf_in_percent(args.vaf_in_percent);
    if args.weighted {
        reader = reader.with_depth_columns(args.depth_cols.clone());
    }
    let table = reader.read(&args.input)?;
    info!("Found {} variant(s) across {} cluster(s)", table.n_variants(), table.cluster_partition().len());

    // ----------------------------- Resample cluster means.
    let mut config = BootstrapConfig::new(model);
    config.num_boots = args.num_boots;
    config.weighted  = args.weighted;
    config.seed      = args.seed;
    if !args.zero_sample.is_empty() {
        config.zero_sample = Some(args.zero_sample.clone());
    }

    info!("Resampling cluster means ({model} model, {} iterations, seed {})...", args.num_boots, args.seed);
    let result = ResamplingEngine::new(&table, config)?.run()?;

    // ----------------------------- Write output matrices.
    let written = ResultWriter::new(&args.output_dir)?.write_result(&result)?;
    info!("Done. {} file(s) written in {}", written.len(), args.output_dir.display());
    Ok(())
}
