use std::{
    error::Error,
    path::PathBuf,
};

use clap::{Parser, Args};
use serde::{Serialize, Deserialize};
use log::debug;

mod error;
pub use error::ParserError;

/// Default basename extension of per-sample bootstrap matrix files. Used to
/// preemptively check for overwrites.
const MATRIX_EXTENSION: &str = "boots.tsv";

#[derive(Parser, Debug, Serialize, Deserialize)]
#[clap(name="vafboot-rs", author, version, about, long_about = None)]
/// vafboot-rs: Bootstrap resampling of subclonal VAF cluster means
pub struct Cli {
    /// Set the verbosity level (-v -vv -vvv)
    ///
    /// Set the verbosity level of this program. Multiple levels allowed {n}
    ///
    /// -v: Info  |  -vv: Debug  | -vvv: Trace {n}
    ///
    /// Note that the program will still output warnings by default, even when this flag is off.
    /// Use the --quiet/-q to disable them
    #[clap(short='v', long, parse(from_occurrences))]
    pub verbose: u8,

    /// Disable warnings.
    ///
    /// By default, warnings are emitted and redirected to the console, even when verbose mode is off.
    /// Use this argument to disable this. Only errors will be displayed.
    #[clap(short='q', long)]
    pub quiet: bool,

    #[clap(flatten)]
    pub boot: BootstrapArgs,
}

#[derive(Args, Debug, Serialize, Deserialize)]
pub struct BootstrapArgs {
    /// Path to the input variant table (tab-separated, headered).
    #[clap(short, long, required=true)]
    pub input: PathBuf,

    /// Output directory where bootstrap matrices are written.
    #[clap(short, long, default_value="vafboot-output")]
    pub output_dir: PathBuf,

    /// Name of the cluster-label column.
    #[clap(long, default_value="cluster")]
    pub cluster_col: String,

    /// Names of the VAF columns, in processing order.
    #[clap(long, required=true, multiple_values=true)]
    pub vaf_cols: Vec<String>,

    /// Names of the depth columns. One per VAF column, in the same order.
    /// Required (and only inspected) when --weighted is set.
    #[clap(long, multiple_values=true)]
    pub depth_cols: Vec<String>,

    /// Number of bootstrap iterations per (sample, cluster) pair.
    #[clap(short='b', long, default_value_t=1000)]
    pub num_boots: usize,

    /// Bootstrap resampling model.
    #[clap(short, long, possible_values=["normal", "normal-truncated", "beta", "binomial", "beta-binomial", "non-parametric"])]
    pub model: String,

    /// Weight statistic estimation and non-parametric resampling by read depth.
    #[clap(short, long)]
    pub weighted: bool,

    /// Caller-supplied zero-VAF background values.
    ///
    /// When provided, these values take full precedence over any detected
    /// zero-median cluster when generating the 'zero.means' distribution.
    #[clap(long, multiple_values=true)]
    pub zero_sample: Vec<f64>,

    /// Input VAF values are percentages; divide them by 100 before validation.
    #[clap(long)]
    pub vaf_in_percent: bool,

    /// Seed of the random number generator (randomly assigned when unspecified).
    #[clap(short, long, default_value_t=rand::random::<u64>())]
    pub seed: u64,

    /// Overwrite any pre-existing output file.
    #[clap(long)]
    pub overwrite: bool,
}

impl Cli {
    /// Serialize command line arguments within a `.yaml` file.
    ///
    /// # Behavior
    /// - File naming follows the convention '{current time}-vafboot.yaml'.
    ///   current time follows the format `YYYY`-`MM`-`DD`T`hhmmss`
    /// - File is written at the root of the user-provided `--output-dir` folder.
    ///
    /// # Errors
    /// Sends an unrecoverable error if `serde_yaml` fails to parse `Self` to a string.
    pub fn serialize(&self) -> Result<(), Box<dyn Error>> {
        // Parse arguments to yaml and print to console.
        let serialized = serde_yaml::to_string(&self)
            .map_err(|err| format!("Failed to serialize command line arguments. got [{err}]"))?;

        debug!("\n---- Command line args ----\n{}\n---", serialized);

        // Fetch the appropriate output-directory and parse the name of the output file.
        let current_time = chrono::offset::Local::now().format("%Y-%m-%dT%H%M%S").to_string();
        std::fs::create_dir_all(&self.boot.output_dir)?;
        let dir_string  = self.boot.output_dir.to_str().ok_or("Invalid characters in directory")?;
        let output_file = format!("{dir_string}/{current_time}-vafboot.yaml");

        std::fs::write(output_file, serialized)?;
        Ok(())
    }
}

impl BootstrapArgs {
    /// Argument-level sanity checks, run before any file is parsed.
    ///
    /// # Errors
    /// - if the input table does not exist.
    /// - if `--num-boots` is 0.
    /// - if `--depth-cols` does not pair up with `--vaf-cols`.
    /// - if `--weighted` was requested without `--depth-cols`.
    /// - if an output file already exists and `--overwrite` is unset.
    pub fn validate(&self) -> Result<(), ParserError> {
        if !self.input.is_file() {
            return Err(ParserError::MissingInput(self.input.display().to_string()))
        }
        if self.num_boots == 0 {
            return Err(ParserError::NullBootCount)
        }
        if !self.depth_cols.is_empty() && self.depth_cols.len() != self.vaf_cols.len() {
            return Err(ParserError::DepthColsMismatch{found: self.depth_cols.len(), expected: self.vaf_cols.len()})
        }
        if self.weighted && self.depth_cols.is_empty() {
            return Err(ParserError::MissingDepthCols)
        }
        for column in &self.vaf_cols {
            let target = self.output_dir.join(format!("{column}.{MATRIX_EXTENSION}"));
            if target.exists() && !self.overwrite {
                return Err(ParserError::CannotOverwrite(target.display().to_string()))
            }
        }
        Ok(())
    }
}
