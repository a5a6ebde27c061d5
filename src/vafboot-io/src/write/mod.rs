use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use located_error::prelude::*;
use log::info;
use vaf_bootstrap::{BootstrapMatrix, ResamplingResult};

mod error;
pub use error::WriterError;

/// Basename of the zero-VAF background output file.
pub const ZERO_MEANS_BASENAME: &str = "zero.means.tsv";

/// Extension of per-sample bootstrap-mean matrix files.
pub const MATRIX_EXTENSION: &str = "boots.tsv";

/// Writes a [`ResamplingResult`] into an output directory: one
/// `<sample>.boots.tsv` matrix per sample column, plus `zero.means.tsv` when
/// a zero-VAF background distribution exists.
pub struct ResultWriter {
    output_dir: PathBuf,
}

impl ResultWriter {
    /// # Errors
    /// If the output directory cannot be created.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .map_err(WriterError::Io)
            .with_loc(|| format!("While creating the output directory '{}'", output_dir.display()))?;
        Ok(Self{output_dir: output_dir.to_path_buf()})
    }

    /// Write every matrix + the optional zero-means vector. Returns the list
    /// of written paths, in output order.
    pub fn write_result(&self, result: &ResamplingResult) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(result.matrices().len() + 1);
        for (sample, matrix) in result.matrices() {
            let path = self.output_dir.join(format!("{sample}.{MATRIX_EXTENSION}"));
            Self::write_matrix(&path, matrix)
                .with_loc(|| format!("While writing the bootstrap matrix of sample '{sample}'"))?;
            info!("Wrote {}", path.display());
            written.push(path);
        }

        if let Some(zero_means) = result.zero_means() {
            let path = self.output_dir.join(ZERO_MEANS_BASENAME);
            Self::write_vector(&path, "zero.means", zero_means)
                .loc("While writing the zero-VAF background means")?;
            info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    fn write_matrix(path: &Path, matrix: &BootstrapMatrix) -> Result<(), WriterError> {
        let mut writer = BufWriter::new(File::create(path)?);
        write!(writer, "{matrix}")?;
        Ok(writer.flush()?)
    }

    fn write_vector(path: &Path, header: &str, values: &[f64]) -> Result<(), WriterError> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{header}")?;
        for value in values {
            writeln!(writer, "{value}")?;
        }
        Ok(writer.flush()?)
    }
}
