use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use located_error::prelude::*;
use log::debug;
use vaf_bootstrap::VariantTable;

mod error;
pub use error::ReaderError;

/// THE field separator of input variant tables.
pub const TABLE_SEPARATOR: char = '\t';

/// Reads a tab-separated variant observation table into a validated
/// [`VariantTable`], using explicit, caller-resolved column names.
/// # Fields
/// - `cluster_col`   : name of the cluster-label column.
/// - `vaf_cols`      : names of the VAF columns, in the caller's order.
/// - `depth_cols`    : optional depth column names. `depth_cols[i]` pairs
///                     with `vaf_cols[i]`.
/// - `vaf_in_percent`: when set, VAF values are percentages and get divided
///                     by 100 before range validation.
#[derive(Debug, Clone)]
pub struct TableReader {
    cluster_col   : String,
    vaf_cols      : Vec<String>,
    depth_cols    : Option<Vec<String>>,
    vaf_in_percent: bool,
}

impl TableReader {
    pub fn new(cluster_col: impl Into<String>, vaf_cols: Vec<String>) -> Self {
        Self{cluster_col: cluster_col.into(), vaf_cols, depth_cols: None, vaf_in_percent: false}
    }

    pub fn with_depth_columns(mut self, depth_cols: Vec<String>) -> Self {
        self.depth_cols = match depth_cols.is_empty() {
            true  => None,
            false => Some(depth_cols),
        };
        self
    }

    pub fn vaf_in_percent(mut self, enabled: bool) -> Self {
        self.vaf_in_percent = enabled;
        self
    }

    /// Parse and validate the table found at `path`.
    ///
    /// # Errors
    /// - `ReaderError` on IO failures, a missing header, missing columns, or
    ///   unparseable fields.
    /// - The table-level validation errors of [`VariantTable::new`] (range,
    ///   column count/overlap).
    pub fn read(&self, path: impl AsRef<Path>) -> Result<VariantTable> {
        let path = path.as_ref();
        let loc_msg = || format!("While reading the variant table '{}'", path.display());

        let file = File::open(path).map_err(ReaderError::Io).with_loc(loc_msg)?;
        let mut lines = BufReader::new(file).lines().enumerate();

        // ---- Resolve requested columns against the header.
        let (_, header) = lines.next().ok_or(ReaderError::MissingHeader).with_loc(loc_msg)?;
        let header = header.map_err(ReaderError::Io).with_loc(loc_msg)?;
        let header: Vec<&str> = header.split(TABLE_SEPARATOR).collect();

        let cluster_idx = self.resolve(&header, &self.cluster_col).with_loc(loc_msg)?;
        let vaf_idx     = self.resolve_all(&header, &self.vaf_cols).with_loc(loc_msg)?;
        let depth_idx   = match &self.depth_cols {
            Some(cols) => Some(self.resolve_all(&header, cols).with_loc(loc_msg)?),
            None       => None,
        };
        debug!("Resolved header indices - cluster: {cluster_idx}, vaf: {vaf_idx:?}, depth: {depth_idx:?}");

        // ---- Parse data rows into column vectors.
        let mut clusters: Vec<String>   = Vec::new();
        let mut vafs  : Vec<Vec<f64>>   = vec![Vec::new(); vaf_idx.len()];
        let mut depths: Vec<Vec<u32>>   = vec![Vec::new(); depth_idx.as_ref().map_or(0, Vec::len)];
        for (i, line) in lines {
            let line_no = i + 1; // 1-based, header included.
            let line    = line.map_err(ReaderError::Io).with_loc(loc_msg)?;
            if line.is_empty() {
                continue
            }
            let fields: Vec<&str> = line.split(TABLE_SEPARATOR).collect();
            if fields.len() != header.len() {
                return Err(ReaderError::UnevenRow{line: line_no, expected: header.len(), found: fields.len()}).with_loc(loc_msg)
            }

            clusters.push(fields[cluster_idx].to_string());
            for (column, &field_idx) in vafs.iter_mut().zip(&vaf_idx) {
                let value: f64 = Self::parse_field(&fields, field_idx, line_no, &header)?;
                column.push(if self.vaf_in_percent { value / 100.0 } else { value });
            }
            if let Some(depth_idx) = &depth_idx {
                for (column, &field_idx) in depths.iter_mut().zip(depth_idx) {
                    column.push(Self::parse_field(&fields, field_idx, line_no, &header)?);
                }
            }
        }

        // ---- Hand over to table-level validation.
        let vafs: IndexMap<String, Vec<f64>> = self.vaf_cols.iter().cloned().zip(vafs).collect();
        let depths: Option<IndexMap<String, Vec<u32>>> = self.depth_cols.as_ref()
            .map(|cols| cols.iter().cloned().zip(depths).collect());
        VariantTable::new(clusters, vafs, depths).with_loc(loc_msg)
    }

    fn resolve(&self, header: &[&str], column: &str) -> Result<usize, ReaderError> {
        header.iter()
            .position(|field| *field == column)
            .ok_or_else(|| ReaderError::MissingColumn(column.to_string()))
    }

    fn resolve_all(&self, header: &[&str], columns: &[String]) -> Result<Vec<usize>, ReaderError> {
        columns.iter().map(|column| self.resolve(header, column)).collect()
    }

    fn parse_field<T: std::str::FromStr>(fields: &[&str], field_idx: usize, line_no: usize, header: &[&str]) -> Result<T, anyhow::Error>
    where
        T::Err: std::fmt::Display,
    {
        fields[field_idx].parse().map_err(|err: T::Err| ReaderError::ParseField{
            line  : line_no,
            column: header[field_idx].to_string(),
            msg   : err.to_string(),
        }).loc("While parsing the variant table")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_table(contents: &str) -> anyhow::Result<(tempfile::TempDir, std::path::PathBuf)> {
        let tmpdir = tempfile::tempdir()?;
        let path   = tmpdir.path().join("variants.tsv");
        let mut file = File::create(&path)?;
        write!(file, "{contents}")?;
        Ok((tmpdir, path))
    }

    const MOCK_TABLE: &str = "\
cluster\ts1.vaf\ts1.depth\tannotation
A\t0.10\t100\tfoo
A\t0.12\t120\tbar
B\t0.50\t80\tbaz
";

    #[test]
    fn read_resolved_columns_only() -> Result<()> {
        let (_tmpdir, path) = write_table(MOCK_TABLE)?;
        let table = TableReader::new("cluster", vec!["s1.vaf".to_string()])
            .with_depth_columns(vec!["s1.depth".to_string()])
            .read(&path)?;

        assert_eq!(table.n_variants(), 3);
        assert_eq!(table.vaf_columns()["s1.vaf"], vec![0.10, 0.12, 0.50]);
        assert_eq!(table.depth_column(0), Some(&[100, 120, 80][..]));
        Ok(())
    }

    #[test]
    fn percent_units_are_converted_before_validation() -> Result<()> {
        let contents = "cluster\ts1\nA\t10.0\nA\t12.0\n";
        let (_tmpdir, path) = write_table(contents)?;
        let table = TableReader::new("cluster", vec!["s1".to_string()])
            .vaf_in_percent(true)
            .read(&path)?;
        assert_eq!(table.vaf_columns()["s1"], vec![0.10, 0.12]);
        Ok(())
    }

    #[test]
    fn missing_column_is_a_schema_error() -> Result<()> {
        let (_tmpdir, path) = write_table(MOCK_TABLE)?;
        let result = TableReader::new("cluster", vec!["s2.vaf".to_string()]).read(&path);
        let err = result.expect_err("missing column must abort");
        assert!(err.chain().any(|cause| cause.to_string().contains("s2.vaf")));
        Ok(())
    }

    #[test]
    fn unparseable_vaf_field_aborts() -> Result<()> {
        let contents = "cluster\ts1\nA\t0.1\nA\tNA\n";
        let (_tmpdir, path) = write_table(contents)?;
        let result = TableReader::new("cluster", vec!["s1".to_string()]).read(&path);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn uneven_row_aborts() -> Result<()> {
        let contents = "cluster\ts1\nA\t0.1\nA\n";
        let (_tmpdir, path) = write_table(contents)?;
        let result = TableReader::new("cluster", vec!["s1".to_string()]).read(&path);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn out_of_range_vaf_aborts() -> Result<()> {
        let contents = "cluster\ts1\nA\t0.1\nA\t40.0\n";
        let (_tmpdir, path) = write_table(contents)?;
        let result = TableReader::new("cluster", vec!["s1".to_string()]).read(&path);
        let err = result.expect_err("out-of-range VAF must abort");
        assert!(err.chain().any(|cause| cause.to_string().contains("[0, 1]")));
        Ok(())
    }
}
