#[cfg(test)]
mod fixture;
pub use fixture::Fixture;

use clap::Parser;

/// Parse a whitespace-separated argument string and run the full program on it.
pub fn run_vafboot(args: &str) -> anyhow::Result<parser::Cli> {
    let cli = parser::Cli::parse_from(args.split_whitespace());
    vafboot_rs::run(&cli)?;
    Ok(cli)
}

/// Parse a written bootstrap matrix back into its header + value rows.
pub fn read_matrix(path: &std::path::Path) -> (Vec<String>, Vec<Vec<f64>>) {
    let contents = std::fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to open test output file: {path:?}"));
    let mut lines = contents.lines();
    let header = lines.next().expect("Empty matrix file")
        .split('\t').map(str::to_string).collect();
    let rows = lines.map(|line| {
        line.split('\t')
            .map(|field| field.parse().expect("Non-numeric matrix field"))
            .collect()
    }).collect();
    (header, rows)
}
