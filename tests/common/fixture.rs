use std::{env, fs, path::{Path, PathBuf}, ops::Deref, fmt::{self, Formatter, Display}};
use tempfile::{self, TempDir};

pub const TEST_DATA_DIR: &str = "./tests/test-data";

/// A file living in a self-cleaning temporary directory. `copy` seeds it from
/// `tests/test-data`, `blank` only reserves the path.
pub struct Fixture {
    path: std::path::PathBuf,
    source: std::path::PathBuf,
    _tempdir: TempDir,
}

impl Fixture {
    pub fn blank(fixture_filename: &str) -> Self {
        let root_dir = &env::var("CARGO_MANIFEST_DIR").expect("$CARGO_MANIFEST_DIR");
        let mut source = PathBuf::from(root_dir);
        source.push(TEST_DATA_DIR);
        source.push(fixture_filename);

        let tempdir = tempfile::tempdir().expect("Failed to generate temp directory");
        let mut path = PathBuf::from(&tempdir.path());
        path.push(fixture_filename);

        Fixture { _tempdir: tempdir, source, path }
    }

    pub fn copy(fixture_filename: &str) -> Self {
        let fixture = Fixture::blank(fixture_filename);
        fs::create_dir_all(fixture.path.parent().expect("No parent directory")).expect("Failed to create directory");
        fs::copy(&fixture.source, &fixture.path).expect("Failed to copy Fixture files.");
        fixture
    }
}

impl Deref for Fixture {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.path.deref()
    }
}

impl Display for Fixture {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.to_str().expect("Invalid path (non UTF8 characters ?)"))
    }
}
