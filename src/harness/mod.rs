/*
  Conformance harness: a manifest of W3C-style tests is loaded,
  every entry becomes a TestCase, and the suite is run against a
  graph backend. check_testsuite is the one-call entry point for
  integration tests.
*/

pub mod manifest;
pub mod runner;
pub mod report;

pub use {
  manifest::{load_manifest, Manifest, TestEntry, TestMeta},
  runner::{TestCase, TestSuite},
  report::{SuiteReport, CaseReport, Status},
};

use {
  std::path::{Path, PathBuf},
  serde::{Serialize, Deserialize},
  crate::errors::HarnessError as Error,
};

type Result<T> = std::result::Result<T, Error>;

/// Which suite to run and where its files live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
  pub suite: String,
  /// Manifest file name, relative to `base_directory`.
  pub manifest: String,
  pub base_directory: PathBuf,
  /// IRI prefix that stands for `base_directory` inside the manifest.
  pub base_url: String,
  /// Tests whose failure is expected.
  #[serde(default)]
  pub ignored: Vec<String>,
  #[serde(default)]
  pub report_path: Option<PathBuf>,
}
impl HarnessConfig {
  pub fn new(suite: impl Into<String>,
    manifest: impl Into<String>,
    base_directory: impl Into<PathBuf>,
    base_url: impl Into<String>) -> Self {
    HarnessConfig {
      suite: suite.into(),
      manifest: manifest.into(),
      base_directory: base_directory.into(),
      base_url: base_url.into(),
      ignored: Vec::new(),
      report_path: None,
    }
  }
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
  }
}

/// Load the manifest, run every test, write the report if one was asked for.
/// Any non-ignored failure turns into `HarnessError::FailedTests`, listing
/// each failing test and why.
pub fn check_testsuite(config: &HarnessConfig) -> Result<SuiteReport> {
  let manifest = load_manifest(&config.manifest, &config.base_directory, &config.base_url)?;
  let suite = TestSuite::from_manifest(config.suite.clone(), &manifest);
  let report = suite.run(&config.ignored);
  tracing::info!(
    suite = %report.suite,
    total = report.total,
    passed = report.passed,
    failed = report.failed,
    ignored = report.ignored,
    "conformance suite finished ({})", report.pass_rate()
  );
  if let Some(path) = &config.report_path {
    report.write_json(path)?;
  }
  if report.is_success() {
    return Ok(report)
  }
  let details = report.failures()
    .map(|case| format!("{}: {}", case.name, case.error.as_deref().unwrap_or("failed")))
    .collect::<Vec<_>>()
    .join("\n");
  Err(Error::FailedTests(report.failed, details))
}
