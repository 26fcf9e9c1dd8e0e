use {
  std::path::Path,
  serde::{Serialize, Deserialize},
  crate::errors::HarnessError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
  Pass,
  Fail,
  /* Failed, but listed as a known failure */
  Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
  pub name: String,
  pub status: Status,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Outcome of one suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
  pub suite: String,
  pub total: usize,
  pub passed: usize,
  pub failed: usize,
  pub ignored: usize,
  pub cases: Vec<CaseReport>,
}
impl SuiteReport {
  pub fn from_cases(suite: impl Into<String>, cases: Vec<CaseReport>) -> Self {
    let count = |status: Status| cases.iter().filter(|c| c.status == status).count();
    SuiteReport {
      suite: suite.into(),
      total: cases.len(),
      passed: count(Status::Pass),
      failed: count(Status::Fail),
      ignored: count(Status::Ignored),
      cases,
    }
  }
  pub fn is_success(&self) -> bool {
    self.failed == 0
  }
  pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
    self.cases.iter().filter(|c| c.status == Status::Fail)
  }
  pub fn case(&self, name: &str) -> Option<&CaseReport> {
    self.cases.iter().find(|c| c.name == name)
  }
  pub fn pass_rate(&self) -> String {
    if self.total > 0 {
      format!("{:.1}%", (self.passed as f64 / self.total as f64) * 100.0)
    }
    else {
      "N/A".to_string()
    }
  }
  pub fn write_json(&self, path: &Path) -> Result<(), HarnessError> {
    let json = serde_json::to_string_pretty(self)?;
    std::fs::write(path, json)?;
    tracing::info!(path = %path.display(), "wrote conformance report");
    Ok(())
  }
  pub fn from_json_file(path: &Path) -> Result<Self, HarnessError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
  }
}
