use {
  std::path::PathBuf,
  crate::{
    errors::{HarnessFailure as Failure, ParserError},
    RdfNode, MapGraph,
    datastore::RdfGraph,
    harness::{
      manifest::{Manifest, TestEntry},
      report::{CaseReport, SuiteReport, Status},
    },
    rdf::parser::{parse, ParserConfig},
  },
};

pub type Outcome = std::result::Result<(), Failure>;

/* One runnable test per manifest entry. Locators are resolved to
  files when the suite is built; a locator outside the suite's base
  directory fails the case when it runs. */
#[derive(Debug, Clone)]
pub struct TestCase {
  entry: TestEntry,
  action: Option<PathBuf>,
  expected: Option<PathBuf>,
}
impl TestCase {
  pub fn new(entry: TestEntry, manifest: &Manifest) -> Self {
    let action = manifest.locate(entry.action());
    let expected = match &entry {
      TestEntry::Eval{ expected, .. } => manifest.locate(expected),
      _ => None,
    };
    TestCase { entry, action, expected }
  }
  pub fn name(&self) -> &str {
    self.entry.name()
  }
  pub fn entry(&self) -> &TestEntry {
    &self.entry
  }
  pub fn run<G: RdfGraph>(&self) -> Outcome {
    match &self.entry {
      TestEntry::Eval{ action, expected, .. } => {
        let parsed: G = expect_parse(action, &self.action)?;
        let wanted: G = expect_parse(expected, &self.expected)?;
        if parsed.is_isomorphic(&wanted) {
          Ok(())
        }
        else {
          Err(Failure::NotIsomorphic(action.to_string(), expected.to_string()))
        }
      },
      TestEntry::PositiveSyntax{ action, .. } => {
        expect_parse::<G>(action, &self.action).map(|_| ())
      },
      TestEntry::NegativeEval{ action, .. }
      | TestEntry::NegativeSyntax{ action, .. } => {
        match try_parse::<G>(action, &self.action)? {
          Ok(_) => Err(Failure::UnexpectedParseSuccess(action.to_string())),
          Err(_) => Ok(()),
        }
      },
    }
  }
}

/* Parsing always uses the locator itself as base and no default prefixes */
fn try_parse<G: RdfGraph>(locator: &RdfNode, path: &Option<PathBuf>) -> Result<Result<G, ParserError>, Failure> {
  let path = match path {
    Some(path) => path,
    None => return Err(Failure::UnresolvedLocator(locator.to_string())),
  };
  let config = ParserConfig {
    base_url: locator.iri().map(String::from),
    prefixes: None,
    syntax: None,
  };
  Ok(parse(&config, path))
}
fn expect_parse<G: RdfGraph>(locator: &RdfNode, path: &Option<PathBuf>) -> Result<G, Failure> {
  try_parse(locator, path)?
    .map_err(|e| Failure::UnexpectedParseFailure(locator.to_string(), Box::new(e)))
}

/// All cases generated from one manifest.
#[derive(Debug, Clone)]
pub struct TestSuite {
  pub name: String,
  pub cases: Vec<TestCase>,
}
impl TestSuite {
  pub fn from_manifest(name: impl Into<String>, manifest: &Manifest) -> Self {
    TestSuite {
      name: name.into(),
      cases: manifest.entries
        .iter()
        .cloned()
        .map(|entry| TestCase::new(entry, manifest))
        .collect(),
    }
  }
  pub fn run(&self, ignored: &[String]) -> SuiteReport {
    self.run_with::<MapGraph>(ignored)
  }
  /// Run every case with graphs of backend `G`. Failures of cases named in
  /// `ignored` are reported as ignored instead of failed.
  pub fn run_with<G: RdfGraph>(&self, ignored: &[String]) -> SuiteReport {
    let cases = self.cases.iter().map(|case| {
      let outcome = case.run::<G>();
      tracing::debug!(suite = %self.name, test = case.name(), passed = outcome.is_ok(), "ran test");
      let (status, error) = match outcome {
        Ok(()) => (Status::Pass, None),
        Err(failure) => {
          let status = if ignored.iter().any(|name| name == case.name()) {
            Status::Ignored
          }
          else {
            Status::Fail
          };
          (status, Some(failure.to_string()))
        },
      };
      CaseReport { name: case.name().to_string(), status, error }
    }).collect();
    SuiteReport::from_cases(self.name.clone(), cases)
  }
}
