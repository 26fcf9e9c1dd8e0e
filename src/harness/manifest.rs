/*
  Reads a W3C-style test manifest (Turtle) into TestEntry values.
  The manifest is itself loaded into a MapGraph and read back with
  (subject, predicate) lookups.
*/

use {
  std::{
    collections::HashSet,
    path::{Path, PathBuf},
  },
  serde::Serialize,
  crate::{
    errors::HarnessError as Error,
    RdfNode, MapGraph,
    datastore::RdfGraph,
    rdf::{
      parser::{parse, ParserConfig, Syntax},
      vocab::{mf, rdf, rdfs, rdft},
    },
  },
};

type Result<T> = std::result::Result<T, Error>;

/// What every entry carries besides its name and files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestMeta {
  /// The entry's own IRI in the manifest.
  pub id: RdfNode,
  /// The `rdf:type` the kind was read from, e.g. `rdft:TestTurtleEval`.
  pub kind: String,
  pub approval: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TestEntry {
  Eval {
    name: String,
    description: Option<String>,
    meta: TestMeta,
    action: RdfNode,
    expected: RdfNode,
  },
  NegativeEval {
    name: String,
    description: Option<String>,
    meta: TestMeta,
    action: RdfNode,
  },
  PositiveSyntax {
    name: String,
    description: Option<String>,
    meta: TestMeta,
    action: RdfNode,
  },
  NegativeSyntax {
    name: String,
    description: Option<String>,
    meta: TestMeta,
    action: RdfNode,
  },
}
impl TestEntry {
  pub fn name(&self) -> &str {
    use TestEntry::*;
    match self {
      Eval{ name, .. } | NegativeEval{ name, .. }
      | PositiveSyntax{ name, .. } | NegativeSyntax{ name, .. } => name,
    }
  }
  pub fn description(&self) -> Option<&str> {
    use TestEntry::*;
    match self {
      Eval{ description, .. } | NegativeEval{ description, .. }
      | PositiveSyntax{ description, .. } | NegativeSyntax{ description, .. } => description.as_deref(),
    }
  }
  pub fn meta(&self) -> &TestMeta {
    use TestEntry::*;
    match self {
      Eval{ meta, .. } | NegativeEval{ meta, .. }
      | PositiveSyntax{ meta, .. } | NegativeSyntax{ meta, .. } => meta,
    }
  }
  pub fn action(&self) -> &RdfNode {
    use TestEntry::*;
    match self {
      Eval{ action, .. } | NegativeEval{ action, .. }
      | PositiveSyntax{ action, .. } | NegativeSyntax{ action, .. } => action,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
  pub entries: Vec<TestEntry>,
  pub label: Option<String>,
  base_url: String,
  base_directory: PathBuf,
}
impl Manifest {
  pub fn base_url(&self) -> &str {
    &self.base_url
  }
  pub fn base_directory(&self) -> &Path {
    &self.base_directory
  }
  /// Map a locator IRI under the manifest's base URL back to a file on disk.
  pub fn locate(&self, locator: &RdfNode) -> Option<PathBuf> {
    let relative = locator.iri()?.strip_prefix(self.base_url.as_str())?;
    if relative.is_empty() {
      return None
    }
    Some(self.base_directory.join(relative))
  }
}

/* The manifest file is `base_directory/manifest_locator`, and every
  IRI in it is read as if the file lived at `base_url + manifest_locator`. */
pub fn load_manifest(manifest_locator: &str, base_directory: &Path, base_url: &str) -> Result<Manifest> {
  let path = base_directory.join(manifest_locator);
  if !path.is_file() {
    return Err(Error::MissingManifest(path))
  }
  let config = ParserConfig {
    base_url: Some(format!("{}{}", base_url, manifest_locator)),
    prefixes: None,
    syntax: Some(Syntax::Turtle),
  };
  let graph: MapGraph = parse(&config, &path)?;
  let reader = ManifestReader { graph: &graph, path: &path };
  let subject = reader.manifest_subject()?;
  let mut entries = Vec::new();
  for item in reader.list(&subject, mf::ENTRIES)? {
    if let Some(entry) = reader.entry(&item)? {
      entries.push(entry);
    }
  }
  tracing::debug!(manifest = %path.display(), entries = entries.len(), "loaded test manifest");
  Ok(Manifest {
    entries,
    label: reader.literal(&subject, rdfs::COMMENT),
    base_url: base_url.to_string(),
    base_directory: base_directory.to_path_buf(),
  })
}

struct ManifestReader<'a, G: RdfGraph> {
  graph: &'a G,
  path: &'a Path,
}
impl<'a, G: RdfGraph> ManifestReader<'a, G> {
  fn invalid(&self, reason: String) -> Error {
    Error::InvalidManifest(reason, self.path.to_path_buf())
  }
  /* The node typed mf:Manifest, or failing that whatever has mf:entries */
  fn manifest_subject(&self) -> Result<RdfNode> {
    let typed = self.graph.query(None, Some(&RdfNode::named(rdf::TYPE)), Some(&RdfNode::named(mf::MANIFEST)));
    if let Some(t) = typed.into_iter().next() {
      return Ok(t.subject().clone())
    }
    let with_entries = self.graph.query(None, Some(&RdfNode::named(mf::ENTRIES)), None);
    match with_entries.into_iter().next() {
      Some(t) => Ok(t.subject().clone()),
      None => Err(self.invalid("no mf:Manifest with mf:entries".into())),
    }
  }
  fn object(&self, subject: &RdfNode, predicate: &str) -> Option<RdfNode> {
    self.graph
      .query(Some(subject), Some(&RdfNode::named(predicate)), None)
      .into_iter()
      .next()
      .map(|t| {
        let [_, _, object] = t.into_parts();
        object
      })
  }
  fn literal(&self, subject: &RdfNode, predicate: &str) -> Option<String> {
    self.object(subject, predicate)
      .and_then(|o| o.lexical().map(String::from))
  }
  /* Walk an rdf:first / rdf:rest collection */
  fn list(&self, subject: &RdfNode, predicate: &str) -> Result<Vec<RdfNode>> {
    let nil = RdfNode::named(rdf::NIL);
    let mut items = Vec::new();
    let mut visited = HashSet::new();
    let mut node = match self.object(subject, predicate) {
      Some(head) => head,
      None => return Ok(items),
    };
    while node != nil {
      if !visited.insert(node.clone()) {
        return Err(self.invalid(format!("{} list loops back on {}", predicate, node)))
      }
      match (self.object(&node, rdf::FIRST), self.object(&node, rdf::REST)) {
        (Some(first), Some(rest)) => {
          items.push(first);
          node = rest;
        },
        _ => return Err(self.invalid(format!("{} is not a well-formed rdf:List", node))),
      }
    }
    Ok(items)
  }
  /* None for entries that are rejected or of a kind we do not run */
  fn entry(&self, id: &RdfNode) -> Result<Option<TestEntry>> {
    let approval = self.object(id, rdft::APPROVAL)
      .and_then(|a| a.iri().map(String::from));
    if approval.as_deref() == Some(rdft::REJECTED) {
      tracing::warn!(entry = %id, "skipping rejected test");
      return Ok(None)
    }
    let kind = self.graph
      .query(Some(id), Some(&RdfNode::named(rdf::TYPE)), None)
      .into_iter()
      .filter_map(|t| t.object().iri().map(String::from))
      .find(|iri| iri.starts_with(rdft::NS));
    let kind = match kind {
      Some(kind) => kind,
      None => {
        tracing::warn!(entry = %id, "skipping test without an rdft: type");
        return Ok(None)
      },
    };
    let name = self.literal(id, mf::NAME)
      .or_else(|| id.iri().and_then(|iri| iri.rsplit('#').next()).map(String::from))
      .unwrap_or_else(|| id.to_string());
    let description = self.literal(id, rdfs::COMMENT);
    let action = self.locator(id, mf::ACTION)?;
    let meta = TestMeta { id: id.clone(), kind: kind.clone(), approval };
    let entry = if kind.ends_with("NegativeEval") {
      TestEntry::NegativeEval { name, description, meta, action }
    }
    else if kind.ends_with("Eval") {
      let expected = self.locator(id, mf::RESULT)?;
      TestEntry::Eval { name, description, meta, action, expected }
    }
    else if kind.ends_with("PositiveSyntax") {
      TestEntry::PositiveSyntax { name, description, meta, action }
    }
    else if kind.ends_with("NegativeSyntax") {
      TestEntry::NegativeSyntax { name, description, meta, action }
    }
    else {
      tracing::warn!(entry = %id, kind = %kind, "skipping test of unsupported kind");
      return Ok(None)
    };
    Ok(Some(entry))
  }
  fn locator(&self, id: &RdfNode, predicate: &str) -> Result<RdfNode> {
    match self.object(id, predicate) {
      Some(node) if node.is_named() => Ok(node),
      Some(node) => Err(self.invalid(format!("{} of {} must be an IRI, found {}", predicate, id, node))),
      None => Err(self.invalid(format!("{} has no {}", id, predicate))),
    }
  }
}
