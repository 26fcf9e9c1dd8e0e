/*
  Turns RDF text (Turtle, N-Triples or RDF/XML) into any RdfGraph.
  The rio parsers do the actual reading; this module only maps
  their borrowed terms onto owned RdfNodes and carries the base
  IRI and prefix declarations over to the graph.
*/

use {
  std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
  },
  oxiri::Iri,
  url::Url,
  rio_api::{
    parser::TriplesParser,
    model::{
      Triple as RioTriple,
      Subject, Term, NamedNode, BlankNode, Literal,
    },
  },
  rio_turtle::{TurtleParser, NTriplesParser},
  rio_xml::RdfXmlParser,
  serde::{Serialize, Deserialize},
  crate::{
    errors::ParserError as Error,
    RdfNode, RdfResource, RdfTriple, PrefixMappings,
    datastore::RdfGraph,
  },
};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
  Turtle,
  NTriples,
  RdfXml,
}
impl Syntax {
  pub fn from_path(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
      "ttl" | "turtle" => Some(Syntax::Turtle),
      "nt" | "ntriples" => Some(Syntax::NTriples),
      "rdf" | "xml" | "owl" => Some(Syntax::RdfXml),
      _ => None,
    }
  }
}

/// Settings for a single parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
  /// Base IRI relative references resolve against. Files default to `file://<absolute path>`.
  #[serde(default)]
  pub base_url: Option<String>,
  /// Prefixes the graph starts with; prefixes declared in the document win over these.
  #[serde(default)]
  pub prefixes: Option<PrefixMappings>,
  /// Forces a syntax instead of guessing it from the file extension.
  #[serde(default)]
  pub syntax: Option<Syntax>,
}
impl ParserConfig {
  pub fn with_base(base_url: impl Into<String>) -> Self {
    ParserConfig {
      base_url: Some(base_url.into()),
      ..ParserConfig::default()
    }
  }
}

pub fn parse<G: RdfGraph>(config: &ParserConfig, path: impl AsRef<Path>) -> Result<G> {
  let path = path.as_ref();
  let syntax = match config.syntax.or_else(|| Syntax::from_path(path)) {
    Some(syntax) => syntax,
    None => return Err(Error::UnknownSyntax(path.to_path_buf())),
  };
  let base = match &config.base_url {
    Some(base) => base.clone(),
    None => file_base(path)?,
  };
  tracing::debug!(path = %path.display(), ?syntax, base = %base, "parsing rdf file");
  let reader = BufReader::new(File::open(path)?);
  parse_reader(config, syntax, Some(&base), reader)
}

/* `file://` IRI of the file's absolute path, percent-encoded */
fn file_base(path: &Path) -> Result<String> {
  let absolute = std::fs::canonicalize(path)?;
  match Url::from_file_path(&absolute) {
    Ok(url) => Ok(url.to_string()),
    Err(()) => Err(Error::BadBaseIri(absolute.display().to_string(), "not an absolute file path".into())),
  }
}

/// Parse in-memory text. Without a configured base, relative IRIs are an error.
pub fn parse_str<G: RdfGraph>(config: &ParserConfig, syntax: Syntax, text: &str) -> Result<G> {
  parse_reader(config, syntax, config.base_url.as_deref(), text.as_bytes())
}

fn parse_reader<G: RdfGraph, R: BufRead>(config: &ParserConfig,
  syntax: Syntax,
  base: Option<&str>,
  reader: R) -> Result<G> {
  let base_iri = match base {
    Some(base) => Some(Iri::parse(base.to_string())
      .map_err(|e| Error::BadBaseIri(base.to_string(), e.to_string()))?),
    None => None,
  };
  let mut triples: Vec<RdfTriple> = Vec::new();
  let mut declared = PrefixMappings::new();
  match syntax {
    Syntax::Turtle => {
      let mut parser = TurtleParser::new(reader, base_iri);
      parser.parse_all(&mut |t| push_triple(&mut triples, t))?;
      declared = parser.prefixes()
        .iter()
        .map(|(prefix, ns)| (prefix.clone(), ns.clone()))
        .collect();
    },
    Syntax::NTriples => {
      NTriplesParser::new(reader).parse_all(&mut |t| push_triple(&mut triples, t))?;
    },
    Syntax::RdfXml => {
      RdfXmlParser::new(reader, base_iri).parse_all(&mut |t| push_triple(&mut triples, t))?;
    },
  }
  let prefixes = config.prefixes
    .clone()
    .unwrap_or_default()
    .merge(&declared, true);
  tracing::debug!(triples = triples.len(), prefixes = prefixes.len(), "parsed rdf");
  Ok(G::mk_graph(triples, base.map(String::from), prefixes))
}

/* Rio -> RippleGraph conversions */
fn push_triple(triples: &mut Vec<RdfTriple>, t: RioTriple) -> Result<()> {
  let subject = match t.subject {
    Subject::NamedNode(NamedNode { iri }) => RdfResource::named(iri),
    Subject::BlankNode(BlankNode { id }) => RdfResource::blank(id),
    other => return Err(Error::UnsupportedTerm(other.to_string())),
  };
  let NamedNode { iri: predicate } = t.predicate;
  let object = match t.object {
    Term::NamedNode(NamedNode { iri }) => RdfNode::named(iri),
    Term::BlankNode(BlankNode { id }) => RdfNode::blank(id),
    Term::Literal(Literal::Simple { value }) => RdfNode::raw_lit(value),
    Term::Literal(Literal::LanguageTaggedString { value, language }) => RdfNode::lang_lit(value, language),
    Term::Literal(Literal::Typed { value, datatype: NamedNode { iri } }) => RdfNode::typed_lit(value, iri),
    other => return Err(Error::UnsupportedTerm(other.to_string())),
  };
  triples.push(RdfTriple::new(subject, RdfResource::named(predicate), object));
  Ok(())
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  use crate::MapGraph;
  #[test]
  fn turtle_with_prefixes_and_base() {
    let text = r#"
      @prefix ex: <http://example.org/> .
      <alice> ex:knows [ ex:name "Bob"@en ] ;
              ex:age "42"^^<http://www.w3.org/2001/XMLSchema#integer> .
    "#;
    let config = ParserConfig::with_base("http://example.org/people/");
    let g: MapGraph = parse_str(&config, Syntax::Turtle, text).unwrap();
    assert_eq!(g.len(), 3);
    assert_eq!(g.base_url(), Some("http://example.org/people/"));
    assert_eq!(g.prefix_mappings().get("ex"), Some("http://example.org/"));
    let alice = RdfNode::named("http://example.org/people/alice");
    let knows = RdfNode::named("http://example.org/knows");
    let friends = g.query(Some(&alice), Some(&knows), None);
    assert_eq!(friends.len(), 1);
    assert!(friends[0].object().is_blank());
    let names = g.query(Some(friends[0].object()), None, None);
    assert_eq!(names[0].object(), &RdfNode::lang_lit("Bob", "en"));
  }
  #[test]
  fn default_prefixes_lose_to_declared_ones() {
    let text = "@prefix ex: <http://declared/> . ex:s ex:p ex:o .";
    let config = ParserConfig {
      prefixes: Some(vec![("ex", "http://default/"), ("x", "http://x/")].into_iter().collect()),
      ..ParserConfig::default()
    };
    let g: MapGraph = parse_str(&config, Syntax::Turtle, text).unwrap();
    assert_eq!(g.prefix_mappings().get("ex"), Some("http://declared/"));
    assert_eq!(g.prefix_mappings().get("x"), Some("http://x/"));
  }
  #[test]
  fn ntriples() {
    let text = "<http://ex/s> <http://ex/p> \"v\" .\n_:b <http://ex/p> <http://ex/o> .\n";
    let g: MapGraph = parse_str(&ParserConfig::default(), Syntax::NTriples, text).unwrap();
    assert_eq!(g.len(), 2);
    assert_eq!(g.base_url(), None);
  }
  #[test]
  fn rdf_xml() {
    let text = r#"<?xml version="1.0"?>
      <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
               xmlns:ex="http://example.org/">
        <rdf:Description rdf:about="alice">
          <ex:name xml:lang="en">Alice</ex:name>
          <ex:knows rdf:nodeID="friend"/>
        </rdf:Description>
        <rdf:Description rdf:nodeID="friend">
          <ex:name>Bob</ex:name>
        </rdf:Description>
      </rdf:RDF>"#;
    let config = ParserConfig::with_base("http://example.org/people/");
    let g: MapGraph = parse_str(&config, Syntax::RdfXml, text).unwrap();
    assert_eq!(g.len(), 3);
    assert_eq!(g.base_url(), Some("http://example.org/people/"));
    let alice = RdfNode::named("http://example.org/people/alice");
    let name = RdfNode::named("http://example.org/name");
    let knows = RdfNode::named("http://example.org/knows");
    assert_eq!(g.query(Some(&alice), Some(&name), None)[0].object(), &RdfNode::lang_lit("Alice", "en"));
    let friends = g.query(Some(&alice), Some(&knows), None);
    assert_eq!(friends.len(), 1);
    assert!(friends[0].object().is_blank());
    let names = g.query(Some(friends[0].object()), Some(&name), None);
    assert_eq!(names[0].object(), &RdfNode::raw_lit("Bob"));

    /* rdf:about="alice" is relative */
    let unresolved: Result<MapGraph> = parse_str(&ParserConfig::default(), Syntax::RdfXml, text);
    assert!(unresolved.is_err());
  }
  #[test]
  fn file_base_is_percent_encoded() {
    use std::io::Write;
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("my data");
    std::fs::create_dir(&nested).unwrap();
    let path = nested.join("g.ttl");
    let mut file = File::create(&path).unwrap();
    write!(file, "<#s> <http://ex/p> <other.ttl> .\n").unwrap();
    let g: MapGraph = parse(&ParserConfig::default(), &path).unwrap();
    let base = g.base_url().unwrap().to_string();
    assert!(base.starts_with("file:///"), "{}", base);
    assert!(base.ends_with("/my%20data/g.ttl"), "{}", base);
    let triples = g.triples_of();
    assert_eq!(triples.len(), 1);
    assert_eq!(triples[0].subject(), &RdfNode::named(format!("{}#s", base)));
    assert!(triples[0].object().iri().unwrap().ends_with("/my%20data/other.ttl"));
  }
  #[test]
  fn syntax_errors_are_reported() {
    let res: Result<MapGraph> = parse_str(&ParserConfig::default(), Syntax::Turtle, "<http://ex/s> <http://ex/p> .");
    assert!(res.is_err());
    let res: Result<MapGraph> = parse_str(&ParserConfig::default(), Syntax::NTriples, "\"lit\" <http://ex/p> <http://ex/o> .");
    assert!(res.is_err());
  }
  #[test]
  fn relative_iri_without_base_fails() {
    let res: Result<MapGraph> = parse_str(&ParserConfig::default(), Syntax::Turtle, "<s> <p> <o> .");
    assert!(res.is_err());
  }
  #[test]
  fn bad_base_iri() {
    let res: Result<MapGraph> = parse_str(&ParserConfig::with_base("not an iri"), Syntax::Turtle, "");
    match res {
      Err(Error::BadBaseIri(iri, _)) => assert_eq!(iri, "not an iri"),
      other => panic!("expected BadBaseIri, got {:?}", other.map(|g| g.len())),
    }
  }
  #[test]
  fn syntax_from_extension() {
    assert_eq!(Syntax::from_path(Path::new("a/b.ttl")), Some(Syntax::Turtle));
    assert_eq!(Syntax::from_path(Path::new("b.NT")), Some(Syntax::NTriples));
    assert_eq!(Syntax::from_path(Path::new("c.rdf")), Some(Syntax::RdfXml));
    assert_eq!(Syntax::from_path(Path::new("d.json")), None);
    let res: Result<MapGraph> = parse(&ParserConfig::default(), "graph.json");
    assert!(matches!(res, Err(Error::UnknownSyntax(_))));
  }
  #[test]
  fn config_from_json() {
    let config: ParserConfig = serde_json::from_str(
      r#"{"base_url": "http://ex/", "syntax": "ntriples"}"#).unwrap();
    assert_eq!(config.syntax, Some(Syntax::NTriples));
    assert!(serde_json::from_str::<ParserConfig>(r#"{"base": "http://ex/"}"#).is_err());
  }
}
