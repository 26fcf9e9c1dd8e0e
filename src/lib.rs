#![allow(non_snake_case)]

/* Exports */

pub mod datastore;
pub mod rdf;
pub mod harness;
pub mod errors;

pub use datastore::{RdfGraph, Selector};
pub use datastore::map_graph::MapGraph as MapGraph;
pub use datastore::query::{TriplePattern, PatternShape};
pub use datastore::isomorphism::is_isomorphic;
pub use rdf::parser::{parse, parse_str, ParserConfig, Syntax};

/* Common Definitions */

use std::collections::BTreeMap;
use std::convert::TryFrom;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize, Hash)]
pub enum RdfNode {
  Named{ iri: String },
  Blank{ id: String },
  RawLit{ val: String },
  LangTaggedLit{ val: String, lang: String },
  TypedLit{ val: String, datatype: String },
}
impl RdfNode {
  pub fn named(iri: impl Into<String>) -> Self {
    RdfNode::Named{ iri: iri.into() }
  }
  pub fn blank(id: impl Into<String>) -> Self {
    RdfNode::Blank{ id: id.into() }
  }
  pub fn raw_lit(val: impl Into<String>) -> Self {
    RdfNode::RawLit{ val: val.into() }
  }
  pub fn lang_lit(val: impl Into<String>, lang: impl Into<String>) -> Self {
    RdfNode::LangTaggedLit{ val: val.into(), lang: lang.into() }
  }
  pub fn typed_lit(val: impl Into<String>, datatype: impl Into<String>) -> Self {
    RdfNode::TypedLit{ val: val.into(), datatype: datatype.into() }
  }
  pub fn is_named(&self) -> bool {
    matches!(self, RdfNode::Named{..})
  }
  pub fn is_blank(&self) -> bool {
    matches!(self, RdfNode::Blank{..})
  }
  pub fn is_literal(&self) -> bool {
    !self.is_named() && !self.is_blank()
  }
  pub fn iri(&self) -> Option<&str> {
    match self {
      RdfNode::Named{ iri } => Some(iri),
      _ => None,
    }
  }
  pub fn blank_id(&self) -> Option<&str> {
    match self {
      RdfNode::Blank{ id } => Some(id),
      _ => None,
    }
  }
  /// Lexical value of a literal.
  pub fn lexical(&self) -> Option<&str> {
    match self {
      RdfNode::RawLit{ val }
      | RdfNode::LangTaggedLit{ val, .. }
      | RdfNode::TypedLit{ val, .. } => Some(val),
      _ => None,
    }
  }
  pub fn language(&self) -> Option<&str> {
    match self {
      RdfNode::LangTaggedLit{ lang, .. } => Some(lang),
      _ => None,
    }
  }
  pub fn datatype(&self) -> Option<&str> {
    match self {
      RdfNode::TypedLit{ datatype, .. } => Some(datatype),
      _ => None,
    }
  }
}
impl std::convert::From<&str> for RdfNode {
  fn from(s: &str) -> Self {
    Self::Named{ iri: s.to_string() }
  }
}
impl std::convert::From<RdfResource> for RdfNode {
  fn from(res: RdfResource) -> Self {
    match res {
      RdfResource::Named{ iri } => RdfNode::Named{ iri },
      RdfResource::Blank{ id } => RdfNode::Blank{ id },
    }
  }
}
/* N-Triples term syntax */
impl std::fmt::Display for RdfNode {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    use RdfNode::*;
    match self {
      Named{ iri } => write!(f, "<{}>", iri),
      Blank{ id } => write!(f, "_:{}", id),
      RawLit{ val } => write!(f, "\"{}\"", escape_lexical(val)),
      LangTaggedLit{ val, lang } => write!(f, "\"{}\"@{}", escape_lexical(val), lang),
      TypedLit{ val, datatype } => write!(f, "\"{}\"^^<{}>", escape_lexical(val), datatype),
    }
  }
}

/* The only node kinds allowed in subject and predicate position */
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize, Hash)]
pub enum RdfResource {
  Named{ iri: String },
  Blank{ id: String },
}
impl RdfResource {
  pub fn named(iri: impl Into<String>) -> Self {
    RdfResource::Named{ iri: iri.into() }
  }
  pub fn blank(id: impl Into<String>) -> Self {
    RdfResource::Blank{ id: id.into() }
  }
}
impl std::convert::From<&str> for RdfResource {
  fn from(s: &str) -> Self {
    Self::Named{ iri: s.to_string() }
  }
}
impl TryFrom<RdfNode> for RdfResource {
  type Error = RdfNode;
  fn try_from(node: RdfNode) -> Result<Self, Self::Error> {
    match node {
      RdfNode::Named{ iri } => Ok(RdfResource::Named{ iri }),
      RdfNode::Blank{ id } => Ok(RdfResource::Blank{ id }),
      lit => Err(lit),
    }
  }
}

/* A statement. Subject and predicate are stored as plain RdfNodes
  so every position can be matched uniformly, but they can only
  ever be built from RdfResources. */
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[RdfNode; 3]", into = "[RdfNode; 3]")]
pub struct RdfTriple {
  subject: RdfNode,
  predicate: RdfNode,
  object: RdfNode,
}
impl RdfTriple {
  pub fn new(subject: RdfResource, predicate: RdfResource, object: RdfNode) -> Self {
    RdfTriple {
      subject: subject.into(),
      predicate: predicate.into(),
      object,
    }
  }
  pub fn subject(&self) -> &RdfNode {
    &self.subject
  }
  pub fn predicate(&self) -> &RdfNode {
    &self.predicate
  }
  pub fn object(&self) -> &RdfNode {
    &self.object
  }
  pub fn into_parts(self) -> [RdfNode; 3] {
    [self.subject, self.predicate, self.object]
  }
  pub fn has_blank(&self) -> bool {
    self.subject.is_blank() || self.predicate.is_blank() || self.object.is_blank()
  }
  /* Crate-internal constructor for nodes already known to be
    resources, e.g. keys taken back out of a MapGraph. */
  pub(crate) fn from_checked(subject: RdfNode, predicate: RdfNode, object: RdfNode) -> Self {
    debug_assert!(!subject.is_literal() && !predicate.is_literal());
    RdfTriple { subject, predicate, object }
  }
}
impl TryFrom<[RdfNode; 3]> for RdfTriple {
  type Error = String;
  fn try_from([s, p, o]: [RdfNode; 3]) -> Result<Self, Self::Error> {
    let s = RdfResource::try_from(s)
      .map_err(|lit| format!("literal {} cannot be a subject", lit))?;
    let p = RdfResource::try_from(p)
      .map_err(|lit| format!("literal {} cannot be a predicate", lit))?;
    Ok(RdfTriple::new(s, p, o))
  }
}
impl std::convert::From<RdfTriple> for [RdfNode; 3] {
  fn from(t: RdfTriple) -> Self {
    t.into_parts()
  }
}
impl std::fmt::Display for RdfTriple {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
  }
}

/* Prefix -> namespace pairs carried by a graph */
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PrefixMappings(BTreeMap<String, String>);
impl PrefixMappings {
  pub fn new() -> Self {
    PrefixMappings(BTreeMap::new())
  }
  pub fn get(&self, prefix: &str) -> Option<&str> {
    self.0.get(prefix).map(String::as_str)
  }
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }
  pub fn len(&self) -> usize {
    self.0.len()
  }
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
  /* replace == true: incoming wins on conflicting prefixes.
     replace == false: existing wins. */
  pub fn merge(&self, other: &PrefixMappings, replace: bool) -> PrefixMappings {
    let mut merged = self.0.clone();
    for (prefix, ns) in other.0.iter() {
      if replace || !merged.contains_key(prefix) {
        merged.insert(prefix.clone(), ns.clone());
      }
    }
    PrefixMappings(merged)
  }
}
impl<K: Into<String>, V: Into<String>> std::iter::FromIterator<(K, V)> for PrefixMappings {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    PrefixMappings(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

/* Utils */
fn escape_lexical(val: &str) -> String {
  let mut out = String::with_capacity(val.len());
  for c in val.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '"' => out.push_str("\\\""),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      c => out.push(c),
    }
  }
  out
}
