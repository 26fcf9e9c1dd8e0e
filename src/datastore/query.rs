use crate::{RdfNode, RdfTriple};
use super::Selector;

/* Which positions of a pattern are fixed. Named after the position
  letters that are bound, '_' for a wildcard. */
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternShape {
  SPO,
  SP_,
  S_O,
  _PO,
  S__,
  _P_,
  __O,
  ___,
}
impl PatternShape {
  pub fn of(s: bool, p: bool, o: bool) -> Self {
    use PatternShape::*;
    match [s, p, o] {
      [true, true, true]    => SPO,
      [true, true, false]   => SP_,
      [true, false, true]   => S_O,
      [false, true, true]   => _PO,
      [true, false, false]  => S__,
      [false, true, false]  => _P_,
      [false, false, true]  => __O,
      [false, false, false] => ___,
    }
  }
  /// Both subject and predicate are bound, so a (S, P) key lookup answers it.
  pub fn is_keyed(self) -> bool {
    matches!(self, PatternShape::SPO | PatternShape::SP_)
  }
}

/// An exact-match triple pattern; `None` is a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TriplePattern {
  pub subject: Option<RdfNode>,
  pub predicate: Option<RdfNode>,
  pub object: Option<RdfNode>,
}
impl TriplePattern {
  pub fn new(subject: Option<RdfNode>, predicate: Option<RdfNode>, object: Option<RdfNode>) -> Self {
    TriplePattern { subject, predicate, object }
  }
  pub fn shape(&self) -> PatternShape {
    PatternShape::of(self.subject.is_some(), self.predicate.is_some(), self.object.is_some())
  }
  pub fn matches(&self, triple: &RdfTriple) -> bool {
    matches_exact(self.subject.as_ref(), triple.subject())
      && matches_exact(self.predicate.as_ref(), triple.predicate())
      && matches_exact(self.object.as_ref(), triple.object())
  }
  /// Run the pattern against any graph backend.
  pub fn run<G: super::RdfGraph>(&self, graph: &G) -> Vec<RdfTriple> {
    graph.query(self.subject.as_ref(), self.predicate.as_ref(), self.object.as_ref())
  }
}

/* Wildcards always match */
pub fn matches_exact(wanted: Option<&RdfNode>, node: &RdfNode) -> bool {
  wanted.map_or(true, |w| w == node)
}
pub fn matches_selector(selector: Option<Selector>, node: &RdfNode) -> bool {
  selector.map_or(true, |f| f(node))
}

/* Filter a flat triple sequence by exact pattern. Backends with no
  index of their own can answer `query` with this. */
pub fn scan_triples<I>(triples: I,
  subject: Option<&RdfNode>,
  predicate: Option<&RdfNode>,
  object: Option<&RdfNode>) -> Vec<RdfTriple>
  where I: IntoIterator<Item = RdfTriple> {
  triples.into_iter()
    .filter(|t| matches_exact(subject, t.subject())
      && matches_exact(predicate, t.predicate())
      && matches_exact(object, t.object()))
    .collect()
}
