pub mod map_graph;
pub mod query;
pub mod isomorphism;

use crate::{RdfNode, RdfTriple, PrefixMappings};

/// Node test used by selector queries, e.g. "object is a literal tagged 'en'".
pub type Selector<'a> = &'a dyn Fn(&RdfNode) -> bool;

/* Capabilities every graph backend provides.
   Graphs are values: nothing here takes &mut self, so a built graph
   can be shared between readers freely. Anything that "changes" a
   graph returns a new one. */
pub trait RdfGraph: Sized {
  /* Required */
  fn mk_graph<I>(triples: I, base_url: Option<String>, prefixes: PrefixMappings) -> Self
    where I: IntoIterator<Item = RdfTriple>;
  fn base_url(&self) -> Option<&str>;
  fn prefix_mappings(&self) -> &PrefixMappings;
  fn add_prefix_mappings(&self, prefixes: PrefixMappings, replace: bool) -> Self;
  /// Every stored triple, duplicates included.
  fn triples_of(&self) -> Vec<RdfTriple>;
  fn len(&self) -> usize;
  fn select(&self,
    subject: Option<Selector>,
    predicate: Option<Selector>,
    object: Option<Selector>) -> Vec<RdfTriple>;
  fn query(&self,
    subject: Option<&RdfNode>,
    predicate: Option<&RdfNode>,
    object: Option<&RdfNode>) -> Vec<RdfTriple>;
  /* Provided */
  fn empty() -> Self {
    Self::mk_graph(Vec::new(), None, PrefixMappings::new())
  }
  fn is_empty(&self) -> bool {
    self.len() == 0
  }
  /// `triples_of` with exact duplicates removed, keeping first occurrences.
  fn uniq_triples_of(&self) -> Vec<RdfTriple> {
    let mut seen = std::collections::HashSet::new();
    self.triples_of()
      .into_iter()
      .filter(|t| seen.insert(t.clone()))
      .collect()
  }
  /// One N-Triples line per stored triple, in storage order.
  fn show_graph(&self) -> String {
    self.triples_of()
      .iter()
      .map(|t| format!("{}\n", t))
      .collect()
  }
  fn is_isomorphic<G: RdfGraph>(&self, other: &G) -> bool {
    isomorphism::is_isomorphic(self, other)
  }
}

/* Contract tests any backend can be run through:
    test_graph_impl!(module_name, BackendType); */
#[cfg(test)]
#[macro_export]
macro_rules! test_graph_impl {
  ($module: ident, $graph: ty) => {
    #[cfg(test)]
    mod $module {
      use std::convert::TryFrom;
      use $crate::{RdfGraph, RdfNode, RdfResource, RdfTriple, PrefixMappings};

      fn t(s: &str, p: &str, o: RdfNode) -> RdfTriple {
        RdfTriple::new(RdfResource::named(s), RdfResource::named(p), o)
      }
      fn sample() -> Vec<RdfTriple> {
        vec![
          t("http://ex/alice", "http://ex/knows", RdfNode::named("http://ex/bob")),
          t("http://ex/alice", "http://ex/knows", RdfNode::named("http://ex/carol")),
          t("http://ex/alice", "http://ex/name", RdfNode::lang_lit("Alice", "en")),
          t("http://ex/bob", "http://ex/name", RdfNode::lang_lit("Robert", "fr")),
          t("http://ex/bob", "http://ex/knows", RdfNode::named("http://ex/carol")),
          RdfTriple::new(RdfResource::blank("b0"), RdfResource::named("http://ex/name"), RdfNode::raw_lit("anon")),
        ]
      }
      fn sorted(mut v: Vec<RdfTriple>) -> Vec<RdfTriple> {
        v.sort();
        v
      }

      #[test]
      fn empty_graph() {
        let g = <$graph>::empty();
        assert!(g.is_empty());
        assert_eq!(g.base_url(), None);
        assert!(g.prefix_mappings().is_empty());
        assert!(g.triples_of().is_empty());
        assert!(g.query(None, None, None).is_empty());
        assert_eq!(g.show_graph(), "");
      }
      #[test]
      fn round_trip_enumeration() {
        let g = <$graph>::mk_graph(sample(), None, PrefixMappings::new());
        assert_eq!(sorted(g.uniq_triples_of()), sorted(sample()));
        assert_eq!(g.len(), sample().len());
      }
      #[test]
      fn duplicates_kept_until_uniq() {
        let dup = t("http://ex/s", "http://ex/p", RdfNode::raw_lit("o"));
        let g = <$graph>::mk_graph(vec![dup.clone(), dup.clone()], None, PrefixMappings::new());
        assert_eq!(g.triples_of(), vec![dup.clone(), dup.clone()]);
        assert_eq!(g.uniq_triples_of(), vec![dup]);
      }
      #[test]
      fn metadata_accessors() {
        let prefixes: PrefixMappings = vec![("ex", "http://ex/")].into_iter().collect();
        let g = <$graph>::mk_graph(sample(), Some("http://ex/base".into()), prefixes.clone());
        assert_eq!(g.base_url(), Some("http://ex/base"));
        assert_eq!(g.prefix_mappings(), &prefixes);
      }
      #[test]
      fn add_prefix_mappings_returns_new_graph() {
        let prefixes: PrefixMappings = vec![("ex", "http://ex/")].into_iter().collect();
        let g = <$graph>::mk_graph(sample(), None, prefixes);
        let incoming: PrefixMappings = vec![("ex", "http://other/"), ("foaf", "http://xmlns.com/foaf/0.1/")]
          .into_iter().collect();
        let kept = g.add_prefix_mappings(incoming.clone(), false);
        let replaced = g.add_prefix_mappings(incoming, true);
        assert_eq!(g.prefix_mappings().get("ex"), Some("http://ex/"));
        assert_eq!(g.prefix_mappings().get("foaf"), None);
        assert_eq!(kept.prefix_mappings().get("ex"), Some("http://ex/"));
        assert_eq!(kept.prefix_mappings().get("foaf"), Some("http://xmlns.com/foaf/0.1/"));
        assert_eq!(replaced.prefix_mappings().get("ex"), Some("http://other/"));
        assert_eq!(sorted(replaced.triples_of()), sorted(g.triples_of()));
      }
      #[test]
      fn query_select_agreement() {
        let g = <$graph>::mk_graph(sample(), None, PrefixMappings::new());
        for triple in g.triples_of() {
          let (s, p, o) = (triple.subject(), triple.predicate(), triple.object());
          let exact = g.query(Some(s), Some(p), Some(o));
          assert!(exact.contains(&triple));
          let is_s = |n: &RdfNode| n == s;
          let is_p = |n: &RdfNode| n == p;
          let is_o = |n: &RdfNode| n == o;
          assert_eq!(sorted(g.select(Some(&is_s), Some(&is_p), Some(&is_o))), sorted(exact));
          assert_eq!(
            sorted(g.query(Some(s), Some(p), None)),
            sorted(g.select(Some(&is_s), Some(&is_p), None)),
          );
        }
      }
      #[test]
      fn every_pattern_shape() {
        let g = <$graph>::mk_graph(sample(), None, PrefixMappings::new());
        let alice = RdfNode::named("http://ex/alice");
        let knows = RdfNode::named("http://ex/knows");
        let carol = RdfNode::named("http://ex/carol");
        assert_eq!(g.query(Some(&alice), None, None).len(), 3);
        assert_eq!(g.query(None, Some(&knows), None).len(), 3);
        assert_eq!(g.query(None, None, Some(&carol)).len(), 2);
        assert_eq!(g.query(Some(&alice), Some(&knows), None).len(), 2);
        assert_eq!(g.query(Some(&alice), None, Some(&carol)).len(), 1);
        assert_eq!(g.query(None, Some(&knows), Some(&carol)).len(), 2);
        assert_eq!(g.query(Some(&alice), Some(&knows), Some(&carol)).len(), 1);
        assert_eq!(sorted(g.query(None, None, None)), sorted(g.triples_of()));
        assert_eq!(sorted(g.select(None, None, None)), sorted(g.triples_of()));
      }
      #[test]
      fn unmatched_pattern_is_empty() {
        let g = <$graph>::mk_graph(sample(), None, PrefixMappings::new());
        let nobody = RdfNode::named("http://ex/nobody");
        let knows = RdfNode::named("http://ex/knows");
        assert!(g.query(Some(&nobody), Some(&knows), None).is_empty());
        assert!(g.query(Some(&nobody), None, None).is_empty());
        assert!(g.query(None, None, Some(&nobody)).is_empty());
      }
      #[test]
      fn selector_on_literal_language() {
        let g = <$graph>::mk_graph(sample(), None, PrefixMappings::new());
        let english = |n: &RdfNode| n.language() == Some("en");
        let res = g.select(None, None, Some(&english));
        assert_eq!(res, vec![t("http://ex/alice", "http://ex/name", RdfNode::lang_lit("Alice", "en"))]);
        let blank_subject = |n: &RdfNode| n.is_blank();
        assert_eq!(g.select(Some(&blank_subject), None, None).len(), 1);
      }
      #[test]
      fn show_graph_one_line_per_triple() {
        let g = <$graph>::mk_graph(sample(), None, PrefixMappings::new());
        let dump = g.show_graph();
        assert_eq!(dump.lines().count(), g.len());
        assert_eq!(dump, g.show_graph());
        for line in dump.lines() {
          assert!(line.ends_with(" ."));
        }
      }
      #[test]
      fn renamed_blank_nodes_are_isomorphic() {
        let g = <$graph>::mk_graph(sample(), None, PrefixMappings::new());
        let renamed: Vec<RdfTriple> = sample().into_iter().map(|tr| {
          let [s, p, o] = tr.into_parts();
          let s = match s {
            RdfNode::Blank{..} => RdfNode::blank("fresh"),
            other => other,
          };
          RdfTriple::try_from([s, p, o]).unwrap()
        }).collect();
        let h = <$graph>::mk_graph(renamed, None, PrefixMappings::new());
        assert!(g.is_isomorphic(&h));
      }
    }
  };
}
