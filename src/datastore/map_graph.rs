use {
  std::{
    borrow::Borrow,
    cmp::Ordering,
    collections::BTreeMap,
    sync::Arc,
  },
  crate::{
    RdfNode, RdfTriple, PrefixMappings,
    datastore::{
      RdfGraph, Selector,
      query::{PatternShape, matches_exact, matches_selector},
    },
  },
};

type Key = (RdfNode, RdfNode);

/* Lets the store be searched with a pair of borrowed nodes, so the
  (S, P) lookup never has to clone them into an owned Key. Ordering
  is the pair's lexicographic order, the same as Key's derived Ord. */
trait KeyRef {
  fn pair(&self) -> (&RdfNode, &RdfNode);
}
impl KeyRef for Key {
  fn pair(&self) -> (&RdfNode, &RdfNode) {
    (&self.0, &self.1)
  }
}
impl KeyRef for (&RdfNode, &RdfNode) {
  fn pair(&self) -> (&RdfNode, &RdfNode) {
    (self.0, self.1)
  }
}
impl<'a> Borrow<dyn KeyRef + 'a> for Key {
  fn borrow(&self) -> &(dyn KeyRef + 'a) {
    self
  }
}
impl PartialEq for dyn KeyRef + '_ {
  fn eq(&self, other: &Self) -> bool {
    self.pair() == other.pair()
  }
}
impl Eq for dyn KeyRef + '_ {}
impl PartialOrd for dyn KeyRef + '_ {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}
impl Ord for dyn KeyRef + '_ {
  fn cmp(&self, other: &Self) -> Ordering {
    self.pair().cmp(&other.pair())
  }
}

/* Triples are grouped by their (Subject, Predicate) pair into
     a list of Objects, kept in the order they were supplied.
   Identical triples stay as duplicate list entries; uniq_triples_of
     is what removes them.
   Storage and prefixes sit behind Arcs so graphs derived from this
     one (add_prefix_mappings) share them instead of copying. */
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct MapGraph {
  store: Arc<BTreeMap<Key, Vec<RdfNode>>>,
  len: usize,
  base_url: Option<String>,
  prefixes: Arc<PrefixMappings>,
}

/* Public */
impl MapGraph {
  pub fn new() -> Self {
    MapGraph {
      store: Arc::new(BTreeMap::new()),
      len: 0,
      base_url: None,
      prefixes: Arc::new(PrefixMappings::new()),
    }
  }
  /// Number of distinct (subject, predicate) keys.
  pub fn key_count(&self) -> usize {
    self.store.len()
  }
  /// The objects stored under one (subject, predicate) key, in insertion order.
  pub fn objects(&self, subject: &RdfNode, predicate: &RdfNode) -> &[RdfNode] {
    self.store
      .get(&(subject, predicate) as &dyn KeyRef)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }
}

impl RdfGraph for MapGraph {
  fn mk_graph<I>(triples: I, base_url: Option<String>, prefixes: PrefixMappings) -> Self
    where I: IntoIterator<Item = RdfTriple> {
    let mut store: BTreeMap<Key, Vec<RdfNode>> = BTreeMap::new();
    let mut len = 0;
    for triple in triples {
      let [s, p, o] = triple.into_parts();
      store.entry((s, p)).or_insert_with(Vec::new).push(o);
      len += 1;
    }
    tracing::debug!(triples = len, keys = store.len(), "built map graph");
    MapGraph {
      store: Arc::new(store),
      len,
      base_url,
      prefixes: Arc::new(prefixes),
    }
  }
  fn base_url(&self) -> Option<&str> {
    self.base_url.as_deref()
  }
  fn prefix_mappings(&self) -> &PrefixMappings {
    &self.prefixes
  }
  fn add_prefix_mappings(&self, prefixes: PrefixMappings, replace: bool) -> Self {
    MapGraph {
      store: Arc::clone(&self.store),
      len: self.len,
      base_url: self.base_url.clone(),
      prefixes: Arc::new(self.prefixes.merge(&prefixes, replace)),
    }
  }
  fn triples_of(&self) -> Vec<RdfTriple> {
    self.___()
  }
  fn len(&self) -> usize {
    self.len
  }
  fn select(&self,
    subject: Option<Selector>,
    predicate: Option<Selector>,
    object: Option<Selector>) -> Vec<RdfTriple> {
    if subject.is_none() && predicate.is_none() && object.is_none() {
      return self.___()
    }
    let mut ret_v = Vec::new();
    for ((s, p), objects) in self.store.iter() {
      /* Reject the whole key before touching its objects */
      if !matches_selector(subject, s) || !matches_selector(predicate, p) {
        continue
      }
      for o in objects.iter().filter(|o| matches_selector(object, o)) {
        ret_v.push(to_triple(s, p, o));
      }
    }
    ret_v
  }
  fn query(&self,
    subject: Option<&RdfNode>,
    predicate: Option<&RdfNode>,
    object: Option<&RdfNode>) -> Vec<RdfTriple> {
    match (subject, predicate, object) {
      (Some(s), Some(p), Some(o)) => self.spo(s, p, o),
      (Some(s), Some(p), None)    => self.sp_(s, p),
      (Some(s), None, Some(o))    => self.s_o(s, o),
      (None, Some(p), Some(o))    => self._po(p, o),
      (Some(s), None, None)       => self.s__(s),
      (None, Some(p), None)       => self._p_(p),
      (None, None, Some(o))       => self.__o(o),
      (None, None, None)          => self.___(),
    }
  }
}

/* Private */
impl MapGraph {
  /* Keyed lookups: one step into the map */
  fn spo(&self, s: &RdfNode, p: &RdfNode, o: &RdfNode) -> Vec<RdfTriple> {
    self.objects(s, p)
      .iter()
      .filter(|obj| *obj == o)
      .map(|obj| to_triple(s, p, obj))
      .collect()
  }
  fn sp_(&self, s: &RdfNode, p: &RdfNode) -> Vec<RdfTriple> {
    self.objects(s, p)
      .iter()
      .map(|obj| to_triple(s, p, obj))
      .collect()
  }
  /* Everything else walks every key */
  fn s_o(&self, s: &RdfNode, o: &RdfNode) -> Vec<RdfTriple> {
    self.scan(Some(s), None, Some(o))
  }
  fn _po(&self, p: &RdfNode, o: &RdfNode) -> Vec<RdfTriple> {
    self.scan(None, Some(p), Some(o))
  }
  fn s__(&self, s: &RdfNode) -> Vec<RdfTriple> {
    self.scan(Some(s), None, None)
  }
  fn _p_(&self, p: &RdfNode) -> Vec<RdfTriple> {
    self.scan(None, Some(p), None)
  }
  fn __o(&self, o: &RdfNode) -> Vec<RdfTriple> {
    self.scan(None, None, Some(o))
  }
  fn ___(&self) -> Vec<RdfTriple> {
    let mut ret_v = Vec::with_capacity(self.len);
    for ((s, p), objects) in self.store.iter() {
      ret_v.extend(objects.iter().map(|o| to_triple(s, p, o)));
    }
    ret_v
  }
  fn scan(&self, s: Option<&RdfNode>, p: Option<&RdfNode>, o: Option<&RdfNode>) -> Vec<RdfTriple> {
    debug_assert!(!PatternShape::of(s.is_some(), p.is_some(), o.is_some()).is_keyed());
    let mut ret_v = Vec::new();
    for ((key_s, key_p), objects) in self.store.iter() {
      if !matches_exact(s, key_s) || !matches_exact(p, key_p) {
        continue
      }
      ret_v.extend(objects.iter()
        .filter(|obj| matches_exact(o, obj))
        .map(|obj| to_triple(key_s, key_p, obj)));
    }
    ret_v
  }
}

/* Utils */
fn to_triple(s: &RdfNode, p: &RdfNode, o: &RdfNode) -> RdfTriple {
  RdfTriple::from_checked(s.clone(), p.clone(), o.clone())
}

#[cfg(test)]
crate::test_graph_impl!(map_graph_contract, crate::datastore::map_graph::MapGraph);

#[cfg(test)]
mod unit_tests {
  use super::*;
  use crate::RdfResource;
  fn t(s: &str, p: &str, o: &str) -> RdfTriple {
    RdfTriple::new(RdfResource::named(s), RdfResource::named(p), RdfNode::raw_lit(o))
  }
  #[test]
  fn default_constructor() {
    let expected = MapGraph {
      store: Arc::new(BTreeMap::new()),
      len: 0,
      base_url: None,
      prefixes: Arc::new(PrefixMappings::new()),
    };
    assert_eq!(expected, MapGraph::new());
    assert_eq!(expected, MapGraph::empty());
  }
  #[test]
  fn objects_grouped_in_input_order() {
    let g = MapGraph::mk_graph(vec![
      t("s", "p", "3"),
      t("x", "p", "9"),
      t("s", "p", "1"),
      t("s", "p", "3"),
      t("s", "q", "2"),
    ], None, PrefixMappings::new());
    assert_eq!(g.key_count(), 3);
    assert_eq!(g.len(), 5);
    let s = RdfNode::named("s");
    let p = RdfNode::named("p");
    assert_eq!(g.objects(&s, &p), &[RdfNode::raw_lit("3"), RdfNode::raw_lit("1"), RdfNode::raw_lit("3")]);
    assert_eq!(g.query(Some(&s), Some(&p), None), vec![t("s", "p", "3"), t("s", "p", "1"), t("s", "p", "3")]);
    assert_eq!(g.query(Some(&s), Some(&p), Some(&RdfNode::raw_lit("3"))).len(), 2);
  }
  #[test]
  fn borrowed_lookup_agrees_with_owned_keys() {
    let g = MapGraph::mk_graph(vec![
      t("b", "p", "1"),
      t("a", "q", "2"),
      t("a", "p", "3"),
      t("a", "p", "4"),
      RdfTriple::new(RdfResource::blank("a"), RdfResource::named("p"), RdfNode::raw_lit("5")),
    ], None, PrefixMappings::new());
    for ((s, p), objects) in g.store.iter() {
      assert_eq!(g.objects(s, p), objects.as_slice());
    }
    let owned: Vec<(&RdfNode, &RdfNode)> = g.store.keys().map(|(s, p)| (s, p)).collect();
    let mut borrowed = owned.clone();
    borrowed.sort_by(|x, y| (x as &dyn KeyRef).cmp(y as &dyn KeyRef));
    assert_eq!(borrowed, owned);
    assert!(g.objects(&RdfNode::named("b"), &RdfNode::named("q")).is_empty());
    assert!(g.objects(&RdfNode::named("c"), &RdfNode::named("p")).is_empty());
    assert_eq!(g.objects(&RdfNode::blank("a"), &RdfNode::named("p")), &[RdfNode::raw_lit("5")]);
  }
  #[test]
  fn storage_order_is_key_order_then_list_order() {
    let g = MapGraph::mk_graph(vec![
      t("b", "p", "2"),
      t("a", "p", "1"),
      t("b", "p", "0"),
    ], None, PrefixMappings::new());
    assert_eq!(g.triples_of(), vec![t("a", "p", "1"), t("b", "p", "2"), t("b", "p", "0")]);
    assert_eq!(g.show_graph(), "<a> <p> \"1\" .\n<b> <p> \"2\" .\n<b> <p> \"0\" .\n");
  }
  #[test]
  fn derived_graph_shares_storage() {
    let g = MapGraph::mk_graph(vec![t("a", "p", "1")], Some("http://base/".into()), PrefixMappings::new());
    let prefixes: PrefixMappings = vec![("ex", "http://ex/")].into_iter().collect();
    let h = g.add_prefix_mappings(prefixes, true);
    assert!(Arc::ptr_eq(&g.store, &h.store));
    assert_eq!(h.base_url(), Some("http://base/"));
    assert!(g.prefix_mappings().is_empty());
    assert_eq!(h.prefix_mappings().len(), 1);
  }
  #[test]
  fn select_skips_objects_of_rejected_keys() {
    use std::cell::Cell;
    let g = MapGraph::mk_graph(vec![
      t("a", "p", "1"),
      t("a", "p", "2"),
      t("b", "p", "3"),
    ], None, PrefixMappings::new());
    let object_checks = Cell::new(0);
    let is_b = |n: &RdfNode| n.iri() == Some("b");
    let counting = |_: &RdfNode| { object_checks.set(object_checks.get() + 1); true };
    let res = g.select(Some(&is_b), None, Some(&counting));
    assert_eq!(res, vec![t("b", "p", "3")]);
    assert_eq!(object_checks.get(), 1);
  }
  #[test]
  fn concurrent_readers() {
    let g = Arc::new(MapGraph::mk_graph(
      (0..100).map(|i| t(&format!("s{}", i % 7), "p", &i.to_string())),
      None, PrefixMappings::new()));
    let handles: Vec<_> = (0..4).map(|_| {
      let g = Arc::clone(&g);
      std::thread::spawn(move || g.query(None, Some(&RdfNode::named("p")), None).len())
    }).collect();
    for handle in handles {
      assert_eq!(handle.join().unwrap(), 100);
    }
  }
}
