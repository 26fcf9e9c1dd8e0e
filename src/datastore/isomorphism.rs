/*
  Graph equality up to blank node renaming.

  Non-blank nodes must match exactly. Blank nodes are first coloured
  by repeatedly hashing their neighbourhoods (the colour of a blank
  node folds in the terms it co-occurs with, and the current colours
  of the blank nodes among them) until the number of colours stops
  growing. Only equally coloured blank nodes can correspond, which
  leaves a small search for the actual bijection.
*/

use {
  bimap::BiHashMap,
  std::{
    collections::{HashMap, HashSet, hash_map::DefaultHasher},
    hash::{Hash, Hasher},
  },
  crate::{
    RdfNode, RdfTriple,
    datastore::RdfGraph,
  },
};

type Colours<'a> = HashMap<&'a str, u64>;

pub fn is_isomorphic<A: RdfGraph, B: RdfGraph>(left: &A, right: &B) -> bool {
  let left = left.uniq_triples_of();
  let right = right.uniq_triples_of();
  if left.len() != right.len() {
    return false
  }
  let (left_ground, left_blank): (Vec<&RdfTriple>, Vec<&RdfTriple>) =
    left.iter().partition(|t| !t.has_blank());
  let (right_ground, right_blank): (Vec<&RdfTriple>, Vec<&RdfTriple>) =
    right.iter().partition(|t| !t.has_blank());
  /* Ground triples compare as plain sets */
  if left_ground.len() != right_ground.len() {
    return false
  }
  let right_ground: HashSet<&RdfTriple> = right_ground.into_iter().collect();
  if !left_ground.iter().all(|t| right_ground.contains(t)) {
    return false
  }
  if left_blank.is_empty() {
    return true
  }
  let left_colours = colour_blank_nodes(&left_blank);
  let right_colours = colour_blank_nodes(&right_blank);
  if histogram(&left_colours) != histogram(&right_colours) {
    return false
  }
  let mut search = Search::new(&left_blank, &right_blank, left_colours, &right_colours);
  search.extend(0)
}

/* Colour refinement */
fn colour_blank_nodes<'a>(triples: &[&'a RdfTriple]) -> Colours<'a> {
  let incident = incidence(triples);
  let mut colours: Colours = incident.keys().map(|&id| (id, 0)).collect();
  let mut classes = 1;
  loop {
    let mut next: Colours = HashMap::with_capacity(colours.len());
    for (&id, &colour) in colours.iter() {
      let mut signatures: Vec<u64> = incident[id]
        .iter()
        .map(|&i| triple_signature(triples[i], id, &colours))
        .collect();
      signatures.sort_unstable();
      next.insert(id, hash_of(&(colour, signatures)));
    }
    let next_classes = histogram(&next).len();
    colours = next;
    if next_classes <= classes {
      break colours
    }
    classes = next_classes;
  }
}
fn triple_signature(triple: &RdfTriple, own_id: &str, colours: &Colours) -> u64 {
  let term = |node: &RdfNode| -> (u8, u64) {
    match node.blank_id() {
      Some(id) if id == own_id => (2, 0),
      Some(id) => (1, colours[id]),
      None => (0, hash_of(node)),
    }
  };
  hash_of(&[term(triple.subject()), term(triple.predicate()), term(triple.object())])
}
/* Blank node id -> indices of the triples it appears in */
fn incidence<'a>(triples: &[&'a RdfTriple]) -> HashMap<&'a str, Vec<usize>> {
  let mut incident: HashMap<&str, Vec<usize>> = HashMap::new();
  for (i, &triple) in triples.iter().enumerate() {
    let mut ids: Vec<&'a str> = vec![triple.subject(), triple.predicate(), triple.object()]
      .into_iter()
      .filter_map(RdfNode::blank_id)
      .collect();
    ids.sort_unstable();
    ids.dedup();
    for id in ids {
      incident.entry(id).or_insert_with(Vec::new).push(i);
    }
  }
  incident
}
fn histogram(colours: &Colours) -> HashMap<u64, usize> {
  let mut counts = HashMap::new();
  for &colour in colours.values() {
    *counts.entry(colour).or_insert(0) += 1;
  }
  counts
}
fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
  let mut hasher = DefaultHasher::new();
  value.hash(&mut hasher);
  hasher.finish()
}

/* Bijection search */
struct Search<'a> {
  left: &'a [&'a RdfTriple],
  right: HashSet<&'a RdfTriple>,
  incident: HashMap<&'a str, Vec<usize>>,
  order: Vec<&'a str>,
  colours: Colours<'a>,
  candidates: HashMap<u64, Vec<&'a str>>,
  mapping: BiHashMap<&'a str, &'a str>,
}
impl<'a> Search<'a> {
  fn new(left: &'a [&'a RdfTriple],
    right: &'a [&'a RdfTriple],
    colours: Colours<'a>,
    right_colours: &Colours<'a>) -> Self {
    let mut candidates: HashMap<u64, Vec<&str>> = HashMap::new();
    for (&id, &colour) in right_colours.iter() {
      candidates.entry(colour).or_insert_with(Vec::new).push(id);
    }
    /* Most constrained blank nodes first */
    let mut order: Vec<&str> = colours.keys().copied().collect();
    order.sort_by_key(|id| (candidates[&colours[id]].len(), *id));
    Search {
      left,
      right: right.iter().copied().collect(),
      incident: incidence(left),
      order,
      colours,
      candidates,
      mapping: BiHashMap::new(),
    }
  }
  fn extend(&mut self, depth: usize) -> bool {
    if depth == self.order.len() {
      return true
    }
    let id = self.order[depth];
    let options = self.candidates[&self.colours[id]].clone();
    for candidate in options {
      /* `id` is unmapped at this depth, so this only fails on a taken candidate */
      if self.mapping.insert_no_overwrite(id, candidate).is_err() {
        continue
      }
      if self.consistent(id) && self.extend(depth + 1) {
        return true
      }
      self.mapping.remove_by_left(&id);
    }
    false
  }
  /* Every triple around `id` whose blank nodes are all mapped must
    exist on the right. */
  fn consistent(&self, id: &str) -> bool {
    self.incident[id].iter().all(|&i| {
      match self.map_triple(self.left[i]) {
        Some(mapped) => self.right.contains(&mapped),
        None => true,
      }
    })
  }
  fn map_triple(&self, triple: &'a RdfTriple) -> Option<RdfTriple> {
    let map = |node: &'a RdfNode| -> Option<RdfNode> {
      match node.blank_id() {
        Some(id) => self.mapping.get_by_left(&id).map(|&to| RdfNode::blank(to)),
        None => Some(node.clone()),
      }
    };
    Some(RdfTriple::from_checked(
      map(triple.subject())?,
      map(triple.predicate())?,
      map(triple.object())?,
    ))
  }
}

#[cfg(test)]
mod unit_tests {
  use super::*;
  use crate::{MapGraph, PrefixMappings, RdfResource};
  use rand::{SeedableRng, seq::SliceRandom, rngs::StdRng};

  fn graph(triples: Vec<RdfTriple>) -> MapGraph {
    MapGraph::mk_graph(triples, None, PrefixMappings::new())
  }
  fn b(id: &str) -> RdfResource {
    RdfResource::blank(id)
  }
  fn knows() -> RdfResource {
    RdfResource::named("http://ex/knows")
  }
  fn ring(ids: &[&str]) -> Vec<RdfTriple> {
    (0..ids.len())
      .map(|i| RdfTriple::new(b(ids[i]), knows(), RdfNode::blank(ids[(i + 1) % ids.len()])))
      .collect()
  }
  fn rename(triples: &[RdfTriple], f: &dyn Fn(&str) -> String) -> Vec<RdfTriple> {
    triples.iter().map(|t| {
      let swap = |n: &RdfNode| match n.blank_id() {
        Some(id) => RdfNode::blank(f(id)),
        None => n.clone(),
      };
      RdfTriple::from_checked(swap(t.subject()), swap(t.predicate()), swap(t.object()))
    }).collect()
  }

  #[test]
  fn ground_graphs() {
    let a = vec![RdfTriple::new("http://ex/s".into(), "http://ex/p".into(), RdfNode::raw_lit("o"))];
    let c = vec![RdfTriple::new("http://ex/s".into(), "http://ex/p".into(), RdfNode::raw_lit("O"))];
    assert!(is_isomorphic(&graph(a.clone()), &graph(a.clone())));
    assert!(!is_isomorphic(&graph(a), &graph(c)));
    assert!(is_isomorphic(&MapGraph::empty(), &MapGraph::empty()));
  }
  #[test]
  fn duplicates_do_not_matter() {
    let t = RdfTriple::new(b("x"), knows(), RdfNode::raw_lit("1"));
    let u = RdfTriple::new(b("y"), knows(), RdfNode::raw_lit("1"));
    assert!(is_isomorphic(&graph(vec![t.clone(), t]), &graph(vec![u])));
  }
  #[test]
  fn renamed_blank_node() {
    let g = vec![
      RdfTriple::new("http://ex/alice".into(), knows(), RdfNode::blank("b")),
      RdfTriple::new(b("b"), RdfResource::named("http://ex/name"), RdfNode::raw_lit("Bob")),
    ];
    let h = rename(&g, &|_| "fresh".to_string());
    assert!(is_isomorphic(&graph(g.clone()), &graph(h)));
    /* A differing non-blank node is never renamed away */
    let mut k = g.clone();
    k[1] = RdfTriple::new(b("b"), RdfResource::named("http://ex/name"), RdfNode::raw_lit("Rob"));
    assert!(!is_isomorphic(&graph(g.clone()), &graph(k)));
    /* Nor can a blank node stand in for an IRI */
    let l = vec![
      RdfTriple::new("http://ex/alice".into(), knows(), RdfNode::named("http://ex/b")),
      RdfTriple::new("http://ex/b".into(), RdfResource::named("http://ex/name"), RdfNode::raw_lit("Bob")),
    ];
    assert!(!is_isomorphic(&graph(g), &graph(l)));
  }
  #[test]
  fn shuffled_labels_on_a_ring() {
    let ids: Vec<String> = (0..12).map(|i| format!("n{}", i)).collect();
    let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let g = ring(&refs);
    let mut shuffled = ids.clone();
    shuffled.shuffle(&mut StdRng::seed_from_u64(7));
    let lookup: HashMap<String, String> = ids.iter().cloned().zip(shuffled.into_iter()).collect();
    let h = rename(&g, &|id| format!("x{}", lookup[id]));
    assert!(is_isomorphic(&graph(g), &graph(h)));
  }
  #[test]
  fn two_triangles_are_not_a_hexagon() {
    /* Every node is in-degree 1 / out-degree 1 in both, so colours
      alone cannot tell them apart. */
    let mut triangles = ring(&["a", "b", "c"]);
    triangles.extend(ring(&["d", "e", "f"]));
    let hexagon = ring(&["a", "b", "c", "d", "e", "f"]);
    assert!(!is_isomorphic(&graph(triangles.clone()), &graph(hexagon)));
    let renamed = rename(&triangles, &|id| id.to_uppercase());
    assert!(is_isomorphic(&graph(triangles), &graph(renamed)));
  }
  #[test]
  fn search_maps_blank_nodes_one_to_one() {
    /* All four nodes share a colour, so every candidate list is the full set */
    let left = ring(&["a", "b", "c", "d"]);
    let right = rename(&left, &|id| format!("r{}", id));
    let l: Vec<&RdfTriple> = left.iter().collect();
    let r: Vec<&RdfTriple> = right.iter().collect();
    let left_colours = colour_blank_nodes(&l);
    let right_colours = colour_blank_nodes(&r);
    let mut search = Search::new(&l, &r, left_colours, &right_colours);
    assert!(search.extend(0));
    assert_eq!(search.mapping.len(), 4);
    let images: HashSet<&str> = search.mapping.right_values().copied().collect();
    assert_eq!(images, ["ra", "rb", "rc", "rd"].iter().copied().collect());
    for t in &left {
      let mapped = search.map_triple(t).unwrap();
      assert!(right.contains(&mapped));
    }
  }
  #[test]
  fn blank_count_mismatch() {
    let g = vec![
      RdfTriple::new(b("x"), knows(), RdfNode::blank("y")),
      RdfTriple::new(b("y"), knows(), RdfNode::raw_lit("end")),
    ];
    let h = vec![
      RdfTriple::new(b("x"), knows(), RdfNode::blank("x")),
      RdfTriple::new(b("y"), knows(), RdfNode::raw_lit("end")),
    ];
    assert!(!is_isomorphic(&graph(g), &graph(h)));
  }
}
