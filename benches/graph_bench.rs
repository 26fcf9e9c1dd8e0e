use criterion::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use ripple_graph::{MapGraph, RdfGraph, RdfNode, RdfResource, RdfTriple, PrefixMappings};

/* Synthetic social graph: n people, each with a few links and a name */
fn people(n: usize) -> Vec<RdfTriple> {
  let mut rng = StdRng::seed_from_u64(7);
  let knows = RdfResource::named("http://example.org/knows");
  let name = RdfResource::named("http://example.org/name");
  let person = |i: usize| RdfResource::named(format!("http://example.org/person/{}", i));
  let mut triples = Vec::with_capacity(n * 4);
  for i in 0..n {
    for _ in 0..3 {
      let other = rng.gen_range(0, n);
      triples.push(RdfTriple::new(person(i), knows.clone(), person(other).into()));
    }
    triples.push(RdfTriple::new(person(i), name.clone(), RdfNode::raw_lit(format!("Person {}", i))));
  }
  triples
}

pub fn build(c: &mut Criterion) {
  let triples = people(10_000);
  let mut group = c.benchmark_group("graph_builder");
  group.sample_size(10);
  group.bench_function("MapGraph::mk_graph() with 40k triples",
    |b| b.iter(|| MapGraph::mk_graph(black_box(triples.clone()), None, PrefixMappings::new()))
  );
  group.finish();
}

pub fn query(c: &mut Criterion) {
  let g = MapGraph::mk_graph(people(10_000), None, PrefixMappings::new());
  let s = RdfNode::named("http://example.org/person/42");
  let p = RdfNode::named("http://example.org/knows");
  let name = RdfNode::named("http://example.org/name");
  let literal = |o: &RdfNode| o.is_literal();
  let mut group = c.benchmark_group("graph_query");
  group.bench_function("sp_ key lookup",
    |b| b.iter(|| g.query(black_box(Some(&s)), black_box(Some(&p)), None))
  );
  group.bench_function("_p_ scan",
    |b| b.iter(|| g.query(None, black_box(Some(&name)), None))
  );
  group.bench_function("select literals",
    |b| b.iter(|| g.select(None, None, Some(&literal)))
  );
  group.finish();
}

criterion_group!(benches, build, query);
criterion_main!(benches);
