/* IRIs of the vocabularies the test manifests are written in */

pub mod rdf {
  pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
  pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
  pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
  pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

pub mod rdfs {
  pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
}

/// Test manifest vocabulary (mf:)
pub mod mf {
  pub const MANIFEST: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#Manifest";
  pub const ENTRIES: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#entries";
  pub const NAME: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#name";
  pub const ACTION: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#action";
  pub const RESULT: &str = "http://www.w3.org/2001/sw/DataAccess/tests/test-manifest#result";
}

/// RDF test vocabulary (rdft:), used by the Turtle, N-Triples and RDF/XML suites
pub mod rdft {
  pub const NS: &str = "http://www.w3.org/ns/rdftest#";
  pub const APPROVAL: &str = "http://www.w3.org/ns/rdftest#approval";
  pub const REJECTED: &str = "http://www.w3.org/ns/rdftest#Rejected";
}
