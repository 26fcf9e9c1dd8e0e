
type Source<E> = Box<E>;

#[derive(Debug)]
pub enum ParserError {
  Io(Source<std::io::Error>),
  Turtle(Source<rio_turtle::TurtleError>),
  RdfXml(Source<rio_xml::RdfXmlError>),
  BadBaseIri(String, String),
  UnsupportedTerm(String),
  UnknownSyntax(std::path::PathBuf),
}
impl std::error::Error for ParserError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    use ParserError::*;
    match self {
      Io(e) => Some(&**e),
      Turtle(e) => Some(&**e),
      RdfXml(e) => Some(&**e),
      _ => None,
    }
  }
}
impl std::fmt::Display for ParserError {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    use ParserError::*;
    match self {
      Io(e) => write!(f, "{}", *e),
      Turtle(e) => write!(f, "{}", *e),
      RdfXml(e) => write!(f, "{}", *e),
      BadBaseIri(iri, reason) => write!(f, "Base IRI <{}> is not a valid absolute IRI: {}", iri, reason),
      UnsupportedTerm(term) => write!(f, "Cannot represent {} as a RippleGraph node", term),
      UnknownSyntax(path) => write!(f, "Could not tell which RDF syntax {} is written in, set ParserConfig.syntax", path.display()),
    }
  }
}
impl From<std::io::Error> for ParserError {
  fn from(err: std::io::Error) -> ParserError {
    ParserError::Io(Box::new(err))
  }
}
impl From<rio_turtle::TurtleError> for ParserError {
  fn from(err: rio_turtle::TurtleError) -> ParserError {
    ParserError::Turtle(Box::new(err))
  }
}
impl From<rio_xml::RdfXmlError> for ParserError {
  fn from(err: rio_xml::RdfXmlError) -> ParserError {
    ParserError::RdfXml(Box::new(err))
  }
}

/* Failures loading or running a whole suite */
#[derive(Debug)]
pub enum HarnessError {
  Io(Source<std::io::Error>),
  Serde(Source<serde_json::Error>),
  Parser(Source<ParserError>),
  MissingManifest(std::path::PathBuf),
  InvalidManifest(String, std::path::PathBuf),
  FailedTests(usize, String),
}
impl std::error::Error for HarnessError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    use HarnessError::*;
    match self {
      Io(e) => Some(&**e),
      Serde(e) => Some(&**e),
      Parser(e) => Some(&**e),
      _ => None,
    }
  }
}
impl std::fmt::Display for HarnessError {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    use HarnessError::*;
    match self {
      Io(e) => write!(f, "{}", *e),
      Serde(e) => write!(f, "{}", *e),
      Parser(e) => write!(f, "Manifest could not be parsed: {}", *e),
      MissingManifest(path) => write!(f, "Test manifest does not exist at {}", path.display()),
      InvalidManifest(reason, path) => write!(f, "Test manifest at {} is invalid: {}", path.display(), reason),
      FailedTests(count, details) => write!(f, "{} failing test(s):\n\n{}", count, details),
    }
  }
}
impl From<std::io::Error> for HarnessError {
  fn from(err: std::io::Error) -> HarnessError {
    HarnessError::Io(Box::new(err))
  }
}
impl From<serde_json::Error> for HarnessError {
  fn from(err: serde_json::Error) -> HarnessError {
    HarnessError::Serde(Box::new(err))
  }
}
impl From<ParserError> for HarnessError {
  fn from(err: ParserError) -> HarnessError {
    HarnessError::Parser(Box::new(err))
  }
}

/* Why a single generated test case did not pass */
#[derive(Debug)]
pub enum HarnessFailure {
  UnexpectedParseFailure(String, Source<ParserError>),
  UnexpectedParseSuccess(String),
  NotIsomorphic(String, String),
  UnresolvedLocator(String),
}
impl std::error::Error for HarnessFailure {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    use HarnessFailure::*;
    match self {
      UnexpectedParseFailure(_, e) => Some(&**e),
      _ => None,
    }
  }
}
impl std::fmt::Display for HarnessFailure {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    use HarnessFailure::*;
    match self {
      UnexpectedParseFailure(locator, e) => write!(f, "{} should parse but was rejected: {}", locator, *e),
      UnexpectedParseSuccess(locator) => write!(f, "{} should be rejected but parsed", locator),
      NotIsomorphic(action, expected) => write!(f, "Graph parsed from {} is not isomorphic to {}", action, expected),
      UnresolvedLocator(locator) => write!(f, "{} does not point at a file under the suite's base directory", locator),
    }
  }
}
