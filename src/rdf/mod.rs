pub mod parser;
pub mod vocab;
