#![warn(rust_2018_idioms)]

pub mod config;
pub mod description;
pub mod diagnostic;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod rules;
pub mod util;

pub use config::Config;
pub use diagnostic::Diagnostic;
pub use error::{Error, Result};
pub use lexer::Document;

/// check validates an SDP document against the full rule catalog and returns
/// every finding in catalog order. An empty result means the document
/// conforms under `config`.
pub fn check(text: &str, config: &Config) -> Result<Vec<Diagnostic>> {
    let document = Document::new(text)?;
    Ok(rules::all_sections(&document, config))
}
