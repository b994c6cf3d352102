//! This crate allows to read and write `.bib` files in pure, safe rust.
//!
//! `.bib` files are popular in reference management since many resources
//! allow to export metadata in a BibTeχ file. One entry
//! in such a file can look like this:
//!
//! ```tex
//! @book{DBLP:books/aw/Knuth73a,
//!     author    = {Donald E. Knuth},
//!     title     = {The Art of Computer Programming, Volume {I:} Fundamental Algorithms,
//!                  2nd Edition},
//!     publisher = "Addison-Wesley",
//!     year      = 1973,
//!     note      = "ISBN " # {0201038218},
//! }
//! ```
//!
//! In this example, we call `book` the `kind` or `type` and `DBLP:books/aw/Knuth73a` the `key`.
//! Then we have a sequence of fields with a `name` (like `year`) and `data` (like `1973`).
//! Data is given in `{braces}`, in `"double quotes"`, as a bare number or name, or as
//! several of those joined with `#`. Lines starting with `%` are comments.
//!
//! Its API is built around the idea of iterating over the bib file's entries.
//! Entries are produced lazily; the first malformed construct ends the iteration
//! with a [`ParseError`] carrying line and column, while entries yielded before
//! stay valid:
//!
//! ```rust
//! use bibstream::Parser;
//! use std::str::FromStr;
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     //let p = Parser::from_file("source.bib")?;
//!     let p = Parser::from_str(r#"@book{tolkien1937, author = {J. R. R. Tolkien}}"#)?;
//!     for result in p.iter() {
//!         let entry = result?;
//!         println!("type = {}", entry.kind);
//!         println!("key = {}", entry.key);
//!         for (name, data) in entry.fields() {
//!             println!("\t{}\t= {}", name, data);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Field names are case-insensitive. Entries are written back with a [`Writer`]:
//!
//! ```rust
//! use bibstream::{to_bibtex_string, BibEntry, WriterConfig};
//! let mut entry = BibEntry::new();
//! entry.kind = "book".to_string();
//! entry.key = "tolkien1937".to_string();
//! entry.set("Author", "J. R. R. Tolkien");
//! assert_eq!(&entry["AUTHOR"], "J. R. R. Tolkien");
//! assert_eq!(
//!     to_bibtex_string(&[entry], &WriterConfig::default()),
//!     "@book{tolkien1937,\n    author = {J. R. R. Tolkien}\n}\n"
//! );
//! ```
//!
//! The entire source string is kept in memory, but tokens and entries are
//! only produced on demand.

mod config;
mod errors;
mod lexer;
mod parser;
mod types;
mod writer;

pub use crate::config::{ParserConfig, WriterConfig};
pub use crate::errors::ParseError;
pub use crate::lexer::{Position, TokenKind};
pub use crate::parser::BibEntries;
pub use crate::parser::Parser;
pub use crate::types::BibEntry;
pub use crate::writer::{to_bibtex_string, Writer};
