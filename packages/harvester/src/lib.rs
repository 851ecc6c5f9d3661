//! BIC Harvester - Download and flatten the Bank of Russia BIC directory.
//!
//! The Bank of Russia periodically publishes its directory of bank routing
//! identifiers (BICs) as a zipped, windows-1251-encoded XML file. This crate
//! fetches the archive, extracts and decodes the single contained document,
//! parses it into a generic tree, and flattens every directory entry's
//! correspondent accounts into `(bic, name, corrAccount)` records ready for
//! an external data store.
//!
//! # Example
//!
//! ```no_run
//! use bic_harvester::{harvest, ArchiveSource};
//!
//! # fn main() -> bic_harvester::Result<()> {
//! let source = ArchiveSource::new("http://www.cbr.ru/s/newbik", "downloads/bik");
//! let records = harvest(&source)?;
//! for record in &records {
//!     println!("{} {} {}", record.bic, record.name, record.corr_account);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The pipeline runs its stages strictly in order, each a pure
//! transformation feeding the next:
//!
//! - [`fetch`]: HTTP retrieval of the published archive
//! - [`archive`]: single-entry zip extraction
//! - [`encoding`]: windows-1251 to UTF-8 decoding
//! - [`tree`]: schema-tolerant XML parsing with sequence coercion
//! - [`records`]: flattening entries into output records
//! - [`harvester`]: orchestration of the above
//! - [`config`]: constants and validation
//! - [`error`]: error types and Result alias
//! - [`cli`]: command-line interface

pub mod archive;
pub mod cli;
pub mod config;
pub mod encoding;
pub mod error;
pub mod fetch;
pub mod harvester;
pub mod records;
pub mod tree;

// Re-export the main entry points
pub use harvester::{flatten_document, harvest, ArchiveSource};

// Re-export commonly used items
pub use error::{HarvesterError, Result};
pub use records::OutputRecord;
pub use tree::{ParsedTree, SequenceRules, XmlElement, XmlValue};
