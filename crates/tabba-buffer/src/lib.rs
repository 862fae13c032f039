//! # Tabba Buffer
//!
//! The tab-row text model.
//!
//! ## Key Concepts
//!
//! Tab content is plain text. A "row" of tab is a *block*: one line per
//! instrument string, each line starting with a string label:
//!
//! ```text
//! e|--------------------------------------------------
//! B|--------------------------------------------------
//! G|--------------------------------------------------
//! D|--------------------------------------------------
//! A|--------------------------------------------------
//! E|--------------------------------------------------
//!
//! e|--------------------------------------------------
//! ...
//! ```
//!
//! Blocks are separated by blank lines. Everything in this crate is a
//! pure function from text to text: there is no hidden state, and
//! malformed input degrades to malformed (but never panicking) output.
//!
//! ### Ownership & Borrowing
//! - `Block<'a>` borrows its lines from the content it was parsed from
//! - Row operations take `&str` and return a new `String`

mod block;
mod instrument;
mod rows;
mod template;

pub use block::{Block, block_count, blocks, join_blocks, BLOCK_SEPARATOR};
pub use instrument::{DeviceClass, Instrument, StringLabel};
pub use rows::{add_row, delete_last_row, extract_string_labels, reset_content};
pub use template::{generate_row, RowTemplate, FILLER};
