//! CSV parsing: tokenizer, mapping inference, field normalizers
//!
//! Everything in this module is pure and infallible-or-soft: the tokenizer
//! always produces a table, the normalizers return `Option` per field.

mod fields;
mod mapping;
mod tokenizer;

pub use fields::{infer_type, parse_amount_minor_units, parse_date_seconds};
pub use mapping::infer_mapping;
pub use tokenizer::{detect_delimiter, tokenize, DELIMITER_CANDIDATES};
