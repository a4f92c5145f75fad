//! Reads .xfmv documents into raw function and connection records.
pub mod xfmv;

pub use xfmv::{
    parse_bytes, parse_file, parse_str, AspectAttributes, AspectReference, ConnectionRecord, ParsedDocument,
};
