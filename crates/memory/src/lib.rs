//! Memory interchange and persistence for ReadAgent.
//!
//! - [`codec`]: the index-annotated text form of gists and pages
//! - [`file_store`]: the JSON files a memory lives in between runs

pub mod codec;
pub mod file_store;

pub use codec::{
    join_paragraphs, parse_gists, parse_pages, parse_string_list, render_gists, render_pages,
    render_string_list, split_paragraphs,
};
pub use file_store::{MemoryStore, load_paragraphs_file};
