//! One adapter per upstream. Each takes already-extracted request parameters,
//! validates them, calls its upstream(s) through the shared `UpstreamClient`
//! and maps the answer onto a payload from `data_models`.

pub mod dictionary;
pub mod feeds;
pub mod images;
pub mod lyrics;
pub mod maps;
pub mod news;
pub mod screenshot;
pub mod slang;
pub mod unicode;
pub mod weather;
pub mod web_search;
