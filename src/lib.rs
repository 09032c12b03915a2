#![doc = include_str!("../readme.md")]
pub mod config;
pub mod fetch;
pub mod font_format;
pub mod localize;
pub mod stylesheet;

mod magic_numbers;

#[cfg(test)]
mod test_resources;

pub use config::Config;
pub use fetch::{FetchError, FontFetcher, HttpFetcher};
pub use localize::{localize_stylesheet, LocalizeError};
