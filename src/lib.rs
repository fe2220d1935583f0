//! `fuzzfind` - Fuzzy path matching for go-to-file pickers.
//!
//! Given a rooted collection of directories and files and a short query such
//! as `mod/stry`, the engine finds every file whose path could plausibly be
//! abbreviated by the query, scores each match between 0 and 1, and renders
//! a highlighted and an abbreviated form of the matched path.

#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]

pub mod crawler;
pub mod error;
pub mod query;
mod score;
pub mod search;
pub mod tree;
pub mod types;
