//! stockdash: single-symbol stock price dashboard.
//!
//! Hexagonal architecture: the metrics engine and view formatting live in
//! [`domain`], port traits in [`ports`], concrete data sources, report
//! writers and the web server in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;
