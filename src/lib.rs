//! barstat: deterministic time-series statistics over OHLCV bars.
//!
//! Hexagonal architecture: the analytics engine lives in [`domain`], port
//! traits in [`ports`], concrete implementations in [`adapters`], and the
//! command-line front end in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
