//! HTTP trigger for refreshing an addok geocoding index.
//!
//! `POST /upload` runs `addok batch <file>` followed by `addok ngrams` and
//! relays their output. `GET /ping` is the liveness probe.
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod startup;
pub mod workers;
