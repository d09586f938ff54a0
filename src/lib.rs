//! Weather lookup TUI
//!
//! Current conditions by city name or current location, with a short list of
//! recent searches. The library exposes the store pieces and I/O services so the
//! binary stays a thin terminal shell and everything else can be tested.

pub mod action;
pub mod api;
pub mod components;
pub mod conditions;
pub mod config;
pub mod effect;
pub mod geo;
pub mod reducer;
pub mod services;
pub mod state;
pub mod store;
