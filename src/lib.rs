//! Threatdeck - keyboard-driven control layer and data shaping for a
//! threat-intelligence dashboard.
//!
//! This library crate exposes internal modules for integration testing.

pub mod config;
pub mod data;
pub mod menu;
pub mod shortcuts;
