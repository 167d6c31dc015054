//! Zahab Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing the router to be spawned in-process by the integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod rates;
pub mod routes;
pub mod services;
pub mod state;
