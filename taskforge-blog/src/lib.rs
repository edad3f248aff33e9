//! # TaskForge Blog Library
//!
//! Server-rendered blog front-end: post listings with parameterized search,
//! anonymous commenting, and a cookie-based author login.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTML response mapping
//! - `render`: HTML page building with contextual output encoding
//! - `routes`: Page handlers

pub mod app;
pub mod config;
pub mod error;
pub mod render;
pub mod routes;
