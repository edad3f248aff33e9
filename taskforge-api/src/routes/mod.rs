/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `tasks`: Owner-scoped task CRUD and comments
/// - `projects`: Owner-scoped project CRUD
/// - `admin`: Cross-owner listings and user management

pub mod admin;
pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
