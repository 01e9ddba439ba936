//! API route handlers

pub mod build;
pub mod health;
pub mod suggest;
