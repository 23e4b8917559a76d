//! HTTP handlers for babel-service.

pub mod health;
pub mod memes;
pub mod translate;
