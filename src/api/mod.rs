//! HTTP demo authentication service

pub mod routes;
pub mod server;

pub use server::*;
