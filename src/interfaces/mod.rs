//! Outer surfaces: the embedded router endpoint and the static web server.

pub mod rpc;
pub mod web;
