//! rterm library
//!
//! This crate provides the command implementations, the gRPC-backed
//! remote connection, and output formatting for the rterm binary.

pub mod commands;
pub mod output;
pub mod remote;
