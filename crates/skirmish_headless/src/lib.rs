//! Headless driver for the skirmish simulation.
//!
//! This crate is the replaceable I/O adapter: it owns no game rules. It
//! builds a world from configuration, feeds it a scripted command stream,
//! and writes snapshots out as JSON or text. Anything it can do, a
//! renderer or an AI harness could do through the same two calls:
//! `submit_command` and `tick`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod runner;
