//! Archive-aware recursive hashing pipeline.
//!
//! The binary wires four pieces together: a [`config::RunConfig`] built
//! from the command line, the external archive tool adapter from
//! `hashdig-archive`, the scratch workspace from `hashdig-fs`, and the
//! [`engine::Engine`] that drives the traversal and feeds the
//! [`sink::Sinks`].

pub mod cli;
pub mod config;
pub mod engine;
pub mod path;
pub mod report;
pub mod sink;
