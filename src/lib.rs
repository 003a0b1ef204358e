//! Stagemake core library.
//!
//! Stagemake is a make-style build orchestrator. A manifest maps target names
//! to a recipe and a whitespace separated prerequisite list. The library
//! stages the targets reachable from a goal, keeps only the stale ones, and
//! runs their recipes strictly one after another, stopping at the first
//! failure.
//!
//! The pipeline is split into pure steps so callers can inspect every
//! intermediate result:
//!
//! 1. [`manifest`] loads the file and resolves a [`ir::TargetSet`].
//! 2. [`ir::TargetSet::stage`] produces the ordered stages.
//! 3. [`plan::plan`] filters them into the build sequence.
//! 4. [`runner::execute`] runs the sequence.

pub mod ast;
pub mod cli;
pub mod fs;
pub mod ir;
pub mod manifest;
pub mod plan;
pub mod report;
pub mod runner;
