//! Runtime module: logging and parser bootstrap for embedding programs.

pub mod boot;
