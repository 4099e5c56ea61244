// Command-line front end for the ranking pipeline: configuration, output
// files and the run sequence.

pub mod config;
pub mod histogram;
pub mod report;
pub mod runner;
