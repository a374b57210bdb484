//! sysreportctl - command-line front end for sysreport

pub mod cli;
pub mod commands;
pub mod errors;
pub mod logging;
