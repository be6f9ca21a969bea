//! workaudit - rule and checklist evaluation for audit work papers
//!
//! Managers define attributes (validation rules or checklist criteria),
//! auditors submit work papers, and the engine turns one paper plus the
//! current attribute set into findings, a compliance score and a
//! narrative conclusion.

pub mod attribute;
pub mod audit;
pub mod cli;
pub mod conclusion;
pub mod config;
pub mod engine;
pub mod http_server;
pub mod observability;
pub mod workpaper;
