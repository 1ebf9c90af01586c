//! Catalog import client
//!
//! Maps CSV headers onto a category's attribute model, submits import jobs to
//! the catalog backend and tracks them to completion with adaptive polling.
//!
//! The pipeline: [`services::column_mapper`] proposes a mapping,
//! [`services::submitter`] validates and creates the job,
//! [`services::tracker`] polls it to a terminal state, and
//! [`services::recovery`] re-attaches to an in-flight job after a restart.

pub mod cli;
pub mod config;
pub mod error;
pub mod services;
pub mod types;
