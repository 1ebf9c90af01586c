//! Import pipeline services

pub mod api_client;
pub mod column_mapper;
pub mod recovery;
pub mod submitter;
pub mod tracker;
