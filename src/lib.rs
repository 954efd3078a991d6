pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod schedule;
pub mod state;
pub mod validate;
