pub mod badge;
pub mod constants;
pub mod directory;
pub mod error;
pub mod models;
pub mod rating;
pub mod session;
pub mod tags;
pub mod types;
