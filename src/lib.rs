pub mod config;
pub mod nlp;
pub mod notify;
