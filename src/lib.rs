pub mod cli;
pub mod config;
pub mod convert;
pub mod inspect;
pub mod store;
pub mod sync;
