pub mod inspect;
pub mod serve;
pub mod sync_db;



#[cfg(test)]
#[path = "sync_db_test.rs"]
mod sync_db_test;
