pub mod catalog;
pub mod record;
pub mod store;
pub mod user_directory;
