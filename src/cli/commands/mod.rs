pub mod config;
pub mod distance;
pub mod init;
pub mod list;
pub mod run;
