pub mod evaluate;
pub mod init;
pub mod list_models;
pub mod serve;
