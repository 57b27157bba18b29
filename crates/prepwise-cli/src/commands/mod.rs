pub mod evaluate;
pub mod history;
pub mod init;
pub mod validate;
