pub mod interaction;
pub mod report;
pub mod user;
