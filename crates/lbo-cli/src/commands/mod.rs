pub mod lbo;
pub mod prompt;
