pub mod cli;
pub mod config;
pub mod export;
pub mod history;
pub mod llm;
pub mod paths;
pub mod quotation;
pub mod render;
pub mod util;
