//! Ask an LLM for Python, pull the code out of its reply, and run it on the
//! host or in a throwaway container.

pub mod cli;
pub mod config;
pub mod execution;
pub mod extract;
pub mod handlers;
pub mod llm;
pub mod output;
pub mod printer;
pub mod role;
pub mod utils;
