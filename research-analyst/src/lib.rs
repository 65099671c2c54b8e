// Run archive (SQLite)
pub mod archive;

// Language model and web search backends
pub mod backends;

// Environment configuration
pub mod config;

// Terminal rendering and report export
pub mod render;

// Research workflow module
pub mod research;

// Agent and batch helpers shared by the workflow stages
pub mod workflow_utils;
