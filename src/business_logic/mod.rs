pub mod config;
pub mod patterns;
pub mod reasoning;
pub mod scoring;
