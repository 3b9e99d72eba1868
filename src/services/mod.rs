pub mod coaching;
pub mod llm_provider;
