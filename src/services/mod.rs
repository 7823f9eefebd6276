pub mod code_sandbox;
pub mod llm_provider;
