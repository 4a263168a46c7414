pub mod llm;
pub mod schemas;
pub mod stream;
