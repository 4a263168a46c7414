mod generation;
pub use generation::*;

mod llm_result;
pub use llm_result::*;
