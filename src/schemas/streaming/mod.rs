mod generation_info_cell;
pub use generation_info_cell::*;

mod streaming_generation;
pub use streaming_generation::*;

mod llm_streaming_result;
pub use llm_streaming_result::*;
