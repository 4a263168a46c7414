mod sse;
pub use sse::*;

mod sse_generation;
pub use sse_generation::*;
