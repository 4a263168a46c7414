mod agent_plan;
pub use agent_plan::*;

mod generate_result;
pub use generate_result::*;

mod streaming;
pub use streaming::*;
