pub mod inputs;
pub mod output;
pub mod parallel;

pub use inputs::expand_inputs;
pub use output::write_containers;
pub use parallel::{parallel_compile, FileResult};
