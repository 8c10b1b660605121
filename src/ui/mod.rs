pub mod progress;
pub mod report;
pub mod table;

pub use progress::Spinner;
pub use report::{heading, print_already_initialized, print_import, print_references, print_stats};
