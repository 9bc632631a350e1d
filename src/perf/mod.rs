pub mod layout;
pub mod palette;
pub mod types;
pub mod viz;

// Re-export commonly used types and functions for convenience
pub use layout::*;
pub use palette::*;
pub use types::*;
pub use viz::*;
