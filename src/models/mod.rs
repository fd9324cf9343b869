mod planning;
mod templates;
mod variables;

pub use planning::*;
pub use templates::*;
pub use variables::*;
