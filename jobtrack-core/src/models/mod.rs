mod application;
mod history;

pub use application::*;
pub use history::*;
