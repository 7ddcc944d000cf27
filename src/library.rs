//! Audio file discovery for the chooser screen.

mod model;
mod scan;

pub use model::AudioEntry;
pub use scan::scan;
