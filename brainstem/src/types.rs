/// Primitive BrainSTEM API data types and NewType-patterns.
mod stem_url;
mod strings;

pub use stem_url::*;
pub use strings::*;
