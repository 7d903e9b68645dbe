mod required_authentication_extractor;
mod validation_extractor;

pub use required_authentication_extractor::*;
pub use validation_extractor::*;
