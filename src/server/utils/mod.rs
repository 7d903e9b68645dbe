pub mod clock_utils;
pub mod ownership_utils;
pub mod scoring_utils;
pub mod token_utils;
