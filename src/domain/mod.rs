pub mod constants;
pub mod hybrid;
pub mod registry;
pub mod verification;
