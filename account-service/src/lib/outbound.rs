pub mod random;
pub mod repositories;
