//! Concrete passes.

pub mod dce;
pub mod round_product;

pub use dce::DeadCodeElimination;
pub use round_product::RoundProduct;
