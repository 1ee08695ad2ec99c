pub mod optimize;
pub mod pages;

pub use optimize::*;
pub use pages::*;
