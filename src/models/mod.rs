pub mod advice;
pub mod dataset;
pub mod reading;
pub mod transcript;
pub mod verdict;

pub use advice::*;
pub use dataset::*;
pub use reading::*;
pub use transcript::*;
pub use verdict::*;
