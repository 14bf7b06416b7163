pub mod assembler;
pub mod entropy;
pub mod fit;
pub mod functional;
pub mod handle;
pub mod histogram;
pub mod moments;
pub mod resolver;
pub mod result;

pub use assembler::Assembler;
pub use fit::{FitError, Fitted};
pub use functional::Functional;
pub use histogram::Histogram;
pub use moments::Moments;
pub use resolver::{resolve, ResolvedDistribution};
pub use result::{Column, GenerationResult, Grid, Table, STAT_KEYS};
