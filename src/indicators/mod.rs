pub mod momentum;
pub mod volatility;

pub use momentum::*;
pub use volatility::*;
