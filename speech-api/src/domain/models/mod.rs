mod ids;
mod speech;

pub use ids::*;
pub use speech::*;
