mod speeches;

pub use speeches::*;
