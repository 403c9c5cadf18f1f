pub(crate) mod error;
pub(crate) mod speeches;

pub(crate) use error::ApiError;
