mod speech_repository;

pub use speech_repository::*;
