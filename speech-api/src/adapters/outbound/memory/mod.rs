mod speeches;

pub use speeches::InMemorySpeechRepository;
