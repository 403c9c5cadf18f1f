mod speeches;

pub use speeches::PostgresSpeechRepository;
