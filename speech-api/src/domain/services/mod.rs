mod speeches;

pub use speeches::SpeechServiceImpl;
