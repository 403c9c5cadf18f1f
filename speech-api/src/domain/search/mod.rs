//! Composite speech search.
//!
//! A search takes any combination of four independent criteria:
//!
//! - **author**: case-insensitive substring of the author name
//! - **date range**: inclusive `from`/`to` bounds on the speech date, either
//!   bound optional
//! - **keyword**: case-insensitive substring of any keyword
//! - **text**: case-insensitive substring of the speech text
//!
//! Blank strings count as "not supplied". With nothing supplied the search
//! returns every speech; otherwise it returns the speeches matching all of
//! them (see [`SpeechSearchEngine`]).

mod criteria;
mod engine;

pub use criteria::SearchCriteria;
pub use engine::SpeechSearchEngine;
