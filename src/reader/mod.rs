//! XML Reader Module
//!
//! - BufferedReader: growable read buffer that owns the byte source
//! - Events: reduced event vocabulary for the row decoder
//! - TokenStream: adapter that filters tokenizer output into events

pub mod buffered;
pub mod events;
pub mod tokens;
