// User Interface Module
// Command line front end and the session that holds the current key pair

pub mod cli;
pub mod session;

pub use session::Session;
