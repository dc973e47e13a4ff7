//! Assistant backend integration: the responder strategy and the background
//! dispatcher that keeps the shell loop free while a request is in flight.

mod dispatcher;
mod stub;

pub use dispatcher::ReplyDispatcher;
pub use stub::StubResponderBackend;
