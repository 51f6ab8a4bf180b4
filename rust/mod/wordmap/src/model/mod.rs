mod user;
mod word_input;
mod session;

pub use user::*;
pub use word_input::*;
pub use session::*;
