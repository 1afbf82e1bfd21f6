mod callback;
mod health;

pub use callback::callback;
pub use callback::read_reply;
pub use health::health;
