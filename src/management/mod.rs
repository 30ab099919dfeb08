mod session;

pub use session::FileSessionStore;
pub use session::KEY_ACCESS_TOKEN;
pub use session::KEY_CODE_VERIFIER;
pub use session::MemorySessionStore;
pub use session::SessionError;
pub use session::SessionStore;
