use std::{collections::HashMap, io, path::PathBuf};

/// Persisted key for the transient PKCE code verifier.
pub const KEY_CODE_VERIFIER: &str = "code_verifier";

/// Persisted key for the long-lived bearer access token.
pub const KEY_ACCESS_TOKEN: &str = "access_token";

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Serde(serde_json::Error),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Io(err) => write!(f, "session io error: {}", err),
            SessionError::Serde(err) => write!(f, "session serialization error: {}", err),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<io::Error> for SessionError {
    fn from(err: io::Error) -> Self {
        SessionError::Io(err)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serde(err)
    }
}

/// Injectable key/value capability holding the session's opaque strings
/// (verifier and access token). At most one of each is live at a time; all
/// writers run on the single event-processing flow, so last-writer-wins
/// without locking.
#[allow(async_fn_in_trait)]
pub trait SessionStore: Send {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    async fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

/// File-backed store: one JSON document in the platform data directory,
/// rewritten on every mutation.
pub struct FileSessionStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileSessionStore {
    pub async fn open() -> Result<Self, SessionError> {
        Self::at(Self::session_path()).await
    }

    pub async fn at(path: PathBuf) -> Result<Self, SessionError> {
        let entries = match async_fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json)?,
            Err(_) => HashMap::new(),
        };
        Ok(Self { path, entries })
    }

    async fn persist(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    fn session_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("sponowcli/cache/session.json");
        path
    }
}

impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist().await
    }

    async fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        if self.entries.remove(key).is_some() {
            self.persist().await?;
        }
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.entries.remove(key);
        Ok(())
    }
}
