//! Abstraction over token storage. The library never persists
//! credentials itself and never prompts; callers plug in whatever
//! backing store they use.

use anyhow::Result;

/// A place a session token can be read from and written to.
pub trait TokenStore {
    fn load(&self) -> Result<Option<String>>;
    fn store(&mut self, token: &str) -> Result<()>;
}

/// Keeps the token for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Option<String>,
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn store(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryTokenStore::default();
        assert_eq!(store.load().unwrap(), None);
        store.store("sesame").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("sesame"));
    }
}
