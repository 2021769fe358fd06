//! Session configuration.

/// Tunables for one editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Remote collection holding one document per page.
    pub collection: String,
    /// Fixed local-store key holding the serialized page array.
    pub local_key: String,
    /// Quiet period before a content edit is saved.
    pub save_debounce_ms: i64,
    /// How long after blur the session still counts as actively editing.
    pub edit_grace_ms: i64,
    /// How long to wait for the first remote snapshot before loading the
    /// local store instead.
    pub remote_ready_timeout_ms: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            collection: "pages".to_string(),
            local_key: "blockpad.pages".to_string(),
            save_debounce_ms: 500,
            edit_grace_ms: 500,
            remote_ready_timeout_ms: 3_000,
        }
    }
}
