//! ID generation utilities.

use ulid::Ulid;

/// ID generator for hidden records.
///
/// Content rows keep the integer IDs assigned by their feature modules; only
/// rows owned by this subsystem get generated IDs.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new lowercase ULID.
    ///
    /// Sortable by creation time, which keeps `hidden_record` listings in
    /// the order hides were issued.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}
