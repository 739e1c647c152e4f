//! Latest-request-wins guard for superseding async operations.
//!
//! The session issues a fresh token for every level request and applies an
//! async outcome only if its token is still the newest one issued. Stale
//! completions are discarded at that single comparison point instead of
//! flag checks scattered across call sites.

/// Token identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Numeric value, used only for logging.
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Monotonic token allocator owned by a single session.
#[derive(Debug, Default)]
pub struct RequestGuard {
    latest: u64,
}

impl RequestGuard {
    /// Creates a guard with no requests issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a token strictly greater than every previous one.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Whether `token` is still the newest issued token.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}
