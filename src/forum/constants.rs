//! Shared constants for forum validation and limits.

// =============================================================================
// Tree Shape
// =============================================================================

/// Deepest depth a post may have. Roots sit at depth 0, so the forest holds
/// at most three levels and replies are only accepted on nodes shallower
/// than this.
pub const MAX_REPLY_DEPTH: usize = 2;

// =============================================================================
// Content Size Limits
// =============================================================================

/// Default maximum post body size after trimming (10KB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024;

/// Hard ceiling for a configured body size (100KB).
pub const MAX_BODY_SIZE_LIMIT: usize = 100 * 1024;

// =============================================================================
// Calling Layer
// =============================================================================

/// Default artificial latency applied by the async client (milliseconds).
pub const DEFAULT_LATENCY_MS: u64 = 0;

/// Largest artificial latency accepted from configuration (10 seconds).
pub const MAX_LATENCY_MS: u64 = 10_000;
