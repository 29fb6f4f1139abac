//! Constants for neighbor lookup, position hashing, and CLI defaults.
//!
//! Board dimensions are chosen at runtime (every topology takes its own
//! width and height), so unlike a fixed-size engine there is no compile-time
//! board size here.

// =============================================================================
// Neighbor Offsets
// =============================================================================

/// Offsets to the four cardinal neighbors of a point, as `(dx, dy)`.
/// Order: West, East, North, South.
///
/// These are applied to a canonical coordinate and the result is passed
/// through the topology to find the real neighbor, if any.
pub const DIRECTIONS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// =============================================================================
// Position Hashing
// =============================================================================

/// Seed for the Zobrist key stream. Fixed so hashes are stable across runs
/// and across serialized games.
pub const ZOBRIST_SEED: u64 = 0x5EED_0F_60_B0A2D;

// =============================================================================
// CLI Defaults
// =============================================================================

/// Board width used when no game has been configured yet.
pub const DEFAULT_WIDTH: usize = 9;

/// Board height used when no game has been configured yet.
pub const DEFAULT_HEIGHT: usize = 9;

/// Number of random moves played by the demo.
pub const DEMO_MOVES: usize = 40;

/// Seed for the demo's random move choice.
pub const DEMO_SEED: u64 = 1;
