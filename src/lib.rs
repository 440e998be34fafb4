//! Reassembles an agent's streamed turn output into a single transcript.
//!
//! The wire side decodes `data: `-prefixed event lines out of arbitrarily
//! chunked bytes; the transcript side folds the decoded events into ordered
//! text and tool blocks, reconciling incremental deltas against the
//! finalized message snapshots that follow them.

pub mod collect;
pub mod test_support;
pub mod transcript;
pub mod types;
pub mod util;
pub mod wire;
