//! Append-only segment log for a single project.
//!
//! Each line of the log is one [`Segment`]. Lines are never rewritten: closing
//! a segment appends a second line with the same anchor and start and a
//! populated end. The last line in the file is the authoritative current state;
//! earlier lines sharing an `(anchor, start)` pair are superseded history.
//!
//! ## Usage
//! ```rust,ignore
//! use worktimer_core::journal::{LogStore, Segment};
//!
//! let log = LogStore::discover(&project_dir, ".timer");
//! if let Some(latest) = log.latest()? {
//!     if latest.is_open() {
//!         log.append(&latest.closed_at(now))?;
//!     }
//! }
//! ```

mod segment;
mod store;

pub use segment::{closed_segments, Segment, TIMESTAMP_FORMAT};
pub use store::{candidate_dirs, LogStore, Segments};
