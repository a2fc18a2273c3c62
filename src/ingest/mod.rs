//! Reconstruction of canonical histories from external workload logs.
//!
//! Raw logs are first turned into [`RawOperation`]s, which still use the driver's
//! method tokens, either by pairing invocation and completion lines
//! ([`pair_log`]) or by reading a SCAL operation log ([`parse_scal_log`]). A
//! [`Remapper`] then rewrites the tokens into canonical methods through a
//! [`MethodTable`] and produces the [`History`](crate::history::History).
//!
//! # Example
//! ```
//! use histgen::history::{Method, ObjectKind};
//! use histgen::ingest::{pair_log, MethodTable, Remapper};
//!
//! let raw = pair_log("[0] push(5)\n[0] push_ack(5)\n").unwrap();
//! let history = Remapper::new(MethodTable::canonical(ObjectKind::Stack))
//!     .remap(&raw)
//!     .unwrap();
//!
//! assert_eq!(history.operations()[0].method, Method::Push);
//! assert_eq!(history.to_string(), "# stack\n0 push 5 0 1\n");
//! ```

pub use self::pairing::{pair_log, render_log, EventPairer, RawOperation};
pub use self::remap::{MethodTable, Remapper};
pub use self::scal::parse_scal_log;

mod pairing;
mod remap;
mod scal;
