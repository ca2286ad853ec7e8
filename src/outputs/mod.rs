//! Output files written by a run.
//!
//! # Submodules
//!
//! - [`ledger`]: the append-only markdown ledger, one file per source
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── lhc_judgments.md   # Lahore High Court, newest first
//! └── sc_judgments.md    # Supreme Court, newest first
//! ```

pub mod ledger;
