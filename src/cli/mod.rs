//! # CLI Module
//!
//! The interactive shell around the download pipeline. It owns everything
//! that touches the terminal: spinners, the numbered playlist menu, the
//! selection prompt and the final report. The decisions themselves live
//! elsewhere ([`crate::utils::parse_selection`] for the selection,
//! [`crate::download`] for the batch), so they can be tested without a
//! terminal.
//!
//! ## Session Flow
//!
//! ```text
//! download root ─→ authorize ─→ list playlists ─→ menu + prompt
//!                                                     ↓
//!                         report ←─ orchestrator ←─ selection
//! ```
//!
//! ## Error Handling
//!
//! - **Startup failures** (download root, authorization, playlist listing) are
//!   returned to `main`, which prints them and exits with status 1
//! - **Track failures** never leave the orchestrator; they show up in the report
//! - **Ctrl-C** during the batch prints a notice and ends the run normally

mod download;
mod report;

pub use download::{DownloadSettings, RunOutcome, download};
pub use report::{failure_rows, playlist_rows, print_summary};
