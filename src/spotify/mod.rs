//! # Spotify Integration Module
//!
//! This module is the interface to the Spotify Web API used by spyt. It
//! covers the two things the downloader needs from Spotify: an authorized
//! session and the user's playlists with their tracks.
//!
//! ## Architecture
//!
//! ```text
//! CLI shell
//!     ↓
//! Spotify Integration Layer
//!     ├── Authorization (OAuth 2.0 authorization code, client secret)
//!     └── Playlists (paged listing of playlists and playlist tracks)
//!     ↓
//! HTTP Layer (reqwest, JSON)
//!     ↓
//! Spotify Web API
//! ```
//!
//! ## Authorization
//!
//! [`auth`] runs the authorization-code flow:
//! - **Token Reuse**: a cached token for the same client id is reused and refreshed
//!   when it is about to expire
//! - **Browser Integration**: the consent page is opened in the default browser
//! - **Local Callback Server**: a temporary listener on the redirect port captures the code
//! - **State Check**: a random `state` value guards the callback against forged redirects
//!
//! The result is an [`auth::AuthSession`] that lives for one run and is
//! handed by reference to everything that talks to the API.
//!
//! ## Playlists
//!
//! [`playlists`] implements [`crate::download::PlaylistSource`]. Listings are
//! paged; [`playlists::PageCursor`] fetches one page per call and follows the
//! `next` link Spotify returns. Entries without a track object, local files and
//! podcast episodes are skipped.
//!
//! ## Error Handling
//!
//! - Authorization problems surface as [`crate::error::AuthError`]
//! - Listing problems surface as [`crate::error::FetchError`]. HTTP 401 on a
//!   cached token drops the cache entry and runs the consent flow once more
//!   ([`auth::reauthorize`])
//! - No request is retried

pub mod auth;
pub mod playlists;
