use std::marker::PhantomData;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{
    config,
    download::PlaylistSource,
    error::FetchError,
    spotify::auth::AuthSession,
    types::{Page, Playlist, PlaylistItem, SimplifiedPlaylist, Track},
};

/// Page size for `/me/playlists` (Spotify maximum).
const PLAYLIST_PAGE_LIMIT: u32 = 50;
/// Page size for `/playlists/{id}/tracks` (Spotify maximum).
const TRACK_PAGE_LIMIT: u32 = 100;

/// Lazy cursor over a Spotify paging object.
///
/// Each call to [`PageCursor::next_page`] fetches exactly one page and follows
/// its `next` link. Restart by building a new cursor.
pub struct PageCursor<'a, T> {
    session: &'a AuthSession,
    next: Option<String>,
    _item: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> PageCursor<'a, T> {
    pub fn new(session: &'a AuthSession, first_url: String) -> Self {
        Self {
            session,
            next: Some(first_url),
            _item: PhantomData,
        }
    }

    /// Next page of items, `None` once the last page was returned.
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>, FetchError> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        let page: Page<T> = get_json(self.session, &url).await?;
        self.next = page.next;

        Ok(Some(page.items.into_iter().flatten().collect()))
    }

    pub async fn collect_all(mut self) -> Result<Vec<T>, FetchError> {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}

async fn get_json<T: DeserializeOwned>(session: &AuthSession, url: &str) -> Result<T, FetchError> {
    let response = session
        .http()
        .get(url)
        .bearer_auth(session.access_token())
        .send()
        .await?;

    match response.status() {
        StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
        status if !status.is_success() => Err(FetchError::Status {
            status,
            url: url.to_string(),
        }),
        _ => Ok(response.json::<T>().await?),
    }
}

/// Playlists of the authorized user, read from the Spotify Web API.
pub struct SpotifyPlaylists<'a> {
    session: &'a AuthSession,
}

impl<'a> SpotifyPlaylists<'a> {
    pub fn new(session: &'a AuthSession) -> Self {
        Self { session }
    }

    pub fn playlists(&self) -> PageCursor<'a, SimplifiedPlaylist> {
        let url = format!(
            "{uri}/me/playlists?limit={limit}",
            uri = config::spotify_apiurl(),
            limit = PLAYLIST_PAGE_LIMIT
        );
        PageCursor::new(self.session, url)
    }

    pub fn tracks(&self, playlist_id: &str) -> PageCursor<'a, PlaylistItem> {
        let url = format!(
            "{uri}/playlists/{id}/tracks?limit={limit}",
            uri = config::spotify_apiurl(),
            id = playlist_id,
            limit = TRACK_PAGE_LIMIT
        );
        PageCursor::new(self.session, url)
    }
}

impl PlaylistSource for SpotifyPlaylists<'_> {
    async fn list_playlists(&self) -> Result<Vec<Playlist>, FetchError> {
        let playlists = self.playlists().collect_all().await?;
        Ok(playlists.into_iter().map(Playlist::from).collect())
    }

    async fn list_tracks(&self, playlist: &Playlist) -> Result<Vec<Track>, FetchError> {
        let items = self.tracks(&playlist.id).collect_all().await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(|track| track.into_track())
            .collect())
    }
}
