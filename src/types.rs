use serde::{Deserialize, Serialize};

/// Outcome of the OAuth redirect delivered by the local callback server.
#[derive(Debug, Clone)]
pub enum AuthCallback {
    Code(String),
    Denied(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    pub product: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlayingResponse {
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub item: Option<TrackItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    pub album: AlbumRef,
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

/// Immutable point-in-time view of what is currently playing. Replaced
/// wholesale on every successful poll tick; absence of a snapshot means
/// nothing is playing (or nothing is known yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub progress_ms: u64,
    pub duration_ms: u64,
    pub track_id: String,
    pub track_name: String,
    pub artist_names: String,
    pub album_name: String,
    pub album_image: Option<String>,
}

impl PlaybackSnapshot {
    /// Normalizes the provider's wire shape. A response without an `item`
    /// maps to `None`, which keeps the "no track implies no track fields"
    /// invariant structural instead of a pile of nullable fields.
    pub fn from_response(res: CurrentlyPlayingResponse) -> Option<Self> {
        let item = res.item?;
        Some(Self {
            is_playing: res.is_playing,
            progress_ms: res.progress_ms.unwrap_or(0),
            duration_ms: item.duration_ms,
            track_id: item.id,
            track_name: item.name,
            artist_names: item
                .artists
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            album_name: item.album.name,
            album_image: item.album.images.first().map(|i| i.url.clone()),
        })
    }
}
