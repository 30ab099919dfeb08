use serde_json::json;
use sponowcli::types::{CurrentlyPlayingResponse, PlaybackSnapshot};

// Helper function to build a provider playback response body
fn playback_body(item: serde_json::Value) -> serde_json::Value {
    json!({
        "is_playing": true,
        "progress_ms": 42_000,
        "item": item
    })
}

#[test]
fn test_snapshot_maps_playing_track() {
    let body = playback_body(json!({
        "id": "track1",
        "name": "Song",
        "duration_ms": 180_000,
        "album": {
            "name": "Album",
            "images": [ { "url": "https://img/640" }, { "url": "https://img/300" } ]
        },
        "artists": [ { "name": "A" }, { "name": "B" } ]
    }));

    let res: CurrentlyPlayingResponse = serde_json::from_value(body).unwrap();
    let snapshot = PlaybackSnapshot::from_response(res).unwrap();

    assert!(snapshot.is_playing);
    assert_eq!(snapshot.progress_ms, 42_000);
    assert_eq!(snapshot.duration_ms, 180_000);
    assert_eq!(snapshot.track_id, "track1");
    assert_eq!(snapshot.track_name, "Song");

    // Multiple artists are joined with ", "
    assert_eq!(snapshot.artist_names, "A, B");

    assert_eq!(snapshot.album_name, "Album");

    // The first album image wins
    assert_eq!(snapshot.album_image.as_deref(), Some("https://img/640"));
}

#[test]
fn test_snapshot_null_item_maps_to_none() {
    let body = playback_body(serde_json::Value::Null);
    let res: CurrentlyPlayingResponse = serde_json::from_value(body).unwrap();
    assert!(PlaybackSnapshot::from_response(res).is_none());
}

#[test]
fn test_snapshot_missing_progress_defaults_to_zero() {
    let body = json!({
        "is_playing": false,
        "progress_ms": null,
        "item": {
            "id": "track1",
            "name": "Song",
            "duration_ms": 1000,
            "album": { "name": "Album", "images": [] },
            "artists": [ { "name": "A" } ]
        }
    });

    let res: CurrentlyPlayingResponse = serde_json::from_value(body).unwrap();
    let snapshot = PlaybackSnapshot::from_response(res).unwrap();

    assert!(!snapshot.is_playing);
    assert_eq!(snapshot.progress_ms, 0);

    // No album images means no image URL, not an error
    assert!(snapshot.album_image.is_none());
}

#[test]
fn test_malformed_body_fails_to_decode() {
    // Missing is_playing and an item with the wrong shape must surface as
    // a decode error, never as defaulted fields.
    let body = json!({ "progress_ms": "not-a-number" });
    assert!(serde_json::from_value::<CurrentlyPlayingResponse>(body).is_err());

    let body = json!({
        "is_playing": true,
        "progress_ms": 1,
        "item": { "id": "x" }
    });
    assert!(serde_json::from_value::<CurrentlyPlayingResponse>(body).is_err());
}
