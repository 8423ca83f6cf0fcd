use anyhow::{Context, Result};
use std::path::Path;

use super::track::{Track, TrackStatus};

/// Read-only repository of baseline track records.
///
/// The catalog is append/remove free by design: it is seeded once at startup
/// and shared behind an `Arc` for the lifetime of the process.
pub trait TrackCatalog: Send + Sync {
    /// All tracks in catalog order.
    fn list(&self) -> Vec<Track>;

    fn get_by_id(&self, id: &str) -> Option<Track>;
}

pub struct InMemoryCatalog {
    tracks: Vec<Track>,
}

impl InMemoryCatalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Load a catalog from a JSON file containing an array of tracks.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {:?}", path))?;
        let tracks: Vec<Track> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog file {:?}", path))?;
        Ok(Self::new(tracks))
    }

    /// Built-in reference catalog, used when no catalog file is configured.
    pub fn demo() -> Self {
        Self::new(vec![
            Track {
                id: "1".to_string(),
                isrc: "USRC12345678".to_string(),
                name: "Moonlight Serenade".to_string(),
                artist: "Luna Ray".to_string(),
                current_streams: 12500,
                previous_streams: 12000,
                playlist_source: "Soundcharts Top 100".to_string(),
                skip_rate: 0.12,
                status: TrackStatus::Green,
            },
            Track {
                id: "2".to_string(),
                isrc: "USRC87654321".to_string(),
                name: "Midnight Pulse".to_string(),
                artist: "Neon Shadow".to_string(),
                current_streams: 45000,
                previous_streams: 20000,
                playlist_source: "Spotify Bot-Farm Helper".to_string(),
                skip_rate: 0.55,
                status: TrackStatus::Red,
            },
            Track {
                id: "3".to_string(),
                isrc: "USRC11223344".to_string(),
                name: "Sunset Drift".to_string(),
                artist: "Vibe Master".to_string(),
                current_streams: 8000,
                previous_streams: 7500,
                playlist_source: "Spotify Chill Vibes".to_string(),
                skip_rate: 0.18,
                status: TrackStatus::Green,
            },
            Track {
                id: "4".to_string(),
                isrc: "USRC44332211".to_string(),
                name: "Velocity".to_string(),
                artist: "Turbo Trax".to_string(),
                current_streams: 32000,
                previous_streams: 28000,
                playlist_source: "Apple Music Hype Station".to_string(),
                skip_rate: 0.22,
                status: TrackStatus::Yellow,
            },
        ])
    }
}

impl TrackCatalog for InMemoryCatalog {
    fn list(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    fn get_by_id(&self, id: &str) -> Option<Track> {
        self.tracks.iter().find(|t| t.id == id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_tracks_in_catalog_order() {
        let catalog = InMemoryCatalog::demo();
        let ids: Vec<String> = catalog.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn get_by_id_finds_existing_track() {
        let catalog = InMemoryCatalog::demo();
        let track = catalog.get_by_id("2").unwrap();
        assert_eq!(track.isrc, "USRC87654321");
        assert_eq!(track.artist, "Neon Shadow");
    }

    #[test]
    fn get_by_id_returns_none_for_unknown_track() {
        let catalog = InMemoryCatalog::demo();
        assert!(catalog.get_by_id("999").is_none());
    }

    #[test]
    fn loads_catalog_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let tracks = InMemoryCatalog::demo().list();
        std::fs::write(&path, serde_json::to_string(&tracks).unwrap()).unwrap();

        let catalog = InMemoryCatalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.list().len(), 4);
        assert_eq!(catalog.get_by_id("3").unwrap().name, "Sunset Drift");
    }

    #[test]
    fn rejects_malformed_catalog_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(InMemoryCatalog::from_json_file(&path).is_err());
    }
}
