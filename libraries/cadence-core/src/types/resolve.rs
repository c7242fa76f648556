/// Resolver result shapes
use crate::types::TrackInfo;
use serde::{Deserialize, Serialize};

/// Playlist header returned alongside playlist tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistInfo {
    /// Playlist name
    pub name: String,

    /// Playlist artwork
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl PlaylistInfo {
    /// Create a playlist header
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            thumbnail_url: None,
        }
    }
}

/// Outcome of resolving a query, one arm per load type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolveResult {
    /// Nothing matched the query
    NoMatch,

    /// A direct link resolved to exactly one track
    Track {
        /// The resolved track
        track: TrackInfo,
    },

    /// A search produced ranked candidates, best first
    Search {
        /// Candidates in ranking order
        tracks: Vec<TrackInfo>,
    },

    /// A playlist link resolved to many tracks
    Playlist {
        /// Playlist header
        info: PlaylistInfo,
        /// Playlist entries in order
        tracks: Vec<TrackInfo>,
    },
}

impl ResolveResult {
    /// Number of tracks carried by the result
    pub fn len(&self) -> usize {
        match self {
            ResolveResult::NoMatch => 0,
            ResolveResult::Track { .. } => 1,
            ResolveResult::Search { tracks } | ResolveResult::Playlist { tracks, .. } => {
                tracks.len()
            }
        }
    }

    /// Whether nothing playable came back
    ///
    /// An empty search list is treated the same as `NoMatch`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_counts_as_empty() {
        assert!(ResolveResult::NoMatch.is_empty());
        assert!(ResolveResult::Search { tracks: vec![] }.is_empty());
        assert!(!ResolveResult::Track {
            track: TrackInfo::new("a", "A")
        }
        .is_empty());
    }

    #[test]
    fn playlist_len_counts_tracks() {
        let result = ResolveResult::Playlist {
            info: PlaylistInfo::new("Mix"),
            tracks: vec![TrackInfo::new("a", "A"), TrackInfo::new("b", "B")],
        };
        assert_eq!(result.len(), 2);
    }
}
