//! Duration formatting

use cadence_core::{Track, TrackInfo};

/// `LIVE` for missing or zero, `HH:MM:SS` past an hour, else `MM:SS`
pub fn format_duration(ms: Option<u64>) -> String {
    let ms = match ms {
        Some(ms) if ms > 0 => ms,
        _ => return "LIVE".to_string(),
    };

    let total_secs = ms / 1000;
    let seconds = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Duration column for a track
pub fn duration_label(info: &TrackInfo) -> String {
    if info.is_stream {
        return "LIVE".to_string();
    }
    match info.duration_ms {
        None => "N/A".to_string(),
        duration => format_duration(duration),
    }
}

/// Total of bounded lengths plus the number of live entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationSummary {
    pub total_ms: u64,
    pub live: usize,
}

impl DurationSummary {
    pub fn of<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Self {
        tracks
            .into_iter()
            .fold(Self::default(), |mut summary, track| {
                match track.info().finite_duration() {
                    Some(duration) => {
                        summary.total_ms += u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
                    }
                    None => summary.live += 1,
                }
                summary
            })
    }

    /// `Total Duration: 01:02:03 (2 streams)`
    pub fn label(&self) -> String {
        let total = format_duration(Some(self.total_ms));
        if self.live > 0 {
            format!("Total Duration: {total} ({} streams)", self.live)
        } else {
            format!("Total Duration: {total}")
        }
    }
}
