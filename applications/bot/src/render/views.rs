//! Message views
//!
//! Every view is built from immutable data (tracks, snapshots) so it can be
//! rendered after the session guard is released.

use super::format::{duration_label, format_duration, DurationSummary};
use super::pagination::{paginate, Page};
use super::{ActionRow, Button, ButtonStyle, Embed, OutboundMessage};
use crate::command::ButtonAction;
use cadence_core::{PlaylistInfo, Track, TrackInfo};
use cadence_playback::{LoopMode, QueueSnapshot, SessionSnapshot, SessionState};

const ERROR_COLOR: u32 = 0x00FF_0000;
const BLANK: &str = "\u{200b}";

mod emoji {
    pub const SUCCESS: &str = "✅";
    pub const ERROR: &str = "❌";
    pub const MUSIC: &str = "🎵";
    pub const INFO: &str = "ℹ️";
    pub const TIME: &str = "⏱️";
    pub const QUEUE: &str = "📜";
    pub const SONG: &str = "🎶";
    pub const PLAY: &str = "▶️";
    pub const PAUSE: &str = "⏸️";
    pub const IDLE: &str = "⏹️";
    pub const VOLUME: &str = "🔊";
    pub const REPEAT: &str = "🔁";
    pub const PREVIOUS: &str = "⏮️";
    pub const SKIP: &str = "⏭️";
    pub const STOP: &str = "⏹️";
    pub const WARNING: &str = "⚠️";
}

/// Commands listed by `help`: usage, emoji, description
const HELP_ENTRIES: [(&str, &str, &str); 14] = [
    ("play <song>", "▶️", "Play a song or playlist, or add it to the queue"),
    ("pause", "⏸️", "Pause the current track"),
    ("resume", "▶️", "Resume playback"),
    ("skip", "⏭️", "Skip to the next track in the queue"),
    ("stop", "⏹️", "Stop playback, clear the queue and leave"),
    ("queue [page]", "📜", "Show the upcoming tracks"),
    ("nowplaying", "🎶", "Show the track that is playing"),
    ("volume <0-100>", "🔊", "Set the playback volume"),
    ("shuffle", "🔀", "Shuffle the upcoming tracks"),
    ("loop", "🔁", "Toggle queue loop"),
    ("remove <position>", "❌", "Remove a track from the queue"),
    ("clear", "🧹", "Remove every upcoming track"),
    ("status", "📊", "Show player status"),
    ("help", "🆘", "Show this menu"),
];

/// Builds views with the configured look
#[derive(Debug, Clone)]
pub struct Renderer {
    color: u32,
    prefix: String,
    items_per_page: usize,
}

impl Renderer {
    pub fn new(color: u32, prefix: impl Into<String>, items_per_page: usize) -> Self {
        Self {
            color,
            prefix: prefix.into(),
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn success(&self, message: &str) -> OutboundMessage {
        OutboundMessage::embed(
            Embed::new(self.color).description(format!("{} {message}", emoji::SUCCESS)),
        )
    }

    pub fn error(&self, message: &str) -> OutboundMessage {
        OutboundMessage::embed(
            Embed::new(ERROR_COLOR).description(format!("{} {message}", emoji::ERROR)),
        )
    }

    /// Plain text answer to a button press
    pub fn notice(&self, message: &str) -> OutboundMessage {
        OutboundMessage::text(message)
    }

    pub fn now_playing(&self, track: &Track) -> OutboundMessage {
        let info = track.info();
        let embed = Embed::new(self.color)
            .author("Music Player")
            .title(format!("{} Now Playing", emoji::MUSIC))
            .description(track_link(info))
            .thumbnail(info.thumbnail_url.as_deref())
            .field("Artist", format!("{} {}", emoji::INFO, artist(info)), true)
            .field(
                "Duration",
                format!("{} {}", emoji::TIME, duration_label(info)),
                true,
            )
            .field(
                "Requested By",
                format!("{} {}", emoji::INFO, track.requester().mention()),
                true,
            )
            .footer(format!("Use {}help to see all commands", self.prefix));

        OutboundMessage::embed(embed).with_row(controls_row())
    }

    pub fn added_to_queue(&self, track: &Track, position: usize) -> OutboundMessage {
        let info = track.info();
        let embed = Embed::new(self.color)
            .author("Queue Update")
            .description(format!(
                "{} Added to queue: {}",
                emoji::SUCCESS,
                track_link(info)
            ))
            .thumbnail(info.thumbnail_url.as_deref())
            .field("Artist", format!("{} {}", emoji::INFO, artist(info)), true)
            .field(
                "Duration",
                format!("{} {}", emoji::TIME, duration_label(info)),
                true,
            )
            .field("Position", format!("{} #{position}", emoji::QUEUE), true);

        OutboundMessage::embed(embed)
    }

    /// `tracks` are the entries that made it into the queue
    pub fn added_playlist(
        &self,
        playlist: &PlaylistInfo,
        tracks: &[Track],
        dropped: usize,
    ) -> OutboundMessage {
        let summary = DurationSummary::of(tracks);
        let mut embed = Embed::new(self.color)
            .title(format!("{} Added Playlist", emoji::SUCCESS))
            .description(format!("**{}**", playlist.name))
            .thumbnail(playlist.thumbnail_url.as_deref())
            .field(
                "Total Tracks",
                format!("{} {} tracks", emoji::QUEUE, tracks.len()),
                true,
            )
            .field(
                "Total Duration",
                format!("{} {}", emoji::TIME, format_duration(Some(summary.total_ms))),
                true,
            )
            .field(
                "Stream Count",
                format!("{} {} streams", emoji::INFO, summary.live),
                true,
            );

        if dropped > 0 {
            embed = embed.field(
                "Not Added",
                format!("{} {dropped} tracks did not fit in the queue", emoji::WARNING),
                false,
            );
        }

        OutboundMessage::embed(embed.footer("The playlist will start playing soon"))
    }

    pub fn queue_ended(&self) -> OutboundMessage {
        OutboundMessage::text(format!(
            "{} | Queue has ended. Leaving voice channel.",
            emoji::INFO
        ))
    }

    /// Queue listing at a 0-based page (clamped)
    pub fn queue_list(&self, queue: &QueueSnapshot, page: usize) -> OutboundMessage {
        let mut embed = Embed::new(self.color)
            .author("Queue Management")
            .title(format!("{} Queue List", emoji::QUEUE));

        embed = match &queue.current {
            Some(current) => embed
                .description(format!(
                    "**Now Playing:**\n{} {} - {}\n\n**Up Next:**",
                    emoji::PLAY,
                    track_link(current.info()),
                    duration_label(current.info())
                ))
                .thumbnail(current.info().thumbnail_url.as_deref()),
            None => embed.description("**Queue:**"),
        };

        let page = self.queue_page(queue.pending.len(), page);

        if queue.pending.is_empty() {
            let embed = embed.field(BLANK, "No tracks in queue!", false).footer(page.label());
            return OutboundMessage::embed(embed).on_page(page.current_page);
        }

        let lines: Vec<String> = queue.pending[page.range.clone()]
            .iter()
            .zip(page.range.clone())
            .filter(|(track, _)| is_listable(track.info()))
            .map(|(track, index)| {
                format!(
                    "`{:02}` {} {} - {}",
                    index + 1,
                    emoji::SONG,
                    track_link(track.info()),
                    duration_label(track.info())
                )
            })
            .collect();

        let listing = if lines.is_empty() {
            "No tracks in queue!".to_string()
        } else {
            lines.join("\n")
        };

        let summary = DurationSummary::of(&queue.pending);
        let embed = embed.field(BLANK, listing, false).footer(format!(
            "Total Tracks: {} • {} • {}",
            queue.pending.len(),
            summary.label(),
            page.label()
        ));

        OutboundMessage::embed(embed)
            .with_row(pagination_row())
            .on_page(page.current_page)
    }

    /// Page geometry for a queue of `len` pending tracks
    pub fn queue_page(&self, len: usize, page: usize) -> Page {
        paginate(len, page, self.items_per_page)
    }

    pub fn player_status(&self, session: &SessionSnapshot) -> OutboundMessage {
        let status = match session.state {
            SessionState::Playing => format!("{} Playing", emoji::PLAY),
            SessionState::Paused => format!("{} Paused", emoji::PAUSE),
            SessionState::Connecting | SessionState::Idle | SessionState::Ended => {
                format!("{} Idle", emoji::IDLE)
            }
        };
        let loop_label = match session.queue.loop_mode {
            LoopMode::Queue => "Queue",
            LoopMode::None => "Disabled",
        };

        let mut embed = Embed::new(self.color)
            .title(format!("{} Player Status", emoji::INFO))
            .field("Status", status, true)
            .field("Volume", format!("{} {}%", emoji::VOLUME, session.volume), true)
            .field("Loop Mode", format!("{} {loop_label}", emoji::REPEAT), true);

        if let Some(track) = &session.queue.current {
            embed = embed
                .description(format!(
                    "**Now Playing:**\n{} {}\n{} Duration: {}",
                    emoji::MUSIC,
                    track_link(track.info()),
                    emoji::TIME,
                    duration_label(track.info())
                ))
                .thumbnail(track.info().thumbnail_url.as_deref());
        }

        OutboundMessage::embed(embed)
    }

    pub fn help(&self) -> OutboundMessage {
        let description = HELP_ENTRIES
            .iter()
            .map(|(usage, icon, text)| format!("{icon} **{}{usage}**\n{text}", self.prefix))
            .collect::<Vec<_>>()
            .join("\n\n");

        let embed = Embed::new(self.color)
            .author("Cadence")
            .title("🎤 Music Bot Help")
            .description(description)
            .footer(format!(
                "Prefix: {} • Example: {}play <song name>",
                self.prefix, self.prefix
            ));

        OutboundMessage::embed(embed).with_row(ActionRow {
            buttons: vec![
                button(ButtonAction::HelpMusic, "Music Commands", ButtonStyle::Primary, Some("🎵")),
                button(ButtonAction::HelpQueue, "Queue Commands", ButtonStyle::Secondary, Some("📜")),
                button(ButtonAction::HelpSettings, "Settings", ButtonStyle::Secondary, Some("⚙️")),
            ],
        })
    }
}

fn controls_row() -> ActionRow {
    ActionRow {
        buttons: vec![
            button(ButtonAction::Previous, "Previous", ButtonStyle::Secondary, Some(emoji::PREVIOUS)),
            button(ButtonAction::Pause, "Pause", ButtonStyle::Primary, Some(emoji::PAUSE)),
            button(ButtonAction::Skip, "Skip", ButtonStyle::Secondary, Some(emoji::SKIP)),
            button(ButtonAction::Loop, "Loop", ButtonStyle::Secondary, Some(emoji::REPEAT)),
            button(ButtonAction::Stop, "Stop", ButtonStyle::Danger, Some(emoji::STOP)),
        ],
    }
}

fn pagination_row() -> ActionRow {
    ActionRow {
        buttons: vec![
            button(ButtonAction::FirstPage, "First", ButtonStyle::Secondary, None),
            button(ButtonAction::PrevPage, "Previous", ButtonStyle::Secondary, None),
            button(ButtonAction::NextPage, "Next", ButtonStyle::Secondary, None),
            button(ButtonAction::LastPage, "Last", ButtonStyle::Secondary, None),
        ],
    }
}

fn button(action: ButtonAction, label: &str, style: ButtonStyle, emoji: Option<&str>) -> Button {
    Button {
        custom_id: action.custom_id().to_string(),
        label: label.to_string(),
        style,
        emoji: emoji.map(str::to_string),
    }
}

/// `[title](uri)`, or the bare title without a link
fn track_link(info: &TrackInfo) -> String {
    let title = if info.title.is_empty() {
        "Unknown title"
    } else {
        info.title.as_str()
    };
    match &info.uri {
        Some(uri) => format!("[{title}]({uri})"),
        None => title.to_string(),
    }
}

fn artist(info: &TrackInfo) -> &str {
    if info.author.is_empty() {
        "Unknown"
    } else {
        &info.author
    }
}

/// Queue entries need a title, a link and a length (streams count as having one)
fn is_listable(info: &TrackInfo) -> bool {
    !info.title.is_empty() && info.uri.is_some() && (info.is_stream || info.duration_ms.is_some())
}
