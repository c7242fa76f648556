//! Text command and button parsing
//!
//! Parsing is purely syntactic. Whether a command may run (voice channel,
//! existing session, argument ranges) is decided by the dispatcher.

/// A prefixed text command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `play <query>`; the query may be empty and is rejected later
    Play { query: String },
    Pause,
    Resume,
    Skip,
    Stop,
    /// `queue [page]`, 1-based; unparsable pages are ignored
    Queue { page: Option<usize> },
    NowPlaying,
    /// `volume <0-100>`, raw argument text
    Volume { level: String },
    Shuffle,
    Loop,
    /// `remove <position>`, 1-based; `None` when missing or not a number
    Remove { position: Option<usize> },
    Clear,
    Status,
    Help,
}

impl Command {
    /// Parse a chat message
    ///
    /// Returns `None` for text without the prefix and for unknown commands.
    pub fn parse(prefix: &str, content: &str) -> Option<Self> {
        let body = content.trim_start().strip_prefix(prefix)?;
        let mut words = body.split_whitespace();
        let name = words.next()?.to_lowercase();
        let args: Vec<&str> = words.collect();

        let command = match name.as_str() {
            "play" => Command::Play {
                query: args.join(" "),
            },
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "skip" => Command::Skip,
            "stop" => Command::Stop,
            "queue" => Command::Queue {
                page: args.first().and_then(|page| page.parse().ok()),
            },
            "nowplaying" => Command::NowPlaying,
            "volume" => Command::Volume {
                level: args.join(" "),
            },
            "shuffle" => Command::Shuffle,
            "loop" => Command::Loop,
            "remove" => Command::Remove {
                position: args.first().and_then(|position| position.parse().ok()),
            },
            "clear" => Command::Clear,
            "status" => Command::Status,
            "help" => Command::Help,
            _ => return None,
        };
        Some(command)
    }

    /// Command name as typed, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Play { .. } => "play",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Skip => "skip",
            Command::Stop => "stop",
            Command::Queue { .. } => "queue",
            Command::NowPlaying => "nowplaying",
            Command::Volume { .. } => "volume",
            Command::Shuffle => "shuffle",
            Command::Loop => "loop",
            Command::Remove { .. } => "remove",
            Command::Clear => "clear",
            Command::Status => "status",
            Command::Help => "help",
        }
    }

    /// Music commands need the caller in a voice channel
    pub fn requires_voice(&self) -> bool {
        !matches!(self, Command::Help | Command::Status)
    }

    /// Everything but `play` and `help` acts on an existing session
    pub fn requires_session(&self) -> bool {
        !matches!(self, Command::Play { .. } | Command::Help)
    }
}

/// A pressed message button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Previous,
    Pause,
    Skip,
    Loop,
    Stop,
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    HelpMusic,
    HelpQueue,
    HelpSettings,
}

/// What a button acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    /// Player controls under a now-playing message
    Control,
    /// Queue list navigation
    Page,
    /// Help menu categories
    Help,
}

impl ButtonAction {
    pub const ALL: [ButtonAction; 12] = [
        ButtonAction::Previous,
        ButtonAction::Pause,
        ButtonAction::Skip,
        ButtonAction::Loop,
        ButtonAction::Stop,
        ButtonAction::FirstPage,
        ButtonAction::PrevPage,
        ButtonAction::NextPage,
        ButtonAction::LastPage,
        ButtonAction::HelpMusic,
        ButtonAction::HelpQueue,
        ButtonAction::HelpSettings,
    ];

    pub fn parse(custom_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.custom_id() == custom_id)
    }

    /// Component id carried by the button
    pub fn custom_id(self) -> &'static str {
        match self {
            ButtonAction::Previous => "previous",
            ButtonAction::Pause => "pause",
            ButtonAction::Skip => "skip",
            ButtonAction::Loop => "loop",
            ButtonAction::Stop => "stop",
            ButtonAction::FirstPage => "first",
            ButtonAction::PrevPage => "prev_page",
            ButtonAction::NextPage => "next",
            ButtonAction::LastPage => "last",
            ButtonAction::HelpMusic => "music",
            ButtonAction::HelpQueue => "queue",
            ButtonAction::HelpSettings => "settings",
        }
    }

    pub fn kind(self) -> ButtonKind {
        match self {
            ButtonAction::Previous
            | ButtonAction::Pause
            | ButtonAction::Skip
            | ButtonAction::Loop
            | ButtonAction::Stop => ButtonKind::Control,
            ButtonAction::FirstPage
            | ButtonAction::PrevPage
            | ButtonAction::NextPage
            | ButtonAction::LastPage => ButtonKind::Page,
            ButtonAction::HelpMusic | ButtonAction::HelpQueue | ButtonAction::HelpSettings => {
                ButtonKind::Help
            }
        }
    }
}
