//! Domain types shared by every Cadence crate

mod ids;
mod resolve;
mod track;

pub use ids::{ChannelId, MessageId, RoomId, UserId};
pub use resolve::{PlaylistInfo, ResolveResult};
pub use track::{Track, TrackInfo};
