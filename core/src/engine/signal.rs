use crate::format::AnnouncementStatus;
use crate::state::MessageRef;
use crate::suit::Suit;

/// Outbound actions requested by the state machine. The driver executes
/// them fire-and-forget: delivery failures are logged and never roll back
/// the state transition that produced the signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSignal {
    /// Send a fresh prediction announcement. After a successful send the
    /// driver attaches the returned handle through
    /// [`ServiceCache::attach_outbound_ref`](crate::state::ServiceCache::attach_outbound_ref).
    Announce { number: u64, suit: Suit },

    /// Edit an already-sent announcement in place. `reference` is `None`
    /// when the original send failed; the driver then skips the edit.
    EditAnnouncement {
        reference: Option<MessageRef>,
        number: u64,
        suit: Suit,
        status: AnnouncementStatus,
    },

    /// Free-text message to the announcement channel.
    ChannelNotice(String),

    /// Free-text message to the administrator.
    AdminNotice(String),
}
