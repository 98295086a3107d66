//! Chat kinds and incoming messages.
//!
//! Chat kinds form a flat enumeration. The only hierarchy is that every
//! feed subtype is also a [`ChatKind::Feed`], which [`ChatKind::matches`]
//! takes into account.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of chat a message was posted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    Normal,
    Photo,
    MultiPhoto,
    Video,
    Audio,
    File,
    Map,
    Emoticon,
    OldEmoticon,
    Profile,
    Reply,
    /// Any feed event. Matches every feed subtype below.
    Feed,
    InviteFeed,
    LeaveFeed,
    KickedFeed,
    OpenChatJoinedFeed,
    OpenChatKickedFeed,
    MemberTypeChangedFeed,
    PromoteFeed,
    DemoteFeed,
    HandOverFeed,
    DeleteFeed,
}

impl ChatKind {
    /// Every chat kind, in declaration order.
    pub const ALL: [ChatKind; 22] = [
        Self::Normal,
        Self::Photo,
        Self::MultiPhoto,
        Self::Video,
        Self::Audio,
        Self::File,
        Self::Map,
        Self::Emoticon,
        Self::OldEmoticon,
        Self::Profile,
        Self::Reply,
        Self::Feed,
        Self::InviteFeed,
        Self::LeaveFeed,
        Self::KickedFeed,
        Self::OpenChatJoinedFeed,
        Self::OpenChatKickedFeed,
        Self::MemberTypeChangedFeed,
        Self::PromoteFeed,
        Self::DemoteFeed,
        Self::HandOverFeed,
        Self::DeleteFeed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Photo => "photo",
            Self::MultiPhoto => "multi_photo",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
            Self::Map => "map",
            Self::Emoticon => "emoticon",
            Self::OldEmoticon => "old_emoticon",
            Self::Profile => "profile",
            Self::Reply => "reply",
            Self::Feed => "feed",
            Self::InviteFeed => "invite_feed",
            Self::LeaveFeed => "leave_feed",
            Self::KickedFeed => "kicked_feed",
            Self::OpenChatJoinedFeed => "open_chat_joined_feed",
            Self::OpenChatKickedFeed => "open_chat_kicked_feed",
            Self::MemberTypeChangedFeed => "member_type_changed_feed",
            Self::PromoteFeed => "promote_feed",
            Self::DemoteFeed => "demote_feed",
            Self::HandOverFeed => "hand_over_feed",
            Self::DeleteFeed => "delete_feed",
        }
    }

    /// Returns `true` for [`Feed`](Self::Feed) and its subtypes.
    pub fn is_feed(self) -> bool {
        matches!(
            self,
            Self::Feed
                | Self::InviteFeed
                | Self::LeaveFeed
                | Self::KickedFeed
                | Self::OpenChatJoinedFeed
                | Self::OpenChatKickedFeed
                | Self::MemberTypeChangedFeed
                | Self::PromoteFeed
                | Self::DemoteFeed
                | Self::HandOverFeed
                | Self::DeleteFeed
        )
    }

    /// Returns `true` if a chat of kind `actual` is acceptable where `self`
    /// is expected.
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_schema_command::ChatKind;
    ///
    /// assert!(ChatKind::Feed.matches(ChatKind::KickedFeed));
    /// assert!(!ChatKind::KickedFeed.matches(ChatKind::Feed));
    /// assert!(ChatKind::Normal.matches(ChatKind::Normal));
    /// assert!(!ChatKind::Normal.matches(ChatKind::Reply));
    /// ```
    pub fn matches(self, actual: ChatKind) -> bool {
        self == actual || (self == Self::Feed && actual.is_feed())
    }
}

impl fmt::Display for ChatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown chat kind: {s}"))
    }
}

/// An incoming chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub chat: ChatKind,
    pub author: String,
    pub content: String,
}

impl Message {
    pub fn new(chat: ChatKind, author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chat,
            author: author.into(),
            content: content.into(),
        }
    }
}
