//! Second-stage payload decoding.
//!
//! The kind→shape table is the `decode_body` match below: built at
//! compile time, exhaustive over [`EventKind`], and not mutable at
//! runtime. A decode failure is scoped to the one frame that carried the
//! bad body; the stream continues.

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use thiserror::Error;

use crate::events::*;
use crate::kind::EventKind;

/// Failure to decode a dispatch body into its registered shape.
///
/// Non-fatal: the frame is dropped and the next frame is unaffected.
#[derive(Debug, Error)]
pub enum PayloadDecodeError {
    /// The kind requires a body but the frame carried none.
    #[error("missing body for {kind}")]
    MissingBody { kind: EventKind },

    /// The body did not match the registered shape.
    #[error("decoding {kind} body: {source}")]
    Decode {
        kind: EventKind,
        #[source]
        source: serde_json::Error,
    },
}

/// A dispatch frame whose kind tag this library does not recognize.
///
/// Delivered to wildcard handlers only, body kept opaque.
#[derive(Debug, Clone)]
pub struct UnknownEvent {
    /// The unrecognized wire tag.
    pub kind: String,
    /// The raw body, if the frame carried one.
    pub body: Option<Box<RawValue>>,
}

/// A decoded dispatch payload, one variant per registered kind.
#[derive(Debug, Clone)]
pub enum Payload {
    Ready(Ready),
    Resumed(Resumed),
    ChannelCreate(ChannelCreate),
    ChannelUpdate(ChannelUpdate),
    ChannelDelete(ChannelDelete),
    ChannelPinsUpdate(ChannelPinsUpdate),
    ThreadCreate(ThreadCreate),
    ThreadUpdate(ThreadUpdate),
    ThreadDelete(ThreadDelete),
    ThreadListSync(ThreadListSync),
    ThreadMemberUpdate(ThreadMemberUpdate),
    ThreadMembersUpdate(ThreadMembersUpdate),
    GuildCreate(GuildCreate),
    GuildUpdate(GuildUpdate),
    GuildDelete(GuildDelete),
    GuildBanAdd(GuildBanAdd),
    GuildBanRemove(GuildBanRemove),
    GuildMemberAdd(GuildMemberAdd),
    GuildMemberUpdate(GuildMemberUpdate),
    GuildMemberRemove(GuildMemberRemove),
    GuildMembersChunk(GuildMembersChunk),
    GuildRoleCreate(GuildRoleCreate),
    GuildRoleUpdate(GuildRoleUpdate),
    GuildRoleDelete(GuildRoleDelete),
    GuildEmojisUpdate(GuildEmojisUpdate),
    GuildIntegrationsUpdate(GuildIntegrationsUpdate),
    IntegrationCreate(IntegrationCreate),
    IntegrationUpdate(IntegrationUpdate),
    IntegrationDelete(IntegrationDelete),
    MessageCreate(MessageCreate),
    MessageUpdate(MessageUpdate),
    MessageDelete(MessageDelete),
    MessageDeleteBulk(MessageDeleteBulk),
    MessageReactionAdd(MessageReactionAdd),
    MessageReactionRemove(MessageReactionRemove),
    MessageReactionRemoveAll(MessageReactionRemoveAll),
    MessageReactionRemoveEmoji(MessageReactionRemoveEmoji),
    PresenceUpdate(PresenceUpdate),
    PresencesReplace(PresencesReplace),
    TypingStart(TypingStart),
    UserUpdate(UserUpdate),
    VoiceStateUpdate(VoiceStateUpdate),
    VoiceServerUpdate(VoiceServerUpdate),
    WebhooksUpdate(WebhooksUpdate),
    InviteCreate(InviteCreate),
    InviteDelete(InviteDelete),
    ApplicationCommandCreate(ApplicationCommandCreate),
    ApplicationCommandUpdate(ApplicationCommandUpdate),
    ApplicationCommandDelete(ApplicationCommandDelete),
    Connect(Connect),
    Disconnect(Disconnect),
    RateLimit(RateLimit),
    Unknown(UnknownEvent),
}

impl Payload {
    /// The kind this payload decoded from.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Payload::Ready(_) => EventKind::Ready,
            Payload::Resumed(_) => EventKind::Resumed,
            Payload::ChannelCreate(_) => EventKind::ChannelCreate,
            Payload::ChannelUpdate(_) => EventKind::ChannelUpdate,
            Payload::ChannelDelete(_) => EventKind::ChannelDelete,
            Payload::ChannelPinsUpdate(_) => EventKind::ChannelPinsUpdate,
            Payload::ThreadCreate(_) => EventKind::ThreadCreate,
            Payload::ThreadUpdate(_) => EventKind::ThreadUpdate,
            Payload::ThreadDelete(_) => EventKind::ThreadDelete,
            Payload::ThreadListSync(_) => EventKind::ThreadListSync,
            Payload::ThreadMemberUpdate(_) => EventKind::ThreadMemberUpdate,
            Payload::ThreadMembersUpdate(_) => EventKind::ThreadMembersUpdate,
            Payload::GuildCreate(_) => EventKind::GuildCreate,
            Payload::GuildUpdate(_) => EventKind::GuildUpdate,
            Payload::GuildDelete(_) => EventKind::GuildDelete,
            Payload::GuildBanAdd(_) => EventKind::GuildBanAdd,
            Payload::GuildBanRemove(_) => EventKind::GuildBanRemove,
            Payload::GuildMemberAdd(_) => EventKind::GuildMemberAdd,
            Payload::GuildMemberUpdate(_) => EventKind::GuildMemberUpdate,
            Payload::GuildMemberRemove(_) => EventKind::GuildMemberRemove,
            Payload::GuildMembersChunk(_) => EventKind::GuildMembersChunk,
            Payload::GuildRoleCreate(_) => EventKind::GuildRoleCreate,
            Payload::GuildRoleUpdate(_) => EventKind::GuildRoleUpdate,
            Payload::GuildRoleDelete(_) => EventKind::GuildRoleDelete,
            Payload::GuildEmojisUpdate(_) => EventKind::GuildEmojisUpdate,
            Payload::GuildIntegrationsUpdate(_) => EventKind::GuildIntegrationsUpdate,
            Payload::IntegrationCreate(_) => EventKind::IntegrationCreate,
            Payload::IntegrationUpdate(_) => EventKind::IntegrationUpdate,
            Payload::IntegrationDelete(_) => EventKind::IntegrationDelete,
            Payload::MessageCreate(_) => EventKind::MessageCreate,
            Payload::MessageUpdate(_) => EventKind::MessageUpdate,
            Payload::MessageDelete(_) => EventKind::MessageDelete,
            Payload::MessageDeleteBulk(_) => EventKind::MessageDeleteBulk,
            Payload::MessageReactionAdd(_) => EventKind::MessageReactionAdd,
            Payload::MessageReactionRemove(_) => EventKind::MessageReactionRemove,
            Payload::MessageReactionRemoveAll(_) => EventKind::MessageReactionRemoveAll,
            Payload::MessageReactionRemoveEmoji(_) => EventKind::MessageReactionRemoveEmoji,
            Payload::PresenceUpdate(_) => EventKind::PresenceUpdate,
            Payload::PresencesReplace(_) => EventKind::PresencesReplace,
            Payload::TypingStart(_) => EventKind::TypingStart,
            Payload::UserUpdate(_) => EventKind::UserUpdate,
            Payload::VoiceStateUpdate(_) => EventKind::VoiceStateUpdate,
            Payload::VoiceServerUpdate(_) => EventKind::VoiceServerUpdate,
            Payload::WebhooksUpdate(_) => EventKind::WebhooksUpdate,
            Payload::InviteCreate(_) => EventKind::InviteCreate,
            Payload::InviteDelete(_) => EventKind::InviteDelete,
            Payload::ApplicationCommandCreate(_) => EventKind::ApplicationCommandCreate,
            Payload::ApplicationCommandUpdate(_) => EventKind::ApplicationCommandUpdate,
            Payload::ApplicationCommandDelete(_) => EventKind::ApplicationCommandDelete,
            Payload::Connect(_) => EventKind::Connect,
            Payload::Disconnect(_) => EventKind::Disconnect,
            Payload::RateLimit(_) => EventKind::RateLimit,
            Payload::Unknown(unknown) => EventKind::Unknown(unknown.kind.clone()),
        }
    }
}

fn parse<T: DeserializeOwned>(
    kind: &EventKind,
    body: Option<&RawValue>,
) -> Result<T, PayloadDecodeError> {
    let raw = body.ok_or_else(|| PayloadDecodeError::MissingBody { kind: kind.clone() })?;
    serde_json::from_str(raw.get()).map_err(|source| PayloadDecodeError::Decode {
        kind: kind.clone(),
        source,
    })
}

fn opaque(kind: &EventKind, body: Option<&RawValue>) -> Payload {
    Payload::Unknown(UnknownEvent {
        kind: kind.as_tag().to_string(),
        body: body.map(ToOwned::to_owned),
    })
}

/// Decode a dispatch body into the shape registered for its kind.
///
/// Unknown kinds never fail: they produce [`Payload::Unknown`] with the
/// body kept opaque.
///
/// # Errors
///
/// Returns [`PayloadDecodeError`] when a recognized kind's body is
/// missing or does not match its shape.
pub fn decode_body(
    kind: &EventKind,
    body: Option<&RawValue>,
) -> Result<Payload, PayloadDecodeError> {
    Ok(match kind {
        EventKind::Ready => Payload::Ready(parse(kind, body)?),
        EventKind::Resumed => Payload::Resumed(parse(kind, body)?),
        EventKind::ChannelCreate => Payload::ChannelCreate(parse(kind, body)?),
        EventKind::ChannelUpdate => Payload::ChannelUpdate(parse(kind, body)?),
        EventKind::ChannelDelete => Payload::ChannelDelete(parse(kind, body)?),
        EventKind::ChannelPinsUpdate => Payload::ChannelPinsUpdate(parse(kind, body)?),
        EventKind::ThreadCreate => Payload::ThreadCreate(parse(kind, body)?),
        EventKind::ThreadUpdate => Payload::ThreadUpdate(parse(kind, body)?),
        EventKind::ThreadDelete => Payload::ThreadDelete(parse(kind, body)?),
        EventKind::ThreadListSync => Payload::ThreadListSync(parse(kind, body)?),
        EventKind::ThreadMemberUpdate => Payload::ThreadMemberUpdate(parse(kind, body)?),
        EventKind::ThreadMembersUpdate => Payload::ThreadMembersUpdate(parse(kind, body)?),
        EventKind::GuildCreate => Payload::GuildCreate(parse(kind, body)?),
        EventKind::GuildUpdate => Payload::GuildUpdate(parse(kind, body)?),
        EventKind::GuildDelete => Payload::GuildDelete(parse(kind, body)?),
        EventKind::GuildBanAdd => Payload::GuildBanAdd(parse(kind, body)?),
        EventKind::GuildBanRemove => Payload::GuildBanRemove(parse(kind, body)?),
        EventKind::GuildMemberAdd => Payload::GuildMemberAdd(parse(kind, body)?),
        EventKind::GuildMemberUpdate => Payload::GuildMemberUpdate(parse(kind, body)?),
        EventKind::GuildMemberRemove => Payload::GuildMemberRemove(parse(kind, body)?),
        EventKind::GuildMembersChunk => Payload::GuildMembersChunk(parse(kind, body)?),
        EventKind::GuildRoleCreate => Payload::GuildRoleCreate(parse(kind, body)?),
        EventKind::GuildRoleUpdate => Payload::GuildRoleUpdate(parse(kind, body)?),
        EventKind::GuildRoleDelete => Payload::GuildRoleDelete(parse(kind, body)?),
        EventKind::GuildEmojisUpdate => Payload::GuildEmojisUpdate(parse(kind, body)?),
        EventKind::GuildIntegrationsUpdate => {
            Payload::GuildIntegrationsUpdate(parse(kind, body)?)
        }
        EventKind::IntegrationCreate => Payload::IntegrationCreate(parse(kind, body)?),
        EventKind::IntegrationUpdate => Payload::IntegrationUpdate(parse(kind, body)?),
        EventKind::IntegrationDelete => Payload::IntegrationDelete(parse(kind, body)?),
        EventKind::MessageCreate => Payload::MessageCreate(parse(kind, body)?),
        EventKind::MessageUpdate => Payload::MessageUpdate(parse(kind, body)?),
        EventKind::MessageDelete => Payload::MessageDelete(parse(kind, body)?),
        EventKind::MessageDeleteBulk => Payload::MessageDeleteBulk(parse(kind, body)?),
        EventKind::MessageReactionAdd => Payload::MessageReactionAdd(parse(kind, body)?),
        EventKind::MessageReactionRemove => Payload::MessageReactionRemove(parse(kind, body)?),
        EventKind::MessageReactionRemoveAll => {
            Payload::MessageReactionRemoveAll(parse(kind, body)?)
        }
        EventKind::MessageReactionRemoveEmoji => {
            Payload::MessageReactionRemoveEmoji(parse(kind, body)?)
        }
        EventKind::PresenceUpdate => Payload::PresenceUpdate(parse(kind, body)?),
        EventKind::PresencesReplace => Payload::PresencesReplace(parse(kind, body)?),
        EventKind::TypingStart => Payload::TypingStart(parse(kind, body)?),
        EventKind::UserUpdate => Payload::UserUpdate(parse(kind, body)?),
        EventKind::VoiceStateUpdate => Payload::VoiceStateUpdate(parse(kind, body)?),
        EventKind::VoiceServerUpdate => Payload::VoiceServerUpdate(parse(kind, body)?),
        EventKind::WebhooksUpdate => Payload::WebhooksUpdate(parse(kind, body)?),
        EventKind::InviteCreate => Payload::InviteCreate(parse(kind, body)?),
        EventKind::InviteDelete => Payload::InviteDelete(parse(kind, body)?),
        EventKind::ApplicationCommandCreate => {
            Payload::ApplicationCommandCreate(parse(kind, body)?)
        }
        EventKind::ApplicationCommandUpdate => {
            Payload::ApplicationCommandUpdate(parse(kind, body)?)
        }
        EventKind::ApplicationCommandDelete => {
            Payload::ApplicationCommandDelete(parse(kind, body)?)
        }
        // Synthetic kinds never decode from the wire; a frame claiming
        // one is unrecognized by definition.
        EventKind::Connect | EventKind::Disconnect | EventKind::RateLimit => opaque(kind, body),
        EventKind::Unknown(_) => opaque(kind, body),
    })
}

/// Links a concrete payload type to its kind, enabling statically
/// checked handler registration.
///
/// Implemented for every recognized payload shape. [`UnknownEvent`]
/// deliberately has no implementation: unrecognized kinds are
/// wildcard-only.
pub trait DispatchPayload: Send + Sync + 'static {
    /// The kind this type decodes from.
    fn kind() -> EventKind;

    /// Borrow this type out of a dispatched payload, if the kinds match.
    fn from_payload(payload: &Payload) -> Option<&Self>;
}

macro_rules! dispatch_payload {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl DispatchPayload for $variant {
                fn kind() -> EventKind {
                    EventKind::$variant
                }

                fn from_payload(payload: &Payload) -> Option<&Self> {
                    match payload {
                        Payload::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )+
    };
}

dispatch_payload! {
    Ready, Resumed,
    ChannelCreate, ChannelUpdate, ChannelDelete, ChannelPinsUpdate,
    ThreadCreate, ThreadUpdate, ThreadDelete, ThreadListSync,
    ThreadMemberUpdate, ThreadMembersUpdate,
    GuildCreate, GuildUpdate, GuildDelete,
    GuildBanAdd, GuildBanRemove,
    GuildMemberAdd, GuildMemberUpdate, GuildMemberRemove, GuildMembersChunk,
    GuildRoleCreate, GuildRoleUpdate, GuildRoleDelete,
    GuildEmojisUpdate, GuildIntegrationsUpdate,
    IntegrationCreate, IntegrationUpdate, IntegrationDelete,
    MessageCreate, MessageUpdate, MessageDelete, MessageDeleteBulk,
    MessageReactionAdd, MessageReactionRemove, MessageReactionRemoveAll,
    MessageReactionRemoveEmoji,
    PresenceUpdate, PresencesReplace, TypingStart, UserUpdate,
    VoiceStateUpdate, VoiceServerUpdate,
    WebhooksUpdate, InviteCreate, InviteDelete,
    ApplicationCommandCreate, ApplicationCommandUpdate, ApplicationCommandDelete,
    Connect, Disconnect, RateLimit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope;

    fn body_of(frame: &str) -> Option<Box<RawValue>> {
        envelope::decode(frame).unwrap().body
    }

    #[test]
    fn test_decode_message_create() {
        let body = body_of(
            r#"{"op":0,"s":1,"t":"MESSAGE_CREATE",
                "d":{"id":"m1","channel_id":"c1","content":"hi"}}"#,
        );
        let payload =
            decode_body(&EventKind::MessageCreate, body.as_deref()).unwrap();
        match payload {
            Payload::MessageCreate(ev) => assert_eq!(ev.message.content, "hi"),
            other => panic!("expected MessageCreate, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_missing_required_field_fails() {
        // MessageReaction requires message_id and channel_id.
        let body = body_of(r#"{"op":0,"t":"MESSAGE_REACTION_ADD","d":{"user_id":"1"}}"#);
        let err = decode_body(&EventKind::MessageReactionAdd, body.as_deref()).unwrap_err();
        assert!(matches!(err, PayloadDecodeError::Decode { .. }));
    }

    #[test]
    fn test_missing_body_fails() {
        let err = decode_body(&EventKind::Ready, None).unwrap_err();
        assert!(matches!(err, PayloadDecodeError::MissingBody { .. }));
    }

    #[test]
    fn test_unknown_kind_never_fails() {
        let kind = EventKind::from_tag("SOME_FUTURE_EVENT");
        let body = body_of(r#"{"op":0,"t":"SOME_FUTURE_EVENT","d":{"anything":true}}"#);
        let payload = decode_body(&kind, body.as_deref()).unwrap();
        match payload {
            Payload::Unknown(unknown) => {
                assert_eq!(unknown.kind, "SOME_FUTURE_EVENT");
                assert_eq!(unknown.body.unwrap().get(), r#"{"anything":true}"#);
            }
            other => panic!("expected Unknown, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_payload_kind_matches_decode_kind() {
        let body = body_of(r#"{"op":0,"t":"TYPING_START","d":{"channel_id":"c","user_id":"u","timestamp":1}}"#);
        let payload = decode_body(&EventKind::TypingStart, body.as_deref()).unwrap();
        assert_eq!(payload.kind(), EventKind::TypingStart);
    }

    #[test]
    fn test_typed_extraction() {
        let body = body_of(r#"{"op":0,"t":"TYPING_START","d":{"channel_id":"c","user_id":"u","timestamp":1}}"#);
        let payload = decode_body(&EventKind::TypingStart, body.as_deref()).unwrap();
        let typing = TypingStart::from_payload(&payload).unwrap();
        assert_eq!(typing.channel_id, "c");
        assert!(MessageCreate::from_payload(&payload).is_none());
        assert_eq!(<TypingStart as DispatchPayload>::kind(), EventKind::TypingStart);
    }
}
