use uuid::Uuid;

/// A single submission on its way to the broker. Lives only for the duration of one
/// publish call.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub id: Uuid,
    pub payload: Vec<u8>,
}

impl OutboundMessage {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        OutboundMessage {
            id: Uuid::new_v4(),
            payload: payload.into(),
        }
    }

    /// Hyphenated id, used as record key and `message_uuid` header.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn payload_is_kept_verbatim() {
        let msg = OutboundMessage::new("Grüße aus Köln");
        assert_eq!(msg.payload, "Grüße aus Köln".as_bytes());
    }

    #[test]
    fn every_message_gets_a_fresh_id() {
        let ids: HashSet<Uuid> = (0..1000).map(|_| OutboundMessage::new("x").id).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn key_matches_id() {
        let msg = OutboundMessage::new(Vec::new());
        assert_eq!(msg.key(), msg.id.to_string());
        assert_eq!(msg.id.get_version_num(), 4);
    }
}
