//! Codec trait and the line codec used by the room server.
//!
//! A codec converts between transport [`Frame`]s and typed messages. The
//! client runtime is generic over [`Codec`]; [`LineCodec`] implements the
//! room server's format: space-delimited text commands whose first token
//! names the command, plus binary board snapshots.

use minesync_transport::Frame;

use crate::board;
use crate::types::unescape_spaces;
use crate::{ClientCommand, PlayerEntry, PlayerId, PositionEntry, ProtocolError, ServerMessage};

/// Converts inbound frames into messages and outbound commands into frames.
pub trait Codec: Send + Sync + 'static {
    /// Parses one inbound frame.
    ///
    /// # Errors
    /// - [`ProtocolError::UnknownCommand`] for a text frame with an
    ///   unrecognized first token
    /// - [`ProtocolError::InvalidMessage`] / [`ProtocolError::Json`] for
    ///   malformed arguments
    /// - [`ProtocolError::Inflate`] for a corrupt board snapshot
    fn decode(&self, frame: &Frame) -> Result<ServerMessage, ProtocolError>;

    /// Serializes one outbound command.
    fn encode(&self, command: &ClientCommand) -> Frame;
}

/// The room server's wire format.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineCodec;

impl Codec for LineCodec {
    fn decode(&self, frame: &Frame) -> Result<ServerMessage, ProtocolError> {
        match frame {
            Frame::Binary(data) => Ok(ServerMessage::BoardSnapshot(board::decode(data)?)),
            Frame::Text(text) => decode_text(text),
        }
    }

    fn encode(&self, command: &ClientCommand) -> Frame {
        Frame::Text(command.to_string())
    }
}

/// Parses a text frame: `<command>[ <rest>]`.
fn decode_text(text: &str) -> Result<ServerMessage, ProtocolError> {
    let (command, rest) = text.split_once(' ').unwrap_or((text, ""));

    match command {
        "pos" => {
            let entries: Vec<(PlayerId, (i64, i64))> = serde_json::from_str(rest)?;
            Ok(ServerMessage::Pos(
                entries
                    .into_iter()
                    .map(|(id, (x, y))| PositionEntry { id, x, y })
                    .collect(),
            ))
        }
        "players" => {
            let entries: Vec<(PlayerId, String, String)> = serde_json::from_str(rest)?;
            Ok(ServerMessage::Players(
                entries
                    .into_iter()
                    .map(|(id, name, color)| PlayerEntry {
                        id,
                        name: unescape_spaces(&name),
                        color,
                    })
                    .collect(),
            ))
        }
        "regack" => decode_regack(rest),
        "win" => Ok(ServerMessage::Win),
        "lose" => {
            let who = rest.trim();
            if who.is_empty() {
                return Err(ProtocolError::InvalidMessage("lose without a player".into()));
            }
            Ok(ServerMessage::Lose { who: unescape_spaces(who) })
        }
        "logoff" => Ok(ServerMessage::Logoff(rest.trim().parse()?)),
        other => Err(ProtocolError::UnknownCommand(other.to_owned())),
    }
}

/// `regack <room> <name> <uid> <WxH> <ratio>`
fn decode_regack(rest: &str) -> Result<ServerMessage, ProtocolError> {
    let fields: Vec<&str> = rest.split(' ').filter(|f| !f.is_empty()).collect();
    let [room, name, uid, size, ratio] = fields.as_slice() else {
        return Err(ProtocolError::InvalidMessage(format!(
            "regack expects 5 fields, got {}",
            fields.len()
        )));
    };

    Ok(ServerMessage::Regack {
        room: unescape_spaces(room),
        name: unescape_spaces(name),
        player_id: uid.parse()?,
        size: size.parse()?,
        mine_ratio: (*ratio).to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoardSize;

    fn decode(text: &str) -> Result<ServerMessage, ProtocolError> {
        LineCodec.decode(&Frame::Text(text.into()))
    }

    // =====================================================================
    // Inbound text commands
    // =====================================================================

    #[test]
    fn test_decode_regack() {
        let msg = decode("regack GameRoom Alice 7 30x16 0.2").unwrap();
        assert_eq!(
            msg,
            ServerMessage::Regack {
                room: "GameRoom".into(),
                name: "Alice".into(),
                player_id: PlayerId(7),
                size: BoardSize { width: 30, height: 16 },
                mine_ratio: "0.2".into(),
            }
        );
    }

    #[test]
    fn test_decode_regack_unescapes_names() {
        let msg = decode("regack Big&nbsp;Room Mary&nbsp;Ann 3 9x9 1/5").unwrap();
        let ServerMessage::Regack { room, name, mine_ratio, .. } = msg else {
            panic!("expected regack");
        };
        assert_eq!(room, "Big Room");
        assert_eq!(name, "Mary Ann");
        assert_eq!(mine_ratio, "1/5");
    }

    #[test]
    fn test_decode_regack_with_missing_fields_fails() {
        assert!(matches!(
            decode("regack Room Alice 7"),
            Err(ProtocolError::InvalidMessage(_))
        ));
        assert!(matches!(
            decode("regack Room Alice seven 3x3 0.1"),
            Err(ProtocolError::InvalidMessage(_))
        ));
    }

    #[test]
    fn test_decode_players() {
        let msg = decode(r##"players [[1,"Bob","#ff0000"],[2,"Eve&nbspX","#00ff00"]]"##).unwrap();
        assert_eq!(
            msg,
            ServerMessage::Players(vec![
                PlayerEntry { id: PlayerId(1), name: "Bob".into(), color: "#ff0000".into() },
                PlayerEntry { id: PlayerId(2), name: "Eve X".into(), color: "#00ff00".into() },
            ])
        );
    }

    #[test]
    fn test_decode_pos_batch() {
        let msg = decode("pos [[3,[120,48]],[4,[0,0]]]").unwrap();
        assert_eq!(
            msg,
            ServerMessage::Pos(vec![
                PositionEntry { id: PlayerId(3), x: 120, y: 48 },
                PositionEntry { id: PlayerId(4), x: 0, y: 0 },
            ])
        );
    }

    #[test]
    fn test_decode_pos_with_bad_json_fails() {
        assert!(matches!(decode("pos [[3,[1"), Err(ProtocolError::Json(_))));
        assert!(matches!(decode("pos"), Err(ProtocolError::Json(_))));
    }

    #[test]
    fn test_decode_win_ignores_trailing_name() {
        assert_eq!(decode("win").unwrap(), ServerMessage::Win);
        assert_eq!(decode("win Alice").unwrap(), ServerMessage::Win);
    }

    #[test]
    fn test_decode_lose() {
        assert_eq!(
            decode("lose Bob&nbspby").unwrap(),
            ServerMessage::Lose { who: "Bob by".into() }
        );
        assert!(decode("lose").is_err());
    }

    #[test]
    fn test_decode_logoff() {
        assert_eq!(decode("logoff 5").unwrap(), ServerMessage::Logoff(PlayerId(5)));
        assert!(decode("logoff five").is_err());
    }

    #[test]
    fn test_decode_unknown_command() {
        let result = decode("teleport 1 2");
        assert!(matches!(result, Err(ProtocolError::UnknownCommand(c)) if c == "teleport"));
    }

    // =====================================================================
    // Binary frames and encoding
    // =====================================================================

    #[test]
    fn test_decode_binary_garbage_is_an_inflate_error() {
        let result = LineCodec.decode(&Frame::Binary(vec![0xFF, 0x00, 0x13]));
        assert!(matches!(result, Err(ProtocolError::Inflate(_))));
    }

    #[test]
    fn test_encode_produces_text_frames() {
        assert_eq!(
            LineCodec.encode(&ClientCommand::Reveal { x: 1, y: 2 }),
            Frame::Text("reveal 1 2".into())
        );
        assert_eq!(LineCodec.encode(&ClientCommand::Heartbeat), Frame::Text("<3".into()));
    }
}
