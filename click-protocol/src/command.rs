//! Command byte classification and the ISM7 command set

/// Mask selecting the two type bits of a command byte
pub const TYPE_MASK: u8 = 0xC0;

/// Mask selecting the opcode bits of a command byte
pub const OPCODE_MASK: u8 = 0x3F;

const TYPE_REQUEST: u8 = 0x00;
const TYPE_CONFIRMATION: u8 = 0x40;
const TYPE_INDICATION: u8 = 0x80;

/// ISM7 command bytes
pub mod cmd {
    // Requests: host -> module
    pub const DATA_REQ: u8 = 0x00;
    pub const DATAEX_REQ: u8 = 0x01;
    pub const RESET_REQ: u8 = 0x05;
    pub const SET_CHANNEL_REQ: u8 = 0x06;
    pub const SET_DESTNETID_REQ: u8 = 0x07;
    pub const SET_DESTADDR_REQ: u8 = 0x08;
    pub const SET_REQ: u8 = 0x09;
    pub const GET_REQ: u8 = 0x0A;
    pub const RSSI_REQ: u8 = 0x0D;
    pub const SHUTDOWN_REQ: u8 = 0x0E;
    pub const STANDBY_REQ: u8 = 0x0F;
    pub const SET_PAPOWER_REQ: u8 = 0x11;
    pub const FACTORY_RESET_REQ: u8 = 0x12;

    // Confirmations: module -> host, one per request
    pub const DATA_CNF: u8 = 0x40;
    pub const DATAEX_CNF: u8 = 0x41;
    pub const RESET_CNF: u8 = 0x45;
    pub const SET_CHANNEL_CNF: u8 = 0x46;
    pub const SET_DESTNETID_CNF: u8 = 0x47;
    pub const SET_DESTADDR_CNF: u8 = 0x48;
    pub const SET_CNF: u8 = 0x49;
    pub const GET_CNF: u8 = 0x4A;
    pub const RSSI_CNF: u8 = 0x4D;
    pub const SHUTDOWN_CNF: u8 = 0x4E;
    pub const STANDBY_CNF: u8 = 0x4F;
    pub const SET_PAPOWER_CNF: u8 = 0x51;
    pub const FACTORY_RESET_CNF: u8 = 0x52;

    // Indications: module -> host, unsolicited
    pub const DATAEX_IND: u8 = 0x81;
}

/// Who sent a packet and why, from the command's top two bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketKind {
    /// `00`: host to module
    Request,
    /// `01`: module's synchronous reply to a request
    Confirmation,
    /// `10`: asynchronous event from the module
    Indication,
}

impl PacketKind {
    /// Classify a command byte
    ///
    /// Returns `None` for the unassigned `11` pattern.
    pub fn of(command: u8) -> Option<Self> {
        match command & TYPE_MASK {
            TYPE_REQUEST => Some(PacketKind::Request),
            TYPE_CONFIRMATION => Some(PacketKind::Confirmation),
            TYPE_INDICATION => Some(PacketKind::Indication),
            _ => None,
        }
    }

    /// True for packets the module sends, which are the only valid wait targets
    pub fn is_event(self) -> bool {
        matches!(self, PacketKind::Confirmation | PacketKind::Indication)
    }
}

/// Opcode bits of a command byte
pub fn opcode(command: u8) -> u8 {
    command & OPCODE_MASK
}

/// Confirmation command answering `request`
pub fn confirmation_for(request: u8) -> u8 {
    opcode(request) | TYPE_CONFIRMATION
}

/// True if `command` is something the module can send back
pub fn is_event(command: u8) -> bool {
    PacketKind::of(command).is_some_and(PacketKind::is_event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_type_bits() {
        assert_eq!(PacketKind::of(0x00), Some(PacketKind::Request));
        assert_eq!(PacketKind::of(0x3F), Some(PacketKind::Request));
        assert_eq!(PacketKind::of(0x40), Some(PacketKind::Confirmation));
        assert_eq!(PacketKind::of(0x7F), Some(PacketKind::Confirmation));
        assert_eq!(PacketKind::of(0x80), Some(PacketKind::Indication));
        assert_eq!(PacketKind::of(0xBF), Some(PacketKind::Indication));
        assert_eq!(PacketKind::of(0xC0), None);
        assert_eq!(PacketKind::of(0xFF), None);
    }

    #[test]
    fn test_classify_every_byte() {
        for command in 0..=u8::MAX {
            let expected = match command >> 6 {
                0b00 => Some(PacketKind::Request),
                0b01 => Some(PacketKind::Confirmation),
                0b10 => Some(PacketKind::Indication),
                _ => None,
            };
            assert_eq!(PacketKind::of(command), expected);
        }
    }

    #[test]
    fn test_wait_targets() {
        assert!(!is_event(cmd::DATA_REQ));
        assert!(!is_event(cmd::RESET_REQ));
        assert!(is_event(cmd::RESET_CNF));
        assert!(is_event(cmd::DATAEX_IND));
        assert!(!is_event(0xC4));
    }

    #[test]
    fn test_confirmation_mapping() {
        let pairs = [
            (cmd::DATA_REQ, cmd::DATA_CNF),
            (cmd::DATAEX_REQ, cmd::DATAEX_CNF),
            (cmd::RESET_REQ, cmd::RESET_CNF),
            (cmd::SET_CHANNEL_REQ, cmd::SET_CHANNEL_CNF),
            (cmd::SET_DESTNETID_REQ, cmd::SET_DESTNETID_CNF),
            (cmd::SET_DESTADDR_REQ, cmd::SET_DESTADDR_CNF),
            (cmd::SET_REQ, cmd::SET_CNF),
            (cmd::GET_REQ, cmd::GET_CNF),
            (cmd::RSSI_REQ, cmd::RSSI_CNF),
            (cmd::SHUTDOWN_REQ, cmd::SHUTDOWN_CNF),
            (cmd::STANDBY_REQ, cmd::STANDBY_CNF),
            (cmd::SET_PAPOWER_REQ, cmd::SET_PAPOWER_CNF),
            (cmd::FACTORY_RESET_REQ, cmd::FACTORY_RESET_CNF),
        ];

        for (request, confirmation) in pairs {
            assert_eq!(confirmation_for(request), confirmation);
            assert_eq!(opcode(request), opcode(confirmation));
        }
    }
}
