/*! UECP frames: the transmission envelope around message elements.

On the wire a frame is

```text
STA  ADDR_HI ADDR_LO SEQ MEL  <payload…>  CRC_HI CRC_LO  STP
0xFE |---- CRC covered, byte-stuffed on transmission ---| 0xFF
```

where the address packs a 10-bit site address and a 6-bit encoder
address (zero meaning "all" in both cases), SEQ is a wrap-around
counter with 0 reserved as "unused", and the payload is the
concatenated element syntax of the frame's commands, at most 255
bytes.

[`Frame`] is the in-memory model with [`Frame::encode`] producing the
wire bytes; [`FrameDecoder`] is the inbound state machine, fed with
arbitrary chunks of bytes and yielding one frame per stop delimiter.
A chunk can hold any number of frames, so drain each chunk until no
more come out:

```
use ruecp::frame::FrameDecoder;

let mut decoder = FrameDecoder::new();
let mut chunk: &[u8] = &[
    0xFE, 0x00, 0x00, 0xC5, 0x02, 0x18, 0x00, 0x1A, 0xB4, 0xFF,
    0xFE, 0x00, 0x00, 0xC6, 0x02, 0x1C, 0x02, 0x6D, 0xEE, 0xFF,
];
let mut frames = Vec::new();
loop {
    let (frame, rest) = decoder.push(chunk)?;
    chunk = rest;
    match frame {
        Some(frame) => frames.push(frame),
        None => break,
    }
}
assert_eq!(frames.len(), 2);
# Ok::<(), ruecp::Error>(())
```
*/
use log::{debug, trace};

use crate::command::Command;
use crate::{Result, crc, stuffing};

/// Start-of-frame delimiter.
pub const STA: u8 = 0xFE;
/// Stop-of-frame delimiter.
pub const STP: u8 = 0xFF;

/// One UECP frame: addressing, sequence counter, and commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    site_address: u16,
    encoder_address: u8,
    sequence_counter: u8,
    commands: Vec<Command>,
    payload_len: usize,
}

impl Frame {
    /// Site address meaning "every site".
    pub const ALL_SITES: u16 = 0;
    /// Encoder address meaning "every encoder at the site".
    pub const ALL_ENCODERS: u8 = 0;
    /// Sequence counter value meaning "sequencing not in use".
    pub const SEQUENCE_UNUSED: u8 = 0;

    /// Create an empty broadcast frame (all sites, all encoders,
    /// sequencing unused).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The 10-bit site address.
    #[must_use]
    pub fn site_address(&self) -> u16 {
        self.site_address
    }

    /// Set the site address (0..=0x3FF; 0 addresses all sites).
    pub fn set_site_address(&mut self, site_address: u16) -> Result<()> {
        if site_address > 0x3FF {
            return Err(crate::Error::InvalidField {
                field: "site address",
                value: i64::from(site_address),
            });
        }
        self.site_address = site_address;
        Ok(())
    }

    /// The 6-bit encoder address.
    #[must_use]
    pub fn encoder_address(&self) -> u8 {
        self.encoder_address
    }

    /// Set the encoder address (0..=0x3F; 0 addresses all encoders).
    pub fn set_encoder_address(&mut self, encoder_address: u8) -> Result<()> {
        if encoder_address > 0x3F {
            return Err(crate::Error::InvalidField {
                field: "encoder address",
                value: i64::from(encoder_address),
            });
        }
        self.encoder_address = encoder_address;
        Ok(())
    }

    /// The sequence counter.
    #[must_use]
    pub fn sequence_counter(&self) -> u8 {
        self.sequence_counter
    }

    /// Set the sequence counter. 0 is reserved for "unused"; live
    /// counters wrap from 255 back to 1.
    pub fn set_sequence_counter(&mut self, sequence_counter: u8) {
        self.sequence_counter = sequence_counter;
    }

    /// The commands in this frame, in transmission order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Append a command to the frame.
    ///
    /// Fails with [`PayloadOverflow`](crate::Error::PayloadOverflow)
    /// if the command's wire form would push the total payload past
    /// the 255 bytes the length byte can express; the frame is
    /// unchanged in that case.
    pub fn add_command(&mut self, command: Command) -> Result<()> {
        let len = command.encode().len();
        if self.payload_len + len > 255 {
            return Err(crate::Error::PayloadOverflow);
        }
        self.payload_len += len;
        self.commands.push(command);
        Ok(())
    }

    /// Drop all commands.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
        self.payload_len = 0;
    }

    /// Encode the frame into its complete wire form, delimiters
    /// included.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let address = self.site_address << 6 | u16::from(self.encoder_address);
        let mut body = Vec::with_capacity(6 + self.payload_len);
        body.extend(address.to_be_bytes());
        body.push(self.sequence_counter);
        debug_assert!(self.payload_len <= 255);
        body.push(self.payload_len as u8);
        for command in &self.commands {
            body.extend(command.encode());
        }
        body.extend(crc::crc16(&body).to_be_bytes());

        let mut wire = Vec::with_capacity(2 + body.len());
        wire.push(STA);
        wire.extend(stuffing::stuff(&body));
        wire.push(STP);
        wire
    }
}

/// Incremental frame decoder.
///
/// Feed inbound bytes with [`push`](Self::push); each call returns the
/// next completed frame, if any, plus the unconsumed tail of the
/// chunk, which the caller feeds back in until no frame comes out.
/// Bytes outside frames are discarded, so the decoder tolerates line
/// noise and mid-frame connection loss. Any protocol error resets the
/// internal state before it is reported; the decoder is immediately
/// ready for the next frame.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    start_seen: bool,
    body: Vec<u8>,
    destuffer: stuffing::Destuffer,
}

impl FrameDecoder {
    /// Create a decoder waiting for a start delimiter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume bytes, returning the first completed frame and the
    /// remaining bytes of the chunk.
    ///
    /// Returns `(None, &[])` when the chunk is exhausted without
    /// completing a frame; partial state is kept for the next call.
    pub fn push<'a>(&mut self, data: &'a [u8]) -> Result<(Option<Frame>, &'a [u8])> {
        for (i, &byte) in data.iter().enumerate() {
            match byte {
                STA => {
                    if self.start_seen && !self.body.is_empty() {
                        trace!("start delimiter inside frame, restarting");
                    }
                    self.start_seen = true;
                    self.body.clear();
                    self.destuffer.reset();
                }
                STP if self.start_seen => {
                    let result = self.finalise();
                    self.reset();
                    let frame = result?;
                    debug!(
                        "frame completed: seq {}, {} command(s)",
                        frame.sequence_counter(),
                        frame.commands().len()
                    );
                    return Ok((Some(frame), &data[i + 1..]));
                }
                // Stray byte between frames; tolerate the gap.
                _ if !self.start_seen => trace!("discarding {byte:#04x} outside frame"),
                byte => match self.destuffer.feed(byte) {
                    Ok(Some(raw)) => self.body.push(raw),
                    Ok(None) => (),
                    Err(e) => {
                        self.reset();
                        return Err(e);
                    }
                },
            }
        }
        Ok((None, &data[data.len()..]))
    }

    /// Validate the de-stuffed frame body and build the frame.
    fn finalise(&self) -> Result<Frame> {
        if self.destuffer.pending() {
            return Err(crate::Error::TruncatedStuffing);
        }
        // Address (2), sequence counter, MEL, CRC (2).
        if self.body.len() < 6 {
            return Err(crate::Error::NotEnoughData {
                have: self.body.len(),
                need: 6,
            });
        }
        let (body, crc_bytes) = self.body.split_at(self.body.len() - 2);
        let got = u16::from_be_bytes([crc_bytes[0], crc_bytes[1]]);
        let want = crc::crc16(body);
        if got != want {
            return Err(crate::Error::CrcMismatch { got, want });
        }

        let address = u16::from_be_bytes([body[0], body[1]]);
        let mel = body[3];
        let payload = &body[4..];
        if usize::from(mel) != payload.len() {
            return Err(crate::Error::LengthMismatch {
                mel,
                have: payload.len(),
            });
        }

        let mut frame = Frame::new();
        frame.set_site_address(address >> 6)?;
        frame.set_encoder_address((address & 0x3F) as u8)?;
        frame.set_sequence_counter(body[2]);
        for command in Command::decode_sequence(payload)? {
            frame.add_command(command)?;
        }
        Ok(frame)
    }

    /// Abandon any in-progress frame. Idempotent; this is the
    /// cancellation hook for transports on timeout or disconnect.
    pub fn reset(&mut self) {
        self.start_seen = false;
        self.body.clear();
        self.destuffer.reset();
    }

    /// True if the decoder holds no partial frame state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.start_seen && self.body.is_empty() && !self.destuffer.pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::command::message::ProgrammeIdentificationSet;
    use crate::command::response::{Acknowledgement, ResponseCode};
    use crate::command::{control, message};

    fn hex(s: &str) -> Vec<u8> {
        let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    #[test]
    fn setters() {
        let mut f = Frame::new();
        assert_eq!(f.site_address(), Frame::ALL_SITES);
        assert_eq!(f.encoder_address(), Frame::ALL_ENCODERS);
        assert_eq!(f.sequence_counter(), Frame::SEQUENCE_UNUSED);

        assert_eq!(
            f.set_site_address(0xFFF).unwrap_err(),
            Error::InvalidField {
                field: "site address",
                value: 0xFFF
            }
        );
        assert_eq!(f.site_address(), 0);
        f.set_site_address(0x35).unwrap();
        assert_eq!(f.site_address(), 0x35);

        assert_eq!(
            f.set_encoder_address(0xFF).unwrap_err(),
            Error::InvalidField {
                field: "encoder address",
                value: 0xFF
            }
        );
        assert_eq!(f.encoder_address(), 0);
        f.set_encoder_address(0x33).unwrap();
        assert_eq!(f.encoder_address(), 0x33);
    }

    #[test]
    fn payload_cap() {
        let mut f = Frame::new();
        // A PI element is 5 bytes; 51 of them fill the payload.
        for _ in 0..51 {
            f.add_command(Command::ProgrammeIdentificationSet(
                ProgrammeIdentificationSet {
                    data_set_number: 0,
                    programme_service_number: 0,
                    pi: 0,
                },
            ))
            .unwrap();
        }
        assert_eq!(
            f.add_command(Command::ProgrammeIdentificationSet(
                ProgrammeIdentificationSet {
                    data_set_number: 0,
                    programme_service_number: 0,
                    pi: 0,
                },
            ))
            .unwrap_err(),
            Error::PayloadOverflow
        );
        assert_eq!(f.commands().len(), 51);
        f.clear_commands();
        assert!(f.commands().is_empty());
    }

    #[test]
    fn encode_empty_frame() {
        let mut f = Frame::new();
        assert_eq!(f.encode(), hex("fe 00 00 00 00 7b 3f ff"));

        // Sequence counter 0xFE gets byte-stuffed.
        f.set_sequence_counter(0xFE);
        assert_eq!(f.encode(), hex("fe 00 00 fd 01 00 4b f1 ff"));
    }

    #[test]
    fn encode_with_stuffed_payload() {
        let mut f = Frame::new();
        f.set_sequence_counter(0xFE);
        f.add_command(Command::ProgrammeIdentificationSet(
            ProgrammeIdentificationSet {
                data_set_number: 0,
                programme_service_number: 0,
                pi: 0xFF,
            },
        ))
        .unwrap();
        assert_eq!(f.encode(), hex("fe 00 00 fd 01 05 01 00 00 00 fd 02 0d 3d ff"));
    }

    #[test]
    fn decode_reproduces_encoded_vectors() {
        let mut decoder = FrameDecoder::new();
        for wire in [
            hex("fe 00 00 fd 01 00 4b f1 ff"),
            hex("fe 00 00 fd 01 05 01 00 00 00 fd 02 0d 3d ff"),
        ] {
            let (frame, rest) = decoder.push(&wire).unwrap();
            let frame = frame.unwrap();
            assert!(rest.is_empty());
            assert_eq!(frame.sequence_counter(), 0xFE);
            assert_eq!(frame.encode(), wire);
        }
    }

    #[test]
    fn decode_across_chunks() {
        let data = hex("fe 00 00 2a 02 18 00 4a b0 ff");
        let mut decoder = FrameDecoder::new();

        let (frame, rest) = decoder.push(&data[..3]).unwrap();
        assert!(frame.is_none());
        assert!(rest.is_empty());
        assert!(!decoder.is_empty());

        let (frame, rest) = decoder.push(&data[3..]).unwrap();
        let frame = frame.unwrap();
        assert!(rest.is_empty());
        assert!(decoder.is_empty());

        assert_eq!(frame.site_address(), 0);
        assert_eq!(frame.encoder_address(), 0);
        assert_eq!(frame.sequence_counter(), 0x2A);
        assert_eq!(
            frame.commands(),
            &[Command::Acknowledgement(Acknowledgement::ok())]
        );
    }

    #[test]
    fn decode_select_frame() {
        let data = hex("fe 00 00 2b 02 1c 02 d0 82 ff");
        let mut decoder = FrameDecoder::new();
        let (frame, rest) = decoder.push(&data).unwrap();
        let frame = frame.unwrap();
        assert!(rest.is_empty());
        assert_eq!(frame.sequence_counter(), 0x2B);
        assert_eq!(
            frame.commands(),
            &[Command::DataSetSelect(
                control::DataSetSelect::new(2).unwrap()
            )]
        );
    }

    #[test]
    fn decode_back_to_back_frames() {
        let mut data = hex("fe 00 00 c5 02 18 00 1a b4 ff");
        data.extend(hex("fe 00 00 c6 02 1c 02 6d ee ff"));
        let mut decoder = FrameDecoder::new();

        let (frame, rest) = decoder.push(&data).unwrap();
        assert_eq!(frame.unwrap().sequence_counter(), 0xC5);
        assert_eq!(rest.len(), 10);

        let (frame, rest) = decoder.push(rest).unwrap();
        assert_eq!(frame.unwrap().sequence_counter(), 0xC6);
        assert!(rest.is_empty());

        let (frame, rest) = decoder.push(rest).unwrap();
        assert!(frame.is_none());
        assert!(rest.is_empty());
    }

    #[test]
    fn decode_ignores_leading_noise() {
        let mut data = hex("00 13 37 ff");
        data.extend(hex("fe 00 00 2a 02 18 00 4a b0 ff"));
        let mut decoder = FrameDecoder::new();
        let (frame, _) = decoder.push(&data).unwrap();
        assert_eq!(frame.unwrap().sequence_counter(), 0x2A);
    }

    #[test]
    fn decode_restarts_on_start_delimiter() {
        // A new STA mid-frame abandons the old frame.
        let mut data = hex("fe 00 00 99");
        data.extend(hex("fe 00 00 2a 02 18 00 4a b0 ff"));
        let mut decoder = FrameDecoder::new();
        let (frame, _) = decoder.push(&data).unwrap();
        assert_eq!(frame.unwrap().sequence_counter(), 0x2A);
    }

    #[test]
    fn errors_reset_the_decoder() {
        let good = hex("fe 00 00 2a 02 18 00 4a b0 ff");
        let mut decoder = FrameDecoder::new();

        // CRC failure.
        let mut bad = good.clone();
        bad[7] ^= 0x01;
        assert!(matches!(
            decoder.push(&bad).unwrap_err(),
            Error::CrcMismatch { .. }
        ));
        assert!(decoder.is_empty());
        let (frame, _) = decoder.push(&good).unwrap();
        assert!(frame.is_some());

        // Bad stuffing sequence.
        assert!(matches!(
            decoder.push(&hex("fe 00 fd 05 ff")).unwrap_err(),
            Error::Stuffing { byte: 0x05, .. }
        ));
        assert!(decoder.is_empty());
        let (frame, _) = decoder.push(&good).unwrap();
        assert!(frame.is_some());

        // Stop delimiter right after an escape byte.
        assert!(matches!(
            decoder.push(&hex("fe 00 00 2a 02 18 00 4a b0 fd ff")).unwrap_err(),
            Error::TruncatedStuffing
        ));
        assert!(decoder.is_empty());

        // Frame too short for even the header.
        assert!(matches!(
            decoder.push(&hex("fe 00 00 ff")).unwrap_err(),
            Error::NotEnoughData { have: 2, need: 6 }
        ));

        // MEL disagreeing with the payload length. Body claims one
        // payload byte but has none; CRC is over 00 00 2a 01.
        let mut body = hex("00 00 2a 01");
        body.extend(crc::crc16(&body).to_be_bytes());
        let mut wire = vec![STA];
        wire.extend(stuffing::stuff(&body));
        wire.push(STP);
        assert_eq!(
            decoder.push(&wire).unwrap_err(),
            Error::LengthMismatch { mel: 1, have: 0 }
        );

        // Unknown MEC aborts the frame.
        let mut body = hex("00 00 2a 02 05 00");
        body.extend(crc::crc16(&body).to_be_bytes());
        let mut wire = vec![STA];
        wire.extend(stuffing::stuff(&body));
        wire.push(STP);
        assert_eq!(decoder.push(&wire).unwrap_err(), Error::UnknownMec(0x05));

        // Still good for a healthy frame afterwards.
        let (frame, _) = decoder.push(&good).unwrap();
        assert!(frame.is_some());
    }

    #[test]
    fn stray_stop_is_ignored() {
        let mut decoder = FrameDecoder::new();
        let data = hex("ff ff");
        let (frame, rest) = decoder.push(&data).unwrap();
        assert!(frame.is_none());
        assert!(rest.is_empty());
        assert!(decoder.is_empty());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut decoder = FrameDecoder::new();
        decoder.push(&hex("fe 00 00")).unwrap();
        assert!(!decoder.is_empty());
        decoder.reset();
        assert!(decoder.is_empty());
        decoder.reset();
        assert!(decoder.is_empty());
    }

    #[test]
    fn round_trip() {
        let mut frame = Frame::new();
        frame.set_site_address(0x35).unwrap();
        frame.set_encoder_address(0x12).unwrap();
        frame.set_sequence_counter(0x42);
        frame
            .add_command(Command::ProgrammeIdentificationSet(
                ProgrammeIdentificationSet {
                    data_set_number: 1,
                    programme_service_number: 2,
                    pi: 0xFFFE,
                },
            ))
            .unwrap();
        frame
            .add_command(Command::ProgrammeServiceNameSet(
                message::ProgrammeServiceNameSet::new("RADIO 1", 1, 2).unwrap(),
            ))
            .unwrap();
        frame
            .add_command(Command::Acknowledgement(Acknowledgement {
                code: ResponseCode::BufferOverflow,
                sequence_counter: 0x41,
            }))
            .unwrap();

        let wire = frame.encode();
        let mut decoder = FrameDecoder::new();
        let (decoded, rest) = decoder.push(&wire).unwrap();
        assert!(rest.is_empty());
        assert_eq!(decoded.unwrap(), frame);
    }
}
