#![warn(missing_docs)]
/*! This crate implements UECP, the Universal Encoder Communication
Protocol (EBU Tech 3244/SPB 490), spoken over serial links by RDS
encoders at FM transmitter sites.

UECP wraps *message elements* (set the PI code, replace the radiotext,
adjust the RDS output level, …) in frames with site/encoder addressing,
a sequence counter, byte stuffing, and a CRC. This crate converts
between typed frames and the on-wire byte stream in both directions,
and does so incrementally: bytes can arrive in any chunking, and a
malformed frame never poisons the decoder state for the next one.

# Architecture overview

Outbound, a frame is encoded in layers:

```text
      [ Command list ]
            ↓
  [ element encoders (MEC syntax) ]
            ↓
  [ addr/seq/mel header + payload ]
            ↓
      [ CRC-16 append ]
            ↓
     [ byte stuffing ]
            ↓
  [ STA 0xFE … STP 0xFF framing ]
```

Inbound, [`frame::FrameDecoder`] runs the same layers in reverse as a
byte-driven state machine, delivering a [`frame::Frame`] whenever a
stop delimiter completes a healthy frame.

# Examples

Build a frame and encode it to wire bytes:

```
use ruecp::command::{Command, message::ProgrammeIdentificationSet};
use ruecp::frame::Frame;

let mut frame = Frame::new();
frame.set_sequence_counter(5);
frame.add_command(Command::ProgrammeIdentificationSet(
    ProgrammeIdentificationSet { data_set_number: 0, programme_service_number: 0, pi: 0xABCD },
))?;
let wire = frame.encode();
assert_eq!(wire[0], 0xFE);
assert_eq!(*wire.last().unwrap(), 0xFF);
# Ok::<(), ruecp::Error>(())
```

Decode a byte stream, in whatever chunks the serial port delivers:

```
use ruecp::frame::FrameDecoder;

let mut decoder = FrameDecoder::new();
let wire = [0xFE, 0x00, 0x00, 0x2A, 0x02, 0x18, 0x00, 0x4A, 0xB0, 0xFF];
let (frame, rest) = decoder.push(&wire)?;
let frame = frame.expect("complete frame");
assert_eq!(frame.sequence_counter(), 0x2A);
assert!(rest.is_empty());
# Ok::<(), ruecp::Error>(())
```

The serial transport itself (port setup, 8N1, timeouts) is out of
scope; feed whatever bytes arrive into [`frame::FrameDecoder::push`]
and write [`frame::Frame::encode`] output to the port.
*/

pub mod charset;
pub mod command;
pub mod crc;
pub mod frame;
pub mod stuffing;

/// Errors raised by the UECP codecs.
///
/// The incremental frame decoder resets itself before surfacing any of
/// these, so a malformed frame never corrupts the decoding of the next
/// one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A byte that is illegal in the current byte-stuffing state.
    #[error("invalid stuffed byte {byte:#04x} (escape pending: {escape_pending})")]
    Stuffing {
        /// The offending byte.
        byte: u8,
        /// Whether an 0xFD escape was pending when it arrived.
        escape_pending: bool,
    },

    /// Stuffed data ended with an 0xFD escape still waiting for its
    /// continuation byte.
    #[error("stuffed data truncated inside an escape sequence")]
    TruncatedStuffing,

    /// The frame CRC did not match the payload.
    #[error("CRC mismatch: got {got:#06x}, computed {want:#06x}")]
    CrcMismatch {
        /// CRC found on the wire.
        got: u16,
        /// CRC computed over the payload.
        want: u16,
    },

    /// The frame's message-element-length byte disagrees with the
    /// number of payload bytes actually present.
    #[error("length mismatch: header says {mel} payload bytes, got {have}")]
    LengthMismatch {
        /// Length claimed by the MEL byte.
        mel: u8,
        /// Payload bytes actually present.
        have: usize,
    },

    /// Ran out of bytes while decoding an element or frame.
    #[error("not enough data: have {have} bytes, need {need}")]
    NotEnoughData {
        /// Bytes available.
        have: usize,
        /// Bytes required.
        need: usize,
    },

    /// An element decoder was handed data starting with the wrong
    /// message element code.
    #[error("message element code mismatch: got {got:#04x}, expected {expected:#04x}")]
    MecMismatch {
        /// MEC found at the start of the data.
        got: u8,
        /// MEC the decoder handles.
        expected: u8,
    },

    /// A message element code with no registered decoder.
    #[error("unknown message element code {0:#04x}")]
    UnknownMec(u8),

    /// A field value outside its allowed range.
    #[error("invalid value {value:#x} for {field}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// Adding the command would push the frame payload past 255 bytes.
    #[error("frame payload would exceed 255 bytes")]
    PayloadOverflow,

    /// A character with no RDS basic character set code point.
    #[error("character {0:?} is not in the RDS basic character set")]
    UnmappableChar(char),

    /// A byte with no RDS basic character set mapping.
    #[error("byte {0:#04x} is not defined in the RDS basic character set")]
    UndefinedCodePoint(u8),
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
