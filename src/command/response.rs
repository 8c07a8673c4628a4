/*! Bidirectional link elements.

When the communication mode allows it, the encoder answers frames with
acknowledgements, and the controller can ask for element values with
the Request element. Request is the one element whose syntax depends
on another element: its body names a target MEC, and whether DSN/PSN
address bytes follow is decided by the target's registry metadata, not
by guessing at the byte stream.
*/
use super::{expect_mec, lookup, need};
use crate::Result;

/// Outcome the encoder reports for a received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ResponseCode {
    /// Everything after the last response was received correctly.
    Ok = 0,
    /// CRC check failed.
    CrcError = 1,
    /// A sequence number was skipped.
    MessageNotReceived = 2,
    /// Unknown message element code.
    MessageUnknown = 3,
    /// Data set number not acceptable.
    DataSetNumberError = 4,
    /// Programme service number not acceptable.
    ProgrammeServiceNumberError = 5,
    /// A parameter was out of range.
    ParameterOutOfRange = 6,
    /// Element length does not fit the element.
    MessageElementLengthError = 7,
    /// A field length does not fit its field.
    MessageFieldLengthError = 8,
    /// The message is well-formed but cannot be processed.
    MessageNotAcceptable = 9,
    /// The stop byte never came.
    EndMessageMissing = 10,
    /// The receive buffer overflowed.
    BufferOverflow = 11,
    /// Byte stuffing was violated.
    BadStuffing = 12,
    /// The frame ended in the middle of a message.
    UnexpectedEndOfMessage = 13,
}

impl TryFrom<u8> for ResponseCode {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self> {
        use ResponseCode::{
            BadStuffing, BufferOverflow, CrcError, DataSetNumberError, EndMessageMissing,
            MessageElementLengthError, MessageFieldLengthError, MessageNotAcceptable,
            MessageNotReceived, MessageUnknown, ParameterOutOfRange,
            ProgrammeServiceNumberError, UnexpectedEndOfMessage,
        };
        Ok(match value {
            0 => ResponseCode::Ok,
            1 => CrcError,
            2 => MessageNotReceived,
            3 => MessageUnknown,
            4 => DataSetNumberError,
            5 => ProgrammeServiceNumberError,
            6 => ParameterOutOfRange,
            7 => MessageElementLengthError,
            8 => MessageFieldLengthError,
            9 => MessageNotAcceptable,
            10 => EndMessageMissing,
            11 => BufferOverflow,
            12 => BadStuffing,
            13 => UnexpectedEndOfMessage,
            value => {
                return Err(crate::Error::InvalidField {
                    field: "response code",
                    value: i64::from(value),
                });
            }
        })
    }
}

/// Message acknowledgement (MEC 0x18).
///
/// A positive acknowledgement is just the code; anything else names
/// the sequence counter of the offending frame, so the short and long
/// wire forms are chosen by the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgement {
    /// What the encoder thought of the message.
    pub code: ResponseCode,
    /// Sequence counter of the frame being acknowledged; only on the
    /// wire for codes other than [`ResponseCode::Ok`].
    pub sequence_counter: u8,
}

impl Acknowledgement {
    /// Message element code.
    pub const MEC: u8 = 0x18;

    /// A positive acknowledgement.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            code: ResponseCode::Ok,
            sequence_counter: 0,
        }
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self.code {
            ResponseCode::Ok => vec![Self::MEC, 0],
            code => vec![Self::MEC, code as u8, self.sequence_counter],
        }
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 2)?;
        expect_mec(data, Self::MEC)?;
        let code = ResponseCode::try_from(data[1])?;
        if code == ResponseCode::Ok {
            return Ok((Self::ok(), 2));
        }
        need(data, 3)?;
        Ok((
            Self {
                code,
                sequence_counter: data[2],
            },
            3,
        ))
    }
}

/// Request (MEC 0x17).
///
/// Asks the encoder to report an element's value. The body is a
/// length byte, the target element code, the target's DSN/PSN bytes
/// if (and only if) that element is addressed, and optional opaque
/// extra data the target defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    element_code: u8,
    addressing: Option<(u8, u8)>,
    additional_data: Vec<u8>,
}

impl Request {
    /// Message element code.
    pub const MEC: u8 = 0x17;

    /// Create a request for `element_code`.
    ///
    /// `addressing` is the target's `(data set number, programme
    /// service number)` pair; it is required for addressed elements
    /// and must be absent for the rest, as recorded in the element
    /// registry. Unregistered targets are refused.
    pub fn new(
        element_code: u8,
        addressing: Option<(u8, u8)>,
        additional_data: Vec<u8>,
    ) -> Result<Self> {
        let spec = lookup(element_code).ok_or(crate::Error::UnknownMec(element_code))?;
        if spec.addressed != addressing.is_some() {
            return Err(crate::Error::InvalidField {
                field: "request addressing",
                value: i64::from(element_code),
            });
        }
        // Body length must fit the element length byte.
        let body_len = 1 + if spec.addressed { 2 } else { 0 } + additional_data.len();
        if body_len > 255 {
            return Err(crate::Error::InvalidField {
                field: "additional data",
                value: additional_data.len() as i64,
            });
        }
        Ok(Self {
            element_code,
            addressing,
            additional_data,
        })
    }

    /// The element code whose value is requested.
    #[must_use]
    pub fn element_code(&self) -> u8 {
        self.element_code
    }

    /// The target's DSN/PSN pair, for addressed target elements.
    #[must_use]
    pub fn addressing(&self) -> Option<(u8, u8)> {
        self.addressing
    }

    /// Target-defined extra request data.
    #[must_use]
    pub fn additional_data(&self) -> &[u8] {
        &self.additional_data
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut body = vec![self.element_code];
        if let Some((dsn, psn)) = self.addressing {
            body.push(dsn);
            body.push(psn);
        }
        body.extend(&self.additional_data);
        let mut ret = vec![Self::MEC, body.len() as u8];
        ret.extend(body);
        ret
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 2)?;
        expect_mec(data, Self::MEC)?;
        let mel = usize::from(data[1]);
        need(data, 2 + mel)?;
        let body = &data[2..2 + mel];
        let &element_code = body.first().ok_or(crate::Error::NotEnoughData {
            have: 0,
            need: 1,
        })?;
        let spec = lookup(element_code).ok_or(crate::Error::UnknownMec(element_code))?;
        let (addressing, rest) = if spec.addressed {
            need(body, 3)?;
            (Some((body[1], body[2])), &body[3..])
        } else {
            (None, &body[1..])
        };
        Ok((
            Self::new(element_code, addressing, rest.to_vec())?,
            2 + mel,
        ))
    }
}
