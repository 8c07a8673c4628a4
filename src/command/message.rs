/*! RDS message elements.

The elements that carry actual RDS programme data: PI, PS, TA/TP, DI,
PTY, PTYN and radiotext. All of them address a data set and a
programme service:

* data set number: 0 = currently active set, 1..=0xFD a specific set,
  0xFE = all except the current one, 0xFF = all sets.
* programme service number: which service within the data set.

The deprecated programme item number (0x06) and music/speech flag
(0x05) elements are intentionally absent.
*/
use log::warn;

use super::{expect_mec, need};
use crate::{Result, charset};

/// Validate a PS/PTYN style name: at most 8 characters before
/// stripping trailing spaces, every character encodable.
fn validate_name(name: &str, field: &'static str) -> Result<String> {
    let len = name.chars().count();
    if len > 8 {
        return Err(crate::Error::InvalidField {
            field,
            value: len as i64,
        });
    }
    let name = name.trim_end_matches(' ');
    charset::encode(name)?;
    Ok(name.to_owned())
}

/// Encode a validated name, right-padded with spaces to 8 bytes.
fn padded_name(name: &str) -> impl Iterator<Item = u8> + '_ {
    name.chars()
        .filter_map(charset::char_to_byte)
        .chain(std::iter::repeat(0x20))
        .take(8)
}

/// Programme identification (MEC 0x01).
///
/// The 16-bit PI code identifies the broadcaster; receivers use it for
/// AF switching and EON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammeIdentificationSet {
    /// Target data set.
    pub data_set_number: u8,
    /// Target programme service.
    pub programme_service_number: u8,
    /// The PI code.
    pub pi: u16,
}

impl ProgrammeIdentificationSet {
    /// Message element code.
    pub const MEC: u8 = 0x01;

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let [hi, lo] = self.pi.to_be_bytes();
        vec![
            Self::MEC,
            self.data_set_number,
            self.programme_service_number,
            hi,
            lo,
        ]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 5)?;
        expect_mec(data, Self::MEC)?;
        Ok((
            Self {
                data_set_number: data[1],
                programme_service_number: data[2],
                pi: u16::from_be_bytes([data[3], data[4]]),
            },
            5,
        ))
    }
}

/// Programme service name (MEC 0x02).
///
/// The 8-character station name shown on receiver displays. Stored
/// without trailing spaces; the wire form is always padded to 8 RDS
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammeServiceNameSet {
    /// Target data set.
    pub data_set_number: u8,
    /// Target programme service.
    pub programme_service_number: u8,
    name: String,
}

impl ProgrammeServiceNameSet {
    /// Message element code.
    pub const MEC: u8 = 0x02;

    /// Create a PS element. The name must be at most 8 characters and
    /// encodable in the RDS character set; trailing spaces are
    /// stripped.
    pub fn new(name: &str, data_set_number: u8, programme_service_number: u8) -> Result<Self> {
        Ok(Self {
            data_set_number,
            programme_service_number,
            name: validate_name(name, "programme service name")?,
        })
    }

    /// The station name, without padding.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the station name, with the same validation as
    /// [`new`](Self::new).
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = validate_name(name, "programme service name")?;
        Ok(())
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut ret = vec![
            Self::MEC,
            self.data_set_number,
            self.programme_service_number,
        ];
        ret.extend(padded_name(&self.name));
        ret
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 11)?;
        expect_mec(data, Self::MEC)?;
        let name = charset::decode(&data[3..11])?;
        Ok((Self::new(&name, data[1], data[2])?, 11))
    }
}

/// Traffic announcement / traffic programme flags (MEC 0x03).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficAnnouncementProgrammeSet {
    /// Target data set.
    pub data_set_number: u8,
    /// Target programme service.
    pub programme_service_number: u8,
    /// TA: an announcement is on air right now.
    pub announcement: bool,
    /// TP: this service carries traffic announcements at all.
    pub programme: bool,
}

impl TrafficAnnouncementProgrammeSet {
    /// Message element code.
    pub const MEC: u8 = 0x03;

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![
            Self::MEC,
            self.data_set_number,
            self.programme_service_number,
            u8::from(self.programme) << 1 | u8::from(self.announcement),
        ]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 4)?;
        expect_mec(data, Self::MEC)?;
        Ok((
            Self {
                data_set_number: data[1],
                programme_service_number: data[2],
                announcement: data[3] & 0b01 != 0,
                programme: data[3] & 0b10 != 0,
            },
            4,
        ))
    }
}

/// Decoder information flags (MEC 0x04).
///
/// Only the stereo and dynamic-PTY bits are modelled; artificial head
/// and compressed audio are deprecated in the RDS standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderInformationSet {
    /// Target data set.
    pub data_set_number: u8,
    /// Target programme service.
    pub programme_service_number: u8,
    /// Stereo (cleared means mono).
    pub stereo: bool,
    /// PTY codes change dynamically.
    pub dynamic_pty: bool,
}

impl DecoderInformationSet {
    /// Message element code.
    pub const MEC: u8 = 0x04;

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![
            Self::MEC,
            self.data_set_number,
            self.programme_service_number,
            u8::from(self.dynamic_pty) << 3 | u8::from(self.stereo),
        ]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 4)?;
        expect_mec(data, Self::MEC)?;
        Ok((
            Self {
                data_set_number: data[1],
                programme_service_number: data[2],
                stereo: data[3] & 0b0001 != 0,
                dynamic_pty: data[3] & 0b1000 != 0,
            },
            4,
        ))
    }
}

/// The 31 programme types of RDS, plus "undefined".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ProgrammeType {
    Undefined = 0,
    News = 1,
    CurrentAffairs = 2,
    Information = 3,
    Sport = 4,
    Education = 5,
    Drama = 6,
    Culture = 7,
    Science = 8,
    Varied = 9,
    PopMusic = 10,
    RockMusic = 11,
    EasyListeningMusic = 12,
    LightClassical = 13,
    SeriousClassical = 14,
    OtherMusic = 15,
    Weather = 16,
    Finance = 17,
    ChildrensProgrammes = 18,
    SocialAffairs = 19,
    Religion = 20,
    PhoneIn = 21,
    Travel = 22,
    Leisure = 23,
    JazzMusic = 24,
    CountryMusic = 25,
    NationalMusic = 26,
    OldiesMusic = 27,
    FolkMusic = 28,
    Documentary = 29,
    AlarmTest = 30,
    Alarm = 31,
}

impl TryFrom<u8> for ProgrammeType {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self> {
        use ProgrammeType::*;
        Ok(match value {
            0 => Undefined,
            1 => News,
            2 => CurrentAffairs,
            3 => Information,
            4 => Sport,
            5 => Education,
            6 => Drama,
            7 => Culture,
            8 => Science,
            9 => Varied,
            10 => PopMusic,
            11 => RockMusic,
            12 => EasyListeningMusic,
            13 => LightClassical,
            14 => SeriousClassical,
            15 => OtherMusic,
            16 => Weather,
            17 => Finance,
            18 => ChildrensProgrammes,
            19 => SocialAffairs,
            20 => Religion,
            21 => PhoneIn,
            22 => Travel,
            23 => Leisure,
            24 => JazzMusic,
            25 => CountryMusic,
            26 => NationalMusic,
            27 => OldiesMusic,
            28 => FolkMusic,
            29 => Documentary,
            30 => AlarmTest,
            31 => Alarm,
            value => {
                return Err(crate::Error::InvalidField {
                    field: "programme type",
                    value: i64::from(value),
                });
            }
        })
    }
}

/// Programme type (MEC 0x07).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgrammeTypeSet {
    /// Target data set.
    pub data_set_number: u8,
    /// Target programme service.
    pub programme_service_number: u8,
    /// The programme type to transmit.
    pub programme_type: ProgrammeType,
}

impl ProgrammeTypeSet {
    /// Message element code.
    pub const MEC: u8 = 0x07;

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![
            Self::MEC,
            self.data_set_number,
            self.programme_service_number,
            self.programme_type as u8,
        ]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 4)?;
        expect_mec(data, Self::MEC)?;
        Ok((
            Self {
                data_set_number: data[1],
                programme_service_number: data[2],
                programme_type: ProgrammeType::try_from(data[3])?,
            },
            4,
        ))
    }
}

/// Programme type name (MEC 0x3E).
///
/// Free-text refinement of the PTY ("Football" rather than "Sport").
/// Same 8-character shape as the PS name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammeTypeNameSet {
    /// Target data set.
    pub data_set_number: u8,
    /// Target programme service.
    pub programme_service_number: u8,
    name: String,
}

impl ProgrammeTypeNameSet {
    /// Message element code.
    pub const MEC: u8 = 0x3E;

    /// Create a PTYN element. The name must be at most 8 characters
    /// and encodable in the RDS character set; trailing spaces are
    /// stripped.
    pub fn new(name: &str, data_set_number: u8, programme_service_number: u8) -> Result<Self> {
        Ok(Self {
            data_set_number,
            programme_service_number,
            name: validate_name(name, "programme type name")?,
        })
    }

    /// The programme type name, without padding.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut ret = vec![
            Self::MEC,
            self.data_set_number,
            self.programme_service_number,
        ];
        ret.extend(padded_name(&self.name));
        ret
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 11)?;
        expect_mec(data, Self::MEC)?;
        let name = charset::decode(&data[3..11])?;
        Ok((Self::new(&name, data[1], data[2])?, 11))
    }
}

/// What the encoder does with its radiotext buffer when a new text
/// arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum RadioTextBufferConfiguration {
    /// Flush the buffer, then add this text.
    #[default]
    TruncateBefore = 0b00,
    /// Add this text to the cycle of buffered texts.
    Append = 0b10,
}

impl TryFrom<u8> for RadioTextBufferConfiguration {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0b00 => Ok(Self::TruncateBefore),
            0b10 => Ok(Self::Append),
            // 0b01 and 0b11 are reserved by the protocol.
            value => Err(crate::Error::InvalidField {
                field: "buffer configuration",
                value: i64::from(value),
            }),
        }
    }
}

/// Radiotext (MEC 0x0A).
///
/// Up to 64 characters of free text. Texts shorter than 61 characters
/// must end in a carriage return so receivers know where the text
/// stops; [`new`](Self::new) appends the 0x0D itself (with a warning)
/// when it is missing, [`verbatim`](Self::verbatim) refuses instead.
///
/// The element doubles as a buffer-flush command: the wire form with a
/// zero length byte clears the text buffer without transmitting
/// anything new. Use [`flush`](Self::flush) for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioTextSet {
    /// Target data set.
    pub data_set_number: u8,
    /// Target programme service.
    pub programme_service_number: u8,
    /// A/B flag: toggling it tells receivers to clear their display.
    pub a_b_toggle: bool,
    /// Buffer handling for this text.
    pub buffer_configuration: RadioTextBufferConfiguration,
    text: String,
    number_of_transmissions: u8,
}

impl RadioTextSet {
    /// Message element code.
    pub const MEC: u8 = 0x0A;

    /// Transmission count meaning "repeat until replaced".
    pub const INFINITE_TRANSMISSIONS: u8 = 0;

    /// Create a radiotext element.
    ///
    /// `text` must be 1..=64 characters of the RDS character set; a
    /// missing terminating carriage return on texts shorter than 61
    /// characters is appended with a warning.
    /// `number_of_transmissions` is 0..=15, 0 meaning infinite.
    pub fn new(
        text: &str,
        number_of_transmissions: u8,
        a_b_toggle: bool,
        buffer_configuration: RadioTextBufferConfiguration,
        data_set_number: u8,
        programme_service_number: u8,
    ) -> Result<Self> {
        let mut text = text.to_owned();
        if !text.is_empty() && text.chars().count() < 61 && !text.ends_with('\r') {
            warn!("appending terminating carriage return to radiotext {text:?}");
            text.push('\r');
        }
        Self::build(
            text,
            number_of_transmissions,
            a_b_toggle,
            buffer_configuration,
            data_set_number,
            programme_service_number,
        )
    }

    /// Create a radiotext element without touching the text.
    ///
    /// Unlike [`new`](Self::new), a text shorter than 61 characters
    /// that does not end in a carriage return is an error.
    pub fn verbatim(
        text: &str,
        number_of_transmissions: u8,
        a_b_toggle: bool,
        buffer_configuration: RadioTextBufferConfiguration,
        data_set_number: u8,
        programme_service_number: u8,
    ) -> Result<Self> {
        Self::build(
            text.to_owned(),
            number_of_transmissions,
            a_b_toggle,
            buffer_configuration,
            data_set_number,
            programme_service_number,
        )
    }

    fn build(
        text: String,
        number_of_transmissions: u8,
        a_b_toggle: bool,
        buffer_configuration: RadioTextBufferConfiguration,
        data_set_number: u8,
        programme_service_number: u8,
    ) -> Result<Self> {
        let len = text.chars().count();
        if len == 0 || len > 64 {
            return Err(crate::Error::InvalidField {
                field: "radiotext",
                value: len as i64,
            });
        }
        if len < 61 && !text.ends_with('\r') {
            return Err(crate::Error::InvalidField {
                field: "radiotext",
                value: len as i64,
            });
        }
        charset::encode(&text)?;
        if number_of_transmissions > 0xF {
            return Err(crate::Error::InvalidField {
                field: "number of transmissions",
                value: i64::from(number_of_transmissions),
            });
        }
        Ok(Self {
            data_set_number,
            programme_service_number,
            a_b_toggle,
            buffer_configuration,
            text,
            number_of_transmissions,
        })
    }

    /// Create the flush-only form: clear the encoder's radiotext
    /// buffer without transmitting new text.
    #[must_use]
    pub fn flush(data_set_number: u8, programme_service_number: u8) -> Self {
        Self {
            data_set_number,
            programme_service_number,
            a_b_toggle: false,
            buffer_configuration: RadioTextBufferConfiguration::TruncateBefore,
            text: String::new(),
            number_of_transmissions: 0,
        }
    }

    /// The text, including its terminating carriage return. Empty for
    /// the flush-only form.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// How often the text is transmitted; 0 means until replaced.
    #[must_use]
    pub fn number_of_transmissions(&self) -> u8 {
        self.number_of_transmissions
    }

    /// True for the buffer-flush form that carries no text.
    #[must_use]
    pub fn is_flush(&self) -> bool {
        self.text.is_empty()
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut ret = vec![
            Self::MEC,
            self.data_set_number,
            self.programme_service_number,
        ];
        if self.is_flush() {
            ret.push(0);
            return ret;
        }
        let text: Vec<u8> = self.text.chars().filter_map(charset::char_to_byte).collect();
        ret.push(1 + text.len() as u8);
        ret.push(
            (self.buffer_configuration as u8) << 5
                | self.number_of_transmissions << 1
                | u8::from(self.a_b_toggle),
        );
        ret.extend(text);
        ret
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    ///
    /// A wire text without its terminating carriage return is accepted
    /// and terminated implicitly, with a warning.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 4)?;
        expect_mec(data, Self::MEC)?;
        let (data_set_number, programme_service_number) = (data[1], data[2]);
        let mel = usize::from(data[3]);
        if mel == 0 {
            return Ok((Self::flush(data_set_number, programme_service_number), 4));
        }
        let body = &data[4..];
        need(body, mel)?;
        let flags = body[0];
        let buffer_configuration = RadioTextBufferConfiguration::try_from((flags & 0b0110_0000) >> 5)?;
        let number_of_transmissions = (flags & 0b0001_1110) >> 1;
        let a_b_toggle = flags & 0b0000_0001 != 0;
        let text = charset::decode(&body[1..mel])?;
        Ok((
            Self::new(
                &text,
                number_of_transmissions,
                a_b_toggle,
                buffer_configuration,
                data_set_number,
                programme_service_number,
            )?,
            4 + mel,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn pi_encode() {
        let cmd = ProgrammeIdentificationSet {
            data_set_number: 0x3F,
            programme_service_number: 0xDA,
            pi: 0xABCD,
        };
        assert_eq!(cmd.encode(), [0x01, 0x3F, 0xDA, 0xAB, 0xCD]);
    }

    #[test]
    fn pi_decode() {
        let (cmd, consumed) =
            ProgrammeIdentificationSet::decode(&[0x01, 0x3F, 0xDA, 0xAB, 0xCD]).unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(cmd.pi, 0xABCD);
        assert_eq!(cmd.data_set_number, 0x3F);
        assert_eq!(cmd.programme_service_number, 0xDA);

        assert_eq!(
            ProgrammeIdentificationSet::decode(&[0x01]).unwrap_err(),
            Error::NotEnoughData { have: 1, need: 5 }
        );
        assert_eq!(
            ProgrammeIdentificationSet::decode(&[0xF1, 0x02, 0x03, 0x04, 0x05]).unwrap_err(),
            Error::MecMismatch {
                got: 0xF1,
                expected: 0x01
            }
        );
    }

    #[test]
    fn ps_encode() {
        let cmd = ProgrammeServiceNameSet::new("RADIO 1", 0, 2).unwrap();
        assert_eq!(
            cmd.encode(),
            [0x02, 0x00, 0x02, 0x52, 0x41, 0x44, 0x49, 0x4F, 0x20, 0x31, 0x20]
        );
    }

    #[test]
    fn ps_decode() {
        let (cmd, consumed) = ProgrammeServiceNameSet::decode(&[
            0x02, 0x00, 0x02, 0x52, 0x41, 0x44, 0x49, 0x4F, 0x20, 0x31, 0x20,
        ])
        .unwrap();
        assert_eq!(consumed, 11);
        assert_eq!(cmd.name(), "RADIO 1");
        assert_eq!(cmd.data_set_number, 0);
        assert_eq!(cmd.programme_service_number, 2);
    }

    #[test]
    fn ps_validation() {
        assert!(ProgrammeServiceNameSet::new("12345678", 0, 0).is_ok());
        assert_eq!(
            ProgrammeServiceNameSet::new("123456789", 0, 0).unwrap_err(),
            Error::InvalidField {
                field: "programme service name",
                value: 9
            }
        );
        // Umlauts are fine, tabs are not.
        assert!(ProgrammeServiceNameSet::new("hörfunk", 0, 0).is_ok());
        assert_eq!(
            ProgrammeServiceNameSet::new("a\tb", 0, 0).unwrap_err(),
            Error::UnmappableChar('\t')
        );
        // Trailing spaces are stripped before comparison.
        let a = ProgrammeServiceNameSet::new("RADIO 1 ", 0, 2).unwrap();
        let b = ProgrammeServiceNameSet::new("RADIO 1", 0, 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ta_tp() {
        let cmd = TrafficAnnouncementProgrammeSet {
            data_set_number: 0,
            programme_service_number: 5,
            announcement: false,
            programme: true,
        };
        assert_eq!(cmd.encode(), [0x03, 0x00, 0x05, 0x02]);
        let (decoded, consumed) =
            TrafficAnnouncementProgrammeSet::decode(&[0x03, 0x00, 0x05, 0x02]).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn decoder_information() {
        let cmd = DecoderInformationSet {
            data_set_number: 0,
            programme_service_number: 3,
            stereo: true,
            dynamic_pty: false,
        };
        assert_eq!(cmd.encode(), [0x04, 0x00, 0x03, 0x01]);
        let (decoded, consumed) = DecoderInformationSet::decode(&[0x04, 0x00, 0x03, 0x01]).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn pty() {
        let cmd = ProgrammeTypeSet {
            data_set_number: 0,
            programme_service_number: 5,
            programme_type: ProgrammeType::Science,
        };
        assert_eq!(cmd.encode(), [0x07, 0x00, 0x05, 0x08]);
        let (decoded, consumed) = ProgrammeTypeSet::decode(&[0x07, 0x00, 0x05, 0x08]).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(decoded, cmd);

        assert_eq!(
            ProgrammeTypeSet::decode(&[0x07, 0x00, 0x05, 32]).unwrap_err(),
            Error::InvalidField {
                field: "programme type",
                value: 32
            }
        );
    }

    #[test]
    fn ptyn() {
        let cmd = ProgrammeTypeNameSet::new("Football", 0, 2).unwrap();
        let wire = [
            0x3E, 0x00, 0x02, 0x46, 0x6F, 0x6F, 0x74, 0x62, 0x61, 0x6C, 0x6C,
        ];
        assert_eq!(cmd.encode(), wire);
        let (decoded, consumed) = ProgrammeTypeNameSet::decode(&wire).unwrap();
        assert_eq!(consumed, 11);
        assert_eq!(decoded.name(), "Football");
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn radiotext_decode_truncate() {
        // Flush the buffer, toggle A/B, transmit "RDS" five times.
        let (cmd, consumed) =
            RadioTextSet::decode(&[0x0A, 0x00, 0x01, 0x04, 0x0B, 0x52, 0x44, 0x53]).unwrap();
        assert_eq!(consumed, 8);
        assert_eq!(cmd.data_set_number, 0);
        assert_eq!(cmd.programme_service_number, 1);
        assert!(cmd.a_b_toggle);
        assert_eq!(
            cmd.buffer_configuration,
            RadioTextBufferConfiguration::TruncateBefore
        );
        assert_eq!(cmd.number_of_transmissions(), 5);
        // The terminating carriage return is added on the way in.
        assert_eq!(cmd.text(), "RDS\r");
    }

    #[test]
    fn radiotext_decode_append() {
        let (cmd, consumed) =
            RadioTextSet::decode(&[0x0A, 0x00, 0x01, 0x05, 0x51, 0x74, 0x65, 0x78, 0x74]).unwrap();
        assert_eq!(consumed, 9);
        assert_eq!(
            cmd.buffer_configuration,
            RadioTextBufferConfiguration::Append
        );
        assert_eq!(cmd.number_of_transmissions(), 8);
        assert!(cmd.a_b_toggle);
        assert_eq!(cmd.text(), "text\r");
    }

    #[test]
    fn radiotext_round_trip() {
        let cmd = RadioTextSet::new(
            "Now playing: nothing\r",
            3,
            false,
            RadioTextBufferConfiguration::TruncateBefore,
            0,
            1,
        )
        .unwrap();
        let wire = cmd.encode();
        assert_eq!(wire[0], 0x0A);
        assert_eq!(wire[3] as usize, 1 + cmd.text().chars().count());
        let (decoded, consumed) = RadioTextSet::decode(&wire).unwrap();
        assert_eq!(consumed, wire.len());
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn radiotext_flush() {
        let cmd = RadioTextSet::flush(2, 7);
        assert!(cmd.is_flush());
        assert_eq!(cmd.encode(), [0x0A, 0x02, 0x07, 0x00]);
        let (decoded, consumed) = RadioTextSet::decode(&[0x0A, 0x02, 0x07, 0x00]).unwrap();
        assert_eq!(consumed, 4);
        assert_eq!(decoded, cmd);
        assert_eq!(decoded.data_set_number, 2);
        assert_eq!(decoded.programme_service_number, 7);
    }

    #[test]
    fn radiotext_validation() {
        // The implicit carriage return is appended for short texts...
        let cmd = RadioTextSet::new(
            "RDS",
            0,
            false,
            RadioTextBufferConfiguration::TruncateBefore,
            0,
            0,
        )
        .unwrap();
        assert_eq!(cmd.text(), "RDS\r");
        // ...but verbatim refuses to.
        assert_eq!(
            RadioTextSet::verbatim(
                "RDS",
                0,
                false,
                RadioTextBufferConfiguration::TruncateBefore,
                0,
                0,
            )
            .unwrap_err(),
            Error::InvalidField {
                field: "radiotext",
                value: 3
            }
        );
        // 61+ characters need no terminator.
        let long = "x".repeat(61);
        assert!(
            RadioTextSet::verbatim(
                &long,
                0,
                false,
                RadioTextBufferConfiguration::TruncateBefore,
                0,
                0,
            )
            .is_ok()
        );
        // Too long or empty is refused outright.
        let too_long = "x".repeat(65);
        assert!(
            RadioTextSet::new(
                &too_long,
                0,
                false,
                RadioTextBufferConfiguration::TruncateBefore,
                0,
                0,
            )
            .is_err()
        );
        assert!(
            RadioTextSet::new(
                "",
                0,
                false,
                RadioTextBufferConfiguration::TruncateBefore,
                0,
                0,
            )
            .is_err()
        );
        // Transmission count is four bits.
        assert_eq!(
            RadioTextSet::new(
                "ok\r",
                16,
                false,
                RadioTextBufferConfiguration::TruncateBefore,
                0,
                0,
            )
            .unwrap_err(),
            Error::InvalidField {
                field: "number of transmissions",
                value: 16
            }
        );
    }

    #[test]
    fn radiotext_reserved_buffer_configuration() {
        // Buffer configurations 0b01 and 0b11 are reserved.
        for flags in [0b0010_0000u8, 0b0110_0000] {
            let err = RadioTextSet::decode(&[0x0A, 0x00, 0x01, 0x02, flags, 0x0D]).unwrap_err();
            assert_eq!(
                err,
                Error::InvalidField {
                    field: "buffer configuration",
                    value: i64::from(flags >> 5)
                }
            );
        }
    }
}
