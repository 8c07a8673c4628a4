/*! Encoder control and setup elements.

Housekeeping commands: selecting the active data set, editing the
encoder's site/encoder address lists, choosing the communication mode,
and controlling the RDS output signal itself (on/off, subcarrier
phase, level).
*/
use super::{expect_mec, need};
use crate::Result;

/// Data set select (MEC 0x1C).
///
/// Makes a data set the active one. Unlike the addressing byte of the
/// message elements, data set 0 ("current") would be meaningless here,
/// so the valid range is 1..=0xFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSetSelect {
    data_set_number: u8,
}

impl DataSetSelect {
    /// Message element code.
    pub const MEC: u8 = 0x1C;

    /// Select data set `data_set_number` (1..=0xFF).
    pub fn new(data_set_number: u8) -> Result<Self> {
        if data_set_number == 0 {
            return Err(crate::Error::InvalidField {
                field: "data set number",
                value: 0,
            });
        }
        Ok(Self { data_set_number })
    }

    /// The data set to activate.
    #[must_use]
    pub fn data_set_number(&self) -> u8 {
        self.data_set_number
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![Self::MEC, self.data_set_number]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 2)?;
        expect_mec(data, Self::MEC)?;
        Ok((Self::new(data[1])?, 2))
    }
}

/// Edit operation for the site/encoder address list elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AddressSetMode {
    /// Remove one address from the list.
    RemoveSingle = 0b00,
    /// Add one address to the list.
    AddSingle = 0b01,
    /// Clear the whole list.
    RemoveAll = 0b10,
}

impl TryFrom<u8> for AddressSetMode {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0b00 => Ok(Self::RemoveSingle),
            0b01 => Ok(Self::AddSingle),
            0b10 => Ok(Self::RemoveAll),
            value => Err(crate::Error::InvalidField {
                field: "address set mode",
                value: i64::from(value),
            }),
        }
    }
}

/// Site address list edit (MEC 0x23).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteAddressSet {
    /// What to do with the address.
    pub mode: AddressSetMode,
    site_address: u16,
}

impl SiteAddressSet {
    /// Message element code.
    pub const MEC: u8 = 0x23;

    /// Create a site address edit. The address is 10 bits
    /// (0..=0x3FF).
    pub fn new(mode: AddressSetMode, site_address: u16) -> Result<Self> {
        if site_address > 0x3FF {
            return Err(crate::Error::InvalidField {
                field: "site address",
                value: i64::from(site_address),
            });
        }
        Ok(Self { mode, site_address })
    }

    /// The site address being added or removed.
    #[must_use]
    pub fn site_address(&self) -> u16 {
        self.site_address
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let [hi, lo] = self.site_address.to_be_bytes();
        vec![Self::MEC, self.mode as u8, hi, lo]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 4)?;
        expect_mec(data, Self::MEC)?;
        let mode = AddressSetMode::try_from(data[1])?;
        Ok((Self::new(mode, u16::from_be_bytes([data[2], data[3]]))?, 4))
    }
}

/// Encoder address list edit (MEC 0x27).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderAddressSet {
    /// What to do with the address.
    pub mode: AddressSetMode,
    encoder_address: u8,
}

impl EncoderAddressSet {
    /// Message element code.
    pub const MEC: u8 = 0x27;

    /// Create an encoder address edit. The address is 6 bits
    /// (0..=0x3F).
    pub fn new(mode: AddressSetMode, encoder_address: u8) -> Result<Self> {
        if encoder_address > 0x3F {
            return Err(crate::Error::InvalidField {
                field: "encoder address",
                value: i64::from(encoder_address),
            });
        }
        Ok(Self {
            mode,
            encoder_address,
        })
    }

    /// The encoder address being added or removed.
    #[must_use]
    pub fn encoder_address(&self) -> u8 {
        self.encoder_address
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![Self::MEC, self.mode as u8, self.encoder_address]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 3)?;
        expect_mec(data, Self::MEC)?;
        let mode = AddressSetMode::try_from(data[1])?;
        Ok((Self::new(mode, data[2])?, 3))
    }
}

/// How the encoder talks back on the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommunicationMode {
    /// Never respond.
    Unidirectional = 0,
    /// Respond when asked.
    BidirectionalRequestedResponse = 1,
    /// Respond spontaneously.
    BidirectionalSpontaneousResponse = 2,
}

impl TryFrom<u8> for CommunicationMode {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Unidirectional),
            1 => Ok(Self::BidirectionalRequestedResponse),
            2 => Ok(Self::BidirectionalSpontaneousResponse),
            value => Err(crate::Error::InvalidField {
                field: "communication mode",
                value: i64::from(value),
            }),
        }
    }
}

/// Communication mode (MEC 0x2C).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunicationModeSet {
    /// The mode to switch to.
    pub mode: CommunicationMode,
}

impl CommunicationModeSet {
    /// Message element code.
    pub const MEC: u8 = 0x2C;

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![Self::MEC, self.mode as u8]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 2)?;
        expect_mec(data, Self::MEC)?;
        Ok((
            Self {
                mode: CommunicationMode::try_from(data[1])?,
            },
            2,
        ))
    }
}

/// RDS output enable (MEC 0x1E).
///
/// Switches the 57 kHz subcarrier on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdsEnableSet {
    /// Whether the RDS signal is output at all.
    pub enable: bool,
}

impl RdsEnableSet {
    /// Message element code.
    pub const MEC: u8 = 0x1E;

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![Self::MEC, u8::from(self.enable)]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 2)?;
        expect_mec(data, Self::MEC)?;
        match data[1] {
            0x00 => Ok((Self { enable: false }, 2)),
            0x01 => Ok((Self { enable: true }, 2)),
            value => Err(crate::Error::InvalidField {
                field: "enable flag",
                value: i64::from(value),
            }),
        }
    }
}

/// RDS phase (MEC 0x22).
///
/// Subcarrier phase against the 19 kHz pilot, in tenths of a degree,
/// per reference-table input. Table entry 0 means all inputs, 7 the
/// currently selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdsPhaseSet {
    reference_table: u8,
    deci_degrees: u16,
}

impl RdsPhaseSet {
    /// Message element code.
    pub const MEC: u8 = 0x22;

    /// Reference table entry addressing every input.
    pub const ALL_REFERENCE_TABLES: u8 = 0;
    /// Reference table entry addressing the current input.
    pub const CURRENT_REFERENCE_TABLE: u8 = 7;

    /// Create a phase element. `reference_table` is 0..=7,
    /// `deci_degrees` 0..=3599 (i.e. 0.0° to 359.9°).
    pub fn new(reference_table: u8, deci_degrees: u16) -> Result<Self> {
        if reference_table > 7 {
            return Err(crate::Error::InvalidField {
                field: "reference table",
                value: i64::from(reference_table),
            });
        }
        if deci_degrees > 3599 {
            return Err(crate::Error::InvalidField {
                field: "deci-degrees",
                value: i64::from(deci_degrees),
            });
        }
        Ok(Self {
            reference_table,
            deci_degrees,
        })
    }

    /// The addressed reference table entry.
    #[must_use]
    pub fn reference_table(&self) -> u8 {
        self.reference_table
    }

    /// The phase in tenths of a degree.
    #[must_use]
    pub fn deci_degrees(&self) -> u16 {
        self.deci_degrees
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![
            Self::MEC,
            self.reference_table << 5 | (self.deci_degrees >> 8) as u8,
            (self.deci_degrees & 0xFF) as u8,
        ]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 3)?;
        expect_mec(data, Self::MEC)?;
        let reference_table = (data[1] & 0b1110_0000) >> 5;
        let deci_degrees = u16::from(data[1] & 0b1111) << 8 | u16::from(data[2]);
        Ok((Self::new(reference_table, deci_degrees)?, 3))
    }
}

/// RDS level (MEC 0x0E).
///
/// Output level of the RDS subcarrier in millivolts peak-to-peak, per
/// reference-table input, 0..=8191.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RdsLevelSet {
    reference_table: u8,
    level: u16,
}

impl RdsLevelSet {
    /// Message element code.
    pub const MEC: u8 = 0x0E;

    /// Create a level element. `reference_table` is 0..=7, `level`
    /// 0..=8191.
    pub fn new(reference_table: u8, level: u16) -> Result<Self> {
        if reference_table > 7 {
            return Err(crate::Error::InvalidField {
                field: "reference table",
                value: i64::from(reference_table),
            });
        }
        if level > 8191 {
            return Err(crate::Error::InvalidField {
                field: "level",
                value: i64::from(level),
            });
        }
        Ok(Self {
            reference_table,
            level,
        })
    }

    /// The addressed reference table entry.
    #[must_use]
    pub fn reference_table(&self) -> u8 {
        self.reference_table
    }

    /// The level in mV peak-to-peak.
    #[must_use]
    pub fn level(&self) -> u16 {
        self.level
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        vec![
            Self::MEC,
            self.reference_table << 5 | (self.level >> 8) as u8,
            (self.level & 0xFF) as u8,
        ]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 3)?;
        expect_mec(data, Self::MEC)?;
        let reference_table = (data[1] & 0b1110_0000) >> 5;
        let level = u16::from(data[1] & 0b0001_1111) << 8 | u16::from(data[2]);
        Ok((Self::new(reference_table, level)?, 3))
    }
}
