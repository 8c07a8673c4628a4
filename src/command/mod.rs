/*! UECP message-element catalogue.

Every command an encoder understands is a *message element*: a byte
sequence starting with a message element code (MEC), followed by
element-specific syntax. This module holds the sum type over all
supported elements and the registry that maps MECs to their decoders.

The registry is a process-lifetime table built at compile time. Each
entry carries the element's decode entry point plus the metadata the
nested Request element needs: whether the element addresses a data set
and programme service. Elements this crate does not implement
(alternative frequencies, EON-AF, slow labelling, linkage information,
and the deprecated PIN and music/speech flags) have no entry and
surface as [`Error::UnknownMec`](crate::Error::UnknownMec).

Submodules group the elements the way the protocol does: RDS message
data, clock control, encoder control and setup, and the bidirectional
link elements.

```
use ruecp::command::Command;

let (command, consumed) = Command::decode(&[0x01, 0x00, 0x02, 0xAB, 0xCD])?;
assert_eq!(consumed, 5);
assert_eq!(command.mec(), 0x01);
assert_eq!(command.encode(), [0x01, 0x00, 0x02, 0xAB, 0xCD]);
# Ok::<(), ruecp::Error>(())
```
*/
pub mod clock;
pub mod control;
pub mod message;
pub mod response;

use crate::Result;

/// One UECP command, i.e. one message element of a frame payload.
///
/// Each variant wraps the typed element struct; construct those
/// directly (or via their validating constructors) and wrap them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    /// Programme identification, MEC 0x01.
    ProgrammeIdentificationSet(message::ProgrammeIdentificationSet),
    /// Programme service name, MEC 0x02.
    ProgrammeServiceNameSet(message::ProgrammeServiceNameSet),
    /// Traffic announcement / traffic programme flags, MEC 0x03.
    TrafficAnnouncementProgrammeSet(message::TrafficAnnouncementProgrammeSet),
    /// Decoder information flags, MEC 0x04.
    DecoderInformationSet(message::DecoderInformationSet),
    /// Programme type, MEC 0x07.
    ProgrammeTypeSet(message::ProgrammeTypeSet),
    /// Real-time clock correction, MEC 0x09.
    RealTimeClockCorrectionSet(clock::RealTimeClockCorrectionSet),
    /// Radiotext, MEC 0x0A.
    RadioTextSet(message::RadioTextSet),
    /// Real-time clock, MEC 0x0D.
    RealTimeClockSet(clock::RealTimeClockSet),
    /// RDS output level, MEC 0x0E.
    RdsLevelSet(control::RdsLevelSet),
    /// Request for an element value, MEC 0x17.
    Request(response::Request),
    /// Message acknowledgement, MEC 0x18.
    Acknowledgement(response::Acknowledgement),
    /// Real-time clock transmission enable, MEC 0x19.
    RealTimeClockEnableSet(clock::RealTimeClockEnableSet),
    /// Data set select, MEC 0x1C.
    DataSetSelect(control::DataSetSelect),
    /// RDS output enable, MEC 0x1E.
    RdsEnableSet(control::RdsEnableSet),
    /// RDS phase, MEC 0x22.
    RdsPhaseSet(control::RdsPhaseSet),
    /// Site address list edit, MEC 0x23.
    SiteAddressSet(control::SiteAddressSet),
    /// Encoder address list edit, MEC 0x27.
    EncoderAddressSet(control::EncoderAddressSet),
    /// Communication mode, MEC 0x2C.
    CommunicationModeSet(control::CommunicationModeSet),
    /// Programme type name, MEC 0x3E.
    ProgrammeTypeNameSet(message::ProgrammeTypeNameSet),
}

impl Command {
    /// The message element code this command encodes as.
    #[must_use]
    pub fn mec(&self) -> u8 {
        match self {
            Command::ProgrammeIdentificationSet(_) => message::ProgrammeIdentificationSet::MEC,
            Command::ProgrammeServiceNameSet(_) => message::ProgrammeServiceNameSet::MEC,
            Command::TrafficAnnouncementProgrammeSet(_) => {
                message::TrafficAnnouncementProgrammeSet::MEC
            }
            Command::DecoderInformationSet(_) => message::DecoderInformationSet::MEC,
            Command::ProgrammeTypeSet(_) => message::ProgrammeTypeSet::MEC,
            Command::RealTimeClockCorrectionSet(_) => clock::RealTimeClockCorrectionSet::MEC,
            Command::RadioTextSet(_) => message::RadioTextSet::MEC,
            Command::RealTimeClockSet(_) => clock::RealTimeClockSet::MEC,
            Command::RdsLevelSet(_) => control::RdsLevelSet::MEC,
            Command::Request(_) => response::Request::MEC,
            Command::Acknowledgement(_) => response::Acknowledgement::MEC,
            Command::RealTimeClockEnableSet(_) => clock::RealTimeClockEnableSet::MEC,
            Command::DataSetSelect(_) => control::DataSetSelect::MEC,
            Command::RdsEnableSet(_) => control::RdsEnableSet::MEC,
            Command::RdsPhaseSet(_) => control::RdsPhaseSet::MEC,
            Command::SiteAddressSet(_) => control::SiteAddressSet::MEC,
            Command::EncoderAddressSet(_) => control::EncoderAddressSet::MEC,
            Command::CommunicationModeSet(_) => control::CommunicationModeSet::MEC,
            Command::ProgrammeTypeNameSet(_) => message::ProgrammeTypeNameSet::MEC,
        }
    }

    /// Encode this command into its element syntax, MEC first.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::ProgrammeIdentificationSet(c) => c.encode(),
            Command::ProgrammeServiceNameSet(c) => c.encode(),
            Command::TrafficAnnouncementProgrammeSet(c) => c.encode(),
            Command::DecoderInformationSet(c) => c.encode(),
            Command::ProgrammeTypeSet(c) => c.encode(),
            Command::RealTimeClockCorrectionSet(c) => c.encode(),
            Command::RadioTextSet(c) => c.encode(),
            Command::RealTimeClockSet(c) => c.encode(),
            Command::RdsLevelSet(c) => c.encode(),
            Command::Request(c) => c.encode(),
            Command::Acknowledgement(c) => c.encode(),
            Command::RealTimeClockEnableSet(c) => c.encode(),
            Command::DataSetSelect(c) => c.encode(),
            Command::RdsEnableSet(c) => c.encode(),
            Command::RdsPhaseSet(c) => c.encode(),
            Command::SiteAddressSet(c) => c.encode(),
            Command::EncoderAddressSet(c) => c.encode(),
            Command::CommunicationModeSet(c) => c.encode(),
            Command::ProgrammeTypeNameSet(c) => c.encode(),
        }
    }

    /// Decode one command from the start of `data`.
    ///
    /// Dispatches on the leading MEC byte and returns the command plus
    /// the number of bytes consumed, so the caller can advance.
    pub fn decode(data: &[u8]) -> Result<(Command, usize)> {
        let &mec = data.first().ok_or(crate::Error::NotEnoughData {
            have: 0,
            need: 1,
        })?;
        let spec = lookup(mec).ok_or(crate::Error::UnknownMec(mec))?;
        (spec.decode)(data)
    }

    /// Decode a whole frame payload into its command list.
    ///
    /// Commands come back in wire order. Any unknown MEC or element
    /// error aborts the whole payload.
    pub fn decode_sequence(mut data: &[u8]) -> Result<Vec<Command>> {
        let mut commands = Vec::new();
        while !data.is_empty() {
            let (command, consumed) = Command::decode(data)?;
            commands.push(command);
            data = &data[consumed..];
        }
        Ok(commands)
    }
}

/// Registry metadata and decode entry point for one element.
pub(crate) struct ElementSpec {
    pub(crate) mec: u8,
    /// Whether the element syntax carries DSN and PSN address bytes
    /// right after the MEC. The Request element uses this to know
    /// which address bytes to expect for its target.
    pub(crate) addressed: bool,
    pub(crate) decode: fn(&[u8]) -> Result<(Command, usize)>,
}

/// All supported elements, in MEC order.
static REGISTRY: &[ElementSpec] = &[
    ElementSpec {
        mec: 0x01,
        addressed: true,
        decode: |d| {
            message::ProgrammeIdentificationSet::decode(d)
                .map(|(c, n)| (Command::ProgrammeIdentificationSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x02,
        addressed: true,
        decode: |d| {
            message::ProgrammeServiceNameSet::decode(d)
                .map(|(c, n)| (Command::ProgrammeServiceNameSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x03,
        addressed: true,
        decode: |d| {
            message::TrafficAnnouncementProgrammeSet::decode(d)
                .map(|(c, n)| (Command::TrafficAnnouncementProgrammeSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x04,
        addressed: true,
        decode: |d| {
            message::DecoderInformationSet::decode(d)
                .map(|(c, n)| (Command::DecoderInformationSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x07,
        addressed: true,
        decode: |d| {
            message::ProgrammeTypeSet::decode(d).map(|(c, n)| (Command::ProgrammeTypeSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x09,
        addressed: false,
        decode: |d| {
            clock::RealTimeClockCorrectionSet::decode(d)
                .map(|(c, n)| (Command::RealTimeClockCorrectionSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x0A,
        addressed: true,
        decode: |d| message::RadioTextSet::decode(d).map(|(c, n)| (Command::RadioTextSet(c), n)),
    },
    ElementSpec {
        mec: 0x0D,
        addressed: false,
        decode: |d| {
            clock::RealTimeClockSet::decode(d).map(|(c, n)| (Command::RealTimeClockSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x0E,
        addressed: false,
        decode: |d| control::RdsLevelSet::decode(d).map(|(c, n)| (Command::RdsLevelSet(c), n)),
    },
    ElementSpec {
        mec: 0x17,
        addressed: false,
        decode: |d| response::Request::decode(d).map(|(c, n)| (Command::Request(c), n)),
    },
    ElementSpec {
        mec: 0x18,
        addressed: false,
        decode: |d| {
            response::Acknowledgement::decode(d).map(|(c, n)| (Command::Acknowledgement(c), n))
        },
    },
    ElementSpec {
        mec: 0x19,
        addressed: false,
        decode: |d| {
            clock::RealTimeClockEnableSet::decode(d)
                .map(|(c, n)| (Command::RealTimeClockEnableSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x1C,
        addressed: false,
        decode: |d| control::DataSetSelect::decode(d).map(|(c, n)| (Command::DataSetSelect(c), n)),
    },
    ElementSpec {
        mec: 0x1E,
        addressed: false,
        decode: |d| control::RdsEnableSet::decode(d).map(|(c, n)| (Command::RdsEnableSet(c), n)),
    },
    ElementSpec {
        mec: 0x22,
        addressed: false,
        decode: |d| control::RdsPhaseSet::decode(d).map(|(c, n)| (Command::RdsPhaseSet(c), n)),
    },
    ElementSpec {
        mec: 0x23,
        addressed: false,
        decode: |d| {
            control::SiteAddressSet::decode(d).map(|(c, n)| (Command::SiteAddressSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x27,
        addressed: false,
        decode: |d| {
            control::EncoderAddressSet::decode(d).map(|(c, n)| (Command::EncoderAddressSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x2C,
        addressed: false,
        decode: |d| {
            control::CommunicationModeSet::decode(d)
                .map(|(c, n)| (Command::CommunicationModeSet(c), n))
        },
    },
    ElementSpec {
        mec: 0x3E,
        addressed: true,
        decode: |d| {
            message::ProgrammeTypeNameSet::decode(d)
                .map(|(c, n)| (Command::ProgrammeTypeNameSet(c), n))
        },
    },
];

/// Look up the registry entry for a MEC.
pub(crate) fn lookup(mec: u8) -> Option<&'static ElementSpec> {
    REGISTRY.iter().find(|spec| spec.mec == mec)
}

/// The message element codes this crate can decode, in ascending
/// order.
#[must_use]
pub fn registered_mecs() -> Vec<u8> {
    REGISTRY.iter().map(|spec| spec.mec).collect()
}

/// Shared helper: `NotEnoughData` unless `data` holds `need` bytes.
pub(crate) fn need(data: &[u8], need: usize) -> Result<()> {
    if data.len() < need {
        return Err(crate::Error::NotEnoughData {
            have: data.len(),
            need,
        });
    }
    Ok(())
}

/// Shared helper: `MecMismatch` unless `data` starts with `mec`.
pub(crate) fn expect_mec(data: &[u8], mec: u8) -> Result<()> {
    if data[0] != mec {
        return Err(crate::Error::MecMismatch {
            got: data[0],
            expected: mec,
        });
    }
    Ok(())
}
