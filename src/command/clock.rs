/*! Clock control elements.

RDS group 4A carries a clock-time signal, so encoders need to be told
what time it is. The wire format transports the UTC wall clock plus a
local-zone offset in half-hour steps; everything here is
timezone-aware ([`chrono::DateTime<FixedOffset>`]), and there is no way
to feed a naive timestamp in.
*/
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc};

use super::{expect_mec, need};
use crate::Result;

/// Offset byte layout: low five bits are the magnitude in half hours,
/// bit 6 is the sign (set = west of UTC). Bits 5 and 7 are unused.
fn encode_offset(offset: FixedOffset) -> u8 {
    let secs = offset.local_minus_utc();
    let half_hours = (secs.unsigned_abs() + 900) / 1800;
    u8::from(secs < 0) << 6 | half_hours as u8
}

fn decode_offset(byte: u8) -> Result<FixedOffset> {
    if byte & 0b1010_0000 != 0 {
        return Err(crate::Error::InvalidField {
            field: "localtime offset",
            value: i64::from(byte),
        });
    }
    let mut secs = i32::from(byte & 0b0001_1111) * 1800;
    if byte & 0b0100_0000 != 0 {
        secs = -secs;
    }
    FixedOffset::east_opt(secs).ok_or(crate::Error::InvalidField {
        field: "localtime offset",
        value: i64::from(byte),
    })
}

/// Real-time clock (MEC 0x0D).
///
/// Sets the encoder's clock. The nine wire bytes are year (mod 100,
/// century 2000), month, day, hour, minute, second and centisecond,
/// all in UTC, plus the local-zone offset byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealTimeClockSet {
    timestamp: DateTime<FixedOffset>,
}

impl RealTimeClockSet {
    /// Message element code.
    pub const MEC: u8 = 0x0D;

    /// Create a clock element from a timezone-aware timestamp.
    ///
    /// The timestamp's zone offset must round onto the wire's
    /// ±15.5 hour range of half-hour steps.
    pub fn new(timestamp: DateTime<FixedOffset>) -> Result<Self> {
        let secs = timestamp.offset().local_minus_utc();
        if (secs.unsigned_abs() + 900) / 1800 > 31 {
            return Err(crate::Error::InvalidField {
                field: "localtime offset",
                value: i64::from(secs),
            });
        }
        Ok(Self { timestamp })
    }

    /// The timestamp, in the zone it was supplied in (or, after
    /// decoding, the zone the wire offset byte named).
    #[must_use]
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let utc = self.timestamp.with_timezone(&Utc);
        // Round to centiseconds, but never up into the next second.
        let centisecond = ((utc.timestamp_subsec_micros() + 5_000) / 10_000).min(99) as u8;
        vec![
            Self::MEC,
            utc.year().rem_euclid(100) as u8,
            utc.month() as u8,
            utc.day() as u8,
            utc.hour() as u8,
            utc.minute() as u8,
            utc.second() as u8,
            centisecond,
            encode_offset(*self.timestamp.offset()),
        ]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 9)?;
        expect_mec(data, Self::MEC)?;
        let (year, month, day) = (data[1], data[2], data[3]);
        let (hour, minute, second, centisecond) = (data[4], data[5], data[6], data[7]);
        let invalid = |field, value: u8| crate::Error::InvalidField {
            field,
            value: i64::from(value),
        };
        if !(1..=12).contains(&month) {
            return Err(invalid("month", month));
        }
        if hour > 23 {
            return Err(invalid("hour", hour));
        }
        if minute > 59 {
            return Err(invalid("minute", minute));
        }
        if second > 59 {
            return Err(invalid("second", second));
        }
        if centisecond > 99 {
            return Err(invalid("centisecond", centisecond));
        }
        let offset = decode_offset(data[8])?;
        let utc = NaiveDate::from_ymd_opt(2000 + i32::from(year), month.into(), day.into())
            .ok_or(invalid("day", day))?
            .and_hms_micro_opt(
                hour.into(),
                minute.into(),
                second.into(),
                u32::from(centisecond) * 10_000,
            )
            .ok_or(invalid("time of day", hour))?
            .and_utc();
        Ok((Self::new(utc.with_timezone(&offset))?, 9))
    }
}

/// Real-time clock correction (MEC 0x09).
///
/// A signed millisecond adjustment compensating for the transmission
/// delay between the control site and the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealTimeClockCorrectionSet {
    /// Adjustment in milliseconds, applied to every subsequent clock
    /// set.
    pub adjustment_ms: i16,
}

impl RealTimeClockCorrectionSet {
    /// Message element code.
    pub const MEC: u8 = 0x09;

    /// Encode into element syntax.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let [hi, lo] = self.adjustment_ms.to_be_bytes();
        vec![Self::MEC, hi, lo]
    }

    /// Decode from the start of `data`, returning the element and the
    /// bytes consumed.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        need(data, 3)?;
        expect_mec(data, Self::MEC)?;
        Ok((
            Self {
                adjustment_ms: i16::from_be_bytes([data[1], data[2]]),
            },
            3,
        ))
    }
}

/// Real-time clock transmission enable (MEC 0x19).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealTimeClockEnableSet {
    /// Whether the encoder transmits clock-time groups.
    pub enable: bool,
}

impl RealTimeClockEnableSet {
    /// Message element code.
    pub const MEC: u8 = 0x19;

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use chrono::TimeZone;

    // 2002-09-12 10:18:33.15 UTC, local zone UTC+1.
    const RTC_WIRE: [u8; 9] = [0x0D, 0x02, 0x09, 0x0C, 0x0A, 0x12, 0x21, 0x0F, 0x02];

    fn rtc_timestamp() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2002, 9, 12, 11, 18, 33)
            .unwrap()
            + chrono::Duration::microseconds(150_000)
    }

    #[test]
    fn rtc_decode() {
        let (cmd, consumed) = RealTimeClockSet::decode(&RTC_WIRE).unwrap();
        assert_eq!(consumed, 9);
        assert_eq!(cmd.timestamp(), rtc_timestamp());
        assert_eq!(cmd.timestamp().offset().local_minus_utc(), 3600);
        assert_eq!(cmd.encode(), RTC_WIRE);
    }

    #[test]
    fn rtc_encode() {
        let cmd = RealTimeClockSet::new(rtc_timestamp()).unwrap();
        assert_eq!(cmd.encode(), RTC_WIRE);
    }

    #[test]
    fn rtc_negative_offset() {
        // Sign lives in bit 6: 0x42 is UTC-1.
        let mut wire = RTC_WIRE;
        wire[8] = 0x42;
        let (cmd, _) = RealTimeClockSet::decode(&wire).unwrap();
        assert_eq!(cmd.timestamp().offset().local_minus_utc(), -3600);
        assert_eq!(cmd.encode(), wire);
    }

    #[test]
    fn rtc_invalid_fields() {
        for (index, value, field) in [
            (2, 13, "month"),
            (3, 31, "day"), // 2002-09-31 does not exist
            (4, 24, "hour"),
            (5, 60, "minute"),
            (6, 60, "second"),
            (7, 100, "centisecond"),
            (8, 0b0010_0000, "localtime offset"),
            (8, 0b1000_0000, "localtime offset"),
        ] {
            let mut wire = RTC_WIRE;
            wire[index] = value;
            let err = RealTimeClockSet::decode(&wire).unwrap_err();
            assert_eq!(
                err,
                Error::InvalidField {
                    field,
                    value: i64::from(value)
                },
                "byte {index} = {value:#04x}"
            );
        }
    }

    #[test]
    fn rtc_offset_out_of_range() {
        // 16 hours east cannot be expressed in 5 bits of half hours.
        let ts = FixedOffset::east_opt(16 * 3600)
            .unwrap()
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .unwrap();
        assert!(RealTimeClockSet::new(ts).is_err());
    }

    #[test]
    fn correction() {
        let (cmd, consumed) = RealTimeClockCorrectionSet::decode(&[0x09, 0xFF, 0xC6]).unwrap();
        assert_eq!(consumed, 3);
        assert_eq!(cmd.adjustment_ms, -58);
        assert_eq!(cmd.encode(), [0x09, 0xFF, 0xC6]);

        let cmd = RealTimeClockCorrectionSet { adjustment_ms: -169 };
        assert_eq!(cmd.encode(), [0x09, 0xFF, 0x57]);
    }

    #[test]
    fn enable() {
        let (cmd, consumed) = RealTimeClockEnableSet::decode(&[0x19, 0x01]).unwrap();
        assert_eq!(consumed, 2);
        assert!(cmd.enable);
        assert_eq!(cmd.encode(), [0x19, 0x01]);
        assert_eq!(
            RealTimeClockEnableSet::decode(&[0x19, 0x02]).unwrap_err(),
            Error::InvalidField {
                field: "enable flag",
                value: 2
            }
        );
    }
}
