/*! Byte-stuffing (transparency) codec.

The frame delimiters 0xFE/0xFF and the escape byte 0xFD must never
appear inside a transmitted frame body, so each occurrence is replaced
by a two-byte escape sequence:

| Raw  | Stuffed   |
|------|-----------|
| 0xFD | 0xFD 0x00 |
| 0xFE | 0xFD 0x01 |
| 0xFF | 0xFD 0x02 |

Stuffing is total and stateless. Destuffing is a one-bit state machine
(escape pending or not), available both as a one-shot function and as
the incremental [`Destuffer`] the frame decoder feeds byte by byte.

```
use ruecp::stuffing;

assert_eq!(stuffing::stuff(&[0x12, 0xFE]), [0x12, 0xFD, 0x01]);
assert_eq!(stuffing::destuff(&[0x12, 0xFD, 0x01])?, [0x12, 0xFE]);
# Ok::<(), ruecp::Error>(())
```
*/

/// Escape byte introducing a stuffed sequence.
pub const ESCAPE: u8 = 0xFD;

/// Apply byte stuffing to a frame body.
///
/// Never fails; the output is at most twice as long as the input.
#[must_use]
pub fn stuff(data: &[u8]) -> Vec<u8> {
    // Add 10% capacity to leave room for escaped bytes.
    let mut ret = Vec::with_capacity(data.len() * 110 / 100);
    for &b in data {
        match b {
            0xFD..=0xFF => ret.extend([ESCAPE, b - ESCAPE]),
            b => ret.push(b),
        }
    }
    ret
}

/// Remove byte stuffing from a complete buffer.
///
/// Strict: any byte that is illegal in the current state fails, as does
/// input ending in the middle of an escape sequence.
pub fn destuff(data: &[u8]) -> crate::Result<Vec<u8>> {
    let mut decoder = Destuffer::default();
    let mut ret = Vec::with_capacity(data.len());
    for &b in data {
        if let Some(raw) = decoder.feed(b)? {
            ret.push(raw);
        }
    }
    if decoder.pending() {
        return Err(crate::Error::TruncatedStuffing);
    }
    Ok(ret)
}

/// Incremental byte-stuffing decoder.
///
/// The only state is whether the previous byte was the 0xFD escape.
/// [`Destuffer::feed`] yields at most one raw byte per input byte;
/// [`Destuffer::reset`] returns to the normal state, and
/// [`Destuffer::pending`] tells a framing layer whether stopping now
/// would truncate an escape sequence.
#[derive(Debug, Default)]
pub struct Destuffer {
    escape_pending: bool,
}

impl Destuffer {
    /// Create a decoder in the normal state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one stuffed byte, possibly yielding one raw byte.
    ///
    /// In the normal state 0x00..=0xFC pass through and 0xFD arms the
    /// escape; the delimiters 0xFE/0xFF are illegal here. In the
    /// escaped state only 0x00..=0x02 are legal, yielding the original
    /// 0xFD..=0xFF. Errors leave the state untouched; the caller
    /// decides whether to [`reset`](Self::reset).
    pub fn feed(&mut self, byte: u8) -> crate::Result<Option<u8>> {
        if self.escape_pending {
            match byte {
                0x00..=0x02 => {
                    self.escape_pending = false;
                    Ok(Some(byte + ESCAPE))
                }
                byte => Err(crate::Error::Stuffing {
                    byte,
                    escape_pending: true,
                }),
            }
        } else {
            match byte {
                ESCAPE => {
                    self.escape_pending = true;
                    Ok(None)
                }
                0xFE | 0xFF => Err(crate::Error::Stuffing {
                    byte,
                    escape_pending: false,
                }),
                byte => Ok(Some(byte)),
            }
        }
    }

    /// True if the last byte fed was an unanswered escape.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.escape_pending
    }

    /// Forget any pending escape.
    pub fn reset(&mut self) {
        self.escape_pending = false;
    }
}
