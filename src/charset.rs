/*! RDS basic character set codec.

RDS text fields (PS, PTYN, radiotext) are not ASCII and not Latin-1:
they use the single-byte "basic character set" of the RDS standard,
covering code points 0x20..=0xFE. 0x20..=0x7E mostly coincides with
ASCII, apart from four substitutions, and 0x80..=0xFE is a grab bag of
accented Latin letters, digraphs, Greek α/π, arrows, currency signs and
fractions. 0x7F, 0xDE and 0xFF are undefined.

Both directions are strict by default: a character without a code point
(or a byte without a character) is an error. The `_lossy` variants skip
unmappable input instead and report how much was converted, for callers
that prefer a mangled display string over no string.

```
use ruecp::charset;

let bytes = charset::encode("Progräm")?;
assert_eq!(bytes, b"Progr\x91m");
assert_eq!(charset::decode(&bytes)?, "Progräm");

let (bytes, encoded) = charset::encode_lossy("a\tb");
assert_eq!(bytes, b"ab");
assert_eq!(encoded, 2);
# Ok::<(), ruecp::Error>(())
```
*/
use std::collections::HashMap;
use std::sync::OnceLock;

/// The 0x80..=0xFE block. 0xDE has no assignment.
const EXTENDED: &[(u8, char)] = &[
    (0x80, 'á'), (0x81, 'à'), (0x82, 'é'), (0x83, 'è'),
    (0x84, 'í'), (0x85, 'ì'), (0x86, 'ó'), (0x87, 'ò'),
    (0x88, 'ú'), (0x89, 'ù'), (0x8A, 'Ñ'), (0x8B, 'Ç'),
    (0x8C, 'Ş'), (0x8D, 'ß'), (0x8E, '¡'), (0x8F, '\u{0132}'),
    (0x90, 'â'), (0x91, 'ä'), (0x92, 'ê'), (0x93, 'ë'),
    (0x94, 'î'), (0x95, 'ï'), (0x96, 'ô'), (0x97, 'ö'),
    (0x98, 'û'), (0x99, 'ü'), (0x9A, 'ñ'), (0x9B, 'ç'),
    (0x9C, 'ş'), (0x9D, 'ğ'), (0x9E, 'ı'), (0x9F, '\u{0133}'),
    (0xA0, 'ª'), (0xA1, '\u{03B1}'), (0xA2, '©'), (0xA3, '‰'),
    (0xA4, 'Ğ'), (0xA5, 'ě'), (0xA6, 'ň'), (0xA7, 'ő'),
    (0xA8, '\u{03C0}'), (0xA9, '€'), (0xAA, '£'), (0xAB, '$'),
    (0xAC, '←'), (0xAD, '↑'), (0xAE, '→'), (0xAF, '↓'),
    (0xB0, 'º'), (0xB1, '¹'), (0xB2, '²'), (0xB3, '³'),
    (0xB4, '±'), (0xB5, 'İ'), (0xB6, 'ń'), (0xB7, 'ű'),
    (0xB8, '\u{00B5}'), (0xB9, '¿'), (0xBA, '÷'), (0xBB, '°'),
    (0xBC, '¼'), (0xBD, '½'), (0xBE, '¾'), (0xBF, '§'),
    (0xC0, 'Á'), (0xC1, 'À'), (0xC2, 'É'), (0xC3, 'È'),
    (0xC4, 'Í'), (0xC5, 'Ì'), (0xC6, 'Ó'), (0xC7, 'Ò'),
    (0xC8, 'Ú'), (0xC9, 'Ù'), (0xCA, 'Ř'), (0xCB, 'Č'),
    (0xCC, 'Š'), (0xCD, 'Ž'), (0xCE, '\u{00D0}'), (0xCF, 'Ŀ'),
    (0xD0, 'Â'), (0xD1, 'Ä'), (0xD2, 'Ê'), (0xD3, 'Ë'),
    (0xD4, 'Î'), (0xD5, 'Ï'), (0xD6, 'Ô'), (0xD7, 'Ö'),
    (0xD8, 'Û'), (0xD9, 'Ü'), (0xDA, 'ř'), (0xDB, 'č'),
    (0xDC, 'š'), (0xDD, 'ž'), (0xDF, 'ŀ'),
    (0xE0, 'Ã'), (0xE1, 'Å'), (0xE2, 'Æ'), (0xE3, 'Œ'),
    (0xE4, 'ŷ'), (0xE5, 'Ý'), (0xE6, 'Õ'), (0xE7, 'Ø'),
    (0xE8, 'Þ'), (0xE9, 'Ŋ'), (0xEA, 'Ŕ'), (0xEB, 'Ć'),
    (0xEC, 'Ś'), (0xED, 'Ź'), (0xEE, 'Ŧ'), (0xEF, 'ð'),
    (0xF0, 'ã'), (0xF1, 'å'), (0xF2, 'æ'), (0xF3, 'œ'),
    (0xF4, 'ŵ'), (0xF5, 'ý'), (0xF6, 'õ'), (0xF7, 'ø'),
    (0xF8, 'þ'), (0xF9, 'ŋ'), (0xFA, 'ŕ'), (0xFB, 'ć'),
    (0xFC, 'ś'), (0xFD, 'ź'), (0xFE, 'ŧ'),
];

static DECODE: OnceLock<[Option<char>; 256]> = OnceLock::new();
static ENCODE: OnceLock<HashMap<char, u8>> = OnceLock::new();

fn decode_table() -> &'static [Option<char>; 256] {
    DECODE.get_or_init(|| {
        let mut table = [None; 256];
        for b in 0x20..=0x7Eu8 {
            table[b as usize] = Some(b as char);
        }
        // The four spots where the low block deviates from ASCII.
        table[0x24] = Some('\u{00A4}'); // ¤ currency sign
        table[0x5E] = Some('\u{2015}'); // horizontal bar
        table[0x60] = Some('\u{2551}'); // ║ double vertical
        table[0x7E] = Some('\u{00AF}'); // ¯ macron
        for &(b, c) in EXTENDED {
            table[b as usize] = Some(c);
        }
        table
    })
}

fn encode_table() -> &'static HashMap<char, u8> {
    ENCODE.get_or_init(|| {
        decode_table()
            .iter()
            .enumerate()
            .filter_map(|(b, c)| c.map(|c| (c, b as u8)))
            .collect()
    })
}

/// Look up the character for a single RDS code point, if defined.
#[must_use]
pub fn byte_to_char(byte: u8) -> Option<char> {
    decode_table()[byte as usize]
}

/// Look up the RDS code point for a single character, if defined.
#[must_use]
pub fn char_to_byte(ch: char) -> Option<u8> {
    encode_table().get(&ch).copied()
}

/// Encode a string into RDS code points.
///
/// Fails on the first character outside the character set.
pub fn encode(input: &str) -> crate::Result<Vec<u8>> {
    input
        .chars()
        .map(|ch| char_to_byte(ch).ok_or(crate::Error::UnmappableChar(ch)))
        .collect()
}

/// Encode a string into RDS code points, skipping unmappable
/// characters.
///
/// Returns the encoded bytes and the number of characters that were
/// actually encoded.
#[must_use]
pub fn encode_lossy(input: &str) -> (Vec<u8>, usize) {
    let bytes: Vec<u8> = input.chars().filter_map(char_to_byte).collect();
    let n = bytes.len();
    (bytes, n)
}

/// Decode RDS code points into a string.
///
/// Fails on the first undefined byte.
pub fn decode(data: &[u8]) -> crate::Result<String> {
    data.iter()
        .map(|&b| byte_to_char(b).ok_or(crate::Error::UndefinedCodePoint(b)))
        .collect()
}

/// Decode RDS code points into a string, skipping undefined bytes.
///
/// Returns the decoded string and the number of bytes that were
/// actually decoded.
#[must_use]
pub fn decode_lossy(data: &[u8]) -> (String, usize) {
    let s: String = data.iter().filter_map(|&b| byte_to_char(b)).collect();
    let n = s.chars().count();
    (s, n)
}
