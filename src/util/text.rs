use crate::error::Result;
use crate::macros::format_err;

/// The text encoding byte used in ID3v2 frames
///
/// This is the first byte of every string-bearing frame payload, and selects
/// how the rest of the strings in that payload are decoded.
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	Utf16 = 1,
	/// UTF-16 big endian, no byte order mark (ID3v2.4)
	Utf16Be = 2,
	/// UTF-8 (ID3v2.4)
	Utf8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	///
	/// # Errors
	///
	/// * `byte` is not a valid encoding marker
	pub fn from_u8(byte: u8) -> Result<Self> {
		match byte {
			0 => Ok(Self::Latin1),
			1 => Ok(Self::Utf16),
			2 => Ok(Self::Utf16Be),
			3 => Ok(Self::Utf8),
			other => Err(format_err!(UnknownEncodingByte(other))),
		}
	}
}

/// A concrete byte ↔ string conversion
///
/// Unlike [`TextEncoding`], this has no notion of byte order marks; inputs are
/// expected to have had any BOM stripped by the caller, and outputs never
/// carry one.
#[derive(Debug, Clone, Eq, PartialEq, Copy)]
pub(crate) enum Codepage {
	Latin1,
	Utf8,
	Utf16Le,
	Utf16Be,
}

impl Codepage {
	pub(crate) fn decode(self, bytes: &[u8]) -> Result<String> {
		match self {
			Codepage::Latin1 => Ok(latin1_decode(bytes)),
			Codepage::Utf8 => utf8_decode(bytes.to_vec()),
			Codepage::Utf16Le => utf16_decode_bytes(bytes, u16::from_le_bytes),
			// A big-endian stream is the little-endian stream with each pair
			// swapped, so a word-wise decode covers both
			Codepage::Utf16Be => utf16_decode_bytes(bytes, u16::from_be_bytes),
		}
	}

	pub(crate) fn encode(self, text: &str) -> Result<Vec<u8>> {
		match self {
			Codepage::Latin1 => latin1_encode(text),
			Codepage::Utf8 => Ok(text.as_bytes().to_vec()),
			Codepage::Utf16Le => Ok(utf16_encode(text, u16::to_le_bytes)),
			Codepage::Utf16Be => Err(format_err!(UnsupportedEncoding("UTF-16BE"))),
		}
	}
}

/// A resolved encoding descriptor
///
/// Ties a [`Codepage`] to the BOM that announced it, the width of its null
/// terminator, and the encoding byte that represents it on the wire.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Encoding {
	pub(crate) codepage: Codepage,
	pub(crate) bom: &'static [u8],
	pub(crate) double_byte: bool,
	pub(crate) marker: TextEncoding,
}

impl Encoding {
	pub(crate) const LATIN1: Encoding = Encoding {
		codepage: Codepage::Latin1,
		bom: &[],
		double_byte: false,
		marker: TextEncoding::Latin1,
	};
	pub(crate) const UTF16_LE: Encoding = Encoding {
		codepage: Codepage::Utf16Le,
		bom: &[0xFF, 0xFE],
		double_byte: true,
		marker: TextEncoding::Utf16,
	};
	pub(crate) const UTF16_BE: Encoding = Encoding {
		codepage: Codepage::Utf16Be,
		bom: &[0xFE, 0xFF],
		double_byte: true,
		marker: TextEncoding::Utf16,
	};
	pub(crate) const UTF8_BOM: Encoding = Encoding {
		codepage: Codepage::Utf8,
		bom: &[0xEF, 0xBB, 0xBF],
		double_byte: false,
		marker: TextEncoding::Utf16,
	};
	// The fallthrough for encoding byte 1 with no recognizable BOM
	pub(crate) const UTF8_SNIFFED: Encoding = Encoding {
		codepage: Codepage::Utf8,
		bom: &[],
		double_byte: false,
		marker: TextEncoding::Utf16,
	};
	pub(crate) const UTF16_BE_BARE: Encoding = Encoding {
		codepage: Codepage::Utf16Be,
		bom: &[],
		double_byte: true,
		marker: TextEncoding::Utf16Be,
	};
	pub(crate) const UTF8: Encoding = Encoding {
		codepage: Codepage::Utf8,
		bom: &[],
		double_byte: false,
		marker: TextEncoding::Utf8,
	};

	/// Resolve an encoding byte (and the content following it) to a descriptor
	///
	/// `None` defaults to `0x01`, the historical "unicode" marker. For `0x01`
	/// the BOM is sniffed from `content`; the first matching prefix wins, and
	/// BOM-less content falls through to UTF-8.
	pub(crate) fn resolve(byte: Option<u8>, content: &[u8]) -> Result<&'static Encoding> {
		let marker = match byte {
			Some(byte) => TextEncoding::from_u8(byte)?,
			None => TextEncoding::Utf16,
		};

		match marker {
			TextEncoding::Latin1 => Ok(&Self::LATIN1),
			TextEncoding::Utf16 => {
				for encoding in [&Self::UTF16_LE, &Self::UTF16_BE, &Self::UTF8_BOM] {
					if content.starts_with(encoding.bom) {
						return Ok(encoding);
					}
				}

				Ok(&Self::UTF8_SNIFFED)
			},
			TextEncoding::Utf16Be => Ok(&Self::UTF16_BE_BARE),
			TextEncoding::Utf8 => Ok(&Self::UTF8),
		}
	}

	/// The number of zero bytes terminating a string in this encoding
	pub(crate) fn terminator_len(&self) -> usize {
		if self.double_byte { 2 } else { 1 }
	}
}

/// Find the null terminator within `content`
///
/// Returns the byte position of the terminator. In a double-byte encoding only
/// an even position where both bytes are zero terminates; a lone zero byte at
/// an odd offset is the low or high half of a code unit and is skipped over.
///
/// # Errors
///
/// * `content` has no terminator
pub(crate) fn find_terminator(content: &[u8], double_byte: bool) -> Result<usize> {
	if double_byte {
		let mut pos = 0;
		while pos + 1 < content.len() {
			if content[pos] == 0 && content[pos + 1] == 0 {
				return Ok(pos);
			}
			pos += 2;
		}

		Err(format_err!(UnterminatedString))
	} else {
		content
			.iter()
			.position(|&b| b == 0)
			.ok_or_else(|| format_err!(UnterminatedString))
	}
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let mut text = bytes.iter().map(|c| *c as char).collect::<String>();
	trim_end_nulls(&mut text);
	text
}

pub(crate) fn latin1_encode(text: &str) -> Result<Vec<u8>> {
	text.chars()
		.map(|c| {
			if (c as u32) <= 255 {
				Ok(c as u8)
			} else {
				Err(format_err!(UnsupportedEncoding("ISO-8859-1")))
			}
		})
		.collect()
}

pub(crate) fn utf8_decode(bytes: Vec<u8>) -> Result<String> {
	String::from_utf8(bytes)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(Into::into)
}

pub(crate) fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	if bytes.is_empty() {
		return Ok(String::new());
	}

	if bytes.len() % 2 != 0 {
		return Err(format_err!(OddUtf16Length));
	}

	let words = bytes
		.chunks_exact(2)
		.map(|pair| endianness([pair[0], pair[1]]))
		.collect::<Vec<u16>>();

	String::from_utf16(&words)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(|_| format_err!(InvalidUtf16))
}

pub(crate) fn utf16_encode(text: &str, endianness: fn(u16) -> [u8; 2]) -> Vec<u8> {
	let mut encoded = Vec::<u8>::new();

	for ch in text.encode_utf16() {
		encoded.extend_from_slice(&endianness(ch));
	}

	encoded
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	if text.ends_with('\0') {
		let new_len = text.trim_end_matches('\0').len();
		text.truncate(new_len);
	}
}
