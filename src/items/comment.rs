use crate::codec::default_encoding;
use crate::error::Result;
use crate::header::Id3v2Version;
use crate::macros::{err, format_err};
use crate::util::text::{self, Encoding};

/// The contents of a comment ("COMM") frame
///
/// Comments are told apart by their language and description; the actual
/// comment text is [`Comment::content`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
	/// ISO-639-2 language code (3 characters)
	pub language: String,
	/// Unique content description
	pub description: String,
	/// The actual comment text
	pub content: String,
}

impl Comment {
	/// Create a new `Comment`
	pub fn new(
		language: impl Into<String>,
		description: impl Into<String>,
		content: impl Into<String>,
	) -> Self {
		Self {
			language: language.into(),
			description: description.into(),
			content: content.into(),
		}
	}

	/// Parse a `Comment` from frame payload bytes
	///
	/// The payload is the encoding byte, 3 language bytes, then the
	/// null-terminated description followed by the comment text. With the
	/// "unicode" encoding marker each of the two strings carries its own BOM.
	///
	/// # Errors
	///
	/// * `payload` is too short
	/// * Unable to decode the text
	pub fn parse(payload: &[u8]) -> Result<Self> {
		if payload.len() < 4 {
			format_err!(@BAIL BadFrameLength);
		}

		let language = text::latin1_decode(&payload[1..4]);

		let strings = &payload[4..];
		let encoding = Encoding::resolve(Some(payload[0]), strings)?;

		let terminator = text::find_terminator(strings, encoding.double_byte)?;
		let description = encoding
			.codepage
			.decode(&strings[encoding.bom.len()..terminator])?;

		let mut content_bytes = &strings[terminator + encoding.terminator_len()..];
		if !encoding.bom.is_empty() && content_bytes.starts_with(encoding.bom) {
			content_bytes = &content_bytes[encoding.bom.len()..];
		}
		let content = encoding.codepage.decode(content_bytes)?;

		Ok(Self {
			language,
			description,
			content,
		})
	}

	/// Convert a `Comment` into frame payload bytes
	///
	/// The language is space-padded (or truncated) to 3 bytes.
	///
	/// # Errors
	///
	/// * `language` is not ASCII
	/// * Unable to encode the text
	pub fn as_bytes(&self, version: Id3v2Version) -> Result<Vec<u8>> {
		let encoding = default_encoding(version);

		let mut bytes = vec![encoding.marker as u8];

		let mut language = [b' '; 3];
		for (slot, byte) in language.iter_mut().zip(self.language.bytes()) {
			if !byte.is_ascii() {
				err!(Argument("comment language must be ASCII"));
			}

			*slot = byte;
		}
		bytes.extend_from_slice(&language);

		bytes.extend_from_slice(encoding.bom);
		bytes.extend(encoding.codepage.encode(&self.description)?);
		bytes.extend(std::iter::repeat(0).take(encoding.terminator_len()));

		bytes.extend_from_slice(encoding.bom);
		bytes.extend(encoding.codepage.encode(&self.content)?);

		Ok(bytes)
	}
}
