//! The frame payload codec
//!
//! [`FrameCodec`] interprets and synthesizes the payload bytes of individual
//! frames. It is configured with a tag's major version once, since the version
//! decides the default text encoding for everything it writes: ID3v2.3 tags
//! get UTF-16 (little endian, with a BOM), ID3v2.4 tags get plain UTF-8.

use crate::error::Result;
use crate::header::Id3v2Version;
use crate::items::{Comment, Picture, Popularimeter};
use crate::macros::format_err;
use crate::util::text::Encoding;

pub(crate) fn default_encoding(version: Id3v2Version) -> &'static Encoding {
	match version {
		Id3v2Version::V3 => &Encoding::UTF16_LE,
		Id3v2Version::V4 => &Encoding::UTF8,
	}
}

/// A frame payload decoder/encoder, configured for one major version
///
/// All routines take (or produce) raw payload bytes, without the outer
/// 10-byte frame header.
#[derive(Copy, Clone, Debug)]
pub struct FrameCodec {
	version: Id3v2Version,
}

impl FrameCodec {
	/// Create a `FrameCodec` for the given version
	pub const fn new(version: Id3v2Version) -> Self {
		Self { version }
	}

	/// The version this codec writes for
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// Decode a text frame payload
	///
	/// Byte 0 selects the encoding; any BOM announcing it is stripped before
	/// decoding.
	///
	/// # Errors
	///
	/// * `payload` is empty
	/// * Unable to decode the text
	pub fn decode_string(&self, payload: &[u8]) -> Result<String> {
		let Some((&encoding_byte, content)) = payload.split_first() else {
			format_err!(@BAIL BadFrameLength);
		};

		let encoding = Encoding::resolve(Some(encoding_byte), content)?;
		encoding.codepage.decode(&content[encoding.bom.len()..])
	}

	/// Encode a text frame payload in the version's default encoding
	///
	/// # Errors
	///
	/// * Unable to encode the text
	pub fn encode_string(&self, text: &str) -> Result<Vec<u8>> {
		let encoding = default_encoding(self.version);

		let mut payload = vec![encoding.marker as u8];
		payload.extend_from_slice(encoding.bom);
		payload.extend(encoding.codepage.encode(text)?);

		Ok(payload)
	}

	/// Decode a comment ("COMM") frame payload
	///
	/// # Errors
	///
	/// See [`Comment::parse`]
	pub fn decode_comment(&self, payload: &[u8]) -> Result<Comment> {
		Comment::parse(payload)
	}

	/// Encode a comment ("COMM") frame payload
	///
	/// # Errors
	///
	/// See [`Comment::as_bytes`]
	pub fn encode_comment(&self, comment: &Comment) -> Result<Vec<u8>> {
		comment.as_bytes(self.version)
	}

	/// Decode a popularimeter ("POPM") frame payload
	///
	/// # Errors
	///
	/// See [`Popularimeter::parse`]
	pub fn decode_popularity(&self, payload: &[u8]) -> Result<Popularimeter> {
		Popularimeter::parse(payload)
	}

	/// Encode a popularimeter ("POPM") frame payload
	///
	/// # Errors
	///
	/// See [`Popularimeter::as_bytes`]
	pub fn encode_popularity(&self, popularimeter: &Popularimeter) -> Result<Vec<u8>> {
		popularimeter.as_bytes()
	}

	/// Decode an attached picture ("APIC") frame payload
	///
	/// # Errors
	///
	/// See [`Picture::parse`]
	pub fn decode_picture(&self, payload: &[u8]) -> Result<Picture> {
		Picture::parse(payload)
	}

	/// Encode an attached picture ("APIC") frame payload
	///
	/// # Errors
	///
	/// See [`Picture::as_bytes`]
	pub fn encode_picture(&self, picture: &Picture) -> Result<Vec<u8>> {
		picture.as_bytes(self.version)
	}
}
