use crate::codec::default_encoding;
use crate::error::Result;
use crate::header::Id3v2Version;
use crate::macros::format_err;
use crate::util::text::{self, Encoding};

/// The contents of an attached picture ("APIC") frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picture {
	/// The picture's MIME type, e.g. `"image/png"`
	pub mime_type: String,
	/// The picture type byte (`0x03` is the front cover)
	pub pic_type: u8,
	/// A short description of the picture
	pub description: String,
	/// The raw picture bytes
	pub data: Vec<u8>,
}

impl Picture {
	/// Create a new `Picture`
	pub fn new(
		mime_type: impl Into<String>,
		pic_type: u8,
		description: impl Into<String>,
		data: Vec<u8>,
	) -> Self {
		Self {
			mime_type: mime_type.into(),
			pic_type,
			description: description.into(),
			data,
		}
	}

	/// Parse a `Picture` from frame payload bytes
	///
	/// The MIME type is always ISO-8859-1; the description is in the encoding
	/// announced by the leading encoding byte. Everything after the
	/// description's terminator is the picture itself.
	///
	/// # Errors
	///
	/// * `payload` is too short
	/// * The MIME type or description is not null-terminated
	/// * Unable to decode the description
	pub fn parse(payload: &[u8]) -> Result<Self> {
		let Some((&encoding_byte, rest)) = payload.split_first() else {
			format_err!(@BAIL BadFrameLength);
		};

		let mime_end = text::find_terminator(rest, false)?;
		let mime_type = text::latin1_decode(&rest[..mime_end]);

		let after_mime = &rest[mime_end + 1..];
		let Some((&pic_type, description_region)) = after_mime.split_first() else {
			format_err!(@BAIL BadFrameLength);
		};

		let encoding = Encoding::resolve(Some(encoding_byte), description_region)?;
		let terminator = text::find_terminator(description_region, encoding.double_byte)?;
		let description = encoding
			.codepage
			.decode(&description_region[encoding.bom.len()..terminator])?;

		let data = description_region[terminator + encoding.terminator_len()..].to_vec();

		Ok(Self {
			mime_type,
			pic_type,
			description,
			data,
		})
	}

	/// Convert a `Picture` into frame payload bytes
	///
	/// # Errors
	///
	/// * `mime_type` cannot be represented in ISO-8859-1
	/// * Unable to encode the description
	pub fn as_bytes(&self, version: Id3v2Version) -> Result<Vec<u8>> {
		let encoding = default_encoding(version);

		let mut bytes = vec![encoding.marker as u8];

		bytes.extend(text::latin1_encode(&self.mime_type)?);
		bytes.push(0);

		bytes.push(self.pic_type);

		bytes.extend_from_slice(encoding.bom);
		bytes.extend(encoding.codepage.encode(&self.description)?);
		bytes.extend(std::iter::repeat(0).take(encoding.terminator_len()));

		bytes.extend_from_slice(&self.data);

		Ok(bytes)
	}
}
