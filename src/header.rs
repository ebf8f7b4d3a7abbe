//! The 10-byte tag header (and its mirrored footer)

use crate::error::Result;
use crate::macros::format_err;
use crate::util::synchsafe::SynchsafeInteger;

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

/// The size of a tag header in bytes
pub const TAG_HEADER_SIZE: u64 = 10;
/// The size of a tag footer in bytes
pub const TAG_FOOTER_SIZE: u64 = 10;

/// Tag flag bit: the tag ends in a footer (ID3v2.4)
pub(crate) const FOOTER_FLAG: u8 = 0x10;
/// Tag flag bit: an extended header follows the tag header
pub(crate) const EXTENDED_HEADER_FLAG: u8 = 0x40;

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Id3v2Version {
	/// ID3v2.3
	V3,
	/// ID3v2.4
	V4,
}

impl Id3v2Version {
	/// The major revision byte as stored in the header
	pub fn major(self) -> u8 {
		match self {
			Self::V3 => 3,
			Self::V4 => 4,
		}
	}
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TagHeader {
	pub version: Id3v2Version,
	pub minor: u8,
	pub flags: u8,
	/// The size of the tag contents (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub size: u32,
}

impl TagHeader {
	/// Parse a tag header from the first 10 bytes of `reader`
	///
	/// Returns `None` when the magic is absent (or the input is shorter than
	/// a header), in which case the file is treated as audio-only.
	pub(crate) fn parse<R>(reader: &mut R) -> Result<Option<Self>>
	where
		R: Read,
	{
		let mut header = [0; 10];
		match reader.read_exact(&mut header) {
			Ok(()) => {},
			Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
			Err(err) => return Err(err.into()),
		}

		if &header[..3] != b"ID3" {
			return Ok(None);
		}

		log::debug!("Parsing ID3v2 header");

		let version = match header[3] {
			3 => Id3v2Version::V3,
			4 => Id3v2Version::V4,
			major => format_err!(@BAIL UnsupportedVersion(major, header[4])),
		};

		let flags = header[5];
		if flags & EXTENDED_HEADER_FLAG == EXTENDED_HEADER_FLAG {
			format_err!(@BAIL UnsupportedExtendedHeader);
		}

		let size = BigEndian::read_u32(&header[6..]).unsynch();

		Ok(Some(TagHeader {
			version,
			minor: header[4],
			flags,
			size,
		}))
	}

	pub(crate) fn has_footer(&self) -> bool {
		self.version == Id3v2Version::V4 && self.flags & FOOTER_FLAG == FOOTER_FLAG
	}
}
