use crate::error::Result;
use crate::macros::format_err;

use std::fmt::{Display, Formatter};

/// An ID3v2 frame ID
///
/// Always 4 characters within `'A'..='Z'` or `'0'..='9'`. The set of IDs is
/// open-ended; this type makes no attempt to enumerate the known ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId([u8; 4]);

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9')
	/// * `id` is an invalid length (must be 4)
	pub fn new(id: &str) -> Result<Self> {
		let bytes = id.as_bytes();
		let Ok(bytes) = <[u8; 4]>::try_from(bytes) else {
			return Err(format_err!(BadFrameId(bytes.to_vec())));
		};

		Self::from_bytes(bytes)
	}

	pub(crate) fn from_bytes(bytes: [u8; 4]) -> Result<Self> {
		for byte in bytes {
			if !byte.is_ascii_uppercase() && !byte.is_ascii_digit() {
				return Err(format_err!(BadFrameId(bytes.to_vec())));
			}
		}

		Ok(Self(bytes))
	}

	/// The ID as a string
	pub fn as_str(&self) -> &str {
		// Constructors only accept ASCII
		std::str::from_utf8(&self.0).expect("frame IDs are always ASCII")
	}

	/// The raw 4 bytes of the ID
	pub fn as_bytes(&self) -> &[u8; 4] {
		&self.0
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl PartialEq<str> for FrameId {
	fn eq(&self, other: &str) -> bool {
		self.as_str() == other
	}
}

impl PartialEq<&str> for FrameId {
	fn eq(&self, other: &&str) -> bool {
		self.as_str() == *other
	}
}
