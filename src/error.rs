//! Contains the errors that can arise within tagmend
//!
//! The primary error is [`TagmendError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, TagmendError>`
pub type Result<T> = std::result::Result<T, TagmendError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	/// Errors that arise while decoding or encoding tag structures
	Format(FormatError),
	/// An argument handed to a catalog or codec operation was unusable
	Argument(&'static str),
	/// An operation required state the tag does not have (Ex. saving an unbound tag)
	State(&'static str),

	// Conversions for external errors
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
}

/// The types of errors that can occur while interacting with the tag structure itself
#[derive(Debug)]
#[non_exhaustive]
pub enum FormatErrorKind {
	// Header
	/// Arises when a tag major version other than 3 or 4 is found
	UnsupportedVersion(u8, u8),
	/// Arises when the extended header flag is set
	///
	/// Extended headers carry CRCs and restrictions this crate does not interpret.
	/// Rather than risk misreading the frame area, the tag is rejected entirely.
	UnsupportedExtendedHeader,

	// Frame
	/// Arises when a frame ID contains invalid characters (must be within `'A'..'Z'` or `'0'..'9'`)
	/// or if the ID is too short/long.
	BadFrameId(Vec<u8>),
	/// Arises when a frame doesn't have enough data, or its declared size overruns the tag
	BadFrameLength,

	// Text
	/// Arises when an encoding byte outside `0x00..=0x03` is found
	UnknownEncodingByte(u8),
	/// Arises when text cannot be represented in the requested encoding
	UnsupportedEncoding(&'static str),
	/// Arises when a null-terminated string has no terminator
	UnterminatedString,
	/// Arises when a UTF-16 string has an odd byte length
	OddUtf16Length,
	/// Arises when a UTF-16 string contains an unpaired surrogate
	InvalidUtf16,
}

impl Display for FormatErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			// Header
			Self::UnsupportedVersion(major, minor) => write!(
				f,
				"Found an unsupported version (v2.{major}.{minor}), expected a major revision in: \
				 (3, 4)"
			),
			Self::UnsupportedExtendedHeader => {
				write!(f, "Encountered a tag with an extended header")
			},

			// Frame
			Self::BadFrameId(frame_id) => write!(f, "Failed to parse a frame ID: 0x{frame_id:x?}"),
			Self::BadFrameLength => write!(
				f,
				"Frame isn't long enough to extract the necessary information"
			),

			// Text
			Self::UnknownEncodingByte(byte) => {
				write!(f, "Found an unknown encoding byte (0x{byte:02x})")
			},
			Self::UnsupportedEncoding(name) => {
				write!(f, "Text cannot be represented in {name}")
			},
			Self::UnterminatedString => {
				write!(f, "Expected a null-terminated string, no terminator found")
			},
			Self::OddUtf16Length => write!(f, "UTF-16 string has an odd length"),
			Self::InvalidUtf16 => write!(f, "Given an invalid UTF-16 string"),
		}
	}
}

/// An error that arises while interacting with the binary tag layout
pub struct FormatError {
	kind: FormatErrorKind,
}

impl FormatError {
	/// Create a new `FormatError` from a [`FormatErrorKind`]
	#[must_use]
	pub const fn new(kind: FormatErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`FormatErrorKind`]
	pub fn kind(&self) -> &FormatErrorKind {
		&self.kind
	}
}

impl Debug for FormatError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Format: {:?}", self.kind)
	}
}

impl Display for FormatError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Format: {}", self.kind)
	}
}

/// Errors that could occur within tagmend
pub struct TagmendError {
	pub(crate) kind: ErrorKind,
}

impl TagmendError {
	/// Create a `TagmendError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagmend::error::{ErrorKind, TagmendError};
	///
	/// let unbound = TagmendError::new(ErrorKind::State("tag is not bound to a source"));
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for TagmendError {}

impl Debug for TagmendError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<FormatError> for TagmendError {
	fn from(input: FormatError) -> Self {
		Self {
			kind: ErrorKind::Format(input),
		}
	}
}

impl From<std::io::Error> for TagmendError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for TagmendError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl Display for TagmendError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),

			ErrorKind::Format(ref format_err) => write!(f, "{format_err}"),
			ErrorKind::Argument(message) => write!(f, "Invalid argument: {message}"),
			ErrorKind::State(message) => write!(f, "Invalid state: {message}"),
		}
	}
}
