use crate::error::Result;
use crate::macros::format_err;
use crate::util::text;

/// The contents of a popularimeter ("POPM") frame
///
/// A tag can contain multiple "POPM" frames, but there must only be
/// one with the same email address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Popularimeter {
	/// An email address of the user performing the rating
	pub email: String,
	/// A rating of 1-255, where 1 is the worst and 255 is the best.
	/// A rating of 0 is unknown.
	pub rating: u8,
	/// A play counter for the user. It is to be incremented each time the file is played.
	pub counter: u64,
}

impl Popularimeter {
	/// Create a new `Popularimeter`
	pub fn new(email: impl Into<String>, rating: u8, counter: u64) -> Self {
		Self {
			email: email.into(),
			rating,
			counter,
		}
	}

	/// Parse a `Popularimeter` from frame payload bytes
	///
	/// The counter is stored big-endian in however many bytes follow the
	/// rating; anything wider than 8 bytes saturates.
	///
	/// # Errors
	///
	/// * The email is not null-terminated
	/// * `payload` ends before the rating byte
	pub fn parse(payload: &[u8]) -> Result<Self> {
		let terminator = text::find_terminator(payload, false)?;
		let email = text::latin1_decode(&payload[..terminator]);

		let Some(&rating) = payload.get(terminator + 1) else {
			format_err!(@BAIL BadFrameLength);
		};

		let counter_content = &payload[terminator + 2..];

		let counter;
		let remaining_size = counter_content.len();
		if remaining_size > 8 {
			counter = u64::MAX;
		} else {
			let mut counter_bytes = [0; 8];
			let counter_start_pos = 8 - remaining_size;

			counter_bytes[counter_start_pos..].copy_from_slice(counter_content);
			counter = u64::from_be_bytes(counter_bytes);
		}

		Ok(Self {
			email,
			rating,
			counter,
		})
	}

	/// Convert a `Popularimeter` into frame payload bytes
	///
	/// # Errors
	///
	/// * `email` cannot be represented in ISO-8859-1
	pub fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut content = text::latin1_encode(&self.email)?;
		content.push(0);
		content.push(self.rating);

		// When the counter exceeds 32 bits, one byte at a time is prepended,
		// thus making the counter eight bits bigger
		//
		// $xx xx xx xx (xx ...)
		if let Ok(counter) = u32::try_from(self.counter) {
			content.extend(counter.to_be_bytes())
		} else {
			let counter_bytes = self.counter.to_be_bytes();
			let i = counter_bytes.iter().position(|b| *b != 0).unwrap_or(4);

			content.extend(&counter_bytes[i..]);
		}

		Ok(content)
	}
}
