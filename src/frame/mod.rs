//! The in-memory record for a single frame

mod id;

pub use id::FrameId;

use crate::error::Result;
use crate::io::ByteFile;

use std::io::{Seek, SeekFrom, Write};

use byteorder::{BigEndian, WriteBytesExt};

/// The size of a frame header in bytes
pub const FRAME_HEADER_SIZE: u64 = 10;

/// A single metadata frame
///
/// Knows its identifier, the absolute file offset of its payload, its flags,
/// and the payload bytes themselves. The payload *size* is always the length
/// of the payload; growing or shrinking it invalidates the offsets of every
/// later frame until the catalog is realigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
	id: FrameId,
	offset: u64,
	flags: u16,
	value: Vec<u8>,
}

impl Frame {
	pub(crate) fn new(id: FrameId, offset: u64, flags: u16, value: Vec<u8>) -> Self {
		Self {
			id,
			offset,
			flags,
			value,
		}
	}

	/// Create a frame that is not yet placed in a tag
	///
	/// The offset is 0 until the owning catalog realigns its frames.
	pub fn allocate(id: FrameId, payload: Vec<u8>) -> Self {
		Self::new(id, 0, 0, payload)
	}

	/// The frame's ID
	pub fn id(&self) -> &FrameId {
		&self.id
	}

	/// The absolute file offset of the payload (not the frame header)
	pub fn offset(&self) -> u64 {
		self.offset
	}

	pub(crate) fn set_offset(&mut self, offset: u64) {
		self.offset = offset;
	}

	/// The payload size in bytes
	pub fn size(&self) -> u32 {
		self.value.len() as u32
	}

	/// The two flag bytes, as read from the frame header
	pub fn flags(&self) -> u16 {
		self.flags
	}

	/// The payload bytes
	pub fn payload(&self) -> &[u8] {
		&self.value
	}

	/// Replace the payload; the frame's size follows
	pub fn set_payload(&mut self, payload: Vec<u8>) {
		self.value = payload;
	}

	/// Serialize the frame header and payload at the frame's current offset
	pub(crate) fn write(&self, file: &mut ByteFile) -> Result<()> {
		file.seek(SeekFrom::Start(self.offset - FRAME_HEADER_SIZE))?;

		file.write_all(self.id.as_bytes())?;
		file.write_u32::<BigEndian>(self.size())?;
		file.write_u16::<BigEndian>(self.flags)?;
		file.write_all(&self.value)?;

		Ok(())
	}
}
