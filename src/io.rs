//! A positional byte-stream abstraction over a file or an in-memory buffer
//!
//! Everything the tag engine touches goes through [`ByteFile`]: sequential
//! reads and writes advance a cursor, while [`ByteFile::read_slice`] reads at
//! an absolute offset without disturbing it. [`std::io::Read`], [`Write`], and
//! [`Seek`] are implemented so the `byteorder` extension traits apply
//! directly.

use crate::error::Result;

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How a [`ByteFile`] is opened
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OpenMode {
	/// Read-only
	Read,
	/// Writable, truncating any existing content
	Truncate,
	/// Readable and writable in place, without truncation
	///
	/// Writes cannot extend a buffer-backed file in this mode.
	Update,
}

enum Backing {
	Disk(File),
	Memory(Vec<u8>),
}

/// A positional byte stream over a file descriptor or an in-memory buffer
pub struct ByteFile {
	backing: Backing,
	mode: OpenMode,
	position: u64,
	path: Option<PathBuf>,
}

impl ByteFile {
	/// Open the file at `path` in the given mode, cursor at 0
	///
	/// # Errors
	///
	/// * `path` does not exist (or cannot be created in [`OpenMode::Truncate`])
	pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
		let path = path.as_ref();
		let file = match mode {
			OpenMode::Read => File::open(path)?,
			OpenMode::Truncate => OpenOptions::new()
				.write(true)
				.create(true)
				.truncate(true)
				.open(path)?,
			OpenMode::Update => OpenOptions::new().read(true).write(true).open(path)?,
		};

		Ok(Self {
			backing: Backing::Disk(file),
			mode,
			position: 0,
			path: Some(path.to_path_buf()),
		})
	}

	/// Wrap an existing buffer, readable and writable in place
	///
	/// The buffer is fixed-size: a write extending past its end fails.
	pub fn from_buffer(buffer: Vec<u8>) -> Self {
		Self {
			backing: Backing::Memory(buffer),
			mode: OpenMode::Update,
			position: 0,
			path: None,
		}
	}

	/// Create an empty, growable in-memory file
	pub fn memory() -> Self {
		Self {
			backing: Backing::Memory(Vec::new()),
			mode: OpenMode::Truncate,
			position: 0,
			path: None,
		}
	}

	/// The path this file was opened from, if it is disk-backed
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// The current cursor position
	pub fn position(&self) -> u64 {
		self.position
	}

	/// The total length in bytes
	///
	/// # Errors
	///
	/// * Failure to read the file metadata
	pub fn len(&self) -> Result<u64> {
		match &self.backing {
			Backing::Disk(file) => Ok(file.metadata()?.len()),
			Backing::Memory(buffer) => Ok(buffer.len() as u64),
		}
	}

	/// Whether the file is empty
	///
	/// # Errors
	///
	/// * Failure to read the file metadata
	pub fn is_empty(&self) -> Result<bool> {
		Ok(self.len()? == 0)
	}

	/// Read exactly `length` bytes starting at the absolute `offset`
	///
	/// The cursor is restored afterwards, making this safe to interleave with
	/// sequential reads.
	///
	/// # Errors
	///
	/// * Fewer than `length` bytes are available at `offset`
	pub fn read_slice(&mut self, offset: u64, length: usize) -> Result<Vec<u8>> {
		let restore = self.position;

		self.seek(SeekFrom::Start(offset))?;
		let mut content = vec![0; length];
		let outcome = self.read_exact(&mut content);
		self.seek(SeekFrom::Start(restore))?;

		outcome?;
		Ok(content)
	}

	/// A borrowed view of the backing buffer, if memory-backed
	pub fn buffer(&self) -> Option<&[u8]> {
		match &self.backing {
			Backing::Memory(buffer) => Some(buffer),
			Backing::Disk(_) => None,
		}
	}

	pub(crate) fn replace_buffer(&mut self, buffer: Vec<u8>) {
		if let Backing::Memory(existing) = &mut self.backing {
			*existing = buffer;
		}
	}

	/// Consume the file, returning the backing buffer if memory-backed
	pub fn into_buffer(self) -> Option<Vec<u8>> {
		match self.backing {
			Backing::Memory(buffer) => Some(buffer),
			Backing::Disk(_) => None,
		}
	}

	/// Close the file
	///
	/// # Errors
	///
	/// * Failure to flush buffered writes
	pub fn close(mut self) -> Result<()> {
		self.flush()?;
		Ok(())
	}
}

impl Read for ByteFile {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		match &mut self.backing {
			Backing::Disk(file) => {
				let count = file.read(buf)?;
				self.position += count as u64;
				Ok(count)
			},
			Backing::Memory(buffer) => {
				let start = std::cmp::min(self.position as usize, buffer.len());
				let count = std::cmp::min(buf.len(), buffer.len() - start);

				buf[..count].copy_from_slice(&buffer[start..start + count]);
				self.position += count as u64;
				Ok(count)
			},
		}
	}
}

impl Write for ByteFile {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		if self.mode == OpenMode::Read {
			return Err(io::Error::new(
				io::ErrorKind::PermissionDenied,
				"file is opened read-only",
			));
		}

		match &mut self.backing {
			Backing::Disk(file) => {
				let count = file.write(buf)?;
				self.position += count as u64;
				Ok(count)
			},
			Backing::Memory(buffer) => {
				let start = self.position as usize;
				let end = start + buf.len();

				if end > buffer.len() {
					if self.mode == OpenMode::Update {
						return Err(io::Error::new(
							io::ErrorKind::WriteZero,
							"write extends past the end of a fixed-size buffer",
						));
					}

					buffer.resize(end, 0);
				}

				buffer[start..end].copy_from_slice(buf);
				self.position = end as u64;
				Ok(buf.len())
			},
		}
	}

	fn flush(&mut self) -> io::Result<()> {
		match &mut self.backing {
			Backing::Disk(file) => file.flush(),
			Backing::Memory(_) => Ok(()),
		}
	}
}

impl Seek for ByteFile {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		match &mut self.backing {
			Backing::Disk(file) => {
				self.position = file.seek(pos)?;
			},
			Backing::Memory(buffer) => {
				let target = match pos {
					SeekFrom::Start(offset) => i128::from(offset),
					SeekFrom::Current(delta) => i128::from(self.position) + i128::from(delta),
					SeekFrom::End(delta) => buffer.len() as i128 + i128::from(delta),
				};

				if target < 0 {
					return Err(io::Error::new(
						io::ErrorKind::InvalidInput,
						"seek before the start of the file",
					));
				}

				self.position = target as u64;
			},
		}

		Ok(self.position)
	}
}

/// A lazy byte range over a [`ByteFile`]
///
/// This is a pure (offset, size) pair; the bytes are only materialized by
/// [`ByteRange::load`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ByteRange {
	offset: u64,
	size: u64,
}

impl ByteRange {
	/// Create a new `ByteRange`
	pub const fn new(offset: u64, size: u64) -> Self {
		Self { offset, size }
	}

	/// The absolute offset of the first byte in the range
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// The length of the range in bytes
	pub fn size(&self) -> u64 {
		self.size
	}

	pub(crate) fn rebase(&mut self, offset: u64) {
		self.offset = offset;
	}

	/// Materialize the range
	///
	/// # Errors
	///
	/// * The file ends before the range does
	pub fn load(&self, file: &mut ByteFile) -> Result<Vec<u8>> {
		if self.size == 0 {
			return Ok(Vec::new());
		}

		file.read_slice(self.offset, self.size as usize)
	}
}
