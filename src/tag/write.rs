//! The write-back path
//!
//! A save is either an in-place update, where the tag region is rewritten in
//! its existing footprint and the audio bytes are never touched, or a full
//! rewrite, where the audio is buffered and laid back down after the tag. The
//! latter happens when writing to a different destination, or when an edit has
//! outgrown the padding.

use super::TagData;
use crate::error::Result;
use crate::io::{ByteFile, OpenMode};
use crate::macros::err;
use crate::util::synchsafe::SynchsafeInteger;

use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{BigEndian, WriteBytesExt};

impl TagData {
	/// Write the tag back to its source
	///
	/// A clean tag writes nothing. On success the tag is clean again and any
	/// pending relocation has been carried out.
	///
	/// # Errors
	///
	/// * The tag is not bound to a source
	/// * Failure to open or write the destination (the tag stays dirty)
	pub fn save(&mut self) -> Result<()> {
		let Some(source) = &self.source else {
			err!(State("tag is not bound to a source"));
		};

		match source.path().map(Path::to_path_buf) {
			Some(path) => self.write_to_path(&path, true),
			None => self.save_buffer(),
		}
	}

	/// Write the tag to the file at `destination`
	///
	/// Writing anywhere other than the source always performs a full rewrite,
	/// audio included, and leaves the tag's own state (dirty, rewrite)
	/// untouched: the *source* file still differs from memory.
	///
	/// # Errors
	///
	/// * Failure to open or write the destination
	pub fn write_to(&mut self, destination: impl AsRef<Path>) -> Result<()> {
		let destination = destination.as_ref();
		let same_file = self
			.source
			.as_ref()
			.and_then(ByteFile::path)
			.is_some_and(|path| path == destination);

		self.write_to_path(destination, same_file)
	}

	/// Serialize the entire file (tag, padding, footer, audio) into a fresh
	/// buffer
	///
	/// # Errors
	///
	/// * Failure to read the audio region
	pub fn write_to_buffer(&mut self) -> Result<Vec<u8>> {
		let audio = self.audio_bytes()?;

		self.check_footer();

		let mut staged = ByteFile::memory();
		self.write_stream(&mut staged, Some(&audio))?;

		// Infallible, `staged` is memory-backed
		Ok(staged.into_buffer().unwrap())
	}

	fn write_to_path(&mut self, destination: &Path, same_file: bool) -> Result<()> {
		if same_file && !self.dirty {
			log::debug!("Tag is clean, nothing to write");
			return Ok(());
		}

		// Anything that moves the audio means buffering it up front, before
		// the writes below clobber it
		let relocating = !same_file || self.rewrite;
		let audio = if relocating {
			Some(self.audio_bytes()?)
		} else {
			None
		};

		log::debug!(
			"Writing tag to {}: {}",
			destination.display(),
			if relocating {
				"full rewrite"
			} else {
				"in-place update"
			}
		);

		let mode = if relocating {
			OpenMode::Truncate
		} else {
			OpenMode::Update
		};

		self.check_footer();

		let mut destination_file = ByteFile::open(destination, mode)?;
		self.write_stream(&mut destination_file, audio.as_deref())?;
		destination_file.close()?;

		if same_file {
			self.finish_save();
		}

		Ok(())
	}

	fn save_buffer(&mut self) -> Result<()> {
		if !self.dirty {
			log::debug!("Tag is clean, nothing to write");
			return Ok(());
		}

		let relocating = self.rewrite;
		let audio = if relocating {
			Some(self.audio_bytes()?)
		} else {
			None
		};

		self.check_footer();

		let mut staged = ByteFile::memory();
		self.write_stream(&mut staged, audio.as_deref())?;
		// Infallible, `staged` is memory-backed
		let staged = staged.into_buffer().unwrap();

		let Some(source) = self.source.as_mut() else {
			err!(State("tag is not bound to a source"));
		};

		if relocating {
			source.replace_buffer(staged);
		} else {
			// In place: only the tag region changes, the audio bytes beyond
			// it are left as they are
			source.seek(SeekFrom::Start(0))?;
			source.write_all(&staged)?;
		}

		self.finish_save();
		Ok(())
	}

	fn finish_save(&mut self) {
		self.dirty = false;
		self.rewrite = false;
		self.audio.rebase(self.tag_end);
	}

	/// Emit the serialized tag in its strict order: header, frames, padding,
	/// footer (if any), then the audio when relocating
	fn write_stream(&self, destination: &mut ByteFile, audio: Option<&[u8]>) -> Result<()> {
		self.write_tag_header(destination)?;

		for frame in &self.frames {
			frame.write(destination)?;
		}

		if self.padding.size > 0 {
			destination.write_all(&vec![0; self.padding.size as usize])?;
		}

		if self.has_footer {
			self.write_tag_footer(destination)?;
		}

		if let Some(audio) = audio {
			destination.write_all(audio)?;
		}

		Ok(())
	}

	fn write_tag_header(&self, destination: &mut ByteFile) -> Result<()> {
		destination.seek(SeekFrom::Start(0))?;

		destination.write_all(b"ID3")?;
		destination.write_u8(self.version.major())?;
		destination.write_u8(self.minor)?;
		destination.write_u8(self.flags)?;
		destination.write_u32::<BigEndian>(self.content_size().synch())?;

		Ok(())
	}

	/// The footer is the header with its magic reversed, written after the
	/// frames
	fn write_tag_footer(&self, destination: &mut ByteFile) -> Result<()> {
		destination.write_all(b"3DI")?;
		destination.write_u8(self.version.major())?;
		destination.write_u8(self.minor)?;
		destination.write_u8(self.flags)?;
		destination.write_u32::<BigEndian>(self.content_size().synch())?;

		Ok(())
	}
}
