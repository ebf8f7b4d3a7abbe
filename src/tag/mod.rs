//! The central tag object and its frame catalog

pub(crate) mod read;
pub(crate) mod write;

#[cfg(test)]
mod tests;

pub use read::{read_tag, read_tag_from_buffer};

use crate::codec::FrameCodec;
use crate::error::Result;
use crate::frame::{FRAME_HEADER_SIZE, Frame, FrameId};
use crate::header::{FOOTER_FLAG, Id3v2Version, TAG_FOOTER_SIZE, TAG_HEADER_SIZE};
use crate::io::{ByteFile, ByteRange};

/// The padding descriptor: a run of zero bytes between the last frame and the
/// audio data
///
/// Padding is what makes in-place edits possible: frames may grow into it and
/// shrink back out of it without the audio ever moving.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Padding {
	pub(crate) offset: u64,
	pub(crate) size: u64,
}

impl Padding {
	/// The absolute offset of the first padding byte
	pub fn offset(&self) -> u64 {
		self.offset
	}

	/// The number of padding bytes
	pub fn size(&self) -> u64 {
		self.size
	}
}

/// A parsed ID3v2 tag, bound to the file (or buffer) it came from
///
/// This owns the frame catalog and everything needed to write it back:
/// the header fields, the padding descriptor, a locator for the audio bytes
/// trailing the tag, and the dirty/rewrite state that decides between an
/// in-place update and a full rewrite on save.
pub struct TagData {
	pub(crate) source: Option<ByteFile>,
	pub(crate) version: Id3v2Version,
	pub(crate) minor: u8,
	pub(crate) flags: u8,
	/// The offset one past the end of the tag, where the audio starts
	pub(crate) tag_end: u64,
	pub(crate) frames: Vec<Frame>,
	pub(crate) padding: Padding,
	pub(crate) audio: ByteRange,
	pub(crate) rewrite: bool,
	pub(crate) dirty: bool,
	pub(crate) has_footer: bool,
	pub(crate) codec: FrameCodec,
}

impl TagData {
	/// Create the tag for a file with no ID3v2 header
	///
	/// The result is an empty v2.3 tag whose audio region is the entire file.
	/// Since any save would have to make room for the tag at the head of the
	/// file, the audio is always relocated.
	///
	/// # Errors
	///
	/// * Failure to read the file length
	pub fn no_header(audio_file: ByteFile) -> Result<Self> {
		let audio_len = audio_file.len()?;

		Ok(Self {
			source: Some(audio_file),
			version: Id3v2Version::V3,
			minor: 0,
			flags: 0,
			tag_end: TAG_HEADER_SIZE,
			frames: Vec::new(),
			padding: Padding {
				offset: TAG_HEADER_SIZE,
				size: 0,
			},
			audio: ByteRange::new(0, audio_len),
			rewrite: true,
			dirty: false,
			has_footer: false,
			codec: FrameCodec::new(Id3v2Version::V3),
		})
	}

	/// The tag's major version
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// The tag's minor revision byte
	pub fn minor(&self) -> u8 {
		self.minor
	}

	/// The tag's flags byte
	pub fn flags(&self) -> u8 {
		self.flags
	}

	/// Whether the tag ends in a footer
	pub fn has_footer(&self) -> bool {
		self.has_footer
	}

	/// Whether the in-memory tag differs from its source
	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	/// Whether the tag has outgrown its region and the audio must be
	/// relocated on the next save
	pub fn needs_rewrite(&self) -> bool {
		self.rewrite
	}

	/// The offset one past the end of the tag, where the audio data starts
	pub fn tag_end(&self) -> u64 {
		self.tag_end
	}

	/// The current padding descriptor
	pub fn padding(&self) -> Padding {
		self.padding
	}

	/// The payload codec for this tag's version
	pub fn codec(&self) -> &FrameCodec {
		&self.codec
	}

	/// Every frame, in file order
	pub fn frame_list(&self) -> &[Frame] {
		&self.frames
	}

	/// The first frame with the given ID
	pub fn frame(&self, id: &str) -> Option<&Frame> {
		self.frames.iter().find(|frame| frame.id() == id)
	}

	/// Every frame with the given ID, in file order
	pub fn frames(&self, id: &str) -> impl Iterator<Item = &Frame> + '_ {
		let id = id.to_owned();
		self.frames.iter().filter(move |frame| *frame.id() == *id)
	}

	/// The payload of the first frame with the given ID
	pub fn frame_buffer(&self, id: &str) -> Option<Vec<u8>> {
		self.frame(id).map(|frame| frame.payload().to_vec())
	}

	/// The payloads of every frame with the given ID
	pub fn frame_buffers(&self, id: &str) -> Vec<Vec<u8>> {
		self.frames(id)
			.map(|frame| frame.payload().to_vec())
			.collect()
	}

	/// Set the payload of the frame with the given ID, creating the frame if
	/// it does not exist
	///
	/// Setting a payload identical to the current one is a no-op and does not
	/// mark the tag dirty. A size change reflows the padding; when the growth
	/// exceeds the available padding the tag is marked for a full rewrite.
	///
	/// This assumes at most one frame per ID and always updates the first.
	///
	/// # Errors
	///
	/// * `id` is not a valid frame ID
	pub fn set_frame_buffer(&mut self, id: &str, payload: impl Into<Vec<u8>>) -> Result<()> {
		self.reallocate_frame(id, payload.into())
	}

	fn reallocate_frame(&mut self, id: &str, payload: Vec<u8>) -> Result<()> {
		let Some(position) = self.frames.iter().position(|frame| frame.id() == id) else {
			self.allocate_frame(id, payload)?;
			self.dirty = true;
			return Ok(());
		};

		let frame = &mut self.frames[position];
		if frame.payload() == payload.as_slice() {
			return Ok(());
		}

		let old_size = frame.size();
		frame.set_payload(payload);

		if frame.size() != old_size {
			self.realign_frames();
		}

		self.dirty = true;
		Ok(())
	}

	/// Append a new frame with the given ID and payload
	///
	/// Unlike [`TagData::set_frame_buffer`], this never replaces an existing
	/// frame, so it can produce multiple frames with the same ID.
	///
	/// # Errors
	///
	/// * `id` is not a valid frame ID
	pub fn allocate_frame(&mut self, id: &str, payload: impl Into<Vec<u8>>) -> Result<()> {
		let id = FrameId::new(id)?;

		self.frames.push(Frame::allocate(id, payload.into()));
		self.realign_frames();

		Ok(())
	}

	/// Remove every frame with the given ID
	pub fn remove_frame(&mut self, id: &str) {
		let original_len = self.frames.len();
		self.frames.retain(|frame| frame.id() != id);

		if self.frames.len() != original_len {
			self.realign_frames();
		}
	}

	/// Recompute every frame offset and reflow the padding
	///
	/// Invariant maintenance after any size-affecting edit: frames are packed
	/// back to back from the end of the tag header, and whatever space the
	/// edit freed or consumed is settled against the padding. When the
	/// padding goes negative the tag has outgrown its region: `tag_end`
	/// moves and the audio must be relocated on save.
	pub(crate) fn realign_frames(&mut self) {
		let mut cursor = TAG_HEADER_SIZE;
		for frame in &mut self.frames {
			frame.set_offset(cursor + FRAME_HEADER_SIZE);
			cursor += FRAME_HEADER_SIZE + u64::from(frame.size());
		}

		let delta = cursor as i64 - self.padding.offset as i64;
		self.padding.offset = cursor;

		let remaining = self.padding.size as i64 - delta;
		if remaining < 0 {
			log::debug!("Padding exhausted, tag grows by {} bytes", -remaining);

			self.tag_end += remaining.unsigned_abs();
			self.padding.size = 0;
			self.rewrite = true;
		} else {
			self.padding.size = remaining as u64;
		}

		self.dirty = true;
	}

	/// Resolve the footer-vs-padding conflict
	///
	/// A footer and padding are mutually exclusive: padding exists to be
	/// grown into, and a footer pins the end of the tag. When both are
	/// present the footer loses: its 10 bytes are folded into the padding
	/// and the footer flag is cleared. Idempotent.
	pub fn check_footer(&mut self) {
		if self.has_footer && self.padding.size > 0 {
			log::debug!("Tag has padding, discarding the footer");

			self.padding.size += TAG_FOOTER_SIZE;
			self.has_footer = false;
			self.flags &= !FOOTER_FLAG;
		}
	}

	/// The content size as written to the header: everything between the
	/// header and the footer (or the audio)
	pub fn content_size(&self) -> u32 {
		let footer = if self.has_footer { TAG_FOOTER_SIZE } else { 0 };
		(self.tag_end - TAG_HEADER_SIZE - footer) as u32
	}

	/// Load the audio bytes trailing the tag
	///
	/// An unbound tag has no audio; the result is empty.
	///
	/// # Errors
	///
	/// * The source ends before the audio region does
	pub fn audio_bytes(&mut self) -> Result<Vec<u8>> {
		let audio = self.audio;
		match self.source.as_mut() {
			Some(source) => audio.load(source),
			None => Ok(Vec::new()),
		}
	}
}
