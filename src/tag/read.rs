//! The streaming tag parser

use super::{Padding, TagData};
use crate::codec::FrameCodec;
use crate::error::Result;
use crate::frame::{Frame, FrameId};
use crate::header::{TAG_FOOTER_SIZE, TAG_HEADER_SIZE, TagHeader};
use crate::io::{ByteFile, ByteRange, OpenMode};
use crate::macros::format_err;

use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder};

/// Read the ID3v2 tag at the head of the file at `path`
///
/// A file without an `"ID3"` magic is not an error: it yields an empty tag
/// whose audio region is the entire file.
///
/// # Errors
///
/// * Failure to open or read the file
/// * The tag structure is malformed (unsupported version, extended header,
///   frame overrunning the tag, ...)
///
/// # Examples
///
/// ```rust,no_run
/// # fn main() -> tagmend::error::Result<()> {
/// let tag = tagmend::read_tag("music.mp3")?;
///
/// if let Some(payload) = tag.frame_buffer("TALB") {
/// 	println!("album: {}", tag.codec().decode_string(&payload)?);
/// }
/// # Ok(())
/// # }
/// ```
pub fn read_tag(path: impl AsRef<Path>) -> Result<TagData> {
	let file = ByteFile::open(path, OpenMode::Read)?;
	parse(file)
}

/// Read an ID3v2 tag from an in-memory buffer
///
/// The returned tag stays bound to the buffer: [`TagData::save`] edits it in
/// place exactly as it would a file.
///
/// # Errors
///
/// See [`read_tag`]
pub fn read_tag_from_buffer(buffer: Vec<u8>) -> Result<TagData> {
	parse(ByteFile::from_buffer(buffer))
}

fn parse(mut file: ByteFile) -> Result<TagData> {
	let Some(header) = TagHeader::parse(&mut file)? else {
		log::debug!("No ID3v2 header, treating the file as audio-only");
		return TagData::no_header(file);
	};

	log::debug!(
		"Parsing ID3v2 tag, size: {}, version: {:?}",
		header.size,
		header.version
	);

	// The footer is not counted in the content size
	let frames_end = TAG_HEADER_SIZE + u64::from(header.size);
	let has_footer = header.has_footer();
	let tag_end = frames_end + if has_footer { TAG_FOOTER_SIZE } else { 0 };

	let mut frames = Vec::new();
	let mut padding = None;

	while file.position() < frames_end {
		let cursor = file.position();

		// Peek at the next frame ID; a zero byte means the frames have ended
		// and the padding starts here
		if file.read_slice(cursor, 1)?[0] == 0 {
			padding = Some(Padding {
				offset: cursor,
				size: frames_end - cursor,
			});
			file.seek(SeekFrom::Start(tag_end))?;
			break;
		}

		let mut frame_header = [0; 10];
		file.read_exact(&mut frame_header)?;

		// Infallible, the slice is 4 bytes
		let id = FrameId::from_bytes(frame_header[..4].try_into().unwrap())?;
		let size = BigEndian::read_u32(&frame_header[4..8]);
		let flags = BigEndian::read_u16(&frame_header[8..]);

		let payload_offset = file.position();
		if payload_offset + u64::from(size) > frames_end {
			log::warn!("Frame \"{id}\" overruns the tag ({size} bytes)");
			format_err!(@BAIL BadFrameLength);
		}

		let payload = file.read_slice(payload_offset, size as usize)?;
		file.seek(SeekFrom::Current(i64::from(size)))?;

		if size == 0 {
			log::warn!("Skipping an empty \"{id}\" frame");
			continue;
		}

		frames.push(Frame::new(id, payload_offset, flags, payload));
	}

	let padding = padding.unwrap_or(Padding {
		offset: frames_end,
		size: 0,
	});

	let file_len = file.len()?;
	Ok(TagData {
		version: header.version,
		minor: header.minor,
		flags: header.flags,
		tag_end,
		frames,
		padding,
		audio: ByteRange::new(tag_end, file_len.saturating_sub(tag_end)),
		rewrite: false,
		dirty: false,
		has_footer,
		codec: FrameCodec::new(header.version),
		source: Some(file),
	})
}
