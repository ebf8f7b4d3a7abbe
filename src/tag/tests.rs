use super::{TagData, read_tag, read_tag_from_buffer};
use crate::frame::FRAME_HEADER_SIZE;
use crate::header::{Id3v2Version, TAG_FOOTER_SIZE, TAG_HEADER_SIZE};
use crate::util::synchsafe::SynchsafeInteger;

const AUDIO: &[u8] = b"HELLO MP3 AUDIO";

// "Album" as [encoding byte][UTF-16LE BOM][UTF-16LE text]
const TALB_PAYLOAD: [u8; 13] = [
	0x01, 0xFF, 0xFE, b'A', 0x00, b'l', 0x00, b'b', 0x00, b'u', 0x00, b'm', 0x00,
];

fn v23_tag_with_talb(padding: usize) -> Vec<u8> {
	let content = (FRAME_HEADER_SIZE as usize + TALB_PAYLOAD.len() + padding) as u32;

	let mut bytes = vec![b'I', b'D', b'3', 3, 0, 0];
	bytes.extend(content.synch().to_be_bytes());
	bytes.extend(b"TALB");
	bytes.extend((TALB_PAYLOAD.len() as u32).to_be_bytes());
	bytes.extend([0, 0]);
	bytes.extend(TALB_PAYLOAD);
	bytes.extend(std::iter::repeat(0).take(padding));
	bytes.extend(AUDIO);
	bytes
}

fn v24_tag_with_footer(payload_len: usize) -> Vec<u8> {
	let content = (FRAME_HEADER_SIZE as usize + payload_len) as u32;

	let mut header = vec![b'I', b'D', b'3', 4, 0, 0x10];
	header.extend(content.synch().to_be_bytes());

	let mut bytes = header.clone();
	bytes.extend(b"TALB");
	bytes.extend((payload_len as u32).to_be_bytes());
	bytes.extend([0, 0]);
	bytes.push(0x03);
	bytes.extend(std::iter::repeat(b'a').take(payload_len - 1));

	// The footer is the header with reversed magic
	bytes.extend(b"3DI");
	bytes.extend(&header[3..]);

	bytes.extend(AUDIO);
	bytes
}

fn source_buffer(tag: &TagData) -> &[u8] {
	tag.source.as_ref().unwrap().buffer().unwrap()
}

fn assert_invariants(tag: &TagData) {
	let frames = tag.frame_list();

	let mut expected_offset = TAG_HEADER_SIZE + FRAME_HEADER_SIZE;
	for frame in frames {
		assert_eq!(frame.offset(), expected_offset);
		expected_offset += u64::from(frame.size()) + FRAME_HEADER_SIZE;
	}

	let last_frame_end = frames
		.last()
		.map_or(TAG_HEADER_SIZE, |frame| frame.offset() + u64::from(frame.size()));
	assert_eq!(tag.padding().offset(), last_frame_end);

	let frames_size = frames
		.iter()
		.map(|frame| FRAME_HEADER_SIZE + u64::from(frame.size()))
		.sum::<u64>();
	let footer_size = if tag.has_footer() { TAG_FOOTER_SIZE } else { 0 };
	assert_eq!(
		tag.tag_end(),
		TAG_HEADER_SIZE + frames_size + tag.padding().size() + footer_size
	);
}

#[test_log::test]
fn parse_tagless_file() {
	let mut tag = read_tag_from_buffer(AUDIO.to_vec()).unwrap();

	assert_eq!(tag.version(), Id3v2Version::V3);
	assert_eq!(tag.minor(), 0);
	assert!(tag.frame_list().is_empty());
	assert_eq!(tag.padding().offset(), 10);
	assert_eq!(tag.padding().size(), 0);
	assert!(!tag.is_dirty());
	assert_invariants(&tag);

	assert_eq!(tag.audio_bytes().unwrap(), AUDIO);
}

#[test_log::test]
fn parse_minimal_v23() {
	let tag = read_tag_from_buffer(v23_tag_with_talb(0)).unwrap();

	assert_eq!(tag.version(), Id3v2Version::V3);
	assert_eq!(tag.frame_list().len(), 1);
	assert_eq!(tag.frame_buffer("TALB").unwrap(), TALB_PAYLOAD);
	assert!(tag.frame_buffer("TIT2").is_none());
	assert_eq!(tag.tag_end(), 34);
	assert_invariants(&tag);

	let album = tag.codec().decode_string(&tag.frame_buffer("TALB").unwrap());
	assert_eq!(album.unwrap(), "Album");
}

#[test_log::test]
fn parse_stops_at_padding() {
	let tag = read_tag_from_buffer(v23_tag_with_talb(6)).unwrap();

	assert_eq!(tag.frame_list().len(), 1);
	assert_eq!(tag.padding().offset(), 34);
	assert_eq!(tag.padding().size(), 6);
	assert_eq!(tag.tag_end(), 40);
	assert_invariants(&tag);
}

#[test_log::test]
fn oversized_frame_is_rejected() {
	let mut bytes = v23_tag_with_talb(0);
	// Claim the frame is larger than the whole tag
	bytes[14..18].copy_from_slice(&100_u32.to_be_bytes());

	assert!(read_tag_from_buffer(bytes).is_err());
}

#[test_log::test]
fn in_place_shrink() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(0)).unwrap();

	let payload = tag.codec().encode_string("A").unwrap();
	assert_eq!(payload.len(), 5);

	tag.set_frame_buffer("TALB", payload.clone()).unwrap();
	assert!(tag.is_dirty());
	assert!(!tag.needs_rewrite());
	assert_eq!(tag.padding().offset(), 25);
	assert_eq!(tag.padding().size(), 9);
	assert_invariants(&tag);

	tag.save().unwrap();
	assert!(!tag.is_dirty());

	let buffer = source_buffer(&tag);
	// The declared content size is unchanged: the freed bytes became padding
	assert_eq!(&buffer[..10], &[b'I', b'D', b'3', 3, 0, 0, 0, 0, 0, 24]);
	assert_eq!(&buffer[10..14], b"TALB");
	assert_eq!(&buffer[14..18], &5_u32.to_be_bytes());
	assert_eq!(&buffer[20..25], &payload[..]);
	assert!(buffer[25..34].iter().all(|&b| b == 0));
	// The audio never moved
	assert_eq!(&buffer[34..], AUDIO);
}

#[test_log::test]
fn grow_consuming_padding_exactly() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(4)).unwrap();

	let mut payload = TALB_PAYLOAD.to_vec();
	payload.extend([0x00; 4]);

	tag.set_frame_buffer("TALB", payload).unwrap();
	assert_eq!(tag.padding().size(), 0);
	assert!(!tag.needs_rewrite());
	assert_invariants(&tag);
}

#[test_log::test]
fn grow_exhausting_padding() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(4)).unwrap();
	let old_tag_end = tag.tag_end();

	// 10 bytes more than the current payload, 6 more than the padding allows
	let mut payload = TALB_PAYLOAD.to_vec();
	payload.extend([0x00; 10]);

	tag.set_frame_buffer("TALB", payload).unwrap();
	assert!(tag.needs_rewrite());
	assert_eq!(tag.tag_end(), old_tag_end + 6);
	assert_eq!(tag.padding().size(), 0);
	assert_invariants(&tag);

	tag.save().unwrap();
	assert!(!tag.needs_rewrite());
	assert!(!tag.is_dirty());

	// The audio was relocated to the new tag end, byte for byte
	let buffer = source_buffer(&tag);
	assert_eq!(&buffer[tag.tag_end() as usize..], AUDIO);
	assert_eq!(&buffer[6..10], &34_u32.synch().to_be_bytes());
}

#[test_log::test]
fn footer_gives_way_to_padding() {
	let mut tag = read_tag_from_buffer(v24_tag_with_footer(30)).unwrap();

	assert_eq!(tag.version(), Id3v2Version::V4);
	assert!(tag.has_footer());
	assert_eq!(tag.padding().size(), 0);
	assert_eq!(tag.tag_end(), 60);
	assert_invariants(&tag);

	// 20 bytes smaller than the frame's current slot
	tag.set_frame_buffer("TALB", vec![0x03; 10]).unwrap();
	assert_eq!(tag.padding().size(), 20);

	tag.save().unwrap();
	assert!(!tag.has_footer());
	assert_eq!(tag.flags() & 0x10, 0);
	assert!(tag.padding().size() >= 20);
	assert_invariants(&tag);

	let buffer = source_buffer(&tag);
	// Flag bit cleared, content size now covers the former footer
	assert_eq!(buffer[5], 0);
	assert_eq!(&buffer[6..10], &50_u32.synch().to_be_bytes());
	// The footer bytes are gone, overwritten by padding
	assert!(buffer[30..60].iter().all(|&b| b == 0));
	assert!(!buffer.windows(3).any(|window| window == b"3DI"));
	assert_eq!(&buffer[60..], AUDIO);
}

#[test_log::test]
fn footer_survives_when_no_padding_appears() {
	let mut tag = read_tag_from_buffer(v24_tag_with_footer(30)).unwrap();

	// Same-size payload change leaves no padding behind
	tag.set_frame_buffer("TALB", vec![0x03; 30]).unwrap();
	tag.save().unwrap();

	assert!(tag.has_footer());
	let buffer = source_buffer(&tag);
	assert_eq!(&buffer[50..53], b"3DI");
}

#[test_log::test]
fn check_footer_is_idempotent() {
	let mut tag = read_tag_from_buffer(v24_tag_with_footer(30)).unwrap();
	tag.set_frame_buffer("TALB", vec![0x03; 10]).unwrap();

	tag.check_footer();
	let padding = tag.padding();
	let flags = tag.flags();

	tag.check_footer();
	assert_eq!(tag.padding(), padding);
	assert_eq!(tag.flags(), flags);
	assert!(!tag.has_footer());
}

#[test_log::test]
fn save_is_idempotent() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(0)).unwrap();

	let payload = tag.codec().encode_string("A").unwrap();
	tag.set_frame_buffer("TALB", payload).unwrap();

	tag.save().unwrap();
	let after_first = source_buffer(&tag).to_vec();

	// A second save has nothing to do
	tag.save().unwrap();
	assert_eq!(source_buffer(&tag), after_first);
	assert!(!tag.is_dirty());
}

#[test_log::test]
fn identical_payload_does_not_dirty() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(0)).unwrap();

	tag.set_frame_buffer("TALB", TALB_PAYLOAD.to_vec()).unwrap();
	assert!(!tag.is_dirty());
}

#[test_log::test]
fn remove_frame_reflows_padding() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(4)).unwrap();

	tag.remove_frame("TALB");
	assert!(tag.is_dirty());
	assert!(tag.frame_list().is_empty());
	// The frame's 24 bytes joined the padding
	assert_eq!(tag.padding().offset(), 10);
	assert_eq!(tag.padding().size(), 28);
	assert_invariants(&tag);
}

#[test_log::test]
fn remove_missing_frame_is_a_noop() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(0)).unwrap();

	tag.remove_frame("APIC");
	assert!(!tag.is_dirty());
	assert_eq!(tag.frame_list().len(), 1);
}

#[test_log::test]
fn multiple_frames_per_id() {
	let mut tag = read_tag_from_buffer(AUDIO.to_vec()).unwrap();

	tag.allocate_frame("TXXX", b"\x03one".to_vec()).unwrap();
	tag.allocate_frame("TXXX", b"\x03two".to_vec()).unwrap();
	assert_invariants(&tag);

	assert_eq!(tag.frames("TXXX").count(), 2);
	assert_eq!(
		tag.frame_buffers("TXXX"),
		vec![b"\x03one".to_vec(), b"\x03two".to_vec()]
	);
	// The single-frame getter sees the first
	assert_eq!(tag.frame_buffer("TXXX").unwrap(), b"\x03one");

	tag.remove_frame("TXXX");
	assert!(tag.frame_list().is_empty());
}

#[test_log::test]
fn invalid_frame_id_is_rejected() {
	let mut tag = read_tag_from_buffer(AUDIO.to_vec()).unwrap();

	assert!(tag.set_frame_buffer("bad!", vec![0x03]).is_err());
	assert!(tag.allocate_frame("TOOLONG", vec![0x03]).is_err());
}

#[test_log::test]
fn tag_a_tagless_file() {
	let mut tag = read_tag_from_buffer(AUDIO.to_vec()).unwrap();
	assert!(tag.needs_rewrite());

	let payload = tag.codec().encode_string("Fresh").unwrap();
	tag.set_frame_buffer("TIT2", payload.clone()).unwrap();

	tag.save().unwrap();
	assert!(!tag.needs_rewrite());

	let mut reread = read_tag_from_buffer(source_buffer(&tag).to_vec()).unwrap();
	assert_eq!(reread.frame_buffer("TIT2").unwrap(), payload);
	assert_eq!(reread.tag_end(), tag.tag_end());
	assert_eq!(reread.audio_bytes().unwrap(), AUDIO);
}

#[test_log::test]
fn buffer_round_trip_preserves_frames() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(6)).unwrap();
	let comm = tag.codec().encode_comment(&crate::items::Comment::new(
		"eng",
		"",
		"round trip",
	));
	tag.set_frame_buffer("COMM", comm.unwrap()).unwrap();

	let serialized = tag.write_to_buffer().unwrap();
	let reread = read_tag_from_buffer(serialized).unwrap();

	assert_eq!(reread.frame_list().len(), tag.frame_list().len());
	for (a, b) in reread.frame_list().iter().zip(tag.frame_list()) {
		assert_eq!(a.id(), b.id());
		assert_eq!(a.payload(), b.payload());
	}
	assert_invariants(&reread);
}

#[test_log::test]
fn save_unbound_tag_fails() {
	let mut tag = read_tag_from_buffer(v23_tag_with_talb(0)).unwrap();
	tag.source = None;

	let payload = tag.codec().encode_string("A").unwrap();
	tag.set_frame_buffer("TALB", payload).unwrap();
	assert!(tag.save().is_err());
	// The failure leaves the tag dirty
	assert!(tag.is_dirty());
}

#[test_log::test]
fn disk_save_in_place() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("shrink.mp3");
	std::fs::write(&path, v23_tag_with_talb(0)).unwrap();

	let mut tag = read_tag(&path).unwrap();
	let payload = tag.codec().encode_string("A").unwrap();
	tag.set_frame_buffer("TALB", payload.clone()).unwrap();
	tag.save().unwrap();
	assert!(!tag.is_dirty());

	let bytes = std::fs::read(&path).unwrap();
	assert_eq!(&bytes[14..18], &5_u32.to_be_bytes());
	assert_eq!(&bytes[20..25], &payload[..]);
	assert_eq!(&bytes[34..], AUDIO);
}

#[test_log::test]
fn disk_save_with_relocation() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("grow.mp3");
	std::fs::write(&path, v23_tag_with_talb(0)).unwrap();

	let mut tag = read_tag(&path).unwrap();
	let mut payload = TALB_PAYLOAD.to_vec();
	payload.extend([0x00; 16]);
	tag.set_frame_buffer("TALB", payload).unwrap();
	assert!(tag.needs_rewrite());

	tag.save().unwrap();

	let bytes = std::fs::read(&path).unwrap();
	assert_eq!(bytes.len() as u64, tag.tag_end() + AUDIO.len() as u64);
	assert_eq!(&bytes[tag.tag_end() as usize..], AUDIO);
}

#[test_log::test]
fn disk_write_to_other_path() {
	let dir = tempfile::tempdir().unwrap();
	let source = dir.path().join("source.mp3");
	let copy = dir.path().join("copy.mp3");
	std::fs::write(&source, v23_tag_with_talb(6)).unwrap();

	let mut tag = read_tag(&source).unwrap();
	let payload = tag.codec().encode_string("Elsewhere").unwrap();
	tag.set_frame_buffer("TALB", payload.clone()).unwrap();

	tag.write_to(&copy).unwrap();
	// The source file is untouched and the tag still knows it
	assert!(tag.is_dirty());
	assert_eq!(std::fs::read(&source).unwrap(), v23_tag_with_talb(6));

	let mut copied = read_tag(&copy).unwrap();
	assert_eq!(copied.frame_buffer("TALB").unwrap(), payload);
	assert_eq!(copied.audio_bytes().unwrap(), AUDIO);
}

#[test_log::test]
fn clean_save_writes_nothing() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("clean.mp3");
	std::fs::write(&path, v23_tag_with_talb(0)).unwrap();

	let mut tag = read_tag(&path).unwrap();
	tag.save().unwrap();

	assert_eq!(std::fs::read(&path).unwrap(), v23_tag_with_talb(0));
}

#[test_log::test]
fn empty_content_size() {
	let mut bytes = vec![b'I', b'D', b'3', 4, 0, 0, 0, 0, 0, 0];
	bytes.extend(AUDIO);

	let tag = read_tag_from_buffer(bytes).unwrap();
	assert!(tag.frame_list().is_empty());
	assert_eq!(tag.padding().size(), 0);
	assert_eq!(tag.tag_end(), 10);
	assert_eq!(tag.version(), Id3v2Version::V4);
	assert_invariants(&tag);
}
