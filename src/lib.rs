//! Read, edit, and write ID3v2 metadata without moving the audio.
//!
//! `tagmend` parses the ID3v2.3/2.4 tag at the head of an MP3 file into a
//! [`TagData`]: an ordered frame catalog plus the padding descriptor and
//! audio locator needed to write everything back. Edits reflow the padding,
//! so as long as the tag still fits its original region a save is a cheap
//! in-place update and the audio bytes are never relocated. Only when an edit
//! outgrows the padding (or the tag is written somewhere else) does the
//! file get fully rewritten.
//!
//! # Examples
//!
//! ## Reading a frame
//!
//! ```rust,no_run
//! # fn main() -> tagmend::error::Result<()> {
//! use tagmend::read_tag;
//!
//! let tag = read_tag("music.mp3")?;
//!
//! if let Some(payload) = tag.frame_buffer("TIT2") {
//! 	println!("title: {}", tag.codec().decode_string(&payload)?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Editing in place
//!
//! ```rust,no_run
//! # fn main() -> tagmend::error::Result<()> {
//! use tagmend::read_tag;
//!
//! let mut tag = read_tag("music.mp3")?;
//!
//! let title = tag.codec().encode_string("Mended")?;
//! tag.set_frame_buffer("TIT2", title)?;
//! tag.remove_frame("COMM");
//!
//! // An in-place update when the tag still fits, a full rewrite when not
//! tag.save()?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod frame;
pub mod header;
pub mod io;
pub mod items;
pub(crate) mod macros;
pub mod tag;
pub mod util;

pub use crate::codec::FrameCodec;
pub use crate::header::Id3v2Version;
pub use crate::tag::{TagData, read_tag, read_tag_from_buffer};
pub use crate::util::text::TextEncoding;
