//! # mailcorpus-mime
//!
//! Structural parsing of RFC 2822 style email messages.
//!
//! ## Features
//!
//! - **Header parsing**: Ordered header collection that keeps duplicates and raw folding
//! - **Body extraction**: The payload after the header block, byte-for-byte
//! - **Content types**: `type/subtype; param=value` parsing
//! - **Multipart detection**: Tell single-part messages apart from multipart ones
//!
//! No transfer decoding or attachment extraction is performed; the message is
//! split into its header block and payload and nothing more.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailcorpus_mime::Message;
//!
//! let raw_message = "From: sender@example.com\r\n\
//!                    To: recipient@example.com\r\n\
//!                    Subject: Test\r\n\
//!                    \r\n\
//!                    Hello, World!";
//!
//! let message = Message::parse(raw_message);
//! println!("Subject: {}", message.require("subject")?);
//! println!("Multipart: {}", message.is_multipart());
//! println!("Body: {}", message.body);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, decode_text};
