//! Feed entry assembly and item rendering.
//!
//! [`assembler`] maps the ordered episode sequence into feed entries
//! under the channel context from [`FeedConfig`]; [`xml`] renders a
//! single entry as an RSS `<item>` fragment for the host's envelope
//! template.
//!
//! [`FeedConfig`]: crate::config::FeedConfig

mod assembler;
mod xml;

pub use assembler::{AssembledFeed, Enclosure, FeedAssembler, FeedEntry};
pub use xml::{render_item, XmlRenderError};
