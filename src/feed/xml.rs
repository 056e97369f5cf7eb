use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use super::FeedEntry;

#[derive(Debug, Error)]
pub enum XmlRenderError {
    #[error("XML write error: {0}")]
    Write(String),

    #[error("rendered item contains invalid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

fn write_err(e: impl std::fmt::Display) -> XmlRenderError {
    XmlRenderError::Write(e.to_string())
}

/// Renders one feed entry as an RSS `<item>` fragment with iTunes
/// extension elements.
///
/// Absent optional fields produce no element or attribute at all; the
/// fragment never contains empty or zero-valued placeholders. The host
/// splices the fragments into its channel envelope (which owns the
/// `xmlns:itunes` declaration).
pub fn render_item(entry: &FeedEntry) -> Result<String, XmlRenderError> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Start(BytesStart::new("item")))
        .map_err(write_err)?;

    text_element(&mut writer, "title", &entry.title)?;

    if let Some(author) = &entry.author {
        text_element(&mut writer, "itunes:author", author)?;
    }
    if let Some(subtitle) = &entry.subtitle {
        text_element(&mut writer, "itunes:subtitle", subtitle)?;
    }
    if let Some(description) = &entry.description {
        text_element(&mut writer, "itunes:summary", description)?;
    }
    if let Some(image) = &entry.image {
        let mut el = BytesStart::new("itunes:image");
        el.push_attribute(("href", image.as_str()));
        writer.write_event(Event::Empty(el)).map_err(write_err)?;
    }

    let mut enclosure = BytesStart::new("enclosure");
    enclosure.push_attribute(("url", entry.enclosure.url.as_str()));
    if let Some(length) = entry.enclosure.length {
        enclosure.push_attribute(("length", length.to_string().as_str()));
    }
    if let Some(mime_type) = &entry.enclosure.mime_type {
        enclosure.push_attribute(("type", mime_type.as_str()));
    }
    writer
        .write_event(Event::Empty(enclosure))
        .map_err(write_err)?;

    if let Some(description) = &entry.description {
        // Description keeps the article's markup, so it goes out as CDATA
        writer
            .write_event(Event::Start(BytesStart::new("description")))
            .map_err(write_err)?;
        writer
            .write_event(Event::CData(BytesCData::new(description.as_str())))
            .map_err(write_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("description")))
            .map_err(write_err)?;
    }

    text_element(&mut writer, "link", &entry.link)?;
    text_element(&mut writer, "guid", &entry.guid)?;
    text_element(&mut writer, "pubDate", &entry.published.to_rfc2822())?;

    if let Some(duration) = &entry.duration {
        text_element(&mut writer, "itunes:duration", &duration.to_string())?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("item")))
        .map_err(write_err)?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), XmlRenderError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_err)?;
    Ok(())
}
