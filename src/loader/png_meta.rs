//! Metadata carried in PNG text chunks.

use std::io::Cursor;

use crate::error::MapError;

/// Keyword of the text chunk holding tileset and map metadata.
pub const COMMENT_KEYWORD: &str = "Comment";

/// Extracts the `Comment` text chunk of a PNG.
///
/// Chunks written after the image data are only seen once the frame has been
/// decoded, so that is done when the header chunks do not have it.
pub fn read_comment(name: &str, bytes: &[u8]) -> Result<String, MapError> {
    let png_err = |source| MapError::Png {
        name: name.to_owned(),
        source,
    };

    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder.read_info().map_err(png_err)?;
    if let Some(text) = find_comment(reader.info()).map_err(png_err)? {
        return Ok(text);
    }

    let mut buf = vec![0; reader.output_buffer_size()];
    reader.next_frame(&mut buf).map_err(png_err)?;
    find_comment(reader.info())
        .map_err(png_err)?
        .ok_or_else(|| MapError::format(name, "no Comment text chunk"))
}

fn find_comment(info: &png::Info<'_>) -> Result<Option<String>, png::DecodingError> {
    if let Some(chunk) = info
        .uncompressed_latin1_text
        .iter()
        .find(|c| c.keyword == COMMENT_KEYWORD)
    {
        return Ok(Some(chunk.text.clone()));
    }
    if let Some(chunk) = info
        .compressed_latin1_text
        .iter()
        .find(|c| c.keyword == COMMENT_KEYWORD)
    {
        return chunk.get_text().map(Some);
    }
    if let Some(chunk) = info.utf8_text.iter().find(|c| c.keyword == COMMENT_KEYWORD) {
        return chunk.get_text().map(Some);
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_with(keyword: Option<&str>, text: &str) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut enc = png::Encoder::new(&mut out, 1, 1);
            enc.set_color(png::ColorType::Rgba);
            enc.set_depth(png::BitDepth::Eight);
            if let Some(k) = keyword {
                enc.add_text_chunk(k.to_owned(), text.to_owned()).unwrap();
            }
            let mut w = enc.write_header().unwrap();
            w.write_image_data(&[0, 0, 0, 255]).unwrap();
        }
        out
    }

    #[test]
    fn finds_the_comment_chunk() {
        let bytes = png_with(Some("Comment"), r#"{"tiles":[]}"#);
        assert_eq!(read_comment("a.png", &bytes).unwrap(), r#"{"tiles":[]}"#);
    }

    #[test]
    fn other_keywords_are_ignored() {
        let bytes = png_with(Some("Author"), "me");
        let err = read_comment("a.png", &bytes).unwrap_err();
        assert!(matches!(err, MapError::Format { .. }));
    }

    #[test]
    fn garbage_is_a_png_error() {
        let err = read_comment("a.png", b"definitely not a png").unwrap_err();
        assert!(matches!(err, MapError::Png { .. }));
    }
}
