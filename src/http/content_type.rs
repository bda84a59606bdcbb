//! Content type module
//!
//! Maps the fixed set of response content types onto MIME strings, and
//! file extensions onto content types for file-backed callbacks.

/// Content types a response can carry
///
/// # Examples
/// ```
/// use switchboard::http::ContentType;
/// assert_eq!(ContentType::Html.mime(), "text/html");
/// assert_eq!(ContentType::from_extension(Some("png")), ContentType::Png);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Html,
    Css,
    Json,
    Xml,
    Text,
    Png,
    Gif,
    Jpeg,
    Js,
    Pdf,
    Zip,
    Svg,
    Latex,
    Dot,
    OctetStream,
}

impl ContentType {
    /// MIME string for this content type
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Css => "text/css",
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Text => "text/plain",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Jpeg => "image/jpeg",
            Self::Js => "application/javascript",
            Self::Pdf => "application/pdf",
            Self::Zip => "application/zip",
            Self::Svg => "image/svg+xml",
            Self::Latex => "application/x-latex",
            Self::Dot => "application/x-dot",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Guess a content type from a file extension
    ///
    /// Unknown or missing extensions fall back to `OctetStream`.
    #[must_use]
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("html" | "htm") => Self::Html,
            Some("css") => Self::Css,
            Some("json") => Self::Json,
            Some("xml") => Self::Xml,
            Some("txt" | "md") => Self::Text,
            Some("png") => Self::Png,
            Some("gif") => Self::Gif,
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("js" | "mjs") => Self::Js,
            Some("pdf") => Self::Pdf,
            Some("zip") => Self::Zip,
            Some("svg") => Self::Svg,
            Some("tex" | "latex") => Self::Latex,
            Some("dot" | "gv") => Self::Dot,
            _ => Self::OctetStream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_table() {
        assert_eq!(ContentType::Html.mime(), "text/html");
        assert_eq!(ContentType::Css.mime(), "text/css");
        assert_eq!(ContentType::Json.mime(), "application/json");
        assert_eq!(ContentType::Xml.mime(), "application/xml");
        assert_eq!(ContentType::Text.mime(), "text/plain");
        assert_eq!(ContentType::Png.mime(), "image/png");
        assert_eq!(ContentType::Gif.mime(), "image/gif");
        assert_eq!(ContentType::Jpeg.mime(), "image/jpeg");
        assert_eq!(ContentType::Js.mime(), "application/javascript");
        assert_eq!(ContentType::Pdf.mime(), "application/pdf");
        assert_eq!(ContentType::Zip.mime(), "application/zip");
        assert_eq!(ContentType::Svg.mime(), "image/svg+xml");
        assert_eq!(ContentType::Latex.mime(), "application/x-latex");
        assert_eq!(ContentType::Dot.mime(), "application/x-dot");
        assert_eq!(ContentType::OctetStream.mime(), "application/octet-stream");
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(ContentType::from_extension(Some("html")), ContentType::Html);
        assert_eq!(ContentType::from_extension(Some("htm")), ContentType::Html);
        assert_eq!(ContentType::from_extension(Some("jpeg")), ContentType::Jpeg);
        assert_eq!(ContentType::from_extension(Some("jpg")), ContentType::Jpeg);
        assert_eq!(ContentType::from_extension(Some("tex")), ContentType::Latex);
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(
            ContentType::from_extension(Some("xyz")),
            ContentType::OctetStream
        );
        assert_eq!(ContentType::from_extension(None), ContentType::OctetStream);
    }
}
