use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use pydocs_logging::pydocs_warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Malformed sequences were replaced with U+FFFD.
    pub had_replacements: bool,
}

/// Decode page bytes with an explicitly chosen encoding label.
///
/// The server's declared charset is ignored. An unrecognised label falls back
/// to chardetng sniffing. A leading BOM is stripped when it matches the label.
pub fn decode_with_label(bytes: &[u8], label: &str) -> DecodedHtml {
    let encoding = match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) => encoding,
        None => {
            pydocs_warn!("Unknown encoding label {:?}, sniffing content instead", label);
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        }
    };
    let (text, had_replacements) = encoding.decode_with_bom_removal(bytes);
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
        had_replacements,
    }
}

#[cfg(test)]
mod tests {
    use super::decode_with_label;

    #[test]
    fn label_wins_over_content() {
        let bytes = b"caf\xe9";
        let decoded = decode_with_label(bytes, "windows-1252");
        assert_eq!(decoded.html, "café");
        assert_eq!(decoded.encoding_label, "windows-1252");
        assert!(!decoded.had_replacements);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let decoded = decode_with_label(b"caf\xe9", "utf-8");
        assert_eq!(decoded.html, "caf\u{FFFD}");
        assert!(decoded.had_replacements);
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let decoded = decode_with_label(b"\xEF\xBB\xBFhello", "utf-8");
        assert_eq!(decoded.html, "hello");
        assert_eq!(decoded.encoding_label, "UTF-8");
    }

    #[test]
    fn unknown_label_falls_back_to_detection() {
        let decoded = decode_with_label("привет".as_bytes(), "no-such-charset");
        assert_eq!(decoded.html, "привет");
    }
}
