//! Share links for stamped reports

/// Message sent along with a shared report
pub fn share_message(filename: &str) -> String {
    format!("Processed Healthcare Report: {}", filename)
}

/// WhatsApp hand-off URL carrying `message`
pub fn whatsapp_url(message: &str) -> String {
    format!("https://wa.me/?text={}", encode_uri_component(message))
}

/// Percent-encode a string for use in a URL query
///
/// Same unreserved set as JavaScript's `encodeURIComponent`; everything else
/// is encoded as UTF-8 bytes.
pub fn encode_uri_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_message() {
        assert_eq!(share_message("scan.pdf"), "Processed Healthcare Report: scan.pdf");
    }

    #[test]
    fn test_whatsapp_url() {
        assert_eq!(
            whatsapp_url(&share_message("scan.pdf")),
            "https://wa.me/?text=Processed%20Healthcare%20Report%3A%20scan.pdf"
        );
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(encode_uri_component("a-b_c.d~e!*'()"), "a-b_c.d~e!*'()");
        assert_eq!(encode_uri_component("a&b=c/d?"), "a%26b%3Dc%2Fd%3F");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }
}
