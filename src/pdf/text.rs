//! Footer text support: the standard Helvetica font and WinAnsi encoding

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::warn;

/// Add a Helvetica Type1 font (one of the 14 standard PDF fonts) to the document
///
/// Standard fonts need no embedded font program, so this is a single small
/// dictionary shared by every page.
pub fn add_helvetica_font(doc: &mut Document) -> ObjectId {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));

    doc.add_object(Object::Dictionary(font))
}

/// Encode text as WinAnsi bytes
///
/// Characters with no WinAnsi code point are replaced by `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut replaced = 0usize;
    let bytes: Vec<u8> = text
        .chars()
        .map(|c| {
            win_ansi_code(c).unwrap_or_else(|| {
                replaced += 1;
                b'?'
            })
        })
        .collect();

    if replaced > 0 {
        warn!("{} character(s) in {:?} have no WinAnsi encoding, replaced with '?'", replaced, text);
    }

    bytes
}

fn win_ansi_code(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(code as u8),
        _ => {
            let byte = match c {
                '€' => 0x80,
                '‚' => 0x82,
                'ƒ' => 0x83,
                '„' => 0x84,
                '…' => 0x85,
                '†' => 0x86,
                '‡' => 0x87,
                'ˆ' => 0x88,
                '‰' => 0x89,
                'Š' => 0x8A,
                '‹' => 0x8B,
                'Œ' => 0x8C,
                'Ž' => 0x8E,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '˜' => 0x98,
                '™' => 0x99,
                'š' => 0x9A,
                '›' => 0x9B,
                'œ' => 0x9C,
                'ž' => 0x9E,
                'Ÿ' => 0x9F,
                _ => return None,
            };
            Some(byte)
        }
    }
}

/// Format bytes as a PDF hex string, e.g. `<48656C6C6F>`
///
/// Hex strings need no escaping, whatever the text contains.
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 2);
    out.push('<');
    for b in bytes {
        out.push_str(&format!("{:02X}", b));
    }
    out.push('>');
    out
}

/// Helvetica advance widths for chars 32-126, in 1/1000ths of the em square
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, // space ! " # $ % & '
    333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, // 0-7
    556, 556, 278, 278, 584, 584, 584, 556, // 8 9 : ; < = > ?
    1015, 667, 667, 722, 722, 667, 611, 778, // @ A-G
    722, 278, 500, 667, 556, 833, 722, 778, // H-O
    667, 778, 722, 667, 611, 722, 667, 944, // P-W
    667, 667, 611, 278, 278, 278, 469, 556, // X Y Z [ \ ] ^ _
    333, 556, 556, 500, 556, 556, 278, 556, // ` a-g
    556, 222, 222, 500, 222, 833, 556, 556, // h-o
    556, 556, 333, 500, 278, 556, 500, 722, // p-w
    500, 500, 500, 334, 260, 334, 584, // x y z { | } ~
];

/// Width used for anything outside printable ASCII
const HELVETICA_DEFAULT_WIDTH: u16 = 556;

/// Advance width of `text` set in Helvetica at `font_size`, in points
pub fn helvetica_text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                HELVETICA_WIDTHS[(code - 32) as usize] as u32
            } else {
                HELVETICA_DEFAULT_WIDTH as u32
            }
        })
        .sum();

    units as f32 * font_size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii_passthrough() {
        assert_eq!(encode_win_ansi("Page 1 of 3"), b"Page 1 of 3".to_vec());
    }

    #[test]
    fn test_encode_latin1_and_punctuation() {
        assert_eq!(encode_win_ansi("Café – €5"), vec![b'C', b'a', b'f', 0xE9, b' ', 0x96, b' ', 0x80, b'5']);
    }

    #[test]
    fn test_encode_replaces_unmappable() {
        assert_eq!(encode_win_ansi("日本"), b"??".to_vec());
    }

    #[test]
    fn test_hex_string() {
        assert_eq!(hex_string(b"(a)"), "<286129>");
        assert_eq!(hex_string(&[]), "<>");
    }

    #[test]
    fn test_helvetica_width() {
        // H=722, i=222
        assert!((helvetica_text_width("Hi", 10.0) - 9.44).abs() < 0.001);
        assert_eq!(helvetica_text_width("", 10.0), 0.0);
    }

    #[test]
    fn test_helvetica_font_dictionary() {
        let mut doc = Document::with_version("1.5");
        let id = add_helvetica_font(&mut doc);
        let font = doc.get_dictionary(id).unwrap();
        assert_eq!(font.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica");
    }
}
