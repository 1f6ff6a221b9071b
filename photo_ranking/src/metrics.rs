use std::error::Error;
use std::fmt::Display;

/// A character the report font has no glyph for.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GlyphError {
    pub ch: char,
    pub font: String,
}

impl Error for GlyphError {}

impl Display for GlyphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "character {:?} (U+{:04X}) cannot be encoded in {}",
            self.ch, self.ch as u32, self.font
        )
    }
}

/// Measures text for truncation and word wrapping.
///
/// Measuring doubles as the encodability check: a string that cannot be
/// measured cannot be drawn.
pub trait FontMetrics {
    /// Width of `text` in points at the given font size.
    fn text_width(&self, text: &str, size: f64) -> Result<f64, GlyphError>;
}

/// Every character has the same advance, expressed as a fraction of the em.
/// Accepts any character.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct FixedAdvance {
    pub em: f64,
}

impl FontMetrics for FixedAdvance {
    fn text_width(&self, text: &str, size: f64) -> Result<f64, GlyphError> {
        Ok(text.chars().count() as f64 * self.em * size)
    }
}

/// Advance widths of the standard Helvetica font, restricted to the
/// characters of the WinAnsi encoding.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Helvetica;

// Widths in 1/1000 em for the printable ASCII range 0x20..=0x7E.
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

// Widths of the Latin-1 range 0xA0..=0xFF.
const LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..macron
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // degree..questiondown
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // Agrave..Idieresis
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Eth..germandbls
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // agrave..idieresis
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // eth..ydieresis
];

impl Helvetica {
    fn glyph_width(ch: char) -> Option<u16> {
        let code = ch as u32;
        if (0x20..=0x7E).contains(&code) {
            return Some(ASCII_WIDTHS[(code - 0x20) as usize]);
        }
        if (0xA0..=0xFF).contains(&code) {
            return Some(LATIN1_WIDTHS[(code - 0xA0) as usize]);
        }
        // The WinAnsi slots 0x80..=0x9F.
        match ch {
            '\u{20AC}' | '\u{0192}' | '\u{2020}' | '\u{2021}' | '\u{2013}' => Some(556),
            '\u{201A}' | '\u{2018}' | '\u{2019}' => Some(222),
            '\u{201E}' | '\u{201C}' | '\u{201D}' => Some(333),
            '\u{02C6}' | '\u{02DC}' | '\u{2039}' | '\u{203A}' => Some(333),
            '\u{2026}' | '\u{2030}' | '\u{2014}' | '\u{2122}' | '\u{0152}' => Some(1000),
            '\u{0160}' | '\u{0178}' => Some(667),
            '\u{017D}' => Some(611),
            '\u{0161}' | '\u{017E}' => Some(500),
            '\u{0153}' => Some(944),
            '\u{2022}' => Some(350),
            _ => None,
        }
    }
}

impl FontMetrics for Helvetica {
    fn text_width(&self, text: &str, size: f64) -> Result<f64, GlyphError> {
        let mut units: u32 = 0;
        for ch in text.chars() {
            let w = Helvetica::glyph_width(ch).ok_or_else(|| GlyphError {
                ch,
                font: "Helvetica".to_string(),
            })?;
            units += w as u32;
        }
        Ok(units as f64 * size / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_ascii() {
        let w = Helvetica.text_width("Total", 10.0).unwrap();
        // T=611 o=556 t=278 a=556 l=222
        assert!((w - 22.23).abs() < 1e-9);
    }

    #[test]
    fn helvetica_accents() {
        let plain = Helvetica.text_width("Jose Munoz", 8.0).unwrap();
        let accented = Helvetica.text_width("José Muñoz", 8.0).unwrap();
        assert!((plain - accented).abs() < 1e-9);
    }

    #[test]
    fn helvetica_covers_winansi() {
        let upper = "\u{20AC}\u{201A}\u{0192}\u{201E}\u{2026}\u{2020}\u{2021}\u{02C6}\u{2030}\u{0160}\u{2039}\u{0152}\u{017D}\
                     \u{2018}\u{2019}\u{201C}\u{201D}\u{2022}\u{2013}\u{2014}\u{02DC}\u{2122}\u{0161}\u{203A}\u{0153}\u{017E}\u{0178}";
        assert_eq!(upper.chars().count(), 27);
        let all = (0x20u32..=0x7E)
            .chain(0xA0..=0xFF)
            .filter_map(char::from_u32)
            .chain(upper.chars());
        for ch in all {
            let w = Helvetica.text_width(&ch.to_string(), 1000.0);
            assert!(w.is_ok(), "no width for {:?}", ch);
        }
    }

    #[test]
    fn helvetica_symbols() {
        let w = |s: &str| Helvetica.text_width(s, 1000.0).unwrap();
        assert_eq!(w("±"), 584.0);
        assert_eq!(w("½"), 834.0);
        assert_eq!(w("²"), 333.0);
        assert_eq!(w("µ"), 556.0);
        assert_eq!(w("¶"), 537.0);
        assert_eq!(w("Œ"), 1000.0);
        assert_eq!(w("œ"), 944.0);
        assert_eq!(w("™"), 1000.0);
        assert_eq!(w("í"), 278.0);
        assert!(Helvetica.text_width("Exposición ±1 EV, m², Œuvre, Marca™", 8.0).is_ok());
    }

    #[test]
    fn helvetica_rejects_unencodable() {
        let err = Helvetica.text_width("写真", 8.0).unwrap_err();
        assert_eq!(err.ch, '写');
    }

    #[test]
    fn fixed_advance() {
        let m = FixedAdvance { em: 0.5 };
        assert_eq!(m.text_width("abcd", 8.0).unwrap(), 16.0);
        assert_eq!(m.text_width("写真", 8.0).unwrap(), 8.0);
    }
}
