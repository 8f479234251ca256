//! Minimal ESC/POS command builder.
//!
//! Only the handful of commands a receipt needs. Text is encoded as
//! Windows-1252 (ESC t 16) which every Epson-compatible printer understands;
//! characters outside that code page print as `?`.

const ESC: u8 = 0x1B;
const GS: u8 = 0x1D;

/// ESC t 16: select WPC1252.
const CODE_PAGE_WPC1252: u8 = 16;

pub struct EscPosBuilder {
    buf: Vec<u8>,
    columns: usize,
    double: bool,
}

impl EscPosBuilder {
    /// `columns` is the line width in characters at normal size
    /// (58mm paper: 32, 80mm paper: 48).
    pub fn new(columns: usize) -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(&[ESC, b'@', ESC, b't', CODE_PAGE_WPC1252]);
        Self {
            buf,
            columns,
            double: false,
        }
    }

    /// Characters that fit on a line at the current text size.
    pub fn width(&self) -> usize {
        if self.double {
            self.columns / 2
        } else {
            self.columns
        }
    }

    pub fn text(&mut self, s: &str) -> &mut Self {
        let (bytes, _, unmappable) = encoding_rs::WINDOWS_1252.encode(s);
        if !unmappable {
            self.buf.extend_from_slice(&bytes);
            return self;
        }
        // encoding_rs would emit HTML numeric references, the printer wants '?'
        for c in s.chars() {
            let mut tmp = [0u8; 4];
            let (b, _, bad) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut tmp));
            if bad {
                self.buf.push(b'?');
            } else {
                self.buf.extend_from_slice(&b);
            }
        }
        self
    }

    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.buf.push(b'\n');
        self
    }

    /// Like `line`, cut to the current width.
    pub fn line_fit(&mut self, s: &str) -> &mut Self {
        let fitted: String = s.chars().take(self.width()).collect();
        self.line(&fitted)
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push(b'\n');
        self
    }

    /// ESC d n: print and feed n lines.
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'd', lines]);
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'a', 0x01]);
        self
    }

    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'a', 0x00]);
        self
    }

    pub fn bold(&mut self, on: bool) -> &mut Self {
        self.buf.extend_from_slice(&[ESC, b'E', u8::from(on)]);
        self
    }

    /// GS ! 0x11: double width and height.
    pub fn double_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[GS, b'!', 0x11]);
        self.double = true;
        self
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[GS, b'!', 0x00]);
        self.double = false;
        self
    }

    /// Pre-encoded command data such as a raster image.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// GS V 0: full cut.
    pub fn cut(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[GS, b'V', 0x00]);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new(32)
    }
}
