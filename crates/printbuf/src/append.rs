use std::fmt::{self, Write};

use chrono::NaiveDateTime;

use crate::buffer::PrintBuf;

impl PrintBuf<'_> {
    /// Appends raw bytes.
    ///
    /// Writes the bytes that fit and unconditionally advances the logical
    /// length by the full requested size, so [`len`](Self::len) always equals
    /// the total length that would have been written with infinite capacity.
    pub fn append_bytes(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let size = data.len();
        loop {
            let room = self.room();
            if size < room {
                break;
            }
            if self.grow(size).is_err() {
                break;
            }
        }
        let room = self.room();
        if room > 0 {
            self.write_at_tail(data, size.min(room - 1));
        }
        self.advance_len(size);
    }

    /// Appends a string slice.
    pub fn append_str(&mut self, text: &str) {
        self.append_bytes(text.as_bytes());
    }

    /// Appends `count` copies of `byte`.
    ///
    /// # Examples
    ///
    /// ```
    /// use printbuf::PrintBuf;
    ///
    /// let mut buf = PrintBuf::unlimited();
    /// buf.append_fill(b'-', 4);
    /// assert_eq!(buf.bytes(), b"----");
    /// ```
    pub fn append_fill(&mut self, byte: u8, count: usize) {
        if count == 0 {
            return;
        }
        loop {
            let room = self.room();
            if count < room {
                break;
            }
            if self.grow(count).is_err() {
                break;
            }
        }
        let room = self.room();
        if room > 0 {
            self.fill_at_tail(byte, count.min(room - 1));
        }
        self.advance_len(count);
    }

    /// Appends formatted text.
    ///
    /// Equivalent to `write!(buf, ...)`; provided for call sites that already
    /// hold [`fmt::Arguments`]. A formatting error from a `Display`
    /// implementation leaves whatever was produced before the error in place,
    /// consistent with truncation being the uniform failure mode.
    pub fn append_format(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.write_fmt(args);
    }

    /// Appends a calendar time rendered with a `strftime`-style format
    /// string.
    ///
    /// An empty format appends nothing; an invalid format specifier stops
    /// output at the point of the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use printbuf::PrintBuf;
    ///
    /// let noon = NaiveDate::from_ymd_opt(2023, 7, 1)
    ///     .unwrap()
    ///     .and_hms_opt(12, 0, 0)
    ///     .unwrap();
    /// let mut buf = PrintBuf::unlimited();
    /// buf.append_strftime("%Y-%m-%d %H:%M", &noon);
    /// assert_eq!(buf.as_str(), Some("2023-07-01 12:00"));
    /// ```
    pub fn append_strftime(&mut self, format: &str, when: &NaiveDateTime) {
        if format.is_empty() {
            return;
        }
        let _ = write!(self, "{}", when.format(format));
    }
}

impl fmt::Write for PrintBuf<'_> {
    /// Appends the string; never reports an error, since running out of
    /// capacity is represented by the truncated state instead.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}
