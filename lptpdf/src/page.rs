//! The logical page under construction: an array of line buffers with overstrike support and
//! the top-of-form handling around page breaks.

/// In-band code recording a carriage-return overstrike boundary inside a line.
pub(crate) const OVERSTRIKE_MARK: u16 = 0x0D;

/// One logical line: the surviving character codes (with embedded overstrike marks) and the
/// vertical pitch the line was written at.
#[derive(Debug, Clone)]
pub(crate) struct Line {
    pub codes: Vec<u16>,
    pub lpi: u32,
}

impl Line {
    fn new(lpi: u32) -> Self {
        Line {
            codes: Vec::new(),
            lpi,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Accumulates lines for the page being printed.
///
/// Lines are 1-based; `current == 0` means nothing has been placed on this page yet. Lines past
/// the physical page, up to the top-of-form offset, belong to the next page and are carried
/// over when the page turns.
pub(crate) struct PageBuffer {
    /// `lines[i]` is logical line `i + 1`.
    lines: Vec<Line>,
    current: usize,
    pending_cr: bool,
    /// Physical lines on this page.
    lpp: usize,
    /// The 1-based line a form-feed advances to.
    tof: usize,
}

impl PageBuffer {
    pub fn new(lpp: usize, tof: usize) -> Self {
        PageBuffer {
            lines: Vec::new(),
            current: 0,
            pending_cr: false,
            lpp,
            tof,
        }
    }

    /// Whether the page holds text that still has to reach the file. Bare motion (a form feed
    /// or trailing line feeds) does not make a trailing blank page on its own.
    pub fn is_dirty(&self) -> bool {
        self.lines.iter().any(|l| !l.is_empty())
    }

    /// The current 1-based line, or 0 when the page is untouched.
    pub fn current_line(&self) -> usize {
        self.current
    }

    pub fn top_of_form(&self) -> usize {
        self.tof
    }

    /// Whether the next ordinary character must flush the page first.
    pub fn overflowed(&self) -> bool {
        self.current > self.lpp + self.tof
    }

    /// Appends an ordinary character at the current position, on the first line below the
    /// top-of-form when the page is untouched. A carriage return seen earlier on the line is
    /// materialized as an overstrike mark, so later characters overprint from the line start.
    pub fn put_char(&mut self, code: u16, lpi: u32) {
        if self.current == 0 {
            self.current = self.tof + 1;
        }
        let pending_cr = std::mem::take(&mut self.pending_cr);
        let line = self.line_mut(self.current, lpi);
        // the pitch in effect when data lands on the line decides its spacing
        line.lpi = lpi;
        if pending_cr && !line.is_empty() {
            line.codes.push(OVERSTRIKE_MARK);
        }
        line.codes.push(code);
    }

    pub fn line_feed(&mut self, lpi: u32) {
        self.pending_cr = false;
        self.current += 1;
        // record the pitch of the line being entered, even if it stays blank
        if self.current <= self.lpp + self.tof {
            self.line_mut(self.current, lpi);
        }
    }

    pub fn carriage_return(&mut self) {
        if self.current != 0 {
            self.pending_cr = true;
        }
    }

    /// The lines of the physical page, for rendering.
    pub fn visible_lines(&self) -> &[Line] {
        &self.lines[..self.lines.len().min(self.lpp)]
    }

    /// Turns the page: drops the rendered lines and pulls the overflow region down to the top
    /// of the new page. `after_ff` positions the new page at the top-of-form line; an overflow
    /// break continues at the line that triggered it.
    pub fn start_next_page(&mut self, after_ff: bool, lpp: usize, tof: usize) {
        let overflow: Vec<Line> = if self.lines.len() > self.lpp {
            self.lines.drain(self.lpp..).collect()
        } else {
            Vec::new()
        };
        let swapped_any = overflow.iter().any(|l| !l.is_empty());

        self.lines.clear();
        for (index, line) in overflow.into_iter().enumerate() {
            // overflow line lpp + 1 + index becomes line 1 + index of the new page
            self.ensure_len(index + 1, line.lpi);
            self.lines[index] = line;
        }

        self.current = if after_ff {
            tof
        } else if swapped_any {
            tof + 1
        } else {
            self.current.saturating_sub(self.lpp)
        };
        self.pending_cr = false;
        self.lpp = lpp;
        self.tof = tof;
    }

    fn line_mut(&mut self, number: usize, lpi: u32) -> &mut Line {
        self.ensure_len(number, lpi);
        &mut self.lines[number - 1]
    }

    fn ensure_len(&mut self, number: usize, lpi: u32) {
        while self.lines.len() < number {
            self.lines.push(Line::new(lpi));
        }
    }
}
