//! Session configuration: the option table, the core-14 font list and the form styles.

use std::path::PathBuf;

use crate::error::Error;
use crate::types::unit::Unit;

/// The 14 fonts every conforming PDF viewer provides without embedding.
pub const CORE_FONTS: [&str; 14] = [
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Symbol",
    "ZapfDingbats",
];

/// Selectable stationery styles.
pub const FORM_NAMES: [&str; 5] = ["PLAIN", "GREENBAR", "BLUEBAR", "GRAYBAR", "YELLOWBAR"];

/// What the output file is required to look like when the session opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// The file must be empty (or absent).
    #[default]
    New,

    /// A non-empty file must be a PDF this engine produced; new pages are appended.
    Append,

    /// Any existing content is discarded.
    Replace,
}

/// The stationery drawn behind the text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormKind {
    /// Sprocket holes only.
    Plain,

    #[default]
    Greenbar,
    Bluebar,
    Graybar,
    Yellowbar,

    /// A JPEG image scaled to the printable width.
    Image,
}

impl FormKind {
    /// Parses one of the [`FORM_NAMES`] (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name.to_ascii_uppercase().as_str() {
            "PLAIN" => Ok(FormKind::Plain),
            "GREENBAR" => Ok(FormKind::Greenbar),
            "BLUEBAR" => Ok(FormKind::Bluebar),
            "GRAYBAR" => Ok(FormKind::Graybar),
            "YELLOWBAR" => Ok(FormKind::Yellowbar),
            _ => Err(Error::UnknownForm(name.to_string())),
        }
    }

    /// The fill color of the shaded bands, as an `r g b` triple for the `rg` operator.
    pub(crate) fn bar_color(self) -> Option<&'static str> {
        match self {
            FormKind::Greenbar => Some("0.8 0.9 0.8"),
            FormKind::Bluebar => Some("0.8 0.8 0.9"),
            FormKind::Graybar => Some("0.88 0.88 0.88"),
            FormKind::Yellowbar => Some("0.95 0.95 0.8"),
            FormKind::Plain | FormKind::Image => None,
        }
    }
}

/// Checks a font name against the core-14 list, returning the canonical spelling.
pub(crate) fn check_font(name: &str) -> Result<&'static str, Error> {
    CORE_FONTS
        .iter()
        .find(|f| f.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| Error::UnknownFont(name.to_string()))
}

/// The full option table of a session. All values are optional; the defaults describe US
/// 14 7/8 × 11 inch greenbar stock printed at 10 CPI / 6 LPI.
#[derive(Debug, Clone)]
pub struct Settings {
    pub(crate) mode: FileMode,
    pub(crate) page_width: Unit,
    pub(crate) page_length: Unit,
    pub(crate) top_margin: Unit,
    pub(crate) bottom_margin: Unit,
    pub(crate) side_margin: Unit,
    pub(crate) cpi: f64,
    pub(crate) lpi: u32,
    pub(crate) cols: u32,
    /// Logical line a form-feed advances to; `None` derives top-margin × LPI.
    pub(crate) tof_offset: Option<u32>,
    pub(crate) number_width: Unit,
    pub(crate) bar_height: Unit,
    pub(crate) form: FormKind,
    pub(crate) form_image: Option<PathBuf>,
    pub(crate) text_font: &'static str,
    pub(crate) number_font: &'static str,
    pub(crate) label_font: &'static str,
    pub(crate) title: String,
    pub(crate) creator: Option<String>,
    pub(crate) no_lzw: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: FileMode::New,
            page_width: Unit::from_inch(14.875),
            page_length: Unit::from_inch(11.0),
            top_margin: Unit::from_inch(1.0),
            bottom_margin: Unit::from_inch(0.5),
            side_margin: Unit::from_inch(0.47),
            cpi: 10.0,
            lpi: 6,
            cols: 132,
            tof_offset: None,
            number_width: Unit::from_inch(0.1),
            bar_height: Unit::from_inch(0.5),
            form: FormKind::Greenbar,
            form_image: None,
            text_font: "Courier",
            number_font: "Times-Roman",
            label_font: "Times-Bold",
            title: "Lineprinter data".to_string(),
            creator: None,
            no_lzw: false,
        }
    }
}

impl Settings {
    /// Resolves the option table into page geometry, rejecting combinations that cannot be
    /// rendered. Called once at first output, before any file byte is written.
    pub(crate) fn resolve(&self) -> Result<Geometry, Error> {
        let geometry = Geometry {
            width: self.page_width.into_user_unit(),
            length: self.page_length.into_user_unit(),
            top: self.top_margin.into_user_unit(),
            bottom: self.bottom_margin.into_user_unit(),
            side: self.side_margin.into_user_unit(),
            cpi: self.cpi,
            cols: self.cols,
            page_length_in: self.page_length.into_inches(),
            top_in: self.top_margin.into_inches(),
            bottom_in: self.bottom_margin.into_inches(),
            tof_override: self.tof_offset,
            number_width: self.number_width.into_user_unit(),
            bar_height: self.bar_height.into_user_unit(),
        };

        if geometry.width <= 0.0 || geometry.length <= 0.0 {
            return Err(Error::InconsistentGeometry(
                "page size must be positive".into(),
            ));
        }
        if self.cpi <= 0.0 {
            return Err(Error::InconsistentGeometry(
                "characters per inch must be positive".into(),
            ));
        }
        let printable_w = geometry.width - 2.0 * geometry.side;
        let printable_h = geometry.length - geometry.top - geometry.bottom;
        if printable_w <= 0.0 || printable_h <= 0.0 {
            return Err(Error::InconsistentGeometry(
                "margins leave no printable area".into(),
            ));
        }
        if self.cols as f64 * 72.0 / self.cpi > printable_w + 1e-6 {
            return Err(Error::InconsistentGeometry(format!(
                "{} columns at {} CPI do not fit between the side margins",
                self.cols, self.cpi
            )));
        }
        if 2.0 * geometry.number_width >= printable_w {
            return Err(Error::InconsistentGeometry(
                "line-number columns are wider than the printable area".into(),
            ));
        }
        if self.form.bar_color().is_some()
            && geometry.bar_height * self.lpi as f64 + 1e-6 < 72.0
        {
            return Err(Error::InconsistentGeometry(
                "bar height must cover at least one line".into(),
            ));
        }
        if geometry.lines_per_page(self.lpi) == 0 {
            return Err(Error::InconsistentGeometry(
                "page is shorter than one line".into(),
            ));
        }
        if geometry.top_of_form(self.lpi) >= geometry.lines_per_page(self.lpi) {
            return Err(Error::InconsistentGeometry(
                "top-of-form offset is beyond the page".into(),
            ));
        }

        Ok(geometry)
    }
}

/// The frozen page measurements of an active session, in default user space units unless named
/// otherwise. LPI-dependent quantities stay parametric because the vertical pitch may change
/// between pages.
#[derive(Debug, Clone)]
pub(crate) struct Geometry {
    pub width: f64,
    pub length: f64,
    pub top: f64,
    pub bottom: f64,
    pub side: f64,
    pub cpi: f64,
    pub cols: u32,
    pub page_length_in: f64,
    pub top_in: f64,
    pub bottom_in: f64,
    pub tof_override: Option<u32>,
    pub number_width: f64,
    pub bar_height: f64,
}

impl Geometry {
    /// Physical lines on a page at the given pitch.
    pub fn lines_per_page(&self, lpi: u32) -> usize {
        (self.page_length_in * lpi as f64).floor() as usize
    }

    /// The 1-based logical line a form-feed advances to.
    pub fn top_of_form(&self, lpi: u32) -> usize {
        match self.tof_override {
            Some(tof) => tof as usize,
            None => (self.top_in * lpi as f64).floor() as usize,
        }
    }

    /// Left edge of the text overlay: the `cols`-wide text region centered between the page
    /// edges.
    pub fn text_left(&self) -> f64 {
        (self.width - self.cols as f64 * 72.0 / self.cpi) / 2.0
    }
}
