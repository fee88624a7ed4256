//! The static page background: tractor-feed sprocket holes, the bar pattern or image, and the
//! line-number columns.

use std::io::Write;

use crate::jpeg::JpegInfo;
use crate::settings::{FormKind, Geometry};
use crate::types::fmt_coord;

/// Fill gray of the sprocket holes.
const HOLE_FILL: &str = "0.9 0.9 0.9";

/// Stroke gray of the sprocket holes.
const HOLE_STROKE: &str = "0.85 0.85 0.85";

/// Sprocket hole diameter, inches.
const HOLE_DIAMETER_IN: f64 = 0.1575;

/// Distance of the hole centers from the vertical page edges, inches.
const HOLE_INSET_IN: f64 = 0.236;

/// Vertical distance between hole centers, inches.
const HOLE_SPACING_IN: f64 = 0.5;

/// Distance of the first hole center from the top edge, inches.
const HOLE_START_IN: f64 = 0.25;

/// Kappa times radius places the control points of a circle quadrant.
const CIRCLE_K: f64 = 0.551784;

/// Resource name of the background image XObject.
pub(crate) const IMAGE_RESOURCE: &str = "Bg";

/// Renders the constant page background for the given pitch. The result is cached by the
/// session and replayed at the start of every page content stream.
pub(crate) fn render(geometry: &Geometry, form: FormKind, image: Option<&JpegInfo>) -> Vec<u8> {
    let mut out = Vec::new();

    sprocket_holes(&mut out, geometry);

    if let (FormKind::Image, Some(info)) = (form, image) {
        image_background(&mut out, geometry, info);
    }

    if let Some(color) = form.bar_color() {
        bars(&mut out, geometry, color);
        enclosure(&mut out, geometry, color);
    }

    if geometry.number_width > 0.0 {
        line_numbers(&mut out, geometry);
    }

    out
}

/// Paints the background image scaled to the printable width and centered vertically.
fn image_background(out: &mut Vec<u8>, geometry: &Geometry, info: &JpegInfo) {
    let width = geometry.width - 2.0 * geometry.side;
    let height = width * f64::from(info.height) / f64::from(info.width);
    let x = geometry.side;
    let y = (geometry.length - height) / 2.0;

    put(
        out,
        &format!(
            "q {} 0 0 {} {} {} cm /{IMAGE_RESOURCE} Do Q\n",
            fmt_coord(width),
            fmt_coord(height),
            fmt_coord(x),
            fmt_coord(y)
        ),
    );
}

fn put(out: &mut Vec<u8>, text: &str) {
    out.write_all(text.as_bytes())
        .expect("writing to Vec cannot fail");
}

/// One row of holes down each tractor strip, drawn as four Bézier quadrants per circle.
fn sprocket_holes(out: &mut Vec<u8>, geometry: &Geometry) {
    let radius = HOLE_DIAMETER_IN / 2.0 * 72.0;
    let inset = HOLE_INSET_IN * 72.0;
    let spacing = HOLE_SPACING_IN * 72.0;
    let start = HOLE_START_IN * 72.0;

    put(out, &format!("{HOLE_FILL} rg {HOLE_STROKE} RG\n"));

    let mut y = geometry.length - start;
    while y >= start - 1e-6 {
        circle(out, inset, y, radius);
        circle(out, geometry.width - inset, y, radius);
        y -= spacing;
    }
}

fn circle(out: &mut Vec<u8>, cx: f64, cy: f64, r: f64) {
    let k = CIRCLE_K * r;
    let (x0, y0) = (cx + r, cy);
    put(out, &format!("{} {} m\n", fmt_coord(x0), fmt_coord(y0)));
    put(
        out,
        &format!(
            "{} {} {} {} {} {} c\n",
            fmt_coord(cx + r),
            fmt_coord(cy + k),
            fmt_coord(cx + k),
            fmt_coord(cy + r),
            fmt_coord(cx),
            fmt_coord(cy + r)
        ),
    );
    put(
        out,
        &format!(
            "{} {} {} {} {} {} c\n",
            fmt_coord(cx - k),
            fmt_coord(cy + r),
            fmt_coord(cx - r),
            fmt_coord(cy + k),
            fmt_coord(cx - r),
            fmt_coord(cy)
        ),
    );
    put(
        out,
        &format!(
            "{} {} {} {} {} {} c\n",
            fmt_coord(cx - r),
            fmt_coord(cy - k),
            fmt_coord(cx - k),
            fmt_coord(cy - r),
            fmt_coord(cx),
            fmt_coord(cy - r)
        ),
    );
    put(
        out,
        &format!(
            "{} {} {} {} {} {} c\n",
            fmt_coord(cx + k),
            fmt_coord(cy - r),
            fmt_coord(cx + r),
            fmt_coord(cy - k),
            fmt_coord(cx + r),
            fmt_coord(cy)
        ),
    );
    put(out, "b\n");
}

/// Alternate bands of `bar-height`, the even-indexed ones filled, walking down from the top
/// margin until the bottom margin is reached.
fn bars(out: &mut Vec<u8>, geometry: &Geometry, color: &str) {
    let left = geometry.side;
    let width = geometry.width - 2.0 * geometry.side;
    let top = geometry.length - geometry.top;

    put(out, &format!("{color} rg\n"));
    let mut index = 0u32;
    loop {
        let band_top = top - f64::from(index) * geometry.bar_height;
        let band_bottom = band_top - geometry.bar_height;
        if band_bottom < geometry.bottom - 1e-6 {
            break;
        }
        if index % 2 == 0 {
            put(
                out,
                &format!(
                    "{} {} {} {} re f\n",
                    fmt_coord(left),
                    fmt_coord(band_bottom),
                    fmt_coord(width),
                    fmt_coord(geometry.bar_height)
                ),
            );
        }
        index += 1;
    }
}

/// The rounded rectangle around the printable region, with rules separating the line-number
/// columns from the text area.
fn enclosure(out: &mut Vec<u8>, geometry: &Geometry, color: &str) {
    let left = geometry.side;
    let right = geometry.width - geometry.side;
    let bottom = geometry.bottom;
    let top = geometry.length - geometry.top;
    let r = geometry.number_width / 2.0;
    let k = CIRCLE_K * r;

    put(out, &format!("{color} RG 1 w\n"));

    // clockwise from the lower-left corner, one Bézier per rounded corner
    put(out, &format!("{} {} m\n", fmt_coord(left + r), fmt_coord(bottom)));
    put(out, &format!("{} {} l\n", fmt_coord(right - r), fmt_coord(bottom)));
    put(
        out,
        &format!(
            "{} {} {} {} {} {} c\n",
            fmt_coord(right - r + k),
            fmt_coord(bottom),
            fmt_coord(right),
            fmt_coord(bottom + r - k),
            fmt_coord(right),
            fmt_coord(bottom + r)
        ),
    );
    put(out, &format!("{} {} l\n", fmt_coord(right), fmt_coord(top - r)));
    put(
        out,
        &format!(
            "{} {} {} {} {} {} c\n",
            fmt_coord(right),
            fmt_coord(top - r + k),
            fmt_coord(right - r + k),
            fmt_coord(top),
            fmt_coord(right - r),
            fmt_coord(top)
        ),
    );
    put(out, &format!("{} {} l\n", fmt_coord(left + r), fmt_coord(top)));
    put(
        out,
        &format!(
            "{} {} {} {} {} {} c\n",
            fmt_coord(left + r - k),
            fmt_coord(top),
            fmt_coord(left),
            fmt_coord(top - r + k),
            fmt_coord(left),
            fmt_coord(top - r)
        ),
    );
    put(out, &format!("{} {} l\n", fmt_coord(left), fmt_coord(bottom + r)));
    put(
        out,
        &format!(
            "{} {} {} {} {} {} c\n",
            fmt_coord(left),
            fmt_coord(bottom + r - k),
            fmt_coord(left + r - k),
            fmt_coord(bottom),
            fmt_coord(left + r),
            fmt_coord(bottom)
        ),
    );
    put(out, "s\n");

    if geometry.number_width > 0.0 {
        for x in [
            left + geometry.number_width,
            right - geometry.number_width,
        ] {
            put(
                out,
                &format!(
                    "{} {} m {} {} l S\n",
                    fmt_coord(x),
                    fmt_coord(bottom),
                    fmt_coord(x),
                    fmt_coord(top)
                ),
            );
        }
    }
}

/// The two line-number columns: 6-LPI counts on the left, 8-LPI counts on the right, each in
/// its own font and scale.
fn line_numbers(out: &mut Vec<u8>, geometry: &Geometry) {
    let printable_in = geometry.page_length_in - geometry.top_in - geometry.bottom_in;
    let top = geometry.length - geometry.top;
    let left_center = geometry.side + geometry.number_width / 2.0;
    let right_center = geometry.width - geometry.side - geometry.number_width / 2.0;

    put(out, "0.3 0.3 0.3 rg\n");

    // left column counts at 6 LPI in the number font
    let count6 = (printable_in * 6.0).floor() as u32;
    let size6 = 0.55 * 72.0 / 6.0;
    numbers_column(out, "F2", size6, left_center, top, 12.0, count6);

    // right column counts at 8 LPI in the label font
    let count8 = (printable_in * 8.0).floor() as u32;
    let size8 = 0.65 * 72.0 / 8.0;
    numbers_column(out, "F3", size8, right_center, top, 9.0, count8);
}

fn numbers_column(
    out: &mut Vec<u8>,
    font: &str,
    size: f64,
    center: f64,
    top: f64,
    leading: f64,
    count: u32,
) {
    put(out, &format!("BT /{font} {} Tf\n", fmt_coord(size)));
    for n in 1..=count {
        let digits = n.to_string();
        // digits of the Times faces are half an em wide
        let x = center - digits.len() as f64 * size * 0.25;
        let y = top - f64::from(n) * leading;
        put(
            out,
            &format!("1 0 0 1 {} {} Tm ({digits}) Tj\n", fmt_coord(x), fmt_coord(y)),
        );
    }
    put(out, "ET\n");
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::settings::{FormKind, Settings};

    fn greenbar_form() -> String {
        let geometry = Settings::default().resolve().unwrap();
        String::from_utf8(render(&geometry, FormKind::Greenbar, None)).unwrap()
    }

    #[test]
    fn holes_run_down_both_strips() {
        let form = greenbar_form();
        // 11 in page, every half inch starting 0.25 in from each end: 22 rows, two strips
        assert_eq!(form.matches("\nb\n").count(), 44);
        assert!(form.contains("0.9 0.9 0.9 rg 0.85 0.85 0.85 RG"));
    }

    #[test]
    fn even_bands_are_filled() {
        let form = greenbar_form();
        assert!(form.contains("0.8 0.9 0.8 rg"));
        // 9.5 printable inches in half-inch bands: 19 bands, 10 of them even-indexed
        assert_eq!(form.matches(" re f\n").count(), 10);
        // the first band's bottom edge sits half an inch below the top margin
        assert!(form.contains("33.84 684 1003.32 36 re f"));
    }

    #[test]
    fn plain_form_has_no_bars() {
        let geometry = Settings::default().resolve().unwrap();
        let form =
            String::from_utf8(render(&geometry, FormKind::Plain, None)).unwrap();
        assert!(!form.contains("re f"));
        assert!(form.contains("\nb\n"));
    }

    #[test]
    fn number_columns_count_both_pitches() {
        let form = greenbar_form();
        // 9.5 printable inches: 57 lines at 6 LPI, 76 at 8 LPI
        assert!(form.contains("(57) Tj"));
        assert!(form.contains("(76) Tj"));
        assert!(!form.contains("(77) Tj"));
        assert!(form.contains("/F2 6.6 Tf"));
        assert!(form.contains("/F3 5.85 Tf"));
    }

    #[test]
    fn disabling_the_number_column_removes_labels() {
        let mut settings = Settings::default();
        settings.number_width = crate::types::unit::Unit::from_inch(0.0);
        let geometry = settings.resolve().unwrap();
        let form =
            String::from_utf8(render(&geometry, FormKind::Greenbar, None)).unwrap();
        assert!(!form.contains("Tj"));
    }
}
