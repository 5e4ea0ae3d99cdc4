// Number and text formatting shared by the overlay writer.

use std::fmt::Write as _;

pub(super) fn fmt(v: f64) -> String {
    let mut out = String::new();
    fmt_into(&mut out, v);
    out
}

pub(super) fn fmt_into(out: &mut String, v: f64) {
    // Shortest round-trippable decimal, without `-0` or float noise from projection math.
    if !v.is_finite() {
        out.push('0');
        return;
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }

    let _ = write!(out, "{v}");
}

/// Path coordinates keep three fractional digits.
pub(super) fn fmt_path_into(out: &mut String, v: f64) {
    if !v.is_finite() || v.abs() < 0.0005 {
        out.push('0');
        return;
    }
    let k = (v * 1000.0 + 0.5).floor() as i64;
    if k == 0 {
        out.push('0');
        return;
    }

    if k < 0 {
        out.push('-');
    }
    let abs = k.unsigned_abs();
    let _ = write!(out, "{}", abs / 1000);
    let frac = abs % 1000;
    if frac == 0 {
        return;
    }
    let mut digits = format!("{frac:03}");
    while digits.ends_with('0') {
        digits.pop();
    }
    out.push('.');
    out.push_str(&digits);
}

pub(super) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_into(&mut out, text);
    out
}

pub(super) fn escape_xml_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_drops_noise_and_negative_zero() {
        assert_eq!(fmt(f64::NAN), "0");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(1.0000004), "1");
        assert_eq!(fmt(-1.0000004), "-1");
        assert_eq!(fmt(12.5), "12.5");
    }

    #[test]
    fn path_numbers_round_to_three_digits() {
        fn path(v: f64) -> String {
            let mut s = String::new();
            fmt_path_into(&mut s, v);
            s
        }
        assert_eq!(path(0.0001), "0");
        assert_eq!(path(1.23456), "1.235");
        assert_eq!(path(-2.5), "-2.5");
        assert_eq!(path(40.0), "40");
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml("A & <B>"), "A &amp; &lt;B&gt;");
        assert_eq!(escape_xml("it's \"x\""), "it&#39;s &quot;x&quot;");
        assert_eq!(escape_xml("Kamppi"), "Kamppi");
    }
}
