//! Canonical text encoding for hashed and signed payloads.
//!
//! This encoding is a wire contract.  Audit entry hashes and lineage
//! signatures are computed over it, so any change here invalidates every
//! previously written chain and every issued signature.
//!
//! Rules:
//!   - object keys sorted lexicographically at every nesting level
//!   - `", "` between items, `": "` between key and value
//!   - characters outside printable ASCII escaped as lowercase `\uXXXX`,
//!     with surrogate pairs above the BMP
//!   - integers in plain decimal
//!   - floats in shortest round-trip form: fixed notation when the decimal
//!     exponent is in `(-4, 16]` (always with a fractional part), otherwise
//!     `d.ddde+XX` with at least two exponent digits
//!   - `NaN`, `Infinity`, `-Infinity` for non-finite floats

use std::{cell::Cell, io};

use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serialize, Serializer,
};
use serde_json::ser::Formatter;

use crate::detail::{DetailValue, Details};

/// Encode `value` canonically.
pub fn to_canonical_string(value: &DetailValue) -> String {
    ascii_string(to_canonical_bytes(value))
}

/// Encode `value` canonically as UTF-8 bytes (always pure ASCII).
pub fn to_canonical_bytes(value: &DetailValue) -> Vec<u8> {
    encode(Root::Value(value))
}

/// Encode a mapping canonically.
pub fn details_to_canonical_string(details: &Details) -> String {
    ascii_string(encode(Root::Map(details)))
}

enum Root<'a> {
    Value(&'a DetailValue),
    Map(&'a Details),
}

fn encode(root: Root<'_>) -> Vec<u8> {
    let non_finite = Cell::new(None);
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(
        &mut out,
        PythonFormatter {
            non_finite: &non_finite,
        },
    );
    // Writing into a Vec cannot fail and every key is a string.
    let _ = match root {
        Root::Value(value) => Canonical {
            value,
            non_finite: &non_finite,
        }
        .serialize(&mut ser),
        Root::Map(map) => CanonicalMap {
            map,
            non_finite: &non_finite,
        }
        .serialize(&mut ser),
    };
    drop(ser);
    out
}

fn ascii_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

// ── Serialization ────────────────────────────────────────────────────────────

/// serde_json writes non-finite floats through `write_null`.  The value is
/// parked in `non_finite` just before, so the formatter can spell it out.
struct Canonical<'a> {
    value: &'a DetailValue,
    non_finite: &'a Cell<Option<f64>>,
}

struct CanonicalMap<'a> {
    map: &'a Details,
    non_finite: &'a Cell<Option<f64>>,
}

impl Serialize for Canonical<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            DetailValue::Null => serializer.serialize_unit(),
            DetailValue::Bool(b) => serializer.serialize_bool(*b),
            DetailValue::Int(i) => serializer.serialize_i64(*i),
            DetailValue::UInt(u) => serializer.serialize_u64(*u),
            DetailValue::Float(f) => {
                if !f.is_finite() {
                    self.non_finite.set(Some(*f));
                }
                serializer.serialize_f64(*f)
            }
            DetailValue::Str(s) => serializer.serialize_str(s),
            DetailValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Canonical {
                        value: item,
                        non_finite: self.non_finite,
                    })?;
                }
                seq.end()
            }
            DetailValue::Map(map) => CanonicalMap {
                map,
                non_finite: self.non_finite,
            }
            .serialize(serializer),
        }
    }
}

impl Serialize for CanonicalMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // BTreeMap iterates in byte order, which for UTF-8 keys is code point order.
        let mut map = serializer.serialize_map(Some(self.map.len()))?;
        for (key, value) in self.map {
            map.serialize_entry(
                key,
                &Canonical {
                    value,
                    non_finite: self.non_finite,
                },
            )?;
        }
        map.end()
    }
}

// ── Formatter ────────────────────────────────────────────────────────────────

struct PythonFormatter<'a> {
    non_finite: &'a Cell<Option<f64>>,
}

impl Formatter for PythonFormatter<'_> {
    fn write_null<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        match self.non_finite.take() {
            Some(f) if f.is_nan() => writer.write_all(b"NaN"),
            Some(f) if f > 0.0 => writer.write_all(b"Infinity"),
            Some(_) => writer.write_all(b"-Infinity"),
            None => writer.write_all(b"null"),
        }
    }

    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        writer.write_all(python_float_repr(value).as_bytes())
    }

    /// Quotes, backslashes, and control characters never reach this point;
    /// serde_json escapes those itself.
    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut run_start = 0;
        for (pos, ch) in fragment.char_indices() {
            if matches!(ch, ' '..='~') {
                continue;
            }
            writer.write_all(fragment[run_start..pos].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            run_start = pos + ch.len_utf8();
        }
        writer.write_all(fragment[run_start..].as_bytes())
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

/// Shortest round-trip repr of a finite float, in Python's layout.
fn python_float_repr(f: f64) -> String {
    // `{:e}` yields the shortest round-trip digits, e.g. "-1.25e-7" or "0e0".
    let sci = format!("{:e}", f);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let decpt = exp + 1;

    let mut out = String::new();
    if negative {
        out.push('-');
    }

    if -4 < decpt && decpt <= 16 {
        if decpt <= 0 {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(decpt.unsigned_abs() as usize));
            out.push_str(&digits);
        } else {
            let point = decpt as usize;
            if point >= digits.len() {
                out.push_str(&digits);
                out.extend(std::iter::repeat('0').take(point - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..point]);
                out.push('.');
                out.push_str(&digits[point..]);
            }
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push_str(&format!("e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.abs()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(f: f64) -> String {
        to_canonical_string(&DetailValue::Float(f))
    }

    // ── Floats ───────────────────────────────────────────────────────────────

    #[test]
    fn floats_use_shortest_round_trip_form() {
        assert_eq!(float(1.0), "1.0");
        assert_eq!(float(0.0), "0.0");
        assert_eq!(float(-0.0), "-0.0");
        assert_eq!(float(0.5), "0.5");
        assert_eq!(float(123.456), "123.456");
        assert_eq!(float(-2.5), "-2.5");
        assert_eq!(float(0.1 + 0.2), "0.30000000000000004");
    }

    #[test]
    fn floats_switch_to_exponent_outside_fixed_window() {
        assert_eq!(float(0.0001), "0.0001");
        assert_eq!(float(0.00001), "1e-05");
        assert_eq!(float(1.5e-7), "1.5e-07");
        assert_eq!(float(1e15), "1000000000000000.0");
        assert_eq!(float(1e16), "1e+16");
        assert_eq!(float(1.25e100), "1.25e+100");
    }

    #[test]
    fn non_finite_floats_have_literal_spellings() {
        assert_eq!(float(f64::NAN), "NaN");
        assert_eq!(float(f64::INFINITY), "Infinity");
        assert_eq!(float(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn non_finite_floats_do_not_leak_into_nulls() {
        let v = DetailValue::map([
            ("a", DetailValue::Float(f64::NAN)),
            ("b", DetailValue::Null),
            ("c", DetailValue::List(vec![DetailValue::Null, DetailValue::Float(f64::NEG_INFINITY)])),
        ]);
        assert_eq!(to_canonical_string(&v), r#"{"a": NaN, "b": null, "c": [null, -Infinity]}"#);
    }

    // ── Integers ─────────────────────────────────────────────────────────────

    #[test]
    fn integers_cover_the_full_signed_and_unsigned_range() {
        assert_eq!(to_canonical_string(&DetailValue::Int(i64::MIN)), "-9223372036854775808");
        assert_eq!(to_canonical_string(&DetailValue::UInt(u64::MAX)), "18446744073709551615");
    }

    // ── Strings ──────────────────────────────────────────────────────────────

    #[test]
    fn strings_escape_controls_and_non_ascii() {
        let v = DetailValue::from("a\"b\\c\nd\te\u{1}é€😀\u{7f}");
        assert_eq!(
            to_canonical_string(&v),
            r#""a\"b\\c\nd\te\u0001\u00e9\u20ac\ud83d\ude00\u007f""#
        );
    }

    // ── Containers ───────────────────────────────────────────────────────────

    #[test]
    fn maps_sort_keys_recursively_with_spaced_separators() {
        let v = DetailValue::map([
            ("zeta", DetailValue::Int(1)),
            (
                "alpha",
                DetailValue::map([("y", DetailValue::Null), ("x", DetailValue::Bool(true))]),
            ),
            (
                "mid",
                DetailValue::List(vec![DetailValue::Int(1), DetailValue::from("two")]),
            ),
        ]);
        assert_eq!(
            to_canonical_string(&v),
            r#"{"alpha": {"x": true, "y": null}, "mid": [1, "two"], "zeta": 1}"#
        );
    }

    #[test]
    fn empty_containers_encode_compactly() {
        assert_eq!(to_canonical_string(&DetailValue::List(vec![])), "[]");
        assert_eq!(details_to_canonical_string(&Details::new()), "{}");
    }

    #[test]
    fn encoding_is_deterministic_across_insertion_orders() {
        let a = DetailValue::map([("b", 2), ("a", 1)]);
        let b = DetailValue::map([("a", 1), ("b", 2)]);
        assert_eq!(to_canonical_bytes(&a), to_canonical_bytes(&b));
    }
}
