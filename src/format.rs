//! printf-style message formatting.
//!
//! Templates use `%` directives (`%v %s %q %d %x %X %o %b %c %t %f %F %e %E %g %G %%`)
//! with the usual flags (`- + # 0` and space), width and precision. Formatting never
//! fails: mismatches between directives and values are rendered inline, e.g.
//! `%!d(MISSING)`, `%!d(string=abc)` or `%!(EXTRA int=1)`.
//!
//! `%v` and `%g` without precision print floats in their shortest round-trip form,
//! in exponent form (`1e+21`, `1e-05`) once the exponent is below -4 or at least 6.
//! `%q` quotes strings and chars, and integers as the char of that code point.

use std::{fmt, sync::LazyLock};

use regex::{Captures, Regex};

/// Largest width or precision honored by a directive.
const MAX_PADDING: usize = 1_000_000;
/// Decimal exponent from which shortest float output uses exponent form.
const SHORTEST_EXPONENT_LIMIT: i32 = 6;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)%([-+# 0]*)(\d+)?(?:\.(\d*))?(.)?").expect("directive pattern is valid")
});

/// A format argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    Str(String),
    /// Any other value, already rendered through its `Display` impl.
    Other(String),
}

impl Value {
    /// Wraps any displayable value.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Self::Other(value.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float64",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Other(_) => "value",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&shortest(*v)),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Str(v) | Self::Other(v) => f.write_str(v),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident as $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::$variant(value as $target)
                }
            }
        )*
    };
}

impl_from!(Int as i64: i8, i16, i32, i64, isize);
impl_from!(Uint as u64: u8, u16, u32, u64, usize);
impl_from!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<&std::path::Path> for Value {
    fn from(value: &std::path::Path) -> Self {
        Self::Other(value.display().to_string())
    }
}

/// Formats `values` into `template`.
///
/// A template that is not a string is rendered as with `%v` first. Without values the
/// template is returned as is. When the template has no `%` at all, one ` %v` per
/// value is appended so the values still show up.
pub fn format_message(template: impl Into<Value>, values: &[Value]) -> String {
    let template = match template.into() {
        Value::Str(s) => s,
        other => other.to_string(),
    };
    if values.is_empty() {
        return template;
    }
    if template.contains('%') {
        substitute(&template, values)
    } else {
        substitute(&(template + &" %v".repeat(values.len())), values)
    }
}

fn substitute(template: &str, values: &[Value]) -> String {
    let mut out = String::with_capacity(template.len() + 8 * values.len());
    let mut last = 0;
    let mut next = 0;
    for caps in DIRECTIVE.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        last = whole.end();
        let Some(verb) = caps.get(4).and_then(|m| m.as_str().chars().next()) else {
            out.push_str("%!(NOVERB)");
            continue;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }
        let directive = Directive::new(&caps, verb);
        match values.get(next) {
            Some(value) => {
                out.push_str(&directive.render(value));
                next += 1;
            }
            None => out.push_str(&format!("%!{verb}(MISSING)")),
        }
    }
    out.push_str(&template[last..]);
    if next < values.len() {
        let extra: Vec<String> = values[next..]
            .iter()
            .map(|v| format!("{}={v}", v.type_name()))
            .collect();
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }
    out
}

struct Directive {
    minus: bool,
    plus: bool,
    sharp: bool,
    space: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
    verb: char,
}

fn parse_count(text: &str) -> Option<usize> {
    text.parse::<usize>().ok().map(|n| n.min(MAX_PADDING))
}

impl Directive {
    fn new(caps: &Captures<'_>, verb: char) -> Self {
        let flags = caps.get(1).map_or("", |m| m.as_str());
        Self {
            minus: flags.contains('-'),
            plus: flags.contains('+'),
            sharp: flags.contains('#'),
            space: flags.contains(' '),
            zero: flags.contains('0'),
            width: caps.get(2).and_then(|m| parse_count(m.as_str())),
            // A bare `.` means precision zero.
            precision: caps
                .get(3)
                .map(|m| parse_count(m.as_str()).unwrap_or(0)),
            verb,
        }
    }

    fn render(&self, value: &Value) -> String {
        let rendered = match (value, self.verb) {
            (Value::Int(n), 'v' | 'd' | 'x' | 'X' | 'o' | 'b' | 'c' | 'q') => {
                self.integer(i128::from(*n))
            }
            (Value::Uint(n), 'v' | 'd' | 'x' | 'X' | 'o' | 'b' | 'c' | 'q') => {
                self.integer(i128::from(*n))
            }
            (Value::Char(c), 'd' | 'x' | 'X' | 'o' | 'b') => {
                self.integer(i128::from(u32::from(*c)))
            }
            (Value::Float(f), 'v' | 'f' | 'F' | 'e' | 'E' | 'g' | 'G') => Some(self.float(*f)),
            (Value::Bool(b), 'v' | 't') => Some(self.pad(&b.to_string())),
            (Value::Char(c), 'v' | 'c' | 's') => Some(self.text(&c.to_string())),
            (Value::Char(c), 'q') => Some(self.pad(&format!("{c:?}"))),
            (Value::Str(s) | Value::Other(s), 'v' | 's') => Some(self.text(s)),
            (Value::Str(s) | Value::Other(s), 'q') => {
                Some(self.pad(&format!("{:?}", self.truncate(s))))
            }
            (Value::Str(s) | Value::Other(s), 'x' | 'X') => {
                let hex: String = s.bytes().map(|b| format!("{b:02x}")).collect();
                Some(self.pad(&if self.verb == 'X' { hex.to_uppercase() } else { hex }))
            }
            _ => None,
        };
        rendered.unwrap_or_else(|| format!("%!{}({}={value})", self.verb, value.type_name()))
    }

    fn sign(&self, negative: bool) -> &'static str {
        if negative {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        }
    }

    fn integer(&self, n: i128) -> Option<String> {
        let abs = n.unsigned_abs();
        let digits = match self.verb {
            'v' | 'd' => abs.to_string(),
            'x' => format!("{abs:x}"),
            'X' => format!("{abs:X}"),
            'o' => format!("{abs:o}"),
            'b' => format!("{abs:b}"),
            'c' => {
                let c = u32::try_from(n).ok().and_then(char::from_u32)?;
                return Some(self.text(&c.to_string()));
            }
            // Out-of-range code points quote as U+FFFD.
            'q' => {
                let c = u32::try_from(n)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                return Some(self.pad(&format!("{c:?}")));
            }
            _ => return None,
        };
        let digits = match self.precision {
            Some(p) if digits.len() < p => "0".repeat(p - digits.len()) + &digits,
            _ => digits,
        };
        let prefix = match (self.sharp, self.verb) {
            (true, 'x') => "0x",
            (true, 'X') => "0X",
            (true, 'o') => "0",
            (true, 'b') => "0b",
            _ => "",
        };
        Some(self.pad_number(self.sign(n < 0), prefix, &digits, self.precision.is_none()))
    }

    fn float(&self, f: f64) -> String {
        let abs = f.abs();
        let body = match self.verb {
            'f' | 'F' => format!("{:.*}", self.precision.unwrap_or(6), abs),
            'e' | 'E' => exponent(abs, self.precision.unwrap_or(6), self.verb == 'E'),
            'G' => general(abs, self.precision).to_uppercase(),
            _ => general(abs, self.precision),
        };
        self.pad_number(self.sign(f.is_sign_negative() && !f.is_nan()), "", &body, true)
    }

    fn truncate<'a>(&self, s: &'a str) -> &'a str {
        match self.precision.and_then(|p| s.char_indices().nth(p)) {
            Some((end, _)) => &s[..end],
            None => s,
        }
    }

    fn text(&self, s: &str) -> String {
        self.pad(self.truncate(s))
    }

    fn pad(&self, s: &str) -> String {
        let len = s.chars().count();
        match self.width {
            Some(width) if width > len => {
                let fill = " ".repeat(width - len);
                if self.minus { format!("{s}{fill}") } else { format!("{fill}{s}") }
            }
            _ => s.into(),
        }
    }

    fn pad_number(&self, sign: &str, prefix: &str, digits: &str, zero_allowed: bool) -> String {
        let len = sign.len() + prefix.len() + digits.chars().count();
        match self.width {
            Some(width) if width > len => {
                let missing = width - len;
                if self.minus {
                    format!("{sign}{prefix}{digits}{}", " ".repeat(missing))
                } else if self.zero && zero_allowed {
                    format!("{sign}{prefix}{}{digits}", "0".repeat(missing))
                } else {
                    format!("{}{sign}{prefix}{digits}", " ".repeat(missing))
                }
            }
            _ => format!("{sign}{prefix}{digits}"),
        }
    }
}

/// `d.ddddde±XX` with a two-digit minimum exponent.
fn exponent(abs: f64, precision: usize, upper: bool) -> String {
    if !abs.is_finite() {
        return abs.to_string();
    }
    let sci = format!("{abs:.precision$e}");
    let (mantissa, exp) = split_exponent(&sci);
    format!("{mantissa}{}{exp:+03}", if upper { 'E' } else { 'e' })
}

/// Shortest decimal that round-trips, switching to `de±XX` for exponents below -4
/// or from 6 up.
fn shortest(f: f64) -> String {
    if !f.is_finite() || f == 0.0 {
        return f.to_string();
    }
    let sci = format!("{f:e}");
    let (mantissa, exp) = split_exponent(&sci);
    if exp < -4 || exp >= SHORTEST_EXPONENT_LIMIT {
        format!("{mantissa}e{exp:+03}")
    } else {
        f.to_string()
    }
}

/// Shortest representation, or `precision` significant digits.
fn general(abs: f64, precision: Option<usize>) -> String {
    let Some(precision) = precision else {
        return shortest(abs);
    };
    if !abs.is_finite() || abs == 0.0 {
        return abs.to_string();
    }
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, abs);
    let (mantissa, exp) = split_exponent(&sci);
    if exp < -4 || exp >= precision as i32 {
        format!("{}e{exp:+03}", trim_fraction(mantissa))
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{abs:.decimals$}")).into()
    }
}

fn split_exponent(sci: &str) -> (&str, i32) {
    match sci.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (sci, 0),
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &str, values: &[Value]) -> String {
        format_message(template, values)
    }

    #[test]
    fn test_padding_rule() {
        assert_eq!(fmt("x", &[]), "x");
        assert_eq!(fmt("x", &[1.into(), 2.into()]), "x 1 2");
        assert_eq!(fmt("val=%d", &[5.into()]), "val=5");
        assert_eq!(fmt("100%%", &[]), "100%%");
        assert_eq!(fmt("%d%%", &[50.into()]), "50%");
    }

    #[test]
    fn test_non_string_template() {
        assert_eq!(format_message(42, &[]), "42");
        assert_eq!(format_message(3.5, &[true.into()]), "3.5 true");
        assert_eq!(format_message('a', &["b".into(), 'c'.into()]), "a b c");
    }

    #[test]
    fn test_integer_verbs() {
        assert_eq!(
            fmt("%5d|%-5d|%05d", &[42.into(), 42.into(), 42.into()]),
            "   42|42   |00042"
        );
        assert_eq!(
            fmt(
                "%+d %x %X %o %b %#x",
                &[7.into(), 255.into(), 255u8.into(), 8.into(), 5.into(), 255.into()]
            ),
            "+7 ff FF 10 101 0xff"
        );
        assert_eq!(fmt("%d %v", &[(-12i64).into(), u64::MAX.into()]), "-12 18446744073709551615");
        assert_eq!(fmt("%.3d", &[7.into()]), "007");
        assert_eq!(fmt("%c", &[65.into()]), "A");
    }

    #[test]
    fn test_float_verbs() {
        assert_eq!(
            fmt("%.2f %e %g", &[3.14159.into(), 1500.0.into(), 0.5.into()]),
            "3.14 1.500000e+03 0.5"
        );
        assert_eq!(fmt("%08.3f", &[(-3.14159).into()]), "-003.142");
        assert_eq!(fmt("%f", &[1.into()]), "%!f(int=1)");
        assert_eq!(fmt("%.3g %.3g", &[1234.5678.into(), 0.000012345.into()]), "1.23e+03 1.23e-05");
        assert_eq!(fmt("%v", &[2.25f32.into()]), "2.25");
    }

    #[test]
    fn test_shortest_float() {
        assert_eq!(fmt("%v", &[1e21.into()]), "1e+21");
        assert_eq!(fmt("%v %v", &[1e20.into(), 1234567.0.into()]), "1e+20 1.234567e+06");
        assert_eq!(fmt("%v %v", &[123456.0.into(), 0.0001.into()]), "123456 0.0001");
        assert_eq!(fmt("%v %g", &[0.00001.into(), (-1.5e-7).into()]), "1e-05 -1.5e-07");
        assert_eq!(fmt("%v", &[2.5e300.into()]), "2.5e+300");
        assert_eq!(fmt("%10v|", &[1e21.into()]), "     1e+21|");
        assert_eq!(format_message(1e21, &[]), "1e+21");
        assert_eq!(format_message("x", &[(-1e22).into()]), "x -1e+22");
        assert_eq!(Value::from(0.0).to_string(), "0");
    }

    #[test]
    fn test_quoted_integers() {
        assert_eq!(fmt("%q %q", &[65.into(), 0x4e16u32.into()]), "'A' '世'");
        assert_eq!(fmt("%q", &['\n'.into()]), "'\\n'");
        assert_eq!(fmt("%q %q", &[(-1).into(), 0x110000.into()]), "'\u{fffd}' '\u{fffd}'");
        assert_eq!(fmt("%5q|", &[97.into()]), "  'a'|");
    }

    #[test]
    fn test_text_verbs() {
        assert_eq!(
            fmt("%s %q %t %c", &["go".into(), "hi".into(), true.into(), 'x'.into()]),
            "go \"hi\" true x"
        );
        assert_eq!(fmt("%.3s|%6.2f", &["abcdef".into(), 2.5.into()]), "abc|  2.50");
        assert_eq!(fmt("[%-4s][%4s]", &["ab".into(), "cd".into()]), "[ab  ][  cd]");
        assert_eq!(fmt("%x", &["hi".into()]), "6869");
        assert_eq!(fmt("%s", &[Value::display(&std::net::Ipv4Addr::LOCALHOST)]), "127.0.0.1");
    }

    #[test]
    fn test_mismatches_render_inline() {
        assert_eq!(fmt("%d", &["abc".into()]), "%!d(string=abc)");
        assert_eq!(fmt("%d %d", &[1.into()]), "1 %!d(MISSING)");
        assert_eq!(fmt("%d", &[1.into(), "a".into()]), "1%!(EXTRA string=a)");
        assert_eq!(fmt("%z", &[5.into()]), "%!z(int=5)");
        assert_eq!(fmt("end %", &[1.into()]), "end %!(NOVERB)%!(EXTRA int=1)");
        assert_eq!(fmt("%t", &[1.into()]), "%!t(int=1)");
    }

    #[test]
    fn test_deterministic() {
        let values: [Value; 3] = [1.into(), "two".into(), 3.0.into()];
        assert_eq!(fmt("%v-%v-%v", &values), fmt("%v-%v-%v", &values));
    }
}
