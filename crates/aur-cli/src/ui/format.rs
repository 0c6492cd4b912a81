//! Format strings for `--format`
//!
//! A format string is printed once per package. `%[flags][width]<rune>`
//! substitutes a field, `%%` is a literal percent sign and `\n`, `\t`, `\\`
//! are the usual escapes. Flags are `-` (left-align within the width) and
//! `0` (zero-pad numbers). List fields are joined with single spaces and an
//! unknown rune prints `?`.
//!
//! | rune | field          | rune | field        |
//! |------|----------------|------|--------------|
//! | `n`  | name           | `a`  | last modified|
//! | `v`  | version        | `l`  | licenses     |
//! | `d`  | description    | `C`  | conflicts    |
//! | `m`  | maintainer     | `D`  | depends      |
//! | `u`  | upstream URL   | `M`  | makedepends  |
//! | `p`  | URL path       | `O`  | optdepends   |
//! | `o`  | votes          | `P`  | provides     |
//! | `c`  | category id    | `R`  | replaces     |
//! | `i`  | package id     | `t`  | out of date  |
//! | `s`  | submitted      |      |              |

use std::iter::Peekable;
use std::str::Chars;

use aur_schema::Package;

enum Value {
    Str(fn(&Package) -> Option<&str>),
    Int(fn(&Package) -> i64),
    List(fn(&Package) -> &[String]),
}

/// Sorted by rune so lookups can binary search.
static RUNES: &[(char, Value)] = &[
    ('C', Value::List(|p| &p.conflicts)),
    ('D', Value::List(|p| &p.depends)),
    ('M', Value::List(|p| &p.makedepends)),
    ('O', Value::List(|p| &p.optdepends)),
    ('P', Value::List(|p| &p.provides)),
    ('R', Value::List(|p| &p.replaces)),
    ('a', Value::Int(|p| p.modified)),
    ('c', Value::Int(|p| p.category_id)),
    ('d', Value::Str(|p| p.description.as_deref())),
    ('i', Value::Int(|p| p.package_id)),
    ('l', Value::List(|p| &p.licenses)),
    ('m', Value::Str(|p| p.maintainer.as_deref())),
    ('n', Value::Str(|p| p.name.as_deref())),
    ('o', Value::Int(|p| p.votes)),
    ('p', Value::Str(|p| p.urlpath.as_deref())),
    ('s', Value::Int(|p| p.submitted)),
    ('t', Value::Int(|p| p.out_of_date)),
    ('u', Value::Str(|p| p.upstream_url.as_deref())),
    ('v', Value::Str(|p| p.version.as_deref())),
];

fn lookup(rune: char) -> Option<&'static Value> {
    RUNES
        .binary_search_by(|(r, _)| r.cmp(&rune))
        .ok()
        .map(|i| &RUNES[i].1)
}

#[derive(Debug, Default)]
struct Conversion {
    left: bool,
    zero: bool,
    width: usize,
}

/// Render `format` for one package.
pub fn format_package(format: &str, pkg: &Package) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '%' => directive(&mut chars, pkg, &mut out),
            '\\' => escape(&mut chars, &mut out),
            _ => out.push(c),
        }
    }

    out
}

fn directive(chars: &mut Peekable<Chars<'_>>, pkg: &Package, out: &mut String) {
    if chars.next_if_eq(&'%').is_some() {
        out.push('%');
        return;
    }

    let mut conv = Conversion::default();
    while let Some(flag) = chars.next_if(|&c| matches!(c, '-' | '0')) {
        match flag {
            '-' => conv.left = true,
            _ => conv.zero = true,
        }
    }
    while let Some(digit) = chars.next_if(char::is_ascii_digit) {
        let d = digit.to_digit(10).map_or(0, |d| d as usize);
        conv.width = conv.width.saturating_mul(10).saturating_add(d);
    }

    let Some(value) = chars.next().and_then(lookup) else {
        out.push('?');
        return;
    };

    let width = conv.width;
    let text = match value {
        Value::Int(get) if conv.zero && !conv.left => format!("{:0width$}", get(pkg)),
        Value::Int(get) => pad(&conv, &get(pkg).to_string()),
        Value::Str(get) => pad(&conv, get(pkg).unwrap_or_default()),
        Value::List(get) => pad(&conv, &get(pkg).join(" ")),
    };
    out.push_str(&text);
}

fn pad(conv: &Conversion, text: &str) -> String {
    let width = conv.width;
    if conv.left {
        format!("{text:<width$}")
    } else {
        format!("{text:>width$}")
    }
}

fn escape(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    match chars.next() {
        Some('n') => out.push('\n'),
        Some('t') => out.push('\t'),
        Some('\\') => out.push('\\'),
        Some(other) => {
            out.push('\\');
            out.push(other);
        }
        None => out.push('\\'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yay() -> Package {
        Package {
            name: Some("yay".to_string()),
            version: Some("12.4.2-1".to_string()),
            description: Some("Yet another yogurt".to_string()),
            maintainer: Some("jguer".to_string()),
            votes: 2143,
            depends: vec!["pacman".to_string(), "git".to_string()],
            ..Package::default()
        }
    }

    #[test]
    fn test_runes_sorted() {
        assert!(RUNES.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(RUNES.iter().all(|(r, _)| lookup(*r).is_some()));
    }

    #[test]
    fn test_basic_fields() {
        assert_eq!(format_package("%n %v\\n", &yay()), "yay 12.4.2-1\n");
        assert_eq!(format_package("%m:%o", &yay()), "jguer:2143");
    }

    #[test]
    fn test_lists_joined_with_spaces() {
        assert_eq!(format_package("[%D]", &yay()), "[pacman git]");
        assert_eq!(format_package("[%C]", &yay()), "[]");
    }

    #[test]
    fn test_width_and_flags() {
        assert_eq!(format_package("%6n|", &yay()), "   yay|");
        assert_eq!(format_package("%-6n|", &yay()), "yay   |");
        assert_eq!(format_package("%06o", &yay()), "002143");
        assert_eq!(format_package("%-06o|", &yay()), "2143  |");
    }

    #[test]
    fn test_width_applies_to_lists() {
        assert_eq!(format_package("%-14D|", &yay()), "pacman git    |");
        assert_eq!(format_package("%12D|", &yay()), "  pacman git|");
    }

    #[test]
    fn test_literals_and_unknown() {
        assert_eq!(format_package("100%%", &yay()), "100%");
        assert_eq!(format_package("%z", &yay()), "?");
        assert_eq!(format_package("end%", &yay()), "end?");
        assert_eq!(format_package("a\\tb\\\\c\\q", &yay()), "a\tb\\c\\q");
    }

    #[test]
    fn test_missing_string_prints_empty() {
        assert_eq!(format_package("<%u>", &yay()), "<>");
    }
}
