//! Class-name helpers: conditional joining plus Tailwind conflict resolution.
//!
//! `cn!("p-2 text-sm", ("font-bold", active), "px-4")` joins the inputs and
//! drops any earlier utility that a later one overrides.

use std::collections::HashSet;
use regex::Regex;

lazy_static::lazy_static! {
    static ref SPACING: Regex = Regex::new(
        r"^(p|px|py|pt|pr|pb|pl|ps|pe|m|mx|my|mt|mr|mb|ml|ms|me)-(.+)$"
    ).unwrap();
    static ref INSET: Regex = Regex::new(
        r"^(inset-x|inset-y|inset|top|right|bottom|left|start|end)-(.+)$"
    ).unwrap();
    static ref SIZING: Regex = Regex::new(r"^(min-w|min-h|max-w|max-h|w|h|size)-(.+)$").unwrap();
    static ref SIDED: Regex = Regex::new(
        r"^(border|rounded)(?:-(x|y|t|r|b|l|s|e|tl|tr|br|bl|ss|se|es|ee))?(?:-(.+))?$"
    ).unwrap();
    static ref ARBITRARY_LENGTH: Regex = Regex::new(
        r"^\[(?:length:)?(?:-?\d*\.?\d+(?:px|r?em|%|v[hw]|ch|ex|pt|vmin|vmax|[sdl]vh)?|calc\(.*\))\]$"
    ).unwrap();
}

const DISPLAY: &[&str] = &[
    "block", "inline-block", "inline", "flex", "inline-flex", "table", "inline-table",
    "grid", "inline-grid", "contents", "list-item", "hidden", "flow-root",
];
const POSITION: &[&str] = &["static", "fixed", "absolute", "relative", "sticky"];
const FONT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];
const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];
const FONT_WEIGHTS: &[&str] = &[
    "thin", "extralight", "light", "normal", "medium", "semibold", "bold", "extrabold", "black",
];
const BORDER_STYLES: &[&str] = &["solid", "dashed", "dotted", "double", "hidden", "none"];
const SHADOW_SIZES: &[&str] = &["sm", "md", "lg", "xl", "2xl", "inner", "none"];

/// One input to [`clsx`].
#[derive(Clone, Debug, PartialEq)]
pub enum ClassValue<'a> {
    Str(&'a str),
    Owned(String),
    /// Included only when the flag is set.
    Cond(&'a str, bool),
    List(Vec<ClassValue<'a>>),
    Empty,
}

impl<'a> From<&'a str> for ClassValue<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(s)
    }
}

impl<'a> From<&'a String> for ClassValue<'a> {
    fn from(s: &'a String) -> Self {
        Self::Str(s.as_str())
    }
}

impl From<String> for ClassValue<'_> {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

impl<'a> From<Option<&'a str>> for ClassValue<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Self::Empty, Self::Str)
    }
}

impl<'a> From<(&'a str, bool)> for ClassValue<'a> {
    fn from((s, on): (&'a str, bool)) -> Self {
        Self::Cond(s, on)
    }
}

impl<'a> From<Vec<ClassValue<'a>>> for ClassValue<'a> {
    fn from(list: Vec<ClassValue<'a>>) -> Self {
        Self::List(list)
    }
}

impl ClassValue<'_> {
    fn collect_into<'s>(&'s self, out: &mut Vec<&'s str>) {
        match self {
            Self::Str(s) | Self::Cond(s, true) => out.extend(s.split_whitespace()),
            Self::Owned(s) => out.extend(s.split_whitespace()),
            Self::List(list) => list.iter().for_each(|v| v.collect_into(out)),
            Self::Cond(_, false) | Self::Empty => {}
        }
    }
}

/// Joins class values, skipping disabled and empty entries.
pub fn clsx<'a, I>(inputs: I) -> String where I: IntoIterator, I::Item: Into<ClassValue<'a>> {
    let values: Vec<ClassValue<'a>> = inputs.into_iter().map(Into::into).collect();
    let mut classes = Vec::new();
    values.iter().for_each(|v| v.collect_into(&mut classes));
    classes.join(" ")
}

/// Removes utility classes overridden by a later class in the same group.
///
/// Classes are compared under the same variant set (`dark:hover:` equals
/// `hover:dark:`) and importance. Unrecognised classes pass through.
pub fn tw_merge(classes: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();

    for class in classes.split_whitespace().rev() {
        let parsed = ParsedClass::parse(class);
        let Some(group) = class_group(parsed.base) else {
            kept.push(class);
            continue;
        };

        let scope = parsed.scope();
        if seen.contains(&format!("{}{}", scope, group)) {
            continue;
        }
        for conflict in conflicting_groups(&group) {
            seen.insert(format!("{}{}", scope, conflict));
        }
        seen.insert(format!("{}{}", scope, group));
        kept.push(class);
    }

    kept.reverse();
    kept.join(" ")
}

#[macro_export]
macro_rules! cn {
    ($($value:expr),* $(,)?) => {
        $crate::utils::cn::tw_merge(
            &$crate::utils::cn::clsx([$($crate::utils::cn::ClassValue::from($value)),*])
        )
    };
}

struct ParsedClass<'a> {
    variants: Vec<&'a str>,
    important: bool,
    base: &'a str,
}

impl<'a> ParsedClass<'a> {
    fn parse(class: &'a str) -> Self {
        let mut parts = split_top_level(class, ':');
        let last = parts.pop().unwrap_or(class);

        let (important, last) = match last.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, last),
        };
        let last = last.strip_prefix('-').unwrap_or(last);
        let base = match rfind_top_level(last, '/') {
            Some(idx) if idx > 0 => &last[..idx],
            _ => last,
        };

        if !parts.iter().any(|v| v.starts_with('[')) {
            parts.sort_unstable();
        }
        Self { variants: parts, important, base }
    }

    fn scope(&self) -> String {
        let mut scope = self.variants.join(":");
        scope.push(':');
        if self.important {
            scope.push('!');
        }
        scope
    }
}

fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            c if c == sep && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn rfind_top_level(s: &str, needle: char) -> Option<usize> {
    let mut depth = 0i32;
    let mut found = None;
    for (i, c) in s.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth -= 1,
            c if c == needle && depth == 0 => found = Some(i),
            _ => {}
        }
    }
    found
}

fn is_length(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit()) || ARBITRARY_LENGTH.is_match(value)
}

fn class_group(base: &str) -> Option<String> {
    if DISPLAY.contains(&base) {
        return Some("display".into());
    }
    if POSITION.contains(&base) {
        return Some("position".into());
    }
    let exact = match base {
        "visible" | "invisible" | "collapse" => Some("visibility"),
        "flex-row" | "flex-row-reverse" | "flex-col" | "flex-col-reverse" => Some("flex-direction"),
        "flex-wrap" | "flex-wrap-reverse" | "flex-nowrap" => Some("flex-wrap"),
        "flex-1" | "flex-auto" | "flex-initial" | "flex-none" => Some("flex"),
        "italic" | "not-italic" => Some("font-style"),
        "underline" | "overline" | "line-through" | "no-underline" => Some("text-decoration"),
        "uppercase" | "lowercase" | "capitalize" | "normal-case" => Some("text-transform"),
        "shadow" => Some("shadow"),
        "transition" => Some("transition"),
        _ => None,
    };
    if let Some(group) = exact {
        return Some(group.into());
    }

    if let Some(caps) = SPACING.captures(base) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = INSET.captures(base) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = SIZING.captures(base) {
        return Some(caps[1].to_string());
    }
    if let Some(caps) = SIDED.captures(base) {
        let kind = &caps[1];
        let side = caps.get(2).map(|m| m.as_str());
        let value = caps.get(3).map(|m| m.as_str());
        return Some(sided_group(kind, side, value));
    }

    let (prefix, value) = base.split_once('-')?;
    let group = match prefix {
        "text" if FONT_SIZES.contains(&value) || (value.starts_with('[') && is_length(value)) =>
            "font-size",
        "text" if TEXT_ALIGN.contains(&value) => "text-align",
        "text" if matches!(value, "wrap" | "nowrap" | "balance" | "pretty") => "text-wrap",
        "text" if matches!(value, "ellipsis" | "clip") => "text-overflow",
        "text" => "text-color",
        "font" if FONT_WEIGHTS.contains(&value) => "font-weight",
        "font" => "font-family",
        "bg" => bg_group(value),
        "shadow" if SHADOW_SIZES.contains(&value) => "shadow",
        "shadow" => "shadow-color",
        "opacity" => "opacity",
        "cursor" => "cursor",
        "transition" => "transition",
        "duration" => "duration",
        "ease" => "ease",
        "delay" => "delay",
        "z" => "z",
        "leading" => "leading",
        "tracking" => "tracking",
        "gap" if value.starts_with("x-") => "gap-x",
        "gap" if value.starts_with("y-") => "gap-y",
        "gap" => "gap",
        "items" => "align-items",
        "self" => "align-self",
        "content" => "align-content",
        "justify" if value.starts_with("items-") => "justify-items",
        "justify" if value.starts_with("self-") => "justify-self",
        "justify" => "justify-content",
        "overflow" if value.starts_with("x-") => "overflow-x",
        "overflow" if value.starts_with("y-") => "overflow-y",
        "overflow" => "overflow",
        _ => return None,
    };
    Some(group.into())
}

fn bg_group(value: &str) -> &'static str {
    match value {
        "fixed" | "local" | "scroll" => "bg-attachment",
        "auto" | "cover" | "contain" => "bg-size",
        "none" => "bg-image",
        "repeat" | "no-repeat" | "repeat-x" | "repeat-y" | "repeat-round" | "repeat-space" =>
            "bg-repeat",
        "bottom" | "center" | "left" | "left-bottom" | "left-top" | "right" | "right-bottom"
        | "right-top" | "top" => "bg-position",
        v if v.starts_with("gradient-") => "bg-image",
        _ => "bg-color",
    }
}

fn sided_group(kind: &str, side: Option<&str>, value: Option<&str>) -> String {
    let property = match kind {
        "rounded" => "rounded".to_string(),
        _ => {
            match value {
                None => "border-w".to_string(),
                Some(v) if is_length(v) => "border-w".to_string(),
                Some(v) if side.is_none() && BORDER_STYLES.contains(&v) => {
                    return "border-style".to_string();
                }
                Some(_) => "border-color".to_string(),
            }
        }
    };
    match side {
        Some(side) => format!("{}-{}", property, side),
        None => property,
    }
}

fn conflicting_groups(group: &str) -> Vec<String> {
    let sides = |base: &str, list: &[&str]| -> Vec<String> {
        list.iter().map(|side| format!("{}-{}", base, side)).collect()
    };
    let names = |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };

    match group {
        "p" => names(&["px", "py", "pt", "pr", "pb", "pl", "ps", "pe"]),
        "px" => names(&["pr", "pl"]),
        "py" => names(&["pt", "pb"]),
        "m" => names(&["mx", "my", "mt", "mr", "mb", "ml", "ms", "me"]),
        "mx" => names(&["mr", "ml"]),
        "my" => names(&["mt", "mb"]),
        "inset" => names(&["inset-x", "inset-y", "top", "right", "bottom", "left", "start", "end"]),
        "inset-x" => names(&["right", "left"]),
        "inset-y" => names(&["top", "bottom"]),
        "size" => names(&["w", "h"]),
        "gap" => names(&["gap-x", "gap-y"]),
        "overflow" => names(&["overflow-x", "overflow-y"]),
        "font-size" => names(&["leading"]),
        "border-w" | "border-color" => sides(group, &["x", "y", "t", "r", "b", "l", "s", "e"]),
        "border-w-x" => names(&["border-w-r", "border-w-l"]),
        "border-w-y" => names(&["border-w-t", "border-w-b"]),
        "border-color-x" => names(&["border-color-r", "border-color-l"]),
        "border-color-y" => names(&["border-color-t", "border-color-b"]),
        "rounded" =>
            sides("rounded", &["s", "e", "t", "r", "b", "l", "ss", "se", "ee", "es", "tl", "tr", "br", "bl"]),
        "rounded-s" => names(&["rounded-ss", "rounded-es"]),
        "rounded-e" => names(&["rounded-se", "rounded-ee"]),
        "rounded-t" => names(&["rounded-tl", "rounded-tr"]),
        "rounded-r" => names(&["rounded-tr", "rounded-br"]),
        "rounded-b" => names(&["rounded-br", "rounded-bl"]),
        "rounded-l" => names(&["rounded-tl", "rounded-bl"]),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clsx_skips_falsy_inputs() {
        let joined = clsx([
            ClassValue::from("btn  primary"),
            ClassValue::from(("active", false)),
            ClassValue::from(("focused", true)),
            ClassValue::from(None::<&str>),
            ClassValue::from(vec![ClassValue::from("nested"), ClassValue::Empty]),
        ]);
        assert_eq!(joined, "btn primary focused nested");
    }

    #[test]
    fn test_later_padding_wins() {
        assert_eq!(tw_merge("px-2 py-1 p-3"), "p-3");
        assert_eq!(tw_merge("p-3 px-2"), "p-3 px-2");
        assert_eq!(tw_merge("pt-1 py-2 pt-4"), "py-2 pt-4");
    }

    #[test]
    fn test_text_colour_and_size_do_not_conflict() {
        assert_eq!(tw_merge("text-red-500 text-lg"), "text-red-500 text-lg");
        assert_eq!(tw_merge("text-red-500 text-blue-600"), "text-blue-600");
        assert_eq!(tw_merge("text-sm text-[14px]"), "text-[14px]");
        assert_eq!(tw_merge("text-white text-[#fafafa]"), "text-[#fafafa]");
    }

    #[test]
    fn test_variants_scope_conflicts() {
        assert_eq!(
            tw_merge("hover:bg-red-500 bg-blue-500 hover:bg-green-500"),
            "bg-blue-500 hover:bg-green-500"
        );
        assert_eq!(tw_merge("dark:hover:bg-black hover:dark:bg-white"), "hover:dark:bg-white");
        assert_eq!(tw_merge("!p-2 p-4"), "!p-2 p-4");
    }

    #[test]
    fn test_border_width_style_and_colour() {
        assert_eq!(
            tw_merge("border border-solid border-black/[.08] border-2"),
            "border-solid border-black/[.08] border-2"
        );
        assert_eq!(tw_merge("border-black/[.08] border-transparent"), "border-transparent");
        assert_eq!(tw_merge("border-t-2 border-4"), "border-4");
        assert_eq!(tw_merge("border-[3px] border-[#fff]"), "border-[3px] border-[#fff]");
    }

    #[test]
    fn test_display_rounding_and_unknown_classes() {
        assert_eq!(tw_merge("block flex"), "flex");
        assert_eq!(tw_merge("rounded-t-lg rounded-full"), "rounded-full");
        assert_eq!(tw_merge("rounded-full rounded-t-lg"), "rounded-full rounded-t-lg");
        assert_eq!(tw_merge("theme-toggle flex theme-toggle"), "theme-toggle flex theme-toggle");
    }

    #[test]
    fn test_cn_macro() {
        let active = true;
        let class = cn!("p-2 text-sm", ("font-bold", active), None::<&str>, "px-4 text-lg");
        assert_eq!(class, "p-2 font-bold px-4 text-lg");
    }
}
