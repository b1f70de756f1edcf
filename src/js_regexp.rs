use crate::core::{JSObjectDataPtr, MutationContext, ObjectKind, PropertyKey, Realm, RegExpFlags, Value, define_hidden_property, new_object_with};
use crate::error::JSError;
use crate::unicode::{utf8_to_utf16, utf16_code_points, utf16_to_utf8};
use crate::{raise_range_error, raise_syntax_error, raise_type_error};
use regress::Regex;
use std::ops::Range;

impl RegExpFlags {
    /// Parse a JavaScript flags string such as `"gi"`.
    pub fn parse(flags: &str) -> Result<Self, JSError> {
        let mut parsed = RegExpFlags::default();
        for flag in flags.chars() {
            let slot = match flag {
                'd' => &mut parsed.has_indices,
                'g' => &mut parsed.global,
                'i' => &mut parsed.ignore_case,
                'm' => &mut parsed.multiline,
                's' => &mut parsed.dot_all,
                'u' => &mut parsed.unicode,
                'v' => &mut parsed.unicode_sets,
                'y' => &mut parsed.sticky,
                _ => return Err(raise_syntax_error!(format!("Invalid RegExp flag: {flag}"))),
            };
            if *slot {
                return Err(raise_syntax_error!(format!("Duplicate RegExp flag: {flag}")));
            }
            *slot = true;
        }
        if parsed.unicode && parsed.unicode_sets {
            return Err(raise_syntax_error!("Invalid RegExp flags: cannot use both 'u' and 'v'"));
        }
        Ok(parsed)
    }

    /// Flags in canonical `RegExp.prototype.flags` order.
    pub fn to_flags_string(&self) -> String {
        let mut out = String::new();
        for (on, c) in [
            (self.has_indices, 'd'),
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.unicode_sets, 'v'),
            (self.sticky, 'y'),
        ] {
            if on {
                out.push(c);
            }
        }
        out
    }

    // regress only understands the flags that change matching; `v` is
    // approximated by `u`.
    fn matcher_flags(&self) -> String {
        let mut out = String::new();
        if self.ignore_case {
            out.push('i');
        }
        if self.multiline {
            out.push('m');
        }
        if self.dot_all {
            out.push('s');
        }
        if self.unicode || self.unicode_sets {
            out.push('u');
        }
        out
    }
}

pub fn create_regex_from_utf16(pattern: &[u16], flags: &RegExpFlags) -> Result<Regex, JSError> {
    Regex::from_unicode(utf16_code_points(pattern), flags.matcher_flags().as_str())
        .map_err(|e| raise_syntax_error!(format!("Invalid regular expression: /{}/: {}", utf16_to_utf8(pattern), e)))
}

/// `new RegExp(pattern, flags)`. The pattern is compiled once to reject
/// invalid syntax.
pub fn create_regexp<'gc>(mc: &MutationContext<'gc>, realm: &Realm<'gc>, pattern: &str, flags: &str) -> Result<JSObjectDataPtr<'gc>, JSError> {
    let flags = RegExpFlags::parse(flags)?;
    let source = utf8_to_utf16(pattern);
    create_regex_from_utf16(&source, &flags)?;
    Ok(create_regexp_unchecked(mc, realm.prototype("RegExp"), source, flags))
}

/// Build a RegExp object from parts already known to be valid.
pub(crate) fn create_regexp_unchecked<'gc>(
    mc: &MutationContext<'gc>,
    prototype: Option<JSObjectDataPtr<'gc>>,
    source: Vec<u16>,
    flags: RegExpFlags,
) -> JSObjectDataPtr<'gc> {
    let regexp_obj = new_object_with(mc, ObjectKind::RegExp { source, flags }, prototype);
    define_hidden_property(mc, &regexp_obj, "lastIndex", Value::Number(0.0));
    regexp_obj
}

pub fn is_regexp(obj: &JSObjectDataPtr<'_>) -> bool {
    matches!(obj.borrow().kind, ObjectKind::RegExp { .. })
}

/// `re.source`
pub fn regexp_source(obj: &JSObjectDataPtr<'_>) -> Option<String> {
    match &obj.borrow().kind {
        ObjectKind::RegExp { source, .. } => Some(utf16_to_utf8(source)),
        _ => None,
    }
}

/// `re.flags`
pub fn regexp_flags(obj: &JSObjectDataPtr<'_>) -> Option<RegExpFlags> {
    match &obj.borrow().kind {
        ObjectKind::RegExp { flags, .. } => Some(flags.clone()),
        _ => None,
    }
}

/// `re.toString()`, e.g. `/ab+c/gi`.
pub fn regexp_to_string(obj: &JSObjectDataPtr<'_>) -> Option<String> {
    let source = regexp_source(obj)?;
    let flags = regexp_flags(obj)?;
    let pat = if source.is_empty() { "(?:)".to_string() } else { source };
    Some(format!("/{}/{}", pat, flags.to_flags_string()))
}

pub fn get_last_index(obj: &JSObjectDataPtr<'_>) -> f64 {
    match obj.borrow().properties.get(&PropertyKey::from("lastIndex")) {
        Some(Value::Number(n)) => *n,
        _ => 0.0,
    }
}

pub fn set_last_index<'gc>(mc: &MutationContext<'gc>, obj: &JSObjectDataPtr<'gc>, index: f64) {
    obj.borrow_mut(mc).insert("lastIndex", Value::Number(index));
}

/// Run `re.exec(input)` and return the match range in UTF-16 code units.
///
/// Global and sticky regexps start at `lastIndex` and update it: to the end
/// of the match on success, back to 0 on failure. Sticky regexps only match
/// exactly at `lastIndex`.
pub fn regexp_exec<'gc>(mc: &MutationContext<'gc>, obj: &JSObjectDataPtr<'gc>, input: &[u16]) -> Result<Option<Range<usize>>, JSError> {
    let (source, flags) = match &obj.borrow().kind {
        ObjectKind::RegExp { source, flags } => (source.clone(), flags.clone()),
        _ => return Err(raise_type_error!("RegExp.prototype.exec called on incompatible receiver")),
    };
    let re = create_regex_from_utf16(&source, &flags)?;
    let stateful = flags.global || flags.sticky;

    let last_index = get_last_index(obj);
    if last_index < 0.0 || last_index.fract() != 0.0 {
        return Err(raise_range_error!(format!("Invalid lastIndex: {last_index}")));
    }
    let start = if stateful { last_index as usize } else { 0 };
    if start > input.len() {
        set_last_index(mc, obj, 0.0);
        return Ok(None);
    }

    let found = re.find_from_utf16(input, start).next().map(|m| m.range);
    let found = found.filter(|r| !flags.sticky || r.start == start);
    log::trace!("regexp_exec: /{}/ from {} -> {:?}", utf16_to_utf8(&source), start, found);

    if stateful {
        let next = found.as_ref().map(|r| r.end as f64).unwrap_or(0.0);
        set_last_index(mc, obj, next);
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip_in_canonical_order() {
        let flags = RegExpFlags::parse("yigm").unwrap();
        assert_eq!(flags.to_flags_string(), "gimy");
        assert!(flags.sticky && flags.global && flags.ignore_case && flags.multiline);
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(matches!(RegExpFlags::parse("gg"), Err(JSError::SyntaxError { .. })));
        assert!(matches!(RegExpFlags::parse("x"), Err(JSError::SyntaxError { .. })));
        assert!(matches!(RegExpFlags::parse("uv"), Err(JSError::SyntaxError { .. })));
    }
}
