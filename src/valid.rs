//! Content-model matching and attribute value validation.
//!
//! The matcher is greedy and does not backtrack: a choice commits to the
//! first alternative that consumes input, and a repeated group keeps taking
//! passes until one stops consuming.  A child list some grammar permutation
//! would accept can therefore still be reported invalid; close-time repair
//! works against this matcher, not against the full grammar.

use std::borrow::Cow;

use crate::dtd::{
    AttributeDef, AttributeType, ContentType, DefaultDecl, Doctype, Dtd, ElementId,
    coder::ELEMENT_FLAG,
    content::{Combinator, ContentModel, Group, Item},
};

/// Result of matching one group against a child-id slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupMatch {
    /// The group matched, consuming this many leading children.
    Consumed(usize),
    /// The children contradict the group.
    Invalid,
    /// The children seen so far are a proper prefix; more could satisfy it.
    MoreNeeded,
}

/// Verdict over a complete child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    /// A valid prefix that still needs more children.
    NotYetValid,
    Invalid,
}

/// Match a full child list against a content model.
pub fn is_child_valid(model: &ContentModel, children: &[ElementId]) -> Validity {
    match model {
        ContentModel::Mixed(allowed) => {
            if children.iter().all(|id| allowed.contains(id)) {
                Validity::Valid
            } else {
                Validity::Invalid
            }
        }
        ContentModel::Children(group) => match match_group(group, children) {
            GroupMatch::Consumed(n) if n == children.len() => Validity::Valid,
            GroupMatch::Consumed(_) => Validity::Invalid,
            GroupMatch::MoreNeeded => Validity::NotYetValid,
            GroupMatch::Invalid => Validity::Invalid,
        },
    }
}

/// Match `group` against the front of `input`.
pub fn match_group(group: &Group, input: &[ElementId]) -> GroupMatch {
    let mut consumed = 0usize;
    // Length accepted at the end of the last complete pass.
    let mut matched = 0usize;
    let single_pass = !group.quantifier.allows_repeat();
    let allows_zero = group.quantifier.allows_zero();

    loop {
        let pass_start = consumed;
        match group.combinator {
            Combinator::Choice => {
                let mut taken = false;
                // A zero-width success still satisfies the choice.
                let mut zero_hit = false;
                let mut more_needed = false;
                for item in &group.items {
                    match match_item(item, &input[consumed..]) {
                        GroupMatch::Consumed(0) => zero_hit = true,
                        GroupMatch::Consumed(n) => {
                            consumed += n;
                            matched = consumed;
                            taken = true;
                            break;
                        }
                        GroupMatch::MoreNeeded => more_needed = true,
                        GroupMatch::Invalid => {}
                    }
                }
                if !taken {
                    if matched > 0 || zero_hit || allows_zero {
                        return GroupMatch::Consumed(matched);
                    }
                    if more_needed {
                        return GroupMatch::MoreNeeded;
                    }
                    return GroupMatch::Invalid;
                }
                if single_pass {
                    return GroupMatch::Consumed(matched);
                }
            }
            Combinator::Sequence => {
                for item in &group.items {
                    match match_item(item, &input[consumed..]) {
                        GroupMatch::Consumed(n) => consumed += n,
                        fail => {
                            if matched > 0 || allows_zero {
                                return GroupMatch::Consumed(matched);
                            }
                            return fail;
                        }
                    }
                }
                matched = consumed;
                if single_pass {
                    return GroupMatch::Consumed(matched);
                }
            }
        }
        // A repeated pass that consumed nothing would never terminate.
        if consumed == pass_start {
            return GroupMatch::Consumed(matched);
        }
    }
}

fn match_item(item: &Item, input: &[ElementId]) -> GroupMatch {
    match item {
        Item::Element(elem) => match input.first() {
            None => GroupMatch::MoreNeeded,
            Some(first) if first == elem => GroupMatch::Consumed(1),
            Some(_) => GroupMatch::Invalid,
        },
        Item::Group(group) => match_group(group, input),
    }
}

/// Quick membership test: may `child` appear anywhere inside `parent`?
///
/// A flat scan of the packed model, deliberately position-blind; ordering
/// violations are left for close-time re-validation.
pub fn can_be_child(dtd: &Dtd, parent: ElementId, child: ElementId, dt: Doctype) -> bool {
    match dtd.element(parent).content_type(dt) {
        ContentType::Any => true,
        ContentType::Empty | ContentType::Undefined => false,
        ContentType::Mixed | ContentType::Children => {
            let reference = ELEMENT_FLAG | child as u8;
            dtd.model_bytes(parent, dt)
                .is_some_and(|bytes| bytes.contains(&reference))
        }
    }
}

/// Outcome of validating one attribute value against its definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrCheck {
    Valid,
    /// Acceptable after rewriting to the carried value (case folding or
    /// character substitution).
    Adjusted(String),
    Invalid,
}

/// Validate `value` against `def`, assuming references were already fixed.
pub fn validate_attribute(dtd: &Dtd, def: &AttributeDef, value: &str) -> AttrCheck {
    let mut adjusted: Option<String> = None;

    if let AttributeType::Enumerated(options) = def.atype {
        if !options.contains(&value) {
            let lower = value.to_ascii_lowercase();
            if !options.contains(&lower.as_str()) {
                return AttrCheck::Invalid;
            }
            adjusted = Some(lower);
        }
    } else {
        if value_reference_errors(dtd, value) > 0 {
            return AttrCheck::Invalid;
        }
        match def.atype {
            AttributeType::Cdata => {
                if let Some(clean) = replace_forbidden_chars(value) {
                    adjusted = Some(clean);
                }
            }
            AttributeType::Id | AttributeType::IdRef => {
                if !is_valid_name(value) {
                    return AttrCheck::Invalid;
                }
            }
            AttributeType::IdRefs => {
                if value.split_ascii_whitespace().next().is_none() {
                    return AttrCheck::Invalid;
                }
                if !value.split_ascii_whitespace().all(is_valid_name) {
                    return AttrCheck::Invalid;
                }
            }
            AttributeType::NmToken => match repair_nmtoken(value) {
                Some(token) if token != value => adjusted = Some(token),
                Some(_) => {}
                None => return AttrCheck::Invalid,
            },
            AttributeType::NmTokens => {
                let mut tokens = Vec::new();
                for word in value.split_ascii_whitespace() {
                    match repair_nmtoken(word) {
                        Some(token) => tokens.push(token),
                        None => return AttrCheck::Invalid,
                    }
                }
                if tokens.is_empty() {
                    return AttrCheck::Invalid;
                }
                let joined = tokens.join(" ");
                if joined != value {
                    adjusted = Some(joined);
                }
            }
            // Handled before the reference scan.
            AttributeType::Enumerated(_) => {}
        }
    }

    if def.default_decl == DefaultDecl::Fixed {
        let effective = adjusted.as_deref().unwrap_or(value);
        if Some(effective) != def.default_value {
            return AttrCheck::Invalid;
        }
    }
    match adjusted {
        Some(value) => AttrCheck::Adjusted(value),
        None => AttrCheck::Valid,
    }
}

/// Count ill-formed references and raw `<` in an attribute value.
pub fn value_reference_errors(dtd: &Dtd, value: &str) -> usize {
    let mut errors = 0;
    let mut rest = value;
    while let Some(pos) = rest.find(['<', '&']) {
        let tail = &rest[pos..];
        if tail.starts_with('<') {
            errors += 1;
            rest = &tail[1..];
        } else {
            match reference_length(dtd, tail) {
                Some(len) => rest = &tail[len..],
                None => {
                    errors += 1;
                    rest = &tail[1..];
                }
            }
        }
    }
    errors
}

/// Escape raw `<` and ill-formed `&` so the value is reference-safe.
pub fn escape_bad_references<'a>(dtd: &Dtd, value: &'a str) -> Cow<'a, str> {
    if value_reference_errors(dtd, value) == 0 {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    let mut rest = value;
    while let Some(pos) = rest.find(['<', '&']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with('<') {
            out.push_str("&lt;");
            rest = &tail[1..];
        } else {
            match reference_length(dtd, tail) {
                Some(len) => {
                    out.push_str(&tail[..len]);
                    rest = &tail[len..];
                }
                None => {
                    out.push_str("&amp;");
                    rest = &tail[1..];
                }
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Length of a well-formed reference starting at the leading `&`.
fn reference_length(dtd: &Dtd, text: &str) -> Option<usize> {
    let body = text.strip_prefix('&')?;
    let end = body.find(';')?;
    let name = &body[..end];
    let well_formed = if let Some(digits) =
        name.strip_prefix("#x").or_else(|| name.strip_prefix("#X"))
    {
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit())
    } else if let Some(digits) = name.strip_prefix('#') {
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
    } else {
        dtd.entity_exists(name)
    };
    well_formed.then_some(end + 2)
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':' || (!c.is_ascii() && c.is_alphabetic())
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || matches!(c, '.' | '-' | '\u{B7}')
}

fn is_valid_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Substitute `_` for characters a name token may not contain.
/// `None` when nothing substitutable remains.
fn repair_nmtoken(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    Some(
        value
            .chars()
            .map(|c| if is_name_char(c) { c } else { '_' })
            .collect(),
    )
}

/// Substitute `_` for control characters in CDATA. `None` when unchanged.
fn replace_forbidden_chars(value: &str) -> Option<String> {
    if !value.chars().any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r')) {
        return None;
    }
    Some(
        value
            .chars()
            .map(|c| {
                if c.is_control() && !matches!(c, '\t' | '\n' | '\r') {
                    '_'
                } else {
                    c
                }
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtd::{
        coder,
        content::decode_model,
        data::{
            ATT_CELL_ALIGN, ATT_DIR, ATT_HEADERS, ATT_ID, ATT_LANG, ATT_TITLE, ATT_XML_SPACE,
            ATT_XMLNS, ELM_BODY, ELM_BR, ELM_CAPTION, ELM_HEAD, ELM_IMG, ELM_P, ELM_TABLE,
            ELM_TBODY, ELM_TD, ELM_TH, ELM_TITLE, ELM_TR, ELM_UL, XHTML_NS,
        },
        dtd,
    };

    fn children_model(text: &str) -> ContentModel {
        let packed = coder::encode_children(text).unwrap();
        decode_model(&packed, ContentType::Children).unwrap()
    }

    #[test]
    fn accepts_exact_sequences() {
        let model = children_model("(head,body)");
        assert_eq!(is_child_valid(&model, &[ELM_HEAD, ELM_BODY]), Validity::Valid);
        assert_eq!(is_child_valid(&model, &[ELM_HEAD]), Validity::NotYetValid);
        assert_eq!(is_child_valid(&model, &[ELM_BODY]), Validity::Invalid);
        assert_eq!(
            is_child_valid(&model, &[ELM_HEAD, ELM_BODY, ELM_BODY]),
            Validity::Invalid
        );
    }

    #[test]
    fn repeats_quantified_choices() {
        let model = children_model("(th|td)+");
        assert_eq!(is_child_valid(&model, &[ELM_TD, ELM_TH, ELM_TD]), Validity::Valid);
        assert_eq!(is_child_valid(&model, &[]), Validity::NotYetValid);
        assert_eq!(is_child_valid(&model, &[ELM_TD, ELM_P]), Validity::Invalid);
    }

    #[test]
    fn table_model_accepts_real_shapes() {
        let model = children_model("(caption?,(col*|colgroup*),thead?,tfoot?,(tbody+|tr+))");
        assert_eq!(is_child_valid(&model, &[ELM_TR]), Validity::Valid);
        assert_eq!(is_child_valid(&model, &[ELM_TBODY, ELM_TBODY]), Validity::Valid);
        assert_eq!(is_child_valid(&model, &[ELM_CAPTION, ELM_TR, ELM_TR]), Validity::Valid);
        assert_eq!(is_child_valid(&model, &[]), Validity::NotYetValid);
        assert_eq!(is_child_valid(&model, &[ELM_CAPTION]), Validity::NotYetValid);
        assert_eq!(is_child_valid(&model, &[ELM_TR, ELM_TBODY]), Validity::Invalid);
        assert_eq!(is_child_valid(&model, &[ELM_CAPTION, ELM_CAPTION]), Validity::Invalid);
    }

    #[test]
    fn choice_commits_to_the_first_consuming_alternative() {
        // A grammar-complete matcher would accept [head, body] here through
        // the second alternative; the greedy matcher commits to the bare
        // `head` branch and reports the tail invalid.
        let model = children_model("(head|(head,body))");
        assert_eq!(is_child_valid(&model, &[ELM_HEAD]), Validity::Valid);
        assert_eq!(is_child_valid(&model, &[ELM_HEAD, ELM_BODY]), Validity::Invalid);
    }

    #[test]
    fn repetition_without_progress_terminates() {
        let model = children_model("((head)*|(body)*)+");
        assert_eq!(is_child_valid(&model, &[ELM_HEAD, ELM_HEAD]), Validity::Valid);
        // Zero-width alternatives satisfy the group without looping forever.
        assert_eq!(is_child_valid(&model, &[]), Validity::Valid);
    }

    #[test]
    fn mixed_models_are_position_free() {
        let packed = coder::encode_mixed("th|td").unwrap();
        let model = decode_model(&packed, ContentType::Mixed).unwrap();
        assert_eq!(is_child_valid(&model, &[ELM_TD, ELM_TH, ELM_TD]), Validity::Valid);
        assert_eq!(is_child_valid(&model, &[ELM_TD, ELM_P]), Validity::Invalid);
        assert_eq!(is_child_valid(&model, &[]), Validity::Valid);
    }

    #[test]
    fn quick_membership_check() {
        let dtd = dtd().unwrap();
        assert!(can_be_child(dtd, ELM_TR, ELM_TD, Doctype::Transitional));
        assert!(can_be_child(dtd, ELM_TABLE, ELM_TR, Doctype::Transitional));
        assert!(!can_be_child(dtd, ELM_TABLE, ELM_TD, Doctype::Transitional));
        assert!(!can_be_child(dtd, ELM_UL, ELM_IMG, Doctype::Transitional));
        // EMPTY and PCDATA-only elements admit no children at all.
        assert!(!can_be_child(dtd, ELM_BR, ELM_P, Doctype::Transitional));
        assert!(!can_be_child(dtd, ELM_TITLE, ELM_P, Doctype::Strict));
    }

    #[test]
    fn enumerated_values_fold_case() {
        let dtd = dtd().unwrap();
        assert_eq!(validate_attribute(dtd, &ATT_CELL_ALIGN, "left"), AttrCheck::Valid);
        assert_eq!(
            validate_attribute(dtd, &ATT_CELL_ALIGN, "LEFT"),
            AttrCheck::Adjusted("left".into())
        );
        assert_eq!(validate_attribute(dtd, &ATT_CELL_ALIGN, "middle"), AttrCheck::Invalid);
        assert_eq!(validate_attribute(dtd, &ATT_DIR, "rtl"), AttrCheck::Valid);
    }

    #[test]
    fn fixed_values_must_match() {
        let dtd = dtd().unwrap();
        assert_eq!(validate_attribute(dtd, &ATT_XMLNS, XHTML_NS), AttrCheck::Valid);
        assert_eq!(
            validate_attribute(dtd, &ATT_XMLNS, "http://example.com/ns"),
            AttrCheck::Invalid
        );
        assert_eq!(validate_attribute(dtd, &ATT_XML_SPACE, "preserve"), AttrCheck::Valid);
        assert_eq!(
            validate_attribute(dtd, &ATT_XML_SPACE, "PRESERVE"),
            AttrCheck::Adjusted("preserve".into())
        );
    }

    #[test]
    fn id_values_are_never_rewritten() {
        let dtd = dtd().unwrap();
        assert_eq!(validate_attribute(dtd, &ATT_ID, "section-2.1"), AttrCheck::Valid);
        assert_eq!(validate_attribute(dtd, &ATT_ID, "2bad"), AttrCheck::Invalid);
        assert_eq!(validate_attribute(dtd, &ATT_ID, "has space"), AttrCheck::Invalid);
        assert_eq!(validate_attribute(dtd, &ATT_ID, ""), AttrCheck::Invalid);
    }

    #[test]
    fn name_tokens_take_filler_substitution() {
        let dtd = dtd().unwrap();
        assert_eq!(validate_attribute(dtd, &ATT_LANG, "en-us"), AttrCheck::Valid);
        assert_eq!(
            validate_attribute(dtd, &ATT_LANG, "en us"),
            AttrCheck::Adjusted("en_us".into())
        );
        assert_eq!(validate_attribute(dtd, &ATT_LANG, ""), AttrCheck::Invalid);
        assert_eq!(
            validate_attribute(dtd, &ATT_HEADERS, "cell1 cell2"),
            AttrCheck::Valid
        );
        assert_eq!(validate_attribute(dtd, &ATT_HEADERS, "cell1 2bad"), AttrCheck::Invalid);
    }

    #[test]
    fn cdata_rejects_unfixed_references() {
        let dtd = dtd().unwrap();
        assert_eq!(validate_attribute(dtd, &ATT_TITLE, "a &amp; b"), AttrCheck::Valid);
        assert_eq!(validate_attribute(dtd, &ATT_TITLE, "a & b"), AttrCheck::Invalid);
        assert_eq!(validate_attribute(dtd, &ATT_TITLE, "a < b"), AttrCheck::Invalid);
        assert_eq!(
            validate_attribute(dtd, &ATT_TITLE, "tab\tok bell\u{7}no"),
            AttrCheck::Adjusted("tab\tok bell_no".into())
        );
    }

    #[test]
    fn escaping_repairs_raw_references() {
        let dtd = dtd().unwrap();
        assert_eq!(escape_bad_references(dtd, "a&amp;b"), "a&amp;b");
        assert_eq!(escape_bad_references(dtd, "a&b"), "a&amp;b");
        assert_eq!(escape_bad_references(dtd, "a<b"), "a&lt;b");
        assert_eq!(escape_bad_references(dtd, "&#160; &#xA0; &nbsp;"), "&#160; &#xA0; &nbsp;");
        assert_eq!(escape_bad_references(dtd, "&bogus; &#x; &"), "&amp;bogus; &amp;#x; &amp;");
        assert!(matches!(escape_bad_references(dtd, "clean"), Cow::Borrowed(_)));
    }
}
