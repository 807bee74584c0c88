//! Pack DTD content-spec text into the byte encoding the matcher consumes.
//!
//! One byte per token: an element reference carries bit 7 plus the element
//! id; a group-open marker carries the choice flag and the quantifier bits
//! of the whole group; a quantified single name is packed as a one-item
//! group so the quantifier has somewhere to live.

use crate::error::XhtmlError;

use super::data::{self, ElementId};

/// Bit 7 set: the low bits are an element id.
pub const ELEMENT_FLAG: u8 = 0x80;
/// Group open marker.
pub const GROUP_OPEN: u8 = 0x01;
/// Group close marker.
pub const GROUP_CLOSE: u8 = 0x02;
/// Or'ed into the open marker when the group separator is `|`.
pub const CHOICE_FLAG: u8 = 0x10;
/// Quantifier bits, or'ed into the open marker.
pub const REP_ZERO_OR_MORE: u8 = 0x04;
pub const REP_ONE_OR_MORE: u8 = 0x08;
pub const REP_OPTIONAL: u8 = 0x0c;
pub const REP_MASK: u8 = 0x0c;

fn element_id(name: &str) -> Result<ElementId, XhtmlError> {
    data::ELEMENTS
        .iter()
        .position(|e| e.name == name)
        .ok_or_else(|| XhtmlError::Dataset(format!("content model references unknown element '{name}'")))
}

fn quantifier_bits(byte: Option<u8>) -> (u8, bool) {
    match byte {
        Some(b'*') => (REP_ZERO_OR_MORE, true),
        Some(b'+') => (REP_ONE_OR_MORE, true),
        Some(b'?') => (REP_OPTIONAL, true),
        _ => (0, false),
    }
}

/// Pack an element-content spec such as `"(head,body)"`.
pub fn encode_children(text: &str) -> Result<Vec<u8>, XhtmlError> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let pos = encode_group(bytes, 0, &mut out, text)?;
    if pos != bytes.len() {
        return Err(XhtmlError::Dataset(format!(
            "trailing characters after content model '{text}'"
        )));
    }
    Ok(out)
}

/// Pack the element-name list of a mixed model (`"a|b|c"`, empty for
/// PCDATA-only content).
pub fn encode_mixed(text: &str) -> Result<Vec<u8>, XhtmlError> {
    let mut out = Vec::new();
    if text.is_empty() {
        return Ok(out);
    }
    for name in text.split('|') {
        if name.is_empty() {
            return Err(XhtmlError::Dataset(format!("empty name in mixed model '{text}'")));
        }
        out.push(ELEMENT_FLAG | element_id(name)? as u8);
    }
    Ok(out)
}

fn encode_group(
    bytes: &[u8],
    mut pos: usize,
    out: &mut Vec<u8>,
    text: &str,
) -> Result<usize, XhtmlError> {
    if bytes.get(pos) != Some(&b'(') {
        return Err(XhtmlError::Dataset(format!(
            "content model '{text}' does not open with a group at byte {pos}"
        )));
    }
    pos += 1;

    // The open marker is patched once the separator and quantifier are known.
    let open_at = out.len();
    out.push(GROUP_OPEN);

    let mut separator: Option<u8> = None;
    loop {
        pos = encode_item(bytes, pos, out, text)?;
        match bytes.get(pos) {
            Some(&sep @ (b',' | b'|')) => {
                if *separator.get_or_insert(sep) != sep {
                    return Err(XhtmlError::Dataset(format!(
                        "mixed ',' and '|' separators in one group of '{text}'"
                    )));
                }
                pos += 1;
            }
            Some(b')') => {
                pos += 1;
                break;
            }
            _ => {
                return Err(XhtmlError::Dataset(format!(
                    "unterminated group in content model '{text}'"
                )));
            }
        }
    }

    if separator == Some(b'|') {
        out[open_at] |= CHOICE_FLAG;
    }
    let (bits, took) = quantifier_bits(bytes.get(pos).copied());
    if took {
        out[open_at] |= bits;
        pos += 1;
    }
    out.push(GROUP_CLOSE);
    Ok(pos)
}

fn encode_item(
    bytes: &[u8],
    mut pos: usize,
    out: &mut Vec<u8>,
    text: &str,
) -> Result<usize, XhtmlError> {
    if bytes.get(pos) == Some(&b'(') {
        return encode_group(bytes, pos, out, text);
    }
    let start = pos;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
        pos += 1;
    }
    if pos == start {
        return Err(XhtmlError::Dataset(format!(
            "expected element name at byte {pos} of content model '{text}'"
        )));
    }
    let name = &text[start..pos];
    let reference = ELEMENT_FLAG | element_id(name)? as u8;
    let (bits, took) = quantifier_bits(bytes.get(pos).copied());
    if took {
        // A quantified name becomes a one-item group.
        out.push(GROUP_OPEN | bits);
        out.push(reference);
        out.push(GROUP_CLOSE);
        pos += 1;
    } else {
        out.push(reference);
    }
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtd::data::{ELM_BODY, ELM_HEAD, ELM_LI, ELM_TD, ELM_TH};

    fn eref(id: ElementId) -> u8 {
        ELEMENT_FLAG | id as u8
    }

    #[test]
    fn packs_plain_sequence() {
        let packed = encode_children("(head,body)").unwrap();
        assert_eq!(packed, vec![GROUP_OPEN, eref(ELM_HEAD), eref(ELM_BODY), GROUP_CLOSE]);
    }

    #[test]
    fn packs_quantified_choice() {
        let packed = encode_children("(th|td)+").unwrap();
        assert_eq!(
            packed,
            vec![
                GROUP_OPEN | CHOICE_FLAG | REP_ONE_OR_MORE,
                eref(ELM_TH),
                eref(ELM_TD),
                GROUP_CLOSE,
            ]
        );
    }

    #[test]
    fn quantified_name_becomes_nested_group() {
        let packed = encode_children("(li+)").unwrap();
        assert_eq!(
            packed,
            vec![
                GROUP_OPEN,
                GROUP_OPEN | REP_ONE_OR_MORE,
                eref(ELM_LI),
                GROUP_CLOSE,
                GROUP_CLOSE,
            ]
        );
    }

    #[test]
    fn packs_nested_groups() {
        let packed = encode_children("((th|td)+,(tr)*)").unwrap();
        assert_eq!(
            packed,
            vec![
                GROUP_OPEN,
                GROUP_OPEN | CHOICE_FLAG | REP_ONE_OR_MORE,
                eref(ELM_TH),
                eref(ELM_TD),
                GROUP_CLOSE,
                GROUP_OPEN | REP_ZERO_OR_MORE,
                eref(crate::dtd::data::ELM_TR),
                GROUP_CLOSE,
                GROUP_CLOSE,
            ]
        );
    }

    #[test]
    fn packs_mixed_lists() {
        assert_eq!(encode_mixed("").unwrap(), Vec::<u8>::new());
        assert_eq!(encode_mixed("th|td").unwrap(), vec![eref(ELM_TH), eref(ELM_TD)]);
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(encode_children("head,body").is_err());
        assert!(encode_children("(head,body").is_err());
        assert!(encode_children("(head,|body)").is_err());
        assert!(encode_children("(head,body)?junk").is_err());
        assert!(encode_children("(head|body,title)").is_err());
        assert!(encode_children("(nosuchelement)").is_err());
        assert!(encode_mixed("a||b").is_err());
    }
}
