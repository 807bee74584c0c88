//! Decode packed content-model bytes into the typed tree the matcher walks.

use crate::error::XhtmlError;

use super::{
    ContentType,
    coder::{CHOICE_FLAG, ELEMENT_FLAG, GROUP_CLOSE, GROUP_OPEN, REP_MASK, REP_ONE_OR_MORE,
            REP_OPTIONAL, REP_ZERO_OR_MORE},
    data::{self, ElementId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

impl Quantifier {
    /// May the group match the empty sequence?
    pub fn allows_zero(self) -> bool {
        matches!(self, Quantifier::Optional | Quantifier::ZeroOrMore)
    }

    /// May the group match more than once?
    pub fn allows_repeat(self) -> bool {
        matches!(self, Quantifier::ZeroOrMore | Quantifier::OneOrMore)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Sequence,
    Choice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub combinator: Combinator,
    pub quantifier: Quantifier,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Element(ElementId),
    Group(Group),
}

/// Decoded content model of one element in one DTD variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentModel {
    /// `(#PCDATA | ...)*`: the set of elements allowed between character
    /// data, position-free.
    Mixed(Vec<ElementId>),
    /// Element content: an ordered group tree.
    Children(Group),
}

/// Rebuild the typed model from packed bytes (terminator already stripped).
pub fn decode_model(bytes: &[u8], content: ContentType) -> Result<ContentModel, XhtmlError> {
    match content {
        ContentType::Mixed => {
            let mut ids = Vec::with_capacity(bytes.len());
            for &b in bytes {
                ids.push(element_ref(b)?);
            }
            Ok(ContentModel::Mixed(ids))
        }
        ContentType::Children => {
            let (group, pos) = decode_group(bytes, 0)?;
            if pos != bytes.len() {
                return Err(XhtmlError::Dataset(format!(
                    "{} stray bytes after packed content model",
                    bytes.len() - pos
                )));
            }
            Ok(ContentModel::Children(group))
        }
        _ => Err(XhtmlError::Dataset(
            "only mixed and element content carry a packed model".into(),
        )),
    }
}

fn element_ref(byte: u8) -> Result<ElementId, XhtmlError> {
    if byte & ELEMENT_FLAG == 0 {
        return Err(XhtmlError::Dataset(format!(
            "byte {byte:#04x} is not an element reference"
        )));
    }
    let id = (byte & !ELEMENT_FLAG) as ElementId;
    if id >= data::ELEMENTS.len() {
        return Err(XhtmlError::Dataset(format!("element id {id} out of range")));
    }
    Ok(id)
}

fn decode_group(bytes: &[u8], mut pos: usize) -> Result<(Group, usize), XhtmlError> {
    let open = *bytes.get(pos).ok_or_else(|| {
        XhtmlError::Dataset("packed content model ends before a group opens".into())
    })?;
    if open & ELEMENT_FLAG != 0 || open & GROUP_OPEN == 0 {
        return Err(XhtmlError::Dataset(format!(
            "packed content model does not open with a group marker ({open:#04x})"
        )));
    }
    pos += 1;

    let combinator = if open & CHOICE_FLAG != 0 {
        Combinator::Choice
    } else {
        Combinator::Sequence
    };
    let quantifier = match open & REP_MASK {
        REP_ZERO_OR_MORE => Quantifier::ZeroOrMore,
        REP_ONE_OR_MORE => Quantifier::OneOrMore,
        REP_OPTIONAL => Quantifier::Optional,
        _ => Quantifier::One,
    };

    let mut items = Vec::new();
    loop {
        let byte = *bytes.get(pos).ok_or_else(|| {
            XhtmlError::Dataset("packed content model ends inside a group".into())
        })?;
        if byte & ELEMENT_FLAG != 0 {
            items.push(Item::Element(element_ref(byte)?));
            pos += 1;
        } else if byte == GROUP_CLOSE {
            pos += 1;
            break;
        } else if byte & GROUP_OPEN != 0 {
            let (inner, next) = decode_group(bytes, pos)?;
            items.push(Item::Group(inner));
            pos = next;
        } else {
            return Err(XhtmlError::Dataset(format!(
                "unexpected byte {byte:#04x} inside a packed group"
            )));
        }
    }

    if items.is_empty() {
        return Err(XhtmlError::Dataset("empty group in packed content model".into()));
    }
    Ok((Group { combinator, quantifier, items }, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtd::{coder, data::{ELM_BODY, ELM_HEAD, ELM_LI, ELM_TD, ELM_TH}};

    fn children(text: &str) -> Group {
        let packed = coder::encode_children(text).unwrap();
        match decode_model(&packed, ContentType::Children).unwrap() {
            ContentModel::Children(group) => group,
            ContentModel::Mixed(_) => unreachable!(),
        }
    }

    #[test]
    fn round_trips_the_skeleton_model() {
        let group = children("(head,body)");
        assert_eq!(group.combinator, Combinator::Sequence);
        assert_eq!(group.quantifier, Quantifier::One);
        assert_eq!(group.items, vec![Item::Element(ELM_HEAD), Item::Element(ELM_BODY)]);
    }

    #[test]
    fn round_trips_quantified_choice() {
        let group = children("(th|td)+");
        assert_eq!(group.combinator, Combinator::Choice);
        assert_eq!(group.quantifier, Quantifier::OneOrMore);
    }

    #[test]
    fn quantified_name_decodes_as_nested_group() {
        let group = children("(li+)");
        assert_eq!(group.items.len(), 1);
        let Item::Group(inner) = &group.items[0] else {
            panic!("expected nested group");
        };
        assert_eq!(inner.quantifier, Quantifier::OneOrMore);
        assert_eq!(inner.items, vec![Item::Element(ELM_LI)]);
    }

    #[test]
    fn decodes_mixed_lists() {
        let packed = coder::encode_mixed("th|td").unwrap();
        let model = decode_model(&packed, ContentType::Mixed).unwrap();
        assert_eq!(model, ContentModel::Mixed(vec![ELM_TH, ELM_TD]));
        assert_eq!(
            decode_model(&[], ContentType::Mixed).unwrap(),
            ContentModel::Mixed(Vec::new())
        );
    }

    #[test]
    fn rejects_corrupt_byte_streams() {
        // No opening group marker.
        assert!(decode_model(&[0x80 | ELM_HEAD as u8], ContentType::Children).is_err());
        // Truncated group.
        let mut packed = coder::encode_children("(head,body)").unwrap();
        packed.pop();
        assert!(decode_model(&packed, ContentType::Children).is_err());
        // Group marker inside a mixed list.
        assert!(decode_model(&[coder::GROUP_OPEN], ContentType::Mixed).is_err());
        // Junk byte inside a group.
        assert!(
            decode_model(&[coder::GROUP_OPEN, 0x40, coder::GROUP_CLOSE], ContentType::Children)
                .is_err()
        );
        // Empty group.
        assert!(
            decode_model(&[coder::GROUP_OPEN, coder::GROUP_CLOSE], ContentType::Children).is_err()
        );
    }
}
