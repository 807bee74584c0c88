//! Provide the immutable grammar dataset the conversion engine runs against.
//!
//! The dataset is a fixed set of XHTML 1.0 DTD variants: element
//! definitions with per-doctype content models, attribute definitions with
//! default declarations, and the entity-name set.  The declarative tables
//! live in [`data`]; [`coder`] packs their content-model text into the byte
//! encoding consumed at runtime, and [`content`] decodes those bytes back
//! into the typed model tree used by the matcher.
//!
//! All tables are built once into a process-wide [`Dtd`] and are read-only
//! afterwards.

pub mod coder;
pub mod content;
pub mod data;

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use crate::error::XhtmlError;

use content::ContentModel;
pub use data::ElementId;

/// Number of supported DTD variants.
pub const DTD_COUNT: usize = 3;

/// One of the fixed target grammars the output must conform to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Doctype {
    Strict,
    Transitional,
    Frameset,
}

impl Doctype {
    pub const ALL: [Doctype; DTD_COUNT] = [Doctype::Strict, Doctype::Transitional, Doctype::Frameset];

    /// Bit used in element/attribute environment masks.
    pub fn mask(self) -> u8 {
        1 << self as u8
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Short key used on the command line and in the dataset.
    pub fn key(self) -> &'static str {
        match self {
            Doctype::Strict => "strict",
            Doctype::Transitional => "transitional",
            Doctype::Frameset => "frameset",
        }
    }

    pub fn public_id(self) -> &'static str {
        match self {
            Doctype::Strict => "-//W3C//DTD XHTML 1.0 Strict//EN",
            Doctype::Transitional => "-//W3C//DTD XHTML 1.0 Transitional//EN",
            Doctype::Frameset => "-//W3C//DTD XHTML 1.0 Frameset//EN",
        }
    }

    pub fn system_id(self) -> &'static str {
        match self {
            Doctype::Strict => "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd",
            Doctype::Transitional => "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd",
            Doctype::Frameset => "http://www.w3.org/TR/xhtml1/DTD/xhtml1-frameset.dtd",
        }
    }

    /// `true` for the variant whose body slot is a `frameset`.
    pub fn is_frame_based(self) -> bool {
        matches!(self, Doctype::Frameset)
    }

    pub fn from_key(key: &str) -> Option<Doctype> {
        Doctype::ALL.into_iter().find(|d| d.key() == key)
    }

    /// Guess the target grammar from the raw text of a `<!DOCTYPE` declaration.
    ///
    /// XHTML public identifiers are matched first so an input that is
    /// already XHTML keeps its declared variant; after that a few
    /// well-known HTML 4 substrings are tried.
    pub fn from_declaration(text: &str) -> Option<Doctype> {
        for dt in Doctype::ALL {
            if text.contains(dt.public_id()) {
                return Some(dt);
            }
        }
        let lower = text.to_ascii_lowercase();
        if lower.contains("transitional") || lower.contains("loose.dtd") {
            Some(Doctype::Transitional)
        } else if lower.contains("strict") {
            Some(Doctype::Strict)
        } else if lower.contains("frameset") {
            Some(Doctype::Frameset)
        } else {
            None
        }
    }
}

/// Content-type category of an element in one DTD variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// The element does not exist in this variant.
    #[default]
    Undefined,
    Empty,
    Any,
    Mixed,
    Children,
}

/// How an attribute's absence or value is constrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultDecl {
    /// A default value is supplied by the DTD.
    Default,
    Required,
    Implied,
    Fixed,
}

/// Declared lexical type of an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Cdata,
    Id,
    IdRef,
    IdRefs,
    NmToken,
    NmTokens,
    /// Closed set of allowed literals.
    Enumerated(&'static [&'static str]),
}

/// Immutable attribute definition.
///
/// The same attribute name may appear under different definitions on
/// different elements (`type` is REQUIRED on `script` but enumerated with a
/// default on `input`), so definitions are owned by element attribute lists
/// rather than by a global name table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDef {
    pub name: &'static str,
    pub atype: AttributeType,
    pub default_decl: DefaultDecl,
    /// Default or fixed value, when the declaration carries one.
    pub default_value: Option<&'static str>,
    /// Bitmask of doctypes in which this definition applies.
    pub environment: u8,
}

/// Immutable element definition with its per-doctype compiled models.
pub struct Element {
    pub name: &'static str,
    /// Bitmask of doctypes in which the element exists at all.
    pub environment: u8,
    pub content: [ContentType; DTD_COUNT],
    /// Offset of the packed model in [`Dtd::model_buffer`], per doctype.
    /// Meaningful only for `Mixed`/`Children` content.
    spec_offset: [Option<usize>; DTD_COUNT],
    /// Decoded model tree, per doctype.
    model: [Option<ContentModel>; DTD_COUNT],
    /// Ordered list of allowed attribute definitions.
    pub attlist: &'static [AttributeDef],
}

impl Element {
    pub fn content_type(&self, dt: Doctype) -> ContentType {
        self.content[dt.index()]
    }

    /// Find the attribute definition for `name` that applies in `dt`.
    pub fn attribute(&self, name: &str, dt: Doctype) -> Option<&'static AttributeDef> {
        self.attlist
            .iter()
            .find(|def| def.name == name && def.environment & dt.mask() != 0)
    }

    pub fn model(&self, dt: Doctype) -> Option<&ContentModel> {
        self.model[dt.index()].as_ref()
    }

    pub fn exists_in(&self, dt: Doctype) -> bool {
        self.environment & dt.mask() != 0
    }
}

/// The loaded grammar dataset.
pub struct Dtd {
    elements: Vec<Element>,
    entities: HashSet<&'static str>,
    /// Packed content-model byte streams, NUL-terminated, shared between
    /// elements whose model text is identical.
    model_buffer: Vec<u8>,
    element_index: HashMap<&'static str, ElementId>,
}

impl Dtd {
    fn build() -> Result<Dtd, XhtmlError> {
        let mut model_buffer = Vec::new();
        let mut interned: HashMap<(&'static str, bool), usize> = HashMap::new();
        let mut elements = Vec::with_capacity(data::ELEMENTS.len());

        for decl in data::ELEMENTS {
            let mut content = [ContentType::Undefined; DTD_COUNT];
            let mut spec_offset = [None; DTD_COUNT];
            let mut model: [Option<ContentModel>; DTD_COUNT] = [None, None, None];

            for dt in Doctype::ALL {
                let i = dt.index();
                match decl.content[i] {
                    data::Spec::None => {}
                    data::Spec::Empty => content[i] = ContentType::Empty,
                    data::Spec::Any => content[i] = ContentType::Any,
                    data::Spec::Mixed(text) => {
                        content[i] = ContentType::Mixed;
                        let offset = intern_model(&mut model_buffer, &mut interned, text, true)?;
                        spec_offset[i] = Some(offset);
                        model[i] = Some(content::decode_model(
                            model_bytes_at(&model_buffer, offset),
                            ContentType::Mixed,
                        )?);
                    }
                    data::Spec::Children(text) => {
                        content[i] = ContentType::Children;
                        let offset = intern_model(&mut model_buffer, &mut interned, text, false)?;
                        spec_offset[i] = Some(offset);
                        model[i] = Some(content::decode_model(
                            model_bytes_at(&model_buffer, offset),
                            ContentType::Children,
                        )?);
                    }
                }
            }

            elements.push(Element {
                name: decl.name,
                environment: decl.environment,
                content,
                spec_offset,
                model,
                attlist: decl.attlist,
            });
        }

        let mut element_index = HashMap::new();
        for (id, elem) in elements.iter().enumerate() {
            if element_index.insert(elem.name, id).is_some() {
                return Err(XhtmlError::Dataset(format!(
                    "duplicate element declaration '{}'",
                    elem.name
                )));
            }
        }

        Ok(Dtd {
            elements,
            entities: data::ENTITIES.iter().copied().collect(),
            model_buffer,
            element_index,
        })
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id]
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Look an element up by (already lowercased) name.
    pub fn element_by_name(&self, name: &str) -> Option<ElementId> {
        self.element_index.get(name).copied()
    }

    /// Membership test for entity names (`name` without `&`/`;`).
    pub fn entity_exists(&self, name: &str) -> bool {
        self.entities.contains(name)
    }

    /// Packed model bytes for `(elem, dt)`, without the NUL terminator.
    /// `None` for EMPTY/ANY/undefined content.
    pub fn model_bytes(&self, elem: ElementId, dt: Doctype) -> Option<&[u8]> {
        let offset = self.elements[elem].spec_offset[dt.index()]?;
        Some(model_bytes_at(&self.model_buffer, offset))
    }
}

fn model_bytes_at(buffer: &[u8], offset: usize) -> &[u8] {
    let end = buffer[offset..]
        .iter()
        .position(|&b| b == 0)
        .map_or(buffer.len(), |p| offset + p);
    &buffer[offset..end]
}

fn intern_model(
    buffer: &mut Vec<u8>,
    interned: &mut HashMap<(&'static str, bool), usize>,
    text: &'static str,
    mixed: bool,
) -> Result<usize, XhtmlError> {
    if let Some(&offset) = interned.get(&(text, mixed)) {
        return Ok(offset);
    }
    let packed = if mixed {
        coder::encode_mixed(text)?
    } else {
        coder::encode_children(text)?
    };
    let offset = buffer.len();
    buffer.extend_from_slice(&packed);
    buffer.push(0);
    interned.insert((text, mixed), offset);
    Ok(offset)
}

static DTD: LazyLock<Result<Dtd, XhtmlError>> = LazyLock::new(Dtd::build);

/// Access the process-wide dataset, building it on first use.
pub fn dtd() -> Result<&'static Dtd, XhtmlError> {
    DTD.as_ref().map_err(Clone::clone)
}
