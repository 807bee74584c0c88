//! Build/repair session: consumes push events and grows a valid document.
//!
//! The session keeps a cursor into the tree under construction.  Every
//! incoming element is placed where the target grammar allows it, through
//! the repair chain in [`repair`] when the source position is illegal.
//! Recoverable problems are logged and counted; only a corrupt dataset, a
//! rootless document, a strict-mode root discard, or the error ceiling
//! abort a conversion.

mod repair;

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::{
    dtd::{self, ContentType, Doctype, Dtd, ElementId, data},
    error::XhtmlError,
    sax::SaxHandler,
    tree::{Document, NodeId},
    valid::can_be_child,
};

/// Conversion options consumed by [`Session::new`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Target grammar; `None` resolves from the input (doctype declaration,
    /// frame usage) and defaults to transitional.
    pub doctype: Option<Doctype>,
    /// Discard invalid subtrees at close time instead of keeping them with
    /// a warning.
    pub strict: bool,
    /// Abort once the error count exceeds this ceiling.
    pub max_errors: u32,
}

impl Default for ConvertOptions {
    fn default() -> ConvertOptions {
        ConvertOptions { doctype: None, strict: false, max_errors: 20 }
    }
}

/// A finished conversion.
pub struct Conversion {
    pub document: Document,
    pub doctype: Doctype,
    pub error_count: u32,
    pub warning_count: u32,
}

#[derive(Debug, PartialEq, Eq)]
enum SessionState {
    Parsing,
    /// The root element was closed; remaining events are dropped.
    Ended,
}

/// An element inserted away from the cursor position; closing it returns
/// the cursor to where the source document was.
struct PendingRelocation {
    node: NodeId,
    return_to: NodeId,
}

pub struct Session {
    dtd: &'static Dtd,
    doc: Document,
    cursor: Option<NodeId>,
    state: SessionState,
    doctype: Option<Doctype>,
    doctype_locked: bool,
    doctype_declared: bool,
    /// Registered ID attribute values.
    ids: HashSet<String>,
    error_count: u32,
    warning_count: u32,
    pending_relocation: Option<PendingRelocation>,
    options: ConvertOptions,
}

impl Session {
    pub fn new(options: ConvertOptions) -> Result<Session, XhtmlError> {
        let dtd = dtd::dtd()?;
        Ok(Session {
            dtd,
            doc: Document::new(),
            cursor: None,
            state: SessionState::Parsing,
            doctype: options.doctype,
            doctype_locked: options.doctype.is_some(),
            doctype_declared: false,
            ids: HashSet::new(),
            error_count: 0,
            warning_count: 0,
            pending_relocation: None,
            options,
        })
    }

    /// The grammar currently in effect (transitional until decided).
    fn current_doctype(&self) -> Doctype {
        self.doctype.unwrap_or(Doctype::Transitional)
    }

    fn note_error(&mut self) -> Result<(), XhtmlError> {
        self.error_count += 1;
        if self.error_count > self.options.max_errors {
            return Err(XhtmlError::TooManyErrors(self.error_count));
        }
        Ok(())
    }

    fn note_warning(&mut self) {
        self.warning_count += 1;
    }

    /// Map a raw tag name to an element id (lowercasing, alias table).
    fn resolve_name(&self, name: &str) -> Option<ElementId> {
        let mut lower = name.to_ascii_lowercase();
        if let Some((alias, target)) = data::ALIASES.iter().find(|(a, _)| *a == lower) {
            debug!("treating <{alias}> as <{target}>");
            lower = (*target).to_string();
        }
        self.dtd.element_by_name(&lower)
    }

    /// Move the tentative/locked doctype state for `elem`, returning the
    /// grammar to place it under, or `None` when it fits no reachable one.
    fn resolve_environment(&mut self, elem: ElementId) -> Option<Doctype> {
        if self.doctype.is_none() {
            self.doctype = Some(Doctype::Transitional);
        }
        let dt = self.current_doctype();
        let def = self.dtd.element(elem);
        if def.exists_in(dt) {
            return Some(dt);
        }
        if !self.doctype_locked {
            if matches!(elem, data::ELM_FRAMESET | data::ELM_FRAME) && self.frame_switch_allowed() {
                warn!("frame content found; switching to the frameset variant");
                self.switch_to_frameset();
                return Some(Doctype::Frameset);
            }
            if dt == Doctype::Strict && def.exists_in(Doctype::Transitional) {
                warn!(
                    "<{}> does not exist in the strict variant; switching to transitional",
                    def.name
                );
                self.doctype = Some(Doctype::Transitional);
                return Some(Doctype::Transitional);
            }
        }
        None
    }

    /// Frame-based output is still reachable while no body content exists.
    fn frame_switch_allowed(&self) -> bool {
        match self.doc.root {
            None => true,
            Some(root) => match self.doc.find_child_element(root, data::ELM_BODY) {
                None => true,
                Some(body) => self.doc.children(body).is_empty(),
            },
        }
    }

    fn switch_to_frameset(&mut self) {
        self.doctype = Some(Doctype::Frameset);
        self.doctype_locked = true;
        // An empty synthesized body has no place under (head,frameset).
        if let Some(root) = self.doc.root {
            if let Some(body) = self.doc.find_child_element(root, data::ELM_BODY) {
                if self.doc.children(body).is_empty() {
                    if self
                        .cursor
                        .is_some_and(|c| self.doc.ancestors_or_self(c).any(|n| n == body))
                    {
                        self.cursor = Some(root);
                    }
                    self.doc.unlink(body);
                }
            }
        }
    }

    /// Insert character data at the cursor, wrapping it when the cursor's
    /// content model has no place for text.
    fn insert_chardata(&mut self, text: &str) -> Result<(), XhtmlError> {
        let Some(cursor) = self.cursor else {
            warn!("character data outside any element dropped");
            return self.note_error();
        };
        let dt = self.current_doctype();
        let elem = match self.doc.element_id(cursor) {
            Some(elem) => elem,
            None => return Ok(()),
        };
        match self.dtd.element(elem).content_type(dt) {
            ContentType::Mixed | ContentType::Any => {
                self.doc.append_character_data(cursor, text);
            }
            _ if can_be_child(self.dtd, elem, data::ELM_P, dt) => {
                warn!("wrapping stray character data in <p>");
                self.note_warning();
                let p = self.link_new(cursor, data::ELM_P);
                self.doc.append_character_data(p, text);
                self.cursor = Some(p);
            }
            _ if matches!(
                elem,
                data::ELM_UL | data::ELM_OL | data::ELM_DIR | data::ELM_MENU
            ) =>
            {
                warn!("wrapping stray character data in <li>");
                self.note_warning();
                let li = self.link_new(cursor, data::ELM_LI);
                self.doc.append_character_data(li, text);
                self.cursor = Some(li);
            }
            _ => {
                warn!(
                    "character data not allowed inside <{}>; dropped",
                    self.dtd.element(elem).name
                );
                self.note_warning();
            }
        }
        Ok(())
    }

    /// Consume the session and return the finished document.
    pub fn finish(mut self) -> Result<Conversion, XhtmlError> {
        if self.doc.root.is_none() {
            return Err(XhtmlError::NoRootElement);
        }
        // Close everything still open, following any pending relocation back
        // into the subtree the source document was building.
        let mut open = self.cursor.take();
        while let Some(node) = open {
            // the close below may unlink the node, so find the parent first
            let next = match self.pending_relocation.take_if(|pr| pr.node == node) {
                Some(pr) => Some(pr.return_to),
                None => self.doc.parent(node),
            };
            self.close(node)?;
            open = next;
        }
        if self.doc.root.is_none() {
            return Err(XhtmlError::DocumentDiscarded);
        }
        Ok(Conversion {
            document: self.doc,
            doctype: self.doctype.unwrap_or(Doctype::Transitional),
            error_count: self.error_count,
            warning_count: self.warning_count,
        })
    }
}

impl SaxHandler for Session {
    fn start_element(&mut self, name: &str, attrs: &[(String, String)]) -> Result<(), XhtmlError> {
        if self.state == SessionState::Ended {
            debug!("element <{name}> after document end dropped");
            return Ok(());
        }
        let Some(elem) = self.resolve_name(name) else {
            info!("unknown element <{name}> dropped");
            self.note_warning();
            return Ok(());
        };
        let Some(dt) = self.resolve_environment(elem) else {
            warn!(
                "<{}> does not exist in the {} variant; dropped",
                self.dtd.element(elem).name,
                self.current_doctype().key()
            );
            self.note_warning();
            return Ok(());
        };

        if self.cursor.is_none() {
            if elem == data::ELM_HTML {
                let root = self.doc.new_element(data::ELM_HTML);
                self.doc.root = Some(root);
                self.cursor = Some(root);
                self.set_attributes(root, attrs)?;
                return Ok(());
            }
            self.skeleton_repair(elem)?;
        }

        let Some(node) = self.insert_element(elem)? else {
            return Ok(());
        };
        self.set_attributes(node, attrs)?;

        if elem == data::ELM_META && self.doc.get_attribute(node, "http-equiv").is_some() {
            // http-equiv pragmas have no meaning in the XML output.
            info!("<meta http-equiv> removed");
            self.doc.unlink(node);
            return Ok(());
        }
        if self.dtd.element(elem).content_type(dt) != ContentType::Empty {
            self.cursor = Some(node);
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<(), XhtmlError> {
        if self.state == SessionState::Ended {
            return Ok(());
        }
        let Some(elem) = self.resolve_name(name) else {
            debug!("end tag </{name}> for unknown element ignored");
            return Ok(());
        };
        let dt = self.current_doctype();
        if self.dtd.element(elem).content_type(dt) == ContentType::Empty {
            return Ok(());
        }
        let Some(cursor) = self.cursor else {
            return Ok(());
        };
        let Some(target) = self
            .doc
            .ancestors_or_self(cursor)
            .find(|&n| self.doc.is_element(n, elem))
        else {
            debug!("end tag </{name}> without open element ignored");
            return Ok(());
        };

        // Close the target and everything left open inside it.
        let to_close: Vec<NodeId> = self
            .doc
            .ancestors_or_self(cursor)
            .take_while(|&n| n != target)
            .chain(std::iter::once(target))
            .collect();
        // the close below may unlink the target, so find the parent first
        let next = match self.pending_relocation.take_if(|pr| pr.node == target) {
            Some(pr) => Some(pr.return_to),
            None => self.doc.parent(target),
        };
        for node in to_close {
            self.close(node)?;
        }
        self.cursor = next;
        if self.cursor.is_none() {
            self.state = SessionState::Ended;
        }
        Ok(())
    }

    fn characters(&mut self, text: &str) -> Result<(), XhtmlError> {
        if self.state == SessionState::Ended {
            return Ok(());
        }
        self.insert_chardata(text)
    }

    fn whitespace(&mut self) -> Result<(), XhtmlError> {
        if self.state == SessionState::Ended {
            return Ok(());
        }
        let Some(cursor) = self.cursor else {
            return Ok(());
        };
        let dt = self.current_doctype();
        if let Some(elem) = self.doc.element_id(cursor) {
            if self.dtd.element(elem).content_type(dt) == ContentType::Mixed {
                self.doc.append_character_data(cursor, " ");
            }
        }
        Ok(())
    }

    fn cdata_section(&mut self, text: &str) -> Result<(), XhtmlError> {
        if self.state == SessionState::Ended {
            return Ok(());
        }
        let Some(cursor) = self.cursor else {
            warn!("CDATA section outside any element dropped");
            return self.note_error();
        };
        let dt = self.current_doctype();
        let Some(elem) = self.doc.element_id(cursor) else {
            return Ok(());
        };
        match self.dtd.element(elem).content_type(dt) {
            ContentType::Mixed | ContentType::Any => {
                if elem == data::ELM_STYLE && !text.contains(['&', '<']) {
                    // Style sheets read better without the CDATA wrapper.
                    self.doc.append_character_data(cursor, text);
                } else {
                    let node = self.doc.new_cdata(text);
                    self.doc.link_child(cursor, node);
                }
            }
            _ => {
                warn!(
                    "CDATA section not allowed inside <{}>; dropped",
                    self.dtd.element(elem).name
                );
                self.note_warning();
            }
        }
        Ok(())
    }

    fn comment(&mut self, text: &str) -> Result<(), XhtmlError> {
        if self.state == SessionState::Ended {
            return Ok(());
        }
        match self.cursor {
            Some(cursor) => {
                let node = self.doc.new_comment(text);
                self.doc.link_child(cursor, node);
            }
            None => debug!("comment before the root element dropped"),
        }
        Ok(())
    }

    fn doctype_declaration(&mut self, text: &str) -> Result<(), XhtmlError> {
        if self.doctype_declared || self.doc.root.is_some() {
            debug!("extra doctype declaration ignored");
            return Ok(());
        }
        self.doctype_declared = true;
        match Doctype::from_declaration(text) {
            Some(dt) if self.doctype_locked => {
                if Some(dt) != self.doctype {
                    info!("doctype declaration overridden to {}", self.current_doctype().key());
                }
            }
            Some(dt) => {
                self.doctype = Some(dt);
                // An explicit XHTML public identifier settles the variant.
                if text.contains(dt.public_id()) {
                    self.doctype_locked = true;
                }
            }
            None => {
                warn!("unrecognized doctype declaration");
                self.note_warning();
            }
        }
        Ok(())
    }

    fn reference(&mut self, name: &str) -> Result<(), XhtmlError> {
        if self.state == SessionState::Ended {
            return Ok(());
        }
        if name.starts_with('#') || self.dtd.entity_exists(name) {
            return self.insert_chardata(&format!("&{name};"));
        }
        if name == "percnt" {
            return self.insert_chardata("%");
        }
        warn!("unknown entity &{name}; dropped");
        self.note_warning();
        Ok(())
    }

    fn error(&mut self) -> Result<(), XhtmlError> {
        self.note_error()
    }
}
