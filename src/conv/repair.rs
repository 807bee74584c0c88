//! The repair side of the session: element placement, skeleton synthesis,
//! close-time re-validation, and attribute repair.
//!
//! Placement tries the cheapest repair first and discards only as a last
//! resort.  Close-time repair runs when an element with element content is
//! closed and its children no longer satisfy the model.

use std::borrow::Cow;

use log::{debug, info, warn};

use crate::{
    dtd::{AttributeDef, AttributeType, ContentType, DefaultDecl, ElementId, data::*},
    error::XhtmlError,
    tree::NodeId,
    valid::{AttrCheck, Validity, can_be_child, escape_bad_references, is_child_valid,
            validate_attribute},
};

use super::{PendingRelocation, Session};

impl Session {
    pub(super) fn link_new(&mut self, parent: NodeId, elem: ElementId) -> NodeId {
        let node = self.doc.new_element(elem);
        self.doc.link_child(parent, node);
        node
    }

    /// Build enough document structure for a first element that is not
    /// `<html>`.
    pub(super) fn skeleton_repair(&mut self, elem: ElementId) -> Result<(), XhtmlError> {
        warn!("document does not start with <html>; synthesizing the skeleton");
        self.note_error()?;
        let dt = self.current_doctype();
        let html = self.doc.new_element(ELM_HTML);
        self.doc.root = Some(html);
        self.cursor = Some(html);
        self.fix_required_and_defaults(html);
        if matches!(elem, ELM_HEAD | ELM_BODY | ELM_FRAMESET) {
            return Ok(());
        }
        if can_be_child(self.dtd, ELM_HEAD, elem, dt) && !can_be_child(self.dtd, ELM_BODY, elem, dt)
        {
            let head = self.link_new(html, ELM_HEAD);
            self.cursor = Some(head);
            return Ok(());
        }
        if dt.is_frame_based() {
            if matches!(elem, ELM_FRAME | ELM_NOFRAMES) {
                let frameset = self.link_new(html, ELM_FRAMESET);
                self.cursor = Some(frameset);
            }
            return Ok(());
        }
        let body = self.link_new(html, ELM_BODY);
        self.cursor = Some(body);
        Ok(())
    }

    /// Place `elem` at or near the cursor.  `None` means it was dropped (or
    /// merged away); the returned node may sit inside synthesized wrappers.
    pub(super) fn insert_element(&mut self, elem: ElementId) -> Result<Option<NodeId>, XhtmlError> {
        let dt = self.current_doctype();

        // The skeleton singletons are merged, never duplicated.
        if elem == ELM_HTML {
            if let Some(root) = self.doc.root {
                debug!("merging duplicate <html>");
                return Ok(Some(root));
            }
        }
        if matches!(elem, ELM_HEAD | ELM_BODY | ELM_FRAMESET) {
            if let Some(root) = self.doc.root {
                if let Some(existing) = self.doc.find_child_element(root, elem) {
                    debug!("merging duplicate <{}>", self.dtd.element(elem).name);
                    return Ok(Some(existing));
                }
            }
        }

        let Some(mut cursor) = self.cursor else {
            return Ok(None);
        };
        let name = self.dtd.element(elem).name;

        if self.insertion_prohibited(elem, cursor) {
            warn!("<{name}> is excluded inside one of its ancestors; dropped");
            self.note_warning();
            return Ok(None);
        }

        let Some(cursor_elem) = self.doc.element_id(cursor) else {
            return Ok(None);
        };

        if can_be_child(self.dtd, cursor_elem, elem, dt) {
            return Ok(Some(self.link_new(cursor, elem)));
        }

        // List content that is not an item gets one synthesized around it.
        if matches!(cursor_elem, ELM_UL | ELM_OL | ELM_DIR | ELM_MENU)
            && can_be_child(self.dtd, ELM_LI, elem, dt)
        {
            warn!("wrapping <{name}> in a synthesized <li>");
            self.note_warning();
            let li = self.link_new(cursor, ELM_LI);
            return Ok(Some(self.link_new(li, elem)));
        }

        // A cell arriving in a table or row group gets its row.
        if matches!(cursor_elem, ELM_TABLE | ELM_THEAD | ELM_TBODY | ELM_TFOOT)
            && matches!(elem, ELM_TH | ELM_TD)
        {
            warn!("wrapping <{name}> in a synthesized <tr>");
            self.note_warning();
            let tr = self.link_new(cursor, ELM_TR);
            return Ok(Some(self.link_new(tr, elem)));
        }

        // Nothing else may leak out of the strict table containers.
        if matches!(
            cursor_elem,
            ELM_TABLE
                | ELM_THEAD
                | ELM_TBODY
                | ELM_TFOOT
                | ELM_TR
                | ELM_COLGROUP
                | ELM_SELECT
                | ELM_OPTGROUP
                | ELM_FRAMESET
        ) {
            warn!(
                "<{name}> cannot appear inside <{}>; dropped",
                self.dtd.element(cursor_elem).name
            );
            self.note_warning();
            return Ok(None);
        }

        // Close open elements until an ancestor accepts it.  head, body,
        // frameset and html bound the walk.
        let mut target = None;
        for anc in self.doc.ancestors_or_self(cursor).skip(1) {
            let Some(anc_elem) = self.doc.element_id(anc) else {
                break;
            };
            if can_be_child(self.dtd, anc_elem, elem, dt) {
                target = Some(anc);
                break;
            }
            if matches!(anc_elem, ELM_HEAD | ELM_BODY | ELM_FRAMESET | ELM_HTML) {
                break;
            }
        }
        if let Some(target) = target {
            let to_close: Vec<NodeId> = self
                .doc
                .ancestors_or_self(cursor)
                .take_while(|&n| n != target)
                .collect();
            for &node in &to_close {
                if let Some(closed) = self.doc.element_id(node) {
                    info!("<{name}> implicitly closes <{}>", self.dtd.element(closed).name);
                }
            }
            for node in to_close {
                self.close(node)?;
            }
            self.cursor = Some(target);
            return Ok(Some(self.link_new(target, elem)));
        }

        // Body content while the head is still open closes the head.
        let body_elem = if dt.is_frame_based() { ELM_FRAMESET } else { ELM_BODY };
        if let Some(root) = self.doc.root {
            let in_head = self
                .doc
                .ancestors_or_self(cursor)
                .any(|n| self.doc.is_element(n, ELM_HEAD));
            if in_head && can_be_child(self.dtd, body_elem, elem, dt) {
                let mut to_close = Vec::new();
                for node in self.doc.ancestors_or_self(cursor) {
                    let is_head = self.doc.is_element(node, ELM_HEAD);
                    to_close.push(node);
                    if is_head {
                        break;
                    }
                }
                for node in to_close {
                    self.close(node)?;
                }
                cursor = root;
                self.cursor = Some(root);
            }
        }

        // At the root, enter or synthesize the proper half of the skeleton.
        if self.doc.is_element(cursor, ELM_HTML) {
            if can_be_child(self.dtd, body_elem, elem, dt) {
                let body = match self.doc.find_child_element(cursor, body_elem) {
                    Some(body) => body,
                    None => {
                        warn!("synthesizing <{}>", self.dtd.element(body_elem).name);
                        self.note_error()?;
                        self.link_new(cursor, body_elem)
                    }
                };
                self.cursor = Some(body);
                return Ok(Some(self.link_new(body, elem)));
            } else if can_be_child(self.dtd, ELM_HEAD, elem, dt) {
                let head = match self.doc.find_child_element(cursor, ELM_HEAD) {
                    Some(head) => head,
                    None => {
                        warn!("synthesizing <head>");
                        self.note_error()?;
                        let head = self.doc.new_element(ELM_HEAD);
                        self.doc.link_first_child(cursor, head);
                        head
                    }
                };
                self.cursor = Some(head);
                return Ok(Some(self.link_new(head, elem)));
            }
        }

        // Inline content in an element-only context gets a paragraph.
        if let Some(cursor_elem) = self.doc.element_id(cursor) {
            if can_be_child(self.dtd, ELM_P, elem, dt)
                && can_be_child(self.dtd, cursor_elem, ELM_P, dt)
            {
                warn!("wrapping <{name}> in a synthesized <p>");
                self.note_warning();
                let p = self.link_new(cursor, ELM_P);
                return Ok(Some(self.link_new(p, elem)));
            }
        }

        // A misplaced style sheet moves into the head; closing it returns
        // the cursor here.
        if elem == ELM_STYLE {
            if let Some(root) = self.doc.root {
                if let Some(head) = self.doc.find_child_element(root, ELM_HEAD) {
                    warn!("relocating <style> into <head>");
                    self.note_warning();
                    let node = self.link_new(head, ELM_STYLE);
                    self.pending_relocation =
                        Some(PendingRelocation { node, return_to: cursor });
                    return Ok(Some(node));
                }
            }
        }

        warn!("no valid place for <{name}>; dropped");
        self.note_error()?;
        Ok(None)
    }

    /// Exclusions the flat content models cannot express.
    fn insertion_prohibited(&self, elem: ElementId, cursor: NodeId) -> bool {
        for anc in self.doc.ancestors_or_self(cursor) {
            let Some(anc_elem) = self.doc.element_id(anc) else {
                continue;
            };
            let excluded = match anc_elem {
                ELM_A => elem == ELM_A,
                ELM_PRE => matches!(
                    elem,
                    ELM_IMG
                        | ELM_OBJECT
                        | ELM_APPLET
                        | ELM_BIG
                        | ELM_SMALL
                        | ELM_SUB
                        | ELM_SUP
                        | ELM_FONT
                        | ELM_BASEFONT
                ),
                ELM_BUTTON => matches!(
                    elem,
                    ELM_INPUT
                        | ELM_SELECT
                        | ELM_TEXTAREA
                        | ELM_LABEL
                        | ELM_BUTTON
                        | ELM_FORM
                        | ELM_FIELDSET
                        | ELM_IFRAME
                        | ELM_ISINDEX
                ),
                ELM_LABEL => elem == ELM_LABEL,
                ELM_FORM => elem == ELM_FORM,
                _ => false,
            };
            if excluded {
                return true;
            }
        }
        false
    }

    /// Re-validate an element-content node as it closes and repair what the
    /// incremental checks could not see.
    pub(super) fn close(&mut self, node: NodeId) -> Result<(), XhtmlError> {
        let dt = self.current_doctype();
        let Some(elem) = self.doc.element_id(node) else {
            return Ok(());
        };
        let def = self.dtd.element(elem);
        if def.content_type(dt) != ContentType::Children {
            return Ok(());
        }
        let Some(model) = def.model(dt) else {
            return Ok(());
        };
        let children = self.doc.element_child_ids(node);
        if is_child_valid(model, &children) == Validity::Valid {
            return Ok(());
        }

        match elem {
            ELM_HTML => self.repair_html_close(node),
            ELM_HEAD => self.repair_head_close(node),
            ELM_UL | ELM_OL | ELM_DIR | ELM_MENU | ELM_DL | ELM_SELECT | ELM_OPTGROUP
            | ELM_FRAMESET
                if children.is_empty() =>
            {
                warn!("empty <{}> removed", def.name);
                self.note_warning();
                self.doc.unlink(node);
                Ok(())
            }
            ELM_TR if children.is_empty() => {
                warn!("adding an empty <td> to a bare <tr>");
                self.note_warning();
                self.link_new(node, ELM_TD);
                Ok(())
            }
            ELM_TABLE | ELM_THEAD | ELM_TBODY | ELM_TFOOT => {
                if children.is_empty() {
                    warn!("empty <{}> removed", def.name);
                    self.note_warning();
                    self.doc.unlink(node);
                    return Ok(());
                }
                // e.g. a caption with no rows behind it
                warn!("adding a minimal row to <{}>", def.name);
                self.note_warning();
                let tr = self.link_new(node, ELM_TR);
                self.link_new(tr, ELM_TD);
                let repaired = self.doc.element_child_ids(node);
                if is_child_valid(model, &repaired) == Validity::Valid {
                    Ok(())
                } else {
                    self.discard_invalid(node)
                }
            }
            _ => self.discard_invalid(node),
        }
    }

    fn discard_invalid(&mut self, node: NodeId) -> Result<(), XhtmlError> {
        let dt = self.current_doctype();
        let name = match self.doc.element_id(node) {
            Some(elem) => self.dtd.element(elem).name,
            None => return Ok(()),
        };
        if self.options.strict {
            warn!("discarding <{name}> whose content does not satisfy the grammar");
            self.note_error()?;
            self.doc.unlink(node);
        } else {
            warn!("content of <{name}> does not satisfy the {} grammar; kept", dt.key());
            self.note_warning();
        }
        Ok(())
    }

    /// Force the root back to `(head, body)` / `(head, frameset)` shape.
    fn repair_html_close(&mut self, html: NodeId) -> Result<(), XhtmlError> {
        warn!("repairing the document skeleton");
        self.note_error()?;
        let dt = self.current_doctype();
        let body_elem = if dt.is_frame_based() { ELM_FRAMESET } else { ELM_BODY };

        let head = match self.doc.find_child_element(html, ELM_HEAD) {
            Some(head) => head,
            None => {
                let head = self.doc.new_element(ELM_HEAD);
                self.doc.link_first_child(html, head);
                self.synthesize_title(head);
                head
            }
        };
        let body = match self.doc.find_child_element(html, body_elem) {
            Some(body) => body,
            None => self.link_new(html, body_elem),
        };
        // head first, body half last, whatever order the input produced.
        self.doc.unlink(body);
        self.doc.link_child(html, body);
        self.doc.unlink(head);
        self.doc.link_first_child(html, head);
        Ok(())
    }

    /// Deduplicate head singletons and guarantee a title.
    fn repair_head_close(&mut self, head: NodeId) -> Result<(), XhtmlError> {
        for elem in [ELM_TITLE, ELM_BASE] {
            let extras: Vec<NodeId> = self
                .doc
                .children(head)
                .iter()
                .copied()
                .filter(|&c| self.doc.is_element(c, elem))
                .skip(1)
                .collect();
            for node in extras {
                warn!("duplicate <{}> in head removed", self.dtd.element(elem).name);
                self.note_warning();
                self.doc.unlink(node);
            }
        }
        if self.doc.find_child_element(head, ELM_TITLE).is_none() {
            warn!("missing <title> synthesized");
            self.note_warning();
            self.synthesize_title(head);
        }

        let dt = self.current_doctype();
        if let Some(model) = self.dtd.element(ELM_HEAD).model(dt) {
            let children = self.doc.element_child_ids(head);
            if is_child_valid(model, &children) != Validity::Valid {
                return self.discard_invalid(head);
            }
        }
        Ok(())
    }

    fn synthesize_title(&mut self, head: NodeId) {
        let title = self.doc.new_element(ELM_TITLE);
        let text = self.doc.new_text("****");
        self.doc.link_child(title, text);
        self.doc.link_first_child(head, title);
    }

    /// Apply the raw attribute pairs of a start tag to `node`.
    pub(super) fn set_attributes(
        &mut self,
        node: NodeId,
        attrs: &[(String, String)],
    ) -> Result<(), XhtmlError> {
        let dt = self.current_doctype();
        let Some(elem) = self.doc.element_id(node) else {
            return Ok(());
        };
        let element = self.dtd.element(elem);

        for (raw_name, raw_value) in attrs {
            let name = raw_name.to_ascii_lowercase();
            let Some(def) = element.attribute(&name, dt) else {
                warn!("attribute '{name}' not allowed on <{}>; dropped", element.name);
                self.note_warning();
                continue;
            };
            if self.doc.get_attribute(node, &name).is_some() {
                debug!("duplicate attribute '{name}' ignored");
                continue;
            }
            let value = escape_bad_references(self.dtd, raw_value);
            if matches!(value, Cow::Owned(_)) {
                warn!("escaping markup characters in the value of '{name}'");
                self.note_warning();
            }
            match validate_attribute(self.dtd, def, &value) {
                AttrCheck::Valid => self.set_node_att(node, def, value.into_owned()),
                AttrCheck::Adjusted(fixed) => {
                    warn!("value of '{name}' adjusted to '{fixed}'");
                    self.note_warning();
                    self.set_node_att(node, def, fixed);
                }
                AttrCheck::Invalid => self.repair_invalid_attribute(node, def, &name, &value),
            }
        }
        self.fix_required_and_defaults(node);
        Ok(())
    }

    fn repair_invalid_attribute(
        &mut self,
        node: NodeId,
        def: &'static AttributeDef,
        name: &str,
        value: &str,
    ) {
        // HTML alignment says center where the image models say middle.
        if name == "align"
            && value.eq_ignore_ascii_case("center")
            && matches!(def.atype, AttributeType::Enumerated(opts) if opts.contains(&"middle"))
        {
            warn!("align=\"center\" rewritten to \"middle\"");
            self.note_warning();
            self.set_node_att(node, def, "middle".to_string());
            return;
        }
        warn!("invalid value '{value}' for attribute '{name}' dropped");
        self.note_warning();
    }

    fn set_node_att(&mut self, node: NodeId, def: &'static AttributeDef, value: String) {
        let value = if def.atype == AttributeType::Id {
            self.register_id(value)
        } else {
            value
        };
        self.doc.set_attribute(node, def, value);
    }

    /// Register an ID value, making it unique with filler characters.
    fn register_id(&mut self, mut value: String) -> String {
        if self.ids.contains(&value) {
            warn!("duplicate id '{value}' made unique");
            self.note_warning();
            while self.ids.contains(&value) {
                value.push('_');
            }
        }
        self.ids.insert(value.clone());
        value
    }

    /// Materialize FIXED attributes, default required ones where a safe
    /// value exists, and mirror `name` into `id` on the legacy elements.
    fn fix_required_and_defaults(&mut self, node: NodeId) {
        let dt = self.current_doctype();
        let Some(elem) = self.doc.element_id(node) else {
            return;
        };
        let element = self.dtd.element(elem);

        for def in element.attlist {
            if def.environment & dt.mask() == 0 {
                continue;
            }
            if self.doc.get_attribute(node, def.name).is_some() {
                continue;
            }
            match def.default_decl {
                DefaultDecl::Fixed => {
                    if let Some(value) = def.default_value {
                        self.doc.set_attribute(node, def, value.to_string());
                    }
                }
                DefaultDecl::Required => {
                    if def.name == "type" && elem == ELM_SCRIPT {
                        let value = match self.doc.get_attribute(node, "language") {
                            Some(language) => format!("text/{}", language.to_ascii_lowercase()),
                            None => "text/javascript".to_string(),
                        };
                        warn!("missing script type defaulted to '{value}'");
                        self.note_warning();
                        self.doc.set_attribute(node, def, value);
                    } else if def.name == "type" && elem == ELM_STYLE {
                        warn!("missing style type defaulted to 'text/css'");
                        self.note_warning();
                        self.doc.set_attribute(node, def, "text/css".to_string());
                    } else {
                        warn!(
                            "required attribute '{}' missing on <{}>",
                            def.name, element.name
                        );
                        self.note_warning();
                    }
                }
                DefaultDecl::Default | DefaultDecl::Implied => {}
            }
        }

        if matches!(
            elem,
            ELM_A | ELM_APPLET | ELM_FORM | ELM_FRAME | ELM_IFRAME | ELM_IMG | ELM_MAP
        ) && self.doc.get_attribute(node, "id").is_none()
        {
            if let Some(name) = self.doc.get_attribute(node, "name") {
                let name = name.to_string();
                if let Some(id_def) = element.attribute("id", dt) {
                    if validate_attribute(self.dtd, id_def, &name) == AttrCheck::Valid {
                        self.set_node_att(node, id_def, name);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        conv::{Conversion, ConvertOptions, Session},
        dtd::Doctype,
        sax::SaxHandler,
        tree::{Document, NodeKind},
    };

    fn session() -> Session {
        Session::new(ConvertOptions::default()).unwrap()
    }

    fn strict_session() -> Session {
        Session::new(ConvertOptions {
            doctype: Some(Doctype::Strict),
            strict: true,
            ..ConvertOptions::default()
        })
        .unwrap()
    }

    fn open(s: &mut Session, name: &str) {
        s.start_element(name, &[]).unwrap();
    }

    fn open_with(s: &mut Session, name: &str, attrs: &[(&str, &str)]) {
        let attrs: Vec<(String, String)> = attrs
            .iter()
            .map(|&(n, v)| (n.to_string(), v.to_string()))
            .collect();
        s.start_element(name, &attrs).unwrap();
    }

    fn end(s: &mut Session, name: &str) {
        s.end_element(name).unwrap();
    }

    /// html > head > title("t"), cursor left at html.
    fn with_head(s: &mut Session) {
        open(s, "html");
        open(s, "head");
        open(s, "title");
        s.characters("t").unwrap();
        end(s, "head");
    }

    fn element_names(doc: &Document, node: NodeId) -> Vec<&'static str> {
        let dtd = crate::dtd::dtd().unwrap();
        doc.element_child_ids(node)
            .into_iter()
            .map(|e| dtd.element(e).name)
            .collect()
    }

    fn text_of(doc: &Document, node: NodeId) -> String {
        let mut out = String::new();
        for &child in doc.children(node) {
            if let NodeKind::Text(text) = &doc.node(child).kind {
                out.push_str(text);
            }
        }
        out
    }

    fn body_of(conv: &Conversion) -> NodeId {
        let root = conv.document.root.unwrap();
        conv.document.find_child_element(root, ELM_BODY).unwrap()
    }

    #[test]
    fn cell_in_bare_table_gets_a_row() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "table");
        open(&mut s, "th");
        s.characters("x").unwrap();
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let table = doc.find_child_element(body_of(&conv), ELM_TABLE).unwrap();
        let tr = doc.find_child_element(table, ELM_TR).unwrap();
        let th = doc.find_child_element(tr, ELM_TH).unwrap();
        assert_eq!(text_of(doc, th), "x");
        assert_eq!(conv.error_count, 0);
        assert_eq!(conv.warning_count, 1);
    }

    #[test]
    fn orphan_text_counts_one_error() {
        let mut s = session();
        s.characters("stray").unwrap();
        with_head(&mut s);
        open(&mut s, "body");
        let conv = s.finish().unwrap();
        assert_eq!(conv.error_count, 1);
        assert_eq!(text_of(&conv.document, body_of(&conv)), "");
    }

    #[test]
    fn headless_input_gets_a_skeleton() {
        let mut s = session();
        open(&mut s, "p");
        s.characters("hi").unwrap();
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let root = doc.root.unwrap();
        assert_eq!(element_names(doc, root), ["head", "body"]);
        let head = doc.find_child_element(root, ELM_HEAD).unwrap();
        let title = doc.find_child_element(head, ELM_TITLE).unwrap();
        assert_eq!(text_of(doc, title), "****");
        let p = doc.find_child_element(body_of(&conv), ELM_P).unwrap();
        assert_eq!(text_of(doc, p), "hi");
        // one for the missing <html>, one for the skeleton repair at close
        assert_eq!(conv.error_count, 2);
    }

    #[test]
    fn head_start_enters_the_head() {
        let mut s = session();
        open(&mut s, "head");
        open(&mut s, "title");
        s.characters("t").unwrap();
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let root = doc.root.unwrap();
        assert_eq!(element_names(doc, root), ["head", "body"]);
        let head = doc.find_child_element(root, ELM_HEAD).unwrap();
        assert_eq!(text_of(doc, doc.find_child_element(head, ELM_TITLE).unwrap()), "t");
    }

    #[test]
    fn block_content_closes_an_open_head() {
        let mut s = session();
        open(&mut s, "html");
        open(&mut s, "head");
        open(&mut s, "title");
        s.characters("t").unwrap();
        open(&mut s, "p");
        s.characters("body text").unwrap();
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let root = doc.root.unwrap();
        assert_eq!(element_names(doc, root), ["head", "body"]);
        let p = doc.find_child_element(body_of(&conv), ELM_P).unwrap();
        assert_eq!(text_of(doc, p), "body text");
        assert_eq!(conv.error_count, 1);
    }

    #[test]
    fn duplicate_ids_are_made_unique() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open_with(&mut s, "p", &[("id", "x")]);
        end(&mut s, "p");
        open_with(&mut s, "p", &[("id", "x")]);
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let body = body_of(&conv);
        let ids: Vec<&str> = doc
            .children(body)
            .iter()
            .filter_map(|&c| doc.get_attribute(c, "id"))
            .collect();
        assert_eq!(ids, ["x", "x_"]);
        assert!(conv.warning_count >= 1);
    }

    #[test]
    fn empty_list_is_removed_at_close() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "ul");
        end(&mut s, "ul");
        let conv = s.finish().unwrap();
        assert!(conv.document.find_child_element(body_of(&conv), ELM_UL).is_none());
    }

    #[test]
    fn missing_required_alt_stays_absent() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open_with(&mut s, "img", &[("src", "logo.png")]);
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let img = doc.find_child_element(body_of(&conv), ELM_IMG).unwrap();
        assert_eq!(doc.get_attribute(img, "src"), Some("logo.png"));
        assert_eq!(doc.get_attribute(img, "alt"), None);
        assert_eq!(conv.warning_count, 1);
        // fixed attributes are materialized without a warning
        let root = doc.root.unwrap();
        assert_eq!(doc.get_attribute(root, "xmlns"), Some(XHTML_NS));
    }

    #[test]
    fn align_center_becomes_middle_on_images() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open_with(&mut s, "img", &[("src", "x"), ("alt", ""), ("align", "center")]);
        let conv = s.finish().unwrap();
        let doc = &conv.document;
        let img = doc.find_child_element(body_of(&conv), ELM_IMG).unwrap();
        assert_eq!(doc.get_attribute(img, "align"), Some("middle"));
    }

    #[test]
    fn misplaced_style_moves_into_the_head() {
        let mut s = strict_session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "p");
        s.characters("a").unwrap();
        open(&mut s, "style");
        s.characters("p{}").unwrap();
        end(&mut s, "style");
        s.characters("b").unwrap();
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let root = doc.root.unwrap();
        let head = doc.find_child_element(root, ELM_HEAD).unwrap();
        let style = doc.find_child_element(head, ELM_STYLE).unwrap();
        assert_eq!(text_of(doc, style), "p{}");
        let p = doc.find_child_element(body_of(&conv), ELM_P).unwrap();
        assert_eq!(text_of(doc, p), "ab");
    }

    #[test]
    fn frame_content_switches_to_frameset() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        end(&mut s, "body");
        open(&mut s, "frameset");
        open_with(&mut s, "frame", &[("src", "a.html")]);
        let conv = s.finish().unwrap();

        assert_eq!(conv.doctype, Doctype::Frameset);
        let doc = &conv.document;
        let root = doc.root.unwrap();
        assert_eq!(element_names(doc, root), ["head", "frameset"]);
        let frameset = doc.find_child_element(root, ELM_FRAMESET).unwrap();
        assert_eq!(element_names(doc, frameset), ["frame"]);
    }

    #[test]
    fn frameset_rejected_after_body_content() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "p");
        s.characters("text").unwrap();
        open(&mut s, "frameset");
        let conv = s.finish().unwrap();
        assert_eq!(conv.doctype, Doctype::Transitional);
        let root = conv.document.root.unwrap();
        assert!(conv.document.find_child_element(root, ELM_FRAMESET).is_none());
    }

    #[test]
    fn duplicate_title_removed_at_head_close() {
        let mut s = session();
        open(&mut s, "html");
        open(&mut s, "head");
        open(&mut s, "title");
        s.characters("a").unwrap();
        end(&mut s, "title");
        open(&mut s, "title");
        s.characters("b").unwrap();
        end(&mut s, "title");
        end(&mut s, "head");
        open(&mut s, "body");
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let root = doc.root.unwrap();
        let head = doc.find_child_element(root, ELM_HEAD).unwrap();
        assert_eq!(element_names(doc, head), ["title"]);
        assert_eq!(text_of(doc, doc.find_child_element(head, ELM_TITLE).unwrap()), "a");
    }

    #[test]
    fn nested_anchor_is_dropped() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "p");
        open_with(&mut s, "a", &[("href", "x")]);
        open_with(&mut s, "a", &[("href", "y")]);
        s.characters("link").unwrap();
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let p = doc.find_child_element(body_of(&conv), ELM_P).unwrap();
        let a = doc.find_child_element(p, ELM_A).unwrap();
        assert!(doc.find_child_element(a, ELM_A).is_none());
        assert_eq!(text_of(doc, a), "link");
    }

    #[test]
    fn inline_in_list_gets_a_list_item() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "ul");
        open(&mut s, "em");
        s.characters("x").unwrap();
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let ul = doc.find_child_element(body_of(&conv), ELM_UL).unwrap();
        let li = doc.find_child_element(ul, ELM_LI).unwrap();
        let em = doc.find_child_element(li, ELM_EM).unwrap();
        assert_eq!(text_of(doc, em), "x");
    }

    #[test]
    fn strict_mode_discards_irreparable_tables() {
        let mut s = strict_session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "table");
        open(&mut s, "col");
        open(&mut s, "caption");
        s.characters("late").unwrap();
        end(&mut s, "caption");
        end(&mut s, "table");
        let conv = s.finish().unwrap();

        assert!(conv.document.find_child_element(body_of(&conv), ELM_TABLE).is_none());
        assert_eq!(conv.error_count, 1);
    }

    #[test]
    fn lenient_mode_keeps_irreparable_tables() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "table");
        open(&mut s, "col");
        open(&mut s, "caption");
        s.characters("late").unwrap();
        end(&mut s, "caption");
        end(&mut s, "table");
        let conv = s.finish().unwrap();
        assert!(conv.document.find_child_element(body_of(&conv), ELM_TABLE).is_some());
        assert_eq!(conv.error_count, 0);
    }

    #[test]
    fn strict_excluded_elements_upgrade_the_doctype() {
        let mut s = session();
        s.doctype_declaration(
            "DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 4.01 Strict//EN\"",
        )
        .unwrap();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "center");
        let conv = s.finish().unwrap();
        assert_eq!(conv.doctype, Doctype::Transitional);
    }

    #[test]
    fn xhtml_public_id_locks_the_doctype() {
        let mut s = session();
        s.doctype_declaration(
            "DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \
             \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\"",
        )
        .unwrap();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "center");
        s.characters("x").unwrap();
        let conv = s.finish().unwrap();
        // the variant stays strict and <center> is dropped
        assert_eq!(conv.doctype, Doctype::Strict);
        assert!(conv.document.find_child_element(body_of(&conv), ELM_CENTER).is_none());
    }

    #[test]
    fn meta_http_equiv_is_removed() {
        let mut s = session();
        open(&mut s, "html");
        open(&mut s, "head");
        open_with(
            &mut s,
            "meta",
            &[("http-equiv", "Content-Type"), ("content", "text/html")],
        );
        open_with(&mut s, "meta", &[("name", "author"), ("content", "jd")]);
        open(&mut s, "title");
        s.characters("t").unwrap();
        end(&mut s, "head");
        open(&mut s, "body");
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let root = doc.root.unwrap();
        let head = doc.find_child_element(root, ELM_HEAD).unwrap();
        let meta = doc.find_child_element(head, ELM_META).unwrap();
        assert_eq!(doc.get_attribute(meta, "name"), Some("author"));
        assert_eq!(
            element_names(doc, head)
                .iter()
                .filter(|&&n| n == "meta")
                .count(),
            1
        );
    }

    #[test]
    fn references_append_as_character_data() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open(&mut s, "p");
        s.reference("amp").unwrap();
        s.reference("#160").unwrap();
        s.reference("percnt").unwrap();
        s.reference("bogus").unwrap();
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let p = doc.find_child_element(body_of(&conv), ELM_P).unwrap();
        assert_eq!(text_of(doc, p), "&amp;&#160;%");
        assert_eq!(conv.warning_count, 1);
    }

    #[test]
    fn name_is_mirrored_into_id() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        open_with(&mut s, "p", &[]);
        open_with(&mut s, "a", &[("name", "top")]);
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let p = doc.find_child_element(body_of(&conv), ELM_P).unwrap();
        let a = doc.find_child_element(p, ELM_A).unwrap();
        assert_eq!(doc.get_attribute(a, "id"), Some("top"));
        assert_eq!(doc.get_attribute(a, "name"), Some("top"));
    }

    #[test]
    fn events_after_the_root_closes_are_dropped() {
        let mut s = session();
        with_head(&mut s);
        open(&mut s, "body");
        s.characters("kept").unwrap();
        end(&mut s, "html");
        s.characters("lost").unwrap();
        open(&mut s, "p");
        let conv = s.finish().unwrap();

        let doc = &conv.document;
        let body = body_of(&conv);
        assert_eq!(text_of(doc, body), "kept");
        assert!(doc.find_child_element(body, ELM_P).is_none());
    }
}
