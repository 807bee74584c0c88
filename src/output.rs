//! XHTML serializer.
//!
//! Character data in the tree is already XML-safe (the tokenizer escapes
//! stray markup characters and references are stored in their `&name;`
//! form), so text nodes are written verbatim.  Elements whose content
//! model is element-only are broken onto separate lines; mixed content is
//! written inline to preserve its whitespace.

use std::{
    borrow::Cow,
    io::{self, Write},
};

use crate::{
    conv::Conversion,
    dtd::{self, ContentType, Doctype, Dtd},
    tree::{Document, NodeId, NodeKind},
};

pub fn write_document<W: Write>(conv: &Conversion, out: &mut W) -> io::Result<()> {
    let dtd = dtd::dtd().map_err(io::Error::other)?;
    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        out,
        "<!DOCTYPE html PUBLIC \"{}\"\n  \"{}\">",
        conv.doctype.public_id(),
        conv.doctype.system_id()
    )?;
    if let Some(root) = conv.document.root {
        write_node(&conv.document, dtd, conv.doctype, root, out)?;
        writeln!(out)?;
    }
    Ok(())
}

fn write_node<W: Write>(
    doc: &Document,
    dtd: &Dtd,
    dt: Doctype,
    node: NodeId,
    out: &mut W,
) -> io::Result<()> {
    match &doc.node(node).kind {
        NodeKind::Text(text) => out.write_all(text.as_bytes()),
        NodeKind::CData(text) => write!(out, "<![CDATA[{text}]]>"),
        NodeKind::Comment(text) => {
            // a comment may not contain "--"
            let safe: Cow<'_, str> = if text.contains("--") {
                Cow::Owned(text.replace("--", "- -"))
            } else {
                Cow::Borrowed(text)
            };
            write!(out, "<!--{safe}-->")
        }
        NodeKind::Element { elem, .. } => {
            let def = dtd.element(*elem);
            write!(out, "<{}", def.name)?;
            for attr in doc.attributes(node) {
                write!(out, " {}=\"{}\"", attr.def.name, escape_attribute(&attr.value))?;
            }
            if def.content_type(dt) == ContentType::Empty {
                return write!(out, " />");
            }
            write!(out, ">")?;
            let element_only = def.content_type(dt) == ContentType::Children;
            if element_only {
                writeln!(out)?;
            }
            for &child in doc.children(node) {
                write_node(doc, dtd, dt, child, out)?;
                if element_only {
                    writeln!(out)?;
                }
            }
            write!(out, "</{}>", def.name)
        }
    }
}

fn escape_attribute(value: &str) -> Cow<'_, str> {
    if value.contains('"') {
        Cow::Owned(value.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        conv::{ConvertOptions, Session},
        parser,
    };

    fn converted(input: &str) -> String {
        let mut session = Session::new(ConvertOptions::default()).unwrap();
        parser::parse(input, &mut session).unwrap();
        let conv = session.finish().unwrap();
        let mut out = Vec::new();
        write_document(&conv, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn minimal_document() {
        let out = converted("<html><head><title>T</title></head><body><p>hi</p></body></html>");
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\"\n  \
             \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd\">\n\
             <html xmlns=\"http://www.w3.org/1999/xhtml\">\n\
             <head>\n\
             <title>T</title>\n\
             </head>\n\
             <body><p>hi</p></body>\n\
             </html>\n"
        );
    }

    #[test]
    fn empty_elements_self_close() {
        let out = converted(
            "<html><head><title>T</title></head><body><p>a<br>b</p></body></html>",
        );
        assert!(out.contains("<p>a<br />b</p>"));
    }

    #[test]
    fn attribute_values_are_quoted_and_escaped() {
        let out = converted(
            "<html><head><title>T</title></head>\
             <body><p title='say \"hi\"'>x</p></body></html>",
        );
        assert!(out.contains("<p title=\"say &quot;hi&quot;\">x</p>"));
    }

    #[test]
    fn comments_survive() {
        let out = converted(
            "<html><head><title>T</title></head><body><!-- a -- b --></body></html>",
        );
        assert!(out.contains("<!-- a - - b -->"));
    }
}
