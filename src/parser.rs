//! Forgiving HTML tokenizer.
//!
//! The lexer never fails on bad markup.  It emits the event stream a real
//! SAX parser would produce for the cleaned-up document, reports every
//! syntax problem through [`SaxHandler::error`], and leaves all structural
//! decisions to the receiver.  Character data is emitted XML-safe: stray
//! `<`, `>` and `&` are escaped here, recognized references arrive as
//! [`SaxHandler::reference`] events.

use log::debug;

use crate::{error::XhtmlError, sax::SaxHandler};

pub fn parse<H: SaxHandler>(input: &str, handler: &mut H) -> Result<(), XhtmlError> {
    Lexer::new(input).run(handler)
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Element whose raw content runs untokenized to its end tag.
    rawtext: Option<&'a str>,
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.')
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Lexer<'a> {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Lexer { input, pos: 0, rawtext: None }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Take an ASCII name starting at the cursor; empty when none starts.
    fn take_name(&mut self) -> &'a str {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        if bytes.get(self.pos).is_some_and(|b| b.is_ascii_alphabetic()) {
            self.pos += 1;
            while bytes.get(self.pos).copied().is_some_and(is_name_byte) {
                self.pos += 1;
            }
        }
        &self.input[start..self.pos]
    }

    fn run<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        while self.pos < self.input.len() {
            if let Some(element) = self.rawtext.take() {
                self.raw_content(element, handler)?;
                continue;
            }
            match self.peek() {
                Some(b'<') => self.markup(handler)?,
                Some(b'&') => self.reference(handler)?,
                _ => self.text(handler)?,
            }
        }
        Ok(())
    }

    /// Character data up to the next markup or reference start.
    fn text<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        let rest = self.rest();
        let end = rest.find(['<', '&']).unwrap_or(rest.len());
        let chunk = &rest[..end];
        self.pos += end;

        if chunk.chars().all(char::is_whitespace) {
            return handler.whitespace();
        }
        let mut clean = String::with_capacity(chunk.len());
        for c in chunk.chars() {
            match c {
                '>' => clean.push_str("&gt;"),
                c if c.is_control() && !matches!(c, '\t' | '\n' | '\r') => handler.error()?,
                c => clean.push(c),
            }
        }
        handler.characters(&clean)
    }

    /// A `&` in character data: a reference event when well formed, an
    /// escaped literal ampersand otherwise.
    fn reference<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        let rest = &self.rest()[1..];
        let bytes = rest.as_bytes();
        let name_len = if bytes.first() == Some(&b'#') {
            let digits = if matches!(bytes.get(1), Some(b'x' | b'X')) {
                let n = bytes[2..].iter().take_while(|b| b.is_ascii_hexdigit()).count();
                if n == 0 { 0 } else { 2 + n }
            } else {
                let n = bytes[1..].iter().take_while(|b| b.is_ascii_digit()).count();
                if n == 0 { 0 } else { 1 + n }
            };
            digits
        } else {
            bytes.iter().take_while(|&&b| is_name_byte(b)).count()
        };

        if name_len > 0 && bytes.get(name_len) == Some(&b';') {
            let name = &rest[..name_len];
            self.pos += 1 + name_len + 1;
            return handler.reference(name);
        }
        handler.error()?;
        self.pos += 1;
        handler.characters("&amp;")
    }

    fn markup<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        let rest = self.rest();
        if rest.starts_with("<!--") {
            return self.comment(handler);
        }
        if rest.starts_with("<![CDATA[") {
            return self.cdata(handler);
        }
        if rest.starts_with("<!") {
            return self.declaration(handler);
        }
        if rest.starts_with("<?") {
            // processing instructions (and the XML declaration) are dropped
            let end = rest.find('>').map_or(rest.len(), |i| i + 1);
            debug!("skipping processing instruction");
            self.pos += end;
            return Ok(());
        }
        if rest.starts_with("</") {
            return self.end_tag(handler);
        }
        if rest.as_bytes().get(1).is_some_and(|b| b.is_ascii_alphabetic()) {
            return self.start_tag(handler);
        }
        // a lone '<' in text
        handler.error()?;
        self.pos += 1;
        handler.characters("&lt;")
    }

    fn comment<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        let rest = &self.rest()[4..];
        match rest.find("-->") {
            Some(end) => {
                self.pos += 4 + end + 3;
                handler.comment(&rest[..end])
            }
            None => {
                handler.error()?;
                self.pos = self.input.len();
                handler.comment(rest)
            }
        }
    }

    fn cdata<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        let rest = &self.rest()[9..];
        match rest.find("]]>") {
            Some(end) => {
                self.pos += 9 + end + 3;
                handler.cdata_section(&rest[..end])
            }
            None => {
                handler.error()?;
                self.pos = self.input.len();
                handler.cdata_section(rest)
            }
        }
    }

    /// `<!DOCTYPE ...>` and any other `<!` declaration.
    fn declaration<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        let rest = &self.rest()[2..];
        let end = rest.find('>').unwrap_or(rest.len());
        let text = &rest[..end];
        self.pos += 2 + end + rest[end..].len().min(1);
        if text.get(..7).is_some_and(|t| t.eq_ignore_ascii_case("doctype")) {
            handler.doctype_declaration(text)
        } else {
            debug!("skipping markup declaration");
            handler.error()
        }
    }

    fn end_tag<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        self.pos += 2;
        let name = self.take_name();
        if name.is_empty() {
            handler.error()?;
            self.skip_past_tag_end();
            return Ok(());
        }
        self.skip_whitespace();
        if self.peek() == Some(b'>') {
            self.pos += 1;
        } else {
            handler.error()?;
            self.skip_past_tag_end();
        }
        handler.end_element(name)
    }

    fn skip_past_tag_end(&mut self) {
        match self.rest().find('>') {
            Some(i) => self.pos += i + 1,
            None => self.pos = self.input.len(),
        }
    }

    fn start_tag<H: SaxHandler>(&mut self, handler: &mut H) -> Result<(), XhtmlError> {
        self.pos += 1;
        let name = self.take_name();
        let mut attrs: Vec<(String, String)> = Vec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => {
                    handler.error()?;
                    break;
                }
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') if self.rest().as_bytes().get(1) == Some(&b'>') => {
                    self.pos += 2;
                    self_closing = true;
                    break;
                }
                _ => self.attribute(&mut attrs, handler)?,
            }
        }

        handler.start_element(name, &attrs)?;
        if self_closing {
            handler.end_element(name)?;
        } else if name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style") {
            self.rawtext = Some(name);
        }
        Ok(())
    }

    fn attribute<H: SaxHandler>(
        &mut self,
        attrs: &mut Vec<(String, String)>,
        handler: &mut H,
    ) -> Result<(), XhtmlError> {
        let name = self.take_name();
        if name.is_empty() {
            // junk byte inside the tag
            handler.error()?;
            self.pos += self.rest().chars().next().map_or(0, char::len_utf8);
            return Ok(());
        }
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            // minimized boolean attribute
            attrs.push((name.to_string(), name.to_string()));
            return Ok(());
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.pos += 1;
                let rest = self.rest();
                match rest.find(quote as char) {
                    Some(end) => {
                        self.pos += end + 1;
                        &rest[..end]
                    }
                    None => {
                        handler.error()?;
                        let end = rest.find('>').unwrap_or(rest.len());
                        self.pos += end;
                        &rest[..end]
                    }
                }
            }
            _ => {
                let rest = self.rest();
                let end = rest
                    .find(|c: char| c.is_ascii_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                &rest[..end]
            }
        };
        attrs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    /// Raw content of script and style, ending at the matching end tag.
    fn raw_content<H: SaxHandler>(
        &mut self,
        element: &str,
        handler: &mut H,
    ) -> Result<(), XhtmlError> {
        let rest = self.rest();
        let haystack = rest.to_ascii_lowercase();
        let needle = format!("</{}", element.to_ascii_lowercase());

        let mut end = None;
        for (i, _) in haystack.match_indices(&needle) {
            let after = haystack.as_bytes().get(i + needle.len());
            if after.is_none_or(|&b| b.is_ascii_whitespace() || b == b'>' || b == b'/') {
                end = Some(i);
                break;
            }
        }
        let (content, consumed) = match end {
            Some(i) => (&rest[..i], i),
            None => {
                handler.error()?;
                (rest, rest.len())
            }
        };
        self.pos += consumed;
        if content.chars().all(char::is_whitespace) {
            return Ok(());
        }
        handler.cdata_section(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every event as one formatted line.
    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SaxHandler for Recorder {
        fn start_element(
            &mut self,
            name: &str,
            attrs: &[(String, String)],
        ) -> Result<(), XhtmlError> {
            let mut line = format!("start {name}");
            for (n, v) in attrs {
                line.push_str(&format!(" {n}={v}"));
            }
            self.events.push(line);
            Ok(())
        }

        fn end_element(&mut self, name: &str) -> Result<(), XhtmlError> {
            self.events.push(format!("end {name}"));
            Ok(())
        }

        fn characters(&mut self, text: &str) -> Result<(), XhtmlError> {
            self.events.push(format!("text {text}"));
            Ok(())
        }

        fn whitespace(&mut self) -> Result<(), XhtmlError> {
            self.events.push("ws".to_string());
            Ok(())
        }

        fn cdata_section(&mut self, text: &str) -> Result<(), XhtmlError> {
            self.events.push(format!("cdata {text}"));
            Ok(())
        }

        fn comment(&mut self, text: &str) -> Result<(), XhtmlError> {
            self.events.push(format!("comment {text}"));
            Ok(())
        }

        fn doctype_declaration(&mut self, text: &str) -> Result<(), XhtmlError> {
            self.events.push(format!("doctype {text}"));
            Ok(())
        }

        fn reference(&mut self, name: &str) -> Result<(), XhtmlError> {
            self.events.push(format!("ref {name}"));
            Ok(())
        }

        fn error(&mut self) -> Result<(), XhtmlError> {
            self.events.push("error".to_string());
            Ok(())
        }
    }

    fn events(input: &str) -> Vec<String> {
        let mut recorder = Recorder::default();
        parse(input, &mut recorder).unwrap();
        recorder.events
    }

    #[test]
    fn tokenizes_a_simple_document() {
        assert_eq!(
            events("<html><head><title>Hi</title></head>\n</html>"),
            [
                "start html",
                "start head",
                "start title",
                "text Hi",
                "end title",
                "end head",
                "ws",
                "end html",
            ]
        );
    }

    #[test]
    fn attribute_forms() {
        assert_eq!(
            events("<a href=\"x\" CLASS='y z' rel=next selected>go</a>"),
            ["start a href=x CLASS=y z rel=next selected=selected", "text go", "end a"]
        );
    }

    #[test]
    fn self_closing_tag_emits_both_events() {
        assert_eq!(events("<br/><hr />"), ["start br", "end br", "start hr", "end hr"]);
    }

    #[test]
    fn doctype_and_comment() {
        assert_eq!(
            events("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\"><!-- note -->"),
            [
                "doctype DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\"",
                "comment  note ",
            ]
        );
    }

    #[test]
    fn references_and_bad_ampersands() {
        assert_eq!(
            events("a &amp; b&#160;c &#xA9; &broken x"),
            [
                "text a ",
                "ref amp",
                "text  b",
                "ref #160",
                "text c ",
                "ref #xA9",
                "ws",
                "error",
                "text &amp;",
                "text broken x",
            ]
        );
    }

    #[test]
    fn stray_angle_brackets_are_escaped() {
        assert_eq!(
            events("a < b > c"),
            ["text a ", "error", "text &lt;", "text  b &gt; c"]
        );
    }

    #[test]
    fn script_content_is_raw() {
        assert_eq!(
            events("<script>if (a<b && c>d) x();</script>"),
            ["start script", "cdata if (a<b && c>d) x();", "end script"]
        );
    }

    #[test]
    fn style_end_tag_matching_is_case_insensitive() {
        assert_eq!(
            events("<style>p > em { color: red }</STYLE >"),
            ["start style", "cdata p > em { color: red }", "end STYLE"]
        );
    }

    #[test]
    fn explicit_cdata_section() {
        assert_eq!(events("<p><![CDATA[1 < 2]]></p>"), [
            "start p",
            "cdata 1 < 2",
            "end p"
        ]);
    }

    #[test]
    fn unterminated_comment_reports_an_error() {
        assert_eq!(events("<p><!-- oops"), ["start p", "error", "comment  oops"]);
    }

    #[test]
    fn junk_in_tags_is_skipped() {
        assert_eq!(events("<p =>x</p"), ["error", "start p", "text x", "error", "end p"]);
    }

    #[test]
    fn processing_instructions_are_dropped() {
        assert_eq!(events("<?xml version=\"1.0\"?><p>x</p>"), [
            "start p",
            "text x",
            "end p"
        ]);
    }
}
