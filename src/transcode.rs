//! `.hdev` program files
//!
//! A program is persisted as XML with one element per line:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <hdevelop>
//!   <body>
//!     <l>read_image(Image, 'board')</l>
//!     <c>this is a comment</c>
//!   </body>
//! </hdevelop>
//! ```
//!
//! `l` holds a code line verbatim. `c` holds the body of a comment line,
//! without its `*` marker. Decoding gives back the `c` text as is, so a
//! comment line comes back without its marker.

use std::fs;
use std::io::Write;
use std::path::Path;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::debug;

use crate::document::{comment_body, is_comment, Document};
use crate::error::{ParseError, Result};

/// Root element of a program file
pub const ROOT_TAG: &str = "hdevelop";
/// Container of the line elements
pub const BODY_TAG: &str = "body";
/// Code line element
pub const CODE_TAG: &str = "l";
/// Comment line element
pub const COMMENT_TAG: &str = "c";
/// Spaces per nesting level in written files
pub const INDENT_WIDTH: usize = 2;

/// One persisted line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramNode<'a> {
    /// Code line, exact text
    Code(&'a str),
    /// Comment line body
    Comment(&'a str),
}

impl<'a> ProgramNode<'a> {
    /// Node for one document line
    pub fn from_line(text: &'a str) -> Self {
        if is_comment(text) {
            ProgramNode::Comment(comment_body(text))
        } else {
            ProgramNode::Code(text)
        }
    }

    /// Element name
    pub fn tag(&self) -> &'static str {
        match self {
            ProgramNode::Code(_) => CODE_TAG,
            ProgramNode::Comment(_) => COMMENT_TAG,
        }
    }

    /// Element text content
    pub fn text(&self) -> &'a str {
        match self {
            ProgramNode::Code(text) | ProgramNode::Comment(text) => text,
        }
    }
}

/// Nodes for every line of a document, in order
pub fn nodes(document: &Document) -> impl Iterator<Item = ProgramNode<'_>> {
    document.lines().iter().map(|line| ProgramNode::from_line(line.text()))
}

/// Read a program file
///
/// Both unreadable files and malformed XML are reported as [`ParseError`].
pub fn load(path: &Path) -> std::result::Result<Document, ParseError> {
    let bytes = fs::read(path).map_err(ParseError::Read)?;
    let document = decode(&bytes)?;
    debug!("loaded {} lines from {}", document.len(), path.display());
    Ok(document)
}

/// Write a program file
///
/// The file is only touched once the whole program has been encoded.
pub fn save(document: &Document, path: &Path) -> Result<()> {
    let bytes = encode(document)?;
    fs::write(path, bytes)?;
    debug!("saved {} lines to {}", document.len(), path.display());
    Ok(())
}

/// Encode a document as program XML
pub fn encode(document: &Document) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    encode_to(document, &mut bytes)?;
    Ok(bytes)
}

/// Encode a document as program XML into `out`
pub fn encode_to<W: Write>(document: &Document, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', INDENT_WIDTH);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(BytesStart::new(ROOT_TAG)))?;

    if document.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(BODY_TAG)))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new(BODY_TAG)))?;
        for node in nodes(document) {
            let tag = node.tag();
            if node.text().is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(tag)))?;
            } else {
                writer.write_event(Event::Start(BytesStart::new(tag)))?;
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
                    node.text(),
                ))))?;
                writer.write_event(Event::End(BytesEnd::new(tag)))?;
            }
        }
        writer.write_event(Event::End(BytesEnd::new(BODY_TAG)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_TAG)))?;
    writer.get_mut().write_all(b"\n")?;
    Ok(())
}

/// Decode program XML into a document
///
/// Every `l` and `c` element anywhere under the root (the root included)
/// becomes one line, in document order. Other elements are walked through
/// but add no line.
pub fn decode(bytes: &[u8]) -> std::result::Result<Document, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    let mut decoder = Decoder::default();

    loop {
        let position = reader.buffer_position() as u64;
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(source) => {
                return Err(ParseError::Xml {
                    position: reader.buffer_position() as u64,
                    source,
                })
            }
        };

        match event {
            Event::Start(e) => decoder.enter(e.name().as_ref(), position)?,
            Event::Empty(e) => {
                decoder.enter(e.name().as_ref(), position)?;
                decoder.leave(e.name().as_ref(), position)?;
            }
            Event::End(e) => decoder.leave(e.name().as_ref(), position)?,
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|source| ParseError::Xml { position, source })?;
                decoder.text(&text, position)?;
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                let text = std::str::from_utf8(&raw)
                    .map_err(|source| ParseError::Utf8 { position, source })?;
                decoder.text(text, position)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctypes
            _ => {}
        }
    }

    decoder.finish()
}

/// An element that has been opened but not yet closed
#[derive(Debug)]
struct OpenElement {
    tag: String,
    /// Index of the line this element collects text into
    line: Option<usize>,
    /// Text after the first child element is not part of the line
    has_child: bool,
}

#[derive(Debug, Default)]
struct Decoder {
    lines: Vec<String>,
    open: Vec<OpenElement>,
    root_seen: bool,
}

impl Decoder {
    fn enter(&mut self, name: &[u8], position: u64) -> std::result::Result<(), ParseError> {
        match self.open.last_mut() {
            Some(parent) => parent.has_child = true,
            None if self.root_seen => return Err(ParseError::TrailingContent { position }),
            None => self.root_seen = true,
        }

        let tag = String::from_utf8_lossy(name).into_owned();
        let line = if tag == CODE_TAG || tag == COMMENT_TAG {
            self.lines.push(String::new());
            Some(self.lines.len() - 1)
        } else {
            None
        };

        self.open.push(OpenElement {
            tag,
            line,
            has_child: false,
        });
        Ok(())
    }

    fn leave(&mut self, name: &[u8], position: u64) -> std::result::Result<(), ParseError> {
        match self.open.pop() {
            Some(_) => Ok(()),
            None => Err(ParseError::UnexpectedEnd {
                tag: String::from_utf8_lossy(name).into_owned(),
                position,
            }),
        }
    }

    fn text(&mut self, text: &str, position: u64) -> std::result::Result<(), ParseError> {
        match self.open.last() {
            Some(OpenElement {
                line: Some(idx),
                has_child: false,
                ..
            }) => {
                self.lines[*idx].push_str(text);
                Ok(())
            }
            Some(_) => Ok(()),
            None if text.trim().is_empty() => Ok(()),
            None => Err(ParseError::TrailingContent { position }),
        }
    }

    fn finish(self) -> std::result::Result<Document, ParseError> {
        if let Some(element) = self.open.last() {
            return Err(ParseError::Unclosed {
                tag: element.tag.clone(),
            });
        }
        if !self.root_seen {
            return Err(ParseError::MissingRoot);
        }
        Ok(Document::from_lines(self.lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use crate::line::Line;

    fn texts(document: &Document) -> Vec<&str> {
        document.lines().iter().map(Line::text).collect()
    }

    fn encode_str(document: &Document) -> String {
        String::from_utf8(encode(document).unwrap()).unwrap()
    }

    #[test]
    fn test_encode_example_program() {
        let document = Document::from_lines([
            "read_image(Image, 'board')",
            "* this is a comment",
            "threshold(Image, Region, 0, 128)",
        ]);

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                        <hdevelop>\n\
                        \x20 <body>\n\
                        \x20   <l>read_image(Image, 'board')</l>\n\
                        \x20   <c>this is a comment</c>\n\
                        \x20   <l>threshold(Image, Region, 0, 128)</l>\n\
                        \x20 </body>\n\
                        </hdevelop>\n";
        assert_eq!(encode_str(&document), expected);
    }

    #[test]
    fn test_nodes() {
        let document = Document::from_lines(["stop", "  ** note ", ""]);
        let nodes: Vec<_> = nodes(&document).collect();
        assert_eq!(
            nodes,
            vec![
                ProgramNode::Code("stop"),
                ProgramNode::Comment("** note"),
                ProgramNode::Code(""),
            ]
        );
        assert_eq!(nodes[1].tag(), COMMENT_TAG);
        assert_eq!(nodes[2].tag(), CODE_TAG);
    }

    #[test]
    fn test_code_lines_round_trip_exactly() {
        let document = Document::from_lines([
            "read_image(Image, 'board')",
            "",
            "    for I := 1 to 10 by 1   ",
            "\tif (A < B and C > D & E)",
            r#"write_image(Image, "png", 0, "result")"#,
            "X := '<tag>&amp;'",
            "   ",
            "gen_circle(Circle, 100, 100, 50) // ünïcode ✓",
        ]);

        let decoded = decode(&encode(&document).unwrap()).unwrap();
        assert_eq!(decoded, document);
    }

    #[test]
    fn test_comment_lines_come_back_without_marker() {
        // Load-edit-save is not a fixed point for comments: the decoded
        // line has lost its `*` and would be saved as code next time.
        let document = Document::from_lines(["*   this is a comment  ", "stop"]);
        let decoded = decode(&encode(&document).unwrap()).unwrap();
        assert_eq!(texts(&decoded), vec!["this is a comment", "stop"]);

        let resaved: Vec<_> = nodes(&decoded).collect();
        assert_eq!(resaved[0], ProgramNode::Code("this is a comment"));
    }

    #[test]
    fn test_indented_comment_round_trip() {
        let document = Document::from_lines([
            "for I := 1 to 3 by 1",
            "    * note",
            "\t** banner **  ",
            "endfor",
        ]);

        let xml = encode_str(&document);
        assert!(xml.contains("<c>* note</c>"));
        assert!(xml.contains("<c>** banner **</c>"));

        let decoded = decode(xml.as_bytes()).unwrap();
        assert_eq!(
            texts(&decoded),
            vec!["for I := 1 to 3 by 1", "* note", "** banner **", "endfor"]
        );
    }

    #[test]
    fn test_empty_document() {
        let xml = encode_str(&Document::new());
        assert!(xml.contains("<body/>"));
        assert!(decode(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_decode_walks_all_descendants() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<hdevelop file_version="1.2">
  <procedure name="main">
    <interface/>
    <body>
      <l>read_image(Image, 'a')</l>
      <c>* kept verbatim</c>
      <ignored><l>nested</l></ignored>
      <l/>
      <c></c>
    </body>
  </procedure>
  <l>after body</l>
</hdevelop>"#;

        let document = decode(xml.as_bytes()).unwrap();
        assert_eq!(
            texts(&document),
            vec![
                "read_image(Image, 'a')",
                "* kept verbatim",
                "nested",
                "",
                "",
                "after body",
            ]
        );
    }

    #[test]
    fn test_decode_text_before_first_child_only() {
        let xml = "<p><l>a &amp; b<![CDATA[ <c> ]]><!-- skipped -->c<x/>tail</l></p>";
        let document = decode(xml.as_bytes()).unwrap();
        assert_eq!(texts(&document), vec!["a & b <c> c"]);
    }

    #[test]
    fn test_root_element_can_be_a_line() {
        let document = decode(b"<l>stop</l>").unwrap();
        assert_eq!(texts(&document), vec!["stop"]);
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let cases: &[&[u8]] = &[
            b"<hdevelop><body><l>stop</body></hdevelop>",
            b"<hdevelop><body><l>stop</l>",
            b"<hdevelop><body><l",
            b"",
            b"   ",
            b"<a/><b/>",
            b"<a/>junk",
            b"</a>",
            b"<l>&bogus;</l>",
        ];
        for case in cases {
            assert!(
                decode(case).is_err(),
                "expected failure for {:?}",
                String::from_utf8_lossy(case)
            );
        }
    }

    #[test]
    fn test_parse_error_kinds() {
        assert!(matches!(
            decode(b"<hdevelop><body>"),
            Err(ParseError::Unclosed { tag }) if tag == "body"
        ));
        assert!(matches!(decode(b"<!-- only -->"), Err(ParseError::MissingRoot)));
        assert!(matches!(
            decode(b"<a/><b/>"),
            Err(ParseError::TrailingContent { .. })
        ));
        assert!(matches!(
            decode(b"<a></b>"),
            Err(ParseError::Xml { .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.hdev");
        let document = Document::from_lines(["dev_close_window()", "  stop  "]);

        save(&document, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, document);
    }

    #[test]
    fn test_load_missing_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("missing.hdev"));
        assert!(matches!(result, Err(ParseError::Read(_))));
    }

    #[test]
    fn test_save_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.hdev");
        let result = save(&Document::from_lines(["stop"]), &path);
        assert!(matches!(result, Err(EditorError::Io(_))));
    }
}
