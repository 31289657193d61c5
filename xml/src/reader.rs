use sexp::{Atom, Value};

use crate::error::Error;

#[derive(Debug)]
struct Frame {
    tag: String,
    children: Vec<Value>,
}

/// Builds a tree from a stream of markup events.
///
/// The stream is the usual start / text / end shape a markup parser
/// produces. Open elements live on an explicit stack of frames, and text
/// accumulates in one shared buffer until the next element boundary, so
/// chunked text callbacks land in a single run.
///
/// Tags with the `star` prefix always rebuild the split form: `<starset>`
/// becomes `(* set ...)` even when the document came from a compact
/// `*set` head.
///
/// Errors are terminal. After one, the stream has no meaningful
/// continuation and the reader should be dropped.
#[derive(Debug, Default)]
pub struct Reader {
    stack: Vec<Frame>,
    pending: String,
    root: Option<Value>,
}

impl Reader {
    pub fn new() -> Self {
        Reader::default()
    }

    pub fn element_start(&mut self, tag: &str) -> Result<(), Error> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(Error::SecondRoot(tag.to_string()));
        }
        self.flush()?;
        self.stack.push(Frame {
            tag: tag.to_string(),
            children: Vec::new(),
        });
        Ok(())
    }

    /// Takes a text chunk as-is. Parsers may split one run across many
    /// callbacks; the chunks are joined before any atom is cut.
    pub fn text(&mut self, chunk: &str) {
        self.pending.push_str(chunk);
    }

    pub fn element_end(&mut self, tag: &str) -> Result<(), Error> {
        self.flush()?;
        let frame = match self.stack.pop() {
            Some(frame) => frame,
            None => return Err(Error::UnbalancedClose(tag.to_string())),
        };
        if frame.tag != tag {
            return Err(Error::MismatchedClose {
                expected: frame.tag,
                found: tag.to_string(),
            });
        }
        let value = assemble(frame.tag, frame.children);
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(value),
            None => self.root = Some(value),
        }
        Ok(())
    }

    /// Ends the stream and hands back the tree. `Ok(None)` means the
    /// stream held no elements at all.
    pub fn finish(self) -> Result<Option<Value>, Error> {
        if !self.stack.is_empty() {
            return Err(Error::Truncated(self.stack.len()));
        }
        if !self.pending.trim().is_empty() {
            return Err(Error::TextOutsideElement);
        }
        Ok(self.root)
    }

    // Cuts the buffered text into atoms and attaches them to the open
    // element. Outside any element only whitespace is allowed.
    fn flush(&mut self) -> Result<(), Error> {
        let run = std::mem::take(&mut self.pending);
        match self.stack.last_mut() {
            Some(frame) => {
                let atoms = sexp::text::parse_run(&run).map_err(Error::Run)?;
                frame.children.extend(atoms.into_iter().map(Value::Atom));
            }
            None => {
                if !run.trim().is_empty() {
                    return Err(Error::TextOutsideElement);
                }
            }
        }
        Ok(())
    }
}

fn assemble(tag: String, children: Vec<Value>) -> Value {
    let mut items = Vec::with_capacity(children.len() + 2);
    if tag == "star" {
        items.push(Value::Atom(Atom::from("*")));
    } else if let Some(suffix) = tag.strip_prefix("star") {
        items.push(Value::Atom(Atom::from("*")));
        items.push(Value::Atom(Atom::from(suffix)));
    } else {
        items.push(Value::Atom(Atom::from(tag)));
    }
    items.extend(children);
    Value::List(items)
}

/// Parses a complete document and rebuilds its tree.
///
/// Comments and processing instructions are skipped. Attributes are not
/// part of the dialect and reject the document.
pub fn read_document(text: &str) -> Result<Value, Error> {
    let document = roxmltree::Document::parse(text).map_err(|e| Error::Parse(e.to_string()))?;
    let mut reader = Reader::new();
    walk(&mut reader, document.root())?;
    match reader.finish()? {
        Some(root) => Ok(root),
        None => Err(Error::Parse("document has no root element".to_string())),
    }
}

fn walk(reader: &mut Reader, node: roxmltree::Node) -> Result<(), Error> {
    for child in node.children() {
        if child.is_element() {
            if child.attributes().next().is_some() {
                return Err(Error::UnexpectedAttributes(
                    child.tag_name().name().to_string(),
                ));
            }
            reader.element_start(child.tag_name().name())?;
            walk(reader, child)?;
            reader.element_end(child.tag_name().name())?;
        } else if child.is_text() {
            reader.text(child.text().unwrap_or(""));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sexp::{Atom, Value};

    use crate::error::Error;
    use crate::reader::{Reader, read_document};

    #[rstest(input, expected,
        case("<cert>\n  x\n  y\n</cert>\n", Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::from("x")),
            Value::Atom(Atom::from("y")),
        ])),
        case("<star/>\n", Value::List(vec![Value::Atom(Atom::from("*"))])),
        case("<starset>\n  a\n</starset>\n", Value::List(vec![
            Value::Atom(Atom::from("*")),
            Value::Atom(Atom::from("set")),
            Value::Atom(Atom::from("a")),
        ])),
        case("<starfoo/>\n", Value::List(vec![
            Value::Atom(Atom::from("*")),
            Value::Atom(Atom::from("foo")),
        ])),
        case("<cert><hash>#cafe#</hash></cert>", Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::List(vec![
                Value::Atom(Atom::from("hash")),
                Value::Atom(Atom::new(vec![0xca, 0xfe])),
            ]),
        ])),
        case("<cert>\"a&lt;b\"</cert>", Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::from("a<b")),
        ])),
        case("<cert><![CDATA[\"a<b\"]]></cert>", Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::from("a<b")),
        ])),
        case("<cert><!-- note -->x</cert>", Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::from("x")),
        ])),
        case("<cert>\n</cert>\n", Value::List(vec![Value::Atom(Atom::from("cert"))])),
    )]
    fn test_read_document(input: &str, expected: Value) {
        let actual = read_document(input).unwrap();

        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case("<cert x=\"1\"/>", Error::UnexpectedAttributes("cert".to_string())),
        case("<cert>(x)</cert>", Error::Run(sexp::error::Error::Token(
            token::error::Error::UnexpectedChar('('),
        ))),
    )]
    fn test_read_document_error(input: &str, expected: Error) {
        if let Err(e) = read_document(input) {
            assert_eq!(expected, e);
        } else {
            panic!("this test should return an error")
        }
    }

    #[rstest]
    fn test_read_document_malformed() {
        match read_document("<cert>") {
            Err(Error::Parse(_)) => {}
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[rstest]
    fn test_reader_splits_text_chunks() {
        let mut reader = Reader::new();
        reader.element_start("cert").unwrap();
        reader.text("ab");
        reader.text("c");
        reader.element_end("cert").unwrap();

        let root = reader.finish().unwrap();
        let expected = Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::from("abc")),
        ]);
        assert_eq!(Some(expected), root);
    }

    #[rstest]
    fn test_reader_hinted_text() {
        let mut reader = Reader::new();
        reader.element_start("cert").unwrap();
        reader.text("[png]#cafe#");
        reader.element_end("cert").unwrap();

        let root = reader.finish().unwrap();
        let expected = Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::with_hint(vec![0xca, 0xfe], b"png".to_vec())),
        ]);
        assert_eq!(Some(expected), root);
    }

    #[rstest]
    fn test_reader_nested() {
        let mut reader = Reader::new();
        reader.element_start("cert").unwrap();
        reader.element_start("name").unwrap();
        reader.text("bob");
        reader.element_end("name").unwrap();
        reader.element_end("cert").unwrap();

        let root = reader.finish().unwrap();
        let expected = Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::List(vec![
                Value::Atom(Atom::from("name")),
                Value::Atom(Atom::from("bob")),
            ]),
        ]);
        assert_eq!(Some(expected), root);
    }

    #[rstest]
    fn test_reader_mismatched_close() {
        let mut reader = Reader::new();
        reader.element_start("a").unwrap();

        if let Err(e) = reader.element_end("b") {
            assert_eq!(
                Error::MismatchedClose {
                    expected: "a".to_string(),
                    found: "b".to_string(),
                },
                e
            );
        } else {
            panic!("this test should return an error")
        }
    }

    #[rstest]
    fn test_reader_unbalanced_close() {
        let mut reader = Reader::new();

        if let Err(e) = reader.element_end("a") {
            assert_eq!(Error::UnbalancedClose("a".to_string()), e);
        } else {
            panic!("this test should return an error")
        }
    }

    #[rstest]
    fn test_reader_second_root() {
        let mut reader = Reader::new();
        reader.element_start("a").unwrap();
        reader.element_end("a").unwrap();

        if let Err(e) = reader.element_start("b") {
            assert_eq!(Error::SecondRoot("b".to_string()), e);
        } else {
            panic!("this test should return an error")
        }
    }

    #[rstest]
    fn test_reader_truncated() {
        let mut reader = Reader::new();
        reader.element_start("a").unwrap();
        reader.element_start("b").unwrap();

        if let Err(e) = reader.finish() {
            assert_eq!(Error::Truncated(2), e);
        } else {
            panic!("this test should return an error")
        }
    }

    #[rstest]
    fn test_reader_text_before_root() {
        let mut reader = Reader::new();
        reader.text("junk");

        if let Err(e) = reader.element_start("a") {
            assert_eq!(Error::TextOutsideElement, e);
        } else {
            panic!("this test should return an error")
        }
    }

    #[rstest]
    fn test_reader_text_after_root() {
        let mut reader = Reader::new();
        reader.element_start("a").unwrap();
        reader.element_end("a").unwrap();
        reader.text("junk");

        if let Err(e) = reader.finish() {
            assert_eq!(Error::TextOutsideElement, e);
        } else {
            panic!("this test should return an error")
        }
    }

    #[rstest]
    fn test_reader_empty_stream() {
        let reader = Reader::new();

        assert_eq!(None, reader.finish().unwrap());
    }

    #[rstest]
    fn test_reader_whitespace_only_stream() {
        let mut reader = Reader::new();
        reader.text("  \n");

        assert_eq!(None, reader.finish().unwrap());
    }
}
