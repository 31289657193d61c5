use regex::Regex;
use sexp::{Atom, Value};

use crate::error::Error;

const INDENT: &str = "  ";
const LINE_WIDTH: usize = 72;

/// Renders a tree as an indented markup document.
///
/// Lists become elements named by their type tag and atoms become token
/// text lines, two spaces deeper per level. Childless elements self-close.
/// Hex and base64 tokens longer than the soft line width wrap across
/// lines, so atoms of any size survive the trip. Every emitted line ends
/// with a newline.
///
/// Star-convention heads merge into the tag: `(* set a)` renders as
/// `<starset>`. A compact `*set` head renders the same way, so reading
/// the document back yields the split form. That normalization is the
/// one place the round trip is not literal.
pub fn write(root: &Value) -> Result<String, Error> {
    let mut out = String::new();
    write_value(root, 0, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, depth: usize, out: &mut String) -> Result<(), Error> {
    match value {
        Value::Atom(atom) => {
            write_atom(atom, depth, out);
            Ok(())
        }
        Value::List(items) => write_element(items, depth, out),
    }
}

fn write_element(items: &[Value], depth: usize, out: &mut String) -> Result<(), Error> {
    let (name, lead, rest) = resolve_tag(items)?;
    let indent = INDENT.repeat(depth);
    if lead.is_none() && rest.is_empty() {
        out.push_str(&indent);
        out.push_str(format!("<{}/>", name).as_str());
        out.push('\n');
        return Ok(());
    }
    out.push_str(&indent);
    out.push_str(format!("<{}>", name).as_str());
    out.push('\n');
    if let Some(lead) = &lead {
        write_atom(lead, depth + 1, out);
    }
    for item in rest {
        write_value(item, depth + 1, out)?;
    }
    out.push_str(&indent);
    out.push_str(format!("</{}>", name).as_str());
    out.push('\n');
    Ok(())
}

fn write_atom(atom: &Atom, depth: usize, out: &mut String) {
    let indent = INDENT.repeat(depth);
    let escaped = escape(&token::encode(atom.as_bytes(), atom.hint()));
    out.push_str(&token::wrap(&escaped, &indent, LINE_WIDTH));
    out.push('\n');
}

// Maps a list to its element name plus what to render inside. A star
// head that cannot merge falls back to a literal `<star>` element, with
// the unmergeable suffix returned as a lead atom to render first.
fn resolve_tag(items: &[Value]) -> Result<(String, Option<Atom>, &[Value]), Error> {
    let head = sexp::type_tag(items).map_err(Error::Model)?;
    if head.hint().is_some() {
        return Err(Error::HintedTag);
    }
    let bytes = head.as_bytes();
    if bytes == b"*" {
        if let Some(Value::Atom(second)) = items.get(1) {
            if second.hint().is_none() {
                if let Ok(suffix) = std::str::from_utf8(second.as_bytes()) {
                    if let Some(name) = star_merge(suffix)? {
                        return Ok((name, None, &items[2..]));
                    }
                }
            }
        }
        return Ok(("star".to_string(), None, &items[1..]));
    }
    if let Some(suffix) = bytes.strip_prefix(b"*") {
        if let Ok(s) = std::str::from_utf8(suffix) {
            if let Some(name) = star_merge(s)? {
                return Ok((name, None, &items[1..]));
            }
        }
        return Ok((
            "star".to_string(),
            Some(Atom::new(suffix.to_vec())),
            &items[1..],
        ));
    }
    let name = std::str::from_utf8(bytes)
        .map_err(|_| Error::UnsupportedTag(String::from_utf8_lossy(bytes).into_owned()))?;
    if !legal_tag(name)? {
        return Err(Error::UnsupportedTag(name.to_string()));
    }
    if name.starts_with("star") {
        return Err(Error::ReservedTag(name.to_string()));
    }
    Ok((name.to_string(), None, &items[1..]))
}

// `star` plus the suffix must itself be a legal tag for the merged
// spelling to read back to the same suffix.
fn star_merge(suffix: &str) -> Result<Option<String>, Error> {
    if suffix.is_empty() {
        return Ok(None);
    }
    let name = format!("star{}", suffix);
    if legal_tag(&name)? {
        Ok(Some(name))
    } else {
        Ok(None)
    }
}

fn legal_tag(name: &str) -> Result<bool, Error> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9._-]*$")
        .map_err(|_| Error::UnsupportedTag(name.to_string()))?;
    Ok(re.is_match(name))
}

// Escapes only the characters the markup layer consumes itself.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use sexp::{Atom, Value};

    use crate::error::Error;
    use crate::writer::write;

    #[rstest(input, expected,
        case(Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::from("x")),
            Value::Atom(Atom::from("y")),
        ]), "<cert>\n  x\n  y\n</cert>\n"),
        case(Value::List(vec![Value::Atom(Atom::from("*"))]), "<star/>\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("*")),
            Value::Atom(Atom::from("set")),
            Value::Atom(Atom::from("a")),
        ]), "<starset>\n  a\n</starset>\n"),
        case(Value::List(vec![Value::Atom(Atom::from("*foo"))]), "<starfoo/>\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("*")),
            Value::Atom(Atom::from("set")),
        ]), "<starset/>\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("*set")),
            Value::Atom(Atom::from("a")),
        ]), "<starset>\n  a\n</starset>\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::List(vec![
                Value::Atom(Atom::from("name")),
                Value::Atom(Atom::from("bob")),
            ]),
        ]), "<cert>\n  <name>\n    bob\n  </name>\n</cert>\n"),
        case(Value::Atom(Atom::from("hi")), "hi\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::with_hint(vec![0xca, 0xfe], b"png".to_vec())),
        ]), "<cert>\n  [png]#cafe#\n</cert>\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::Atom(Atom::from("a<b&c")),
        ]), "<cert>\n  \"a&lt;b&amp;c\"\n</cert>\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("*")),
            Value::List(vec![Value::Atom(Atom::from("x"))]),
        ]), "<star>\n  <x/>\n</star>\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("*")),
            Value::Atom(Atom::with_hint(b"set".to_vec(), b"h".to_vec())),
        ]), "<star>\n  [h]set\n</star>\n"),
        case(Value::List(vec![
            Value::Atom(Atom::from("*")),
            Value::Atom(Atom::from("two words")),
        ]), "<star>\n  \"two words\"\n</star>\n"),
        case(Value::List(vec![Value::Atom(Atom::from("*two words"))]),
            "<star>\n  \"two words\"\n</star>\n"),
        case(Value::List(vec![Value::Atom(Atom::new(vec![b'*', 0xff]))]),
            "<star>\n  #ff#\n</star>\n"),
    )]
    fn test_write(input: Value, expected: &str) {
        let actual = write(&input).unwrap();

        assert_eq!(expected, actual);
    }

    #[rstest(input, expected,
        case(Value::List(vec![]), Error::Model(sexp::error::Error::EmptyList)),
        case(Value::List(vec![
            Value::List(vec![Value::Atom(Atom::from("cert"))]),
        ]), Error::Model(sexp::error::Error::TypeTagNotAtom)),
        case(Value::List(vec![
            Value::Atom(Atom::from("cert")),
            Value::List(vec![]),
        ]), Error::Model(sexp::error::Error::EmptyList)),
        case(Value::List(vec![
            Value::Atom(Atom::with_hint(b"cert".to_vec(), b"h".to_vec())),
        ]), Error::HintedTag),
        case(Value::List(vec![
            Value::Atom(Atom::with_hint(b"*".to_vec(), b"h".to_vec())),
        ]), Error::HintedTag),
        case(Value::List(vec![Value::Atom(Atom::from("9tag"))]),
            Error::UnsupportedTag("9tag".to_string())),
        case(Value::List(vec![Value::Atom(Atom::from("bad tag"))]),
            Error::UnsupportedTag("bad tag".to_string())),
        case(Value::List(vec![Value::Atom(Atom::new(vec![0xff]))]),
            Error::UnsupportedTag("\u{fffd}".to_string())),
        case(Value::List(vec![Value::Atom(Atom::from("starlet"))]),
            Error::ReservedTag("starlet".to_string())),
        case(Value::List(vec![Value::Atom(Atom::from("star"))]),
            Error::ReservedTag("star".to_string())),
    )]
    fn test_write_error(input: Value, expected: Error) {
        if let Err(e) = write(&input) {
            assert_eq!(expected, e);
        } else {
            panic!("this test should return an error")
        }
    }

    #[rstest]
    fn test_write_wraps_long_atoms() {
        let tree = Value::List(vec![
            Value::Atom(Atom::from("blob")),
            Value::Atom(Atom::new(vec![0xa5; 100])),
        ]);

        let document = write(&tree).unwrap();

        assert!(document.ends_with("</blob>\n"));
        assert!(document.lines().count() > 3);
        for line in document.lines() {
            assert!(line.len() <= 72, "line too long: {}", line);
        }
    }
}
