//! The atom grammar: parsing buffered character runs into atoms.

use token::Scanner;

use crate::Atom;
use crate::error::Error;

/// Lazily parses a character run into atoms.
///
/// Each call builds a fresh iterator over the given run; nothing is shared
/// between calls. A whitespace-only run yields no items. The first invalid
/// token ends the iteration with an error item.
pub fn atoms(run: &str) -> Atoms<'_> {
    Atoms {
        scanner: Scanner::new(run),
    }
}

/// Eagerly parses a complete character run, stopping at the first error.
pub fn parse_run(run: &str) -> Result<Vec<Atom>, Error> {
    atoms(run).collect()
}

/// Iterator over the atoms of one character run.
#[derive(Debug, Clone)]
pub struct Atoms<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Iterator for Atoms<'a> {
    type Item = Result<Atom, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.scanner.next()?;
        Some(token.map(Atom::from).map_err(Error::Token))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use crate::Atom;
    use crate::error::Error;

    #[rstest(
        run,
        expected,
        case("x y", vec![Atom::from("x"), Atom::from("y")]),
        case("\n  a\n  \"b c\"\n  #64#\n", vec![Atom::from("a"), Atom::from("b c"), Atom::from("d")]),
        case("[text/plain]m n", vec![Atom::with_hint(b"m".to_vec(), b"text/plain".to_vec()), Atom::from("n")])
    )]
    fn test_parse_run(run: &str, expected: Vec<Atom>) {
        assert_eq!(expected, crate::text::parse_run(run).unwrap());
    }

    #[rstest(run, case(""), case("   \n\t  "))]
    fn test_parse_run_whitespace_only(run: &str) {
        assert!(crate::text::parse_run(run).unwrap().is_empty());
    }

    #[rstest(
        run,
        expected,
        case("a (b)", Error::Token(token::error::Error::UnexpectedChar('('))),
        case("\"open", Error::Token(token::error::Error::UnterminatedQuoted))
    )]
    fn test_parse_run_with_error(run: &str, expected: Error) {
        if let Err(e) = crate::text::parse_run(run) {
            assert_eq!(expected, e);
        } else {
            panic!("this test should return an error");
        }
    }

    #[test]
    fn test_atoms_is_lazy() {
        // the leading atom is reachable even though the run ends invalid
        let mut atoms = crate::text::atoms("good \"bad");
        assert_eq!(Atom::from("good"), atoms.next().unwrap().unwrap());
        assert!(atoms.next().unwrap().is_err());
        assert!(atoms.next().is_none());
    }
}
