use std::borrow::Cow;

use regex_syntax::ast::{
    self, parse::Parser, Ast, ClassPerl, ClassPerlKind, ClassSetItem, ErrorKind, Literal,
    LiteralKind, Span, SpecialLiteralKind, Visitor,
};

const SPACE: &str = "[ \t\n\r\u{000b}\u{000c}\u{00a0}\u{feff}\u{2003}\u{2028}\u{2029}]";
const NOT_SPACE: &str = "[^ \t\n\r\u{000b}\u{000c}\u{00a0}\u{feff}\u{2003}\u{2028}\u{2029}]";

/// Convert an ECMA 262 regex to the Rust regex dialect on a best effort basis.
///
/// Perl classes become their ASCII forms and `\cX` control escapes become literal code points.
/// Patterns with look arounds or backreferences are passed through for `fancy_regex` to handle.
pub(crate) fn to_rust_regex(pattern: &str) -> Result<Cow<'_, str>, ()> {
    let mut pattern = Cow::Borrowed(pattern);
    let ast = loop {
        match Parser::new().parse(&pattern) {
            Ok(ast) => break ast,
            Err(error) if *error.kind() == ErrorKind::EscapeUnrecognized => {
                let replaced = replace_control_escape(&pattern, *error.span())?;
                pattern = Cow::Owned(replaced);
            }
            Err(error)
                if matches!(
                    error.kind(),
                    ErrorKind::UnsupportedLookAround | ErrorKind::UnsupportedBackreference
                ) =>
            {
                return Ok(pattern);
            }
            Err(_) => return Err(()),
        }
    };
    let mut edits = ast::visit(&ast, Ecma262Translator::default())?;
    if edits.is_empty() {
        return Ok(pattern);
    }
    // Spans of one tree never overlap, so splicing from the end keeps earlier offsets intact
    edits.sort_unstable_by_key(|(span, _)| std::cmp::Reverse(span.start.offset));
    let mut output = pattern.into_owned();
    for (span, replacement) in edits {
        output.replace_range(span.start.offset..span.end.offset, replacement);
    }
    Ok(Cow::Owned(output))
}

/// Replace the `\cX` escape at `span` with the control character it denotes.
fn replace_control_escape(pattern: &str, span: Span) -> Result<String, ()> {
    let (start, end) = (span.start.offset, span.end.offset);
    if pattern.get(start..end) != Some(r"\c") {
        return Err(());
    }
    let letter = pattern[end..]
        .chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .ok_or(())?;
    let control = char::from((letter as u8) % 32);
    Ok(format!("{}{}{}", &pattern[..start], control, &pattern[end + 1..]))
}

/// Collects the replacements a parsed pattern needs.
#[derive(Default)]
struct Ecma262Translator {
    edits: Vec<(Span, &'static str)>,
}

impl Ecma262Translator {
    fn translate(&mut self, class: &ClassPerl) {
        let replacement = match (&class.kind, class.negated) {
            (ClassPerlKind::Digit, false) => "[0-9]",
            (ClassPerlKind::Digit, true) => "[^0-9]",
            (ClassPerlKind::Word, false) => "[A-Za-z0-9_]",
            (ClassPerlKind::Word, true) => "[^A-Za-z0-9_]",
            (ClassPerlKind::Space, false) => SPACE,
            (ClassPerlKind::Space, true) => NOT_SPACE,
        };
        self.edits.push((class.span, replacement));
    }
}

/// `\a` is a Rust escape with no ECMA 262 counterpart.
fn check_literal(literal: &Literal) -> Result<(), ()> {
    if matches!(literal.kind, LiteralKind::Special(SpecialLiteralKind::Bell)) {
        Err(())
    } else {
        Ok(())
    }
}

impl Visitor for Ecma262Translator {
    type Output = Vec<(Span, &'static str)>;
    type Err = ();

    fn finish(self) -> Result<Self::Output, Self::Err> {
        Ok(self.edits)
    }

    fn visit_pre(&mut self, ast: &Ast) -> Result<(), Self::Err> {
        match ast {
            Ast::ClassPerl(class) => {
                self.translate(class);
                Ok(())
            }
            Ast::Literal(literal) => check_literal(literal),
            _ => Ok(()),
        }
    }

    fn visit_class_set_item_pre(&mut self, item: &ClassSetItem) -> Result<(), Self::Err> {
        match item {
            ClassSetItem::Perl(class) => {
                self.translate(class);
                Ok(())
            }
            ClassSetItem::Literal(literal) => check_literal(literal),
            _ => Ok(()),
        }
    }
}
