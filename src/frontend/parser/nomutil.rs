use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::str::{Chars, CharIndices};
use nom::Parser;
use nom::bytes::complete::{tag, take_until, take_while, take_while1};
use nom::character::complete::{char, satisfy};
use nom::combinator::{eof, not, opt, recognize, value};
use nom::multi::many0;
use nom::branch::alt;
use nom::sequence::{delimited, terminated, tuple};
use crate::frontend::parser::{types::{Input, Output, Failure}, error::ParseErrorKind};

impl<'a> nom::error::ParseError<Input<'a>> for Failure<'a> {
    fn from_error_kind(input: Input<'a>, _: nom::error::ErrorKind) -> Self {
        input.fail_here();
        Failure { input, kind: ParseErrorKind::SyntaxError }
    }
    fn append(_: Input<'a>, _: nom::error::ErrorKind, other: Self) -> Self {
        other.input.fail_here();
        other
    }
}

impl<'a> nom::UnspecializedInput for Input<'a> { }

impl<'a> nom::InputLength for Input<'a> {
    #[inline]
    fn input_len(&self) -> usize {
        self.data.len()
    }
}

impl<'a> nom::InputTake for Input<'a> {
    #[inline]
    fn take(&self, count: usize) -> Self {
        self.from_str(&self.data[..count])
    }
    #[inline]
    fn take_split(&self, count: usize) -> (Self, Self) {
        (self.from_str(&self.data[count..]), self.from_str(&self.data[..count]))
    }
}

impl<'a> nom::InputIter for Input<'a> {
    type Item = char;
    type Iter = CharIndices<'a>;
    type IterElem = Chars<'a>;
    #[inline]
    fn iter_indices(&self) -> Self::Iter {
        self.data.char_indices()
    }
    #[inline]
    fn iter_elements(&self) -> Self::IterElem {
        self.data.chars()
    }
    fn position<P>(&self, predicate: P) -> Option<usize> where P: Fn(Self::Item) -> bool {
        nom::InputIter::position(&self.data, predicate)
    }
    #[inline]
    fn slice_index(&self, count: usize) -> Result<usize, nom::Needed> {
        nom::InputIter::slice_index(&self.data, count)
    }
}

impl<'a, 'b> nom::Compare<&'b str> for Input<'a> {
    #[inline(always)]
    fn compare(&self, t: &'b str) -> nom::CompareResult {
        nom::Compare::compare(&self.data, t)
    }
    #[inline(always)]
    fn compare_no_case(&self, t: &'b str) -> nom::CompareResult {
        nom::Compare::compare_no_case(&self.data, t)
    }
}

impl<'a, 'b> nom::FindSubstring<&'b str> for Input<'a> {
    fn find_substring(&self, substr: &'b str) -> Option<usize> {
        nom::FindSubstring::find_substring(&self.data, substr)
    }
}

impl<'a> nom::Offset for Input<'a> {
    fn offset(&self, second: &Self) -> usize {
        nom::Offset::offset(&self.data, &second.data)
    }
}

impl<'a> nom::Slice<Range<usize>> for Input<'a> {
    fn slice(&self, range: Range<usize>) -> Self {
        self.from_str(&self.data[range])
    }
}

impl<'a> nom::Slice<RangeTo<usize>> for Input<'a> {
    fn slice(&self, range: RangeTo<usize>) -> Self {
        self.from_str(&self.data[range])
    }
}

impl<'a> nom::Slice<RangeFrom<usize>> for Input<'a> {
    fn slice(&self, range: RangeFrom<usize>) -> Self {
        self.from_str(&self.data[range])
    }
}

impl<'a> nom::Slice<RangeFull> for Input<'a> {
    fn slice(&self, range: RangeFull) -> Self {
        self.from_str(&self.data[range])
    }
}

impl<'a> std::borrow::Borrow<str> for Input<'a> {
    fn borrow(&self) -> &str {
        self.data
    }
}

/// Turns a backtrackable error of the given parser into a committed failure reporting the expected item.
/// The failure position is the first non-space character at which the item was expected.
pub(super) fn expect<'a, O, P>(what: &'static str, mut parser: P) -> impl FnMut(Input<'a>) -> Output<'a, O>
where
    P: Parser<Input<'a>, O, Failure<'a>>
{
    move |input: Input<'a>| match parser.parse(input.clone()) {
        Err(nom::Err::Error(_)) => {
            let at = match sp0(input.clone()) {
                Ok((remaining, _)) => remaining,
                Err(_) => input,
            };
            Err(nom::Err::Failure(Failure { input: at, kind: ParseErrorKind::Expected(what) }))
        }
        result => result,
    }
}

/// Matches the given keyword unless it is immediately followed by an identifier character.
pub(super) fn word<'a>(keyword: &'static str) -> impl FnMut(Input<'a>) -> Output<'a, Input<'a>> {
    terminated(tag(keyword), not(satisfy(is_ident_char)))
}

/// Matches any of the given keywords without consuming input.
pub(super) fn peek_word<'a>(keywords: &'static [&'static str]) -> impl FnMut(Input<'a>) -> Output<'a, ()> {
    move |input: Input<'a>| {
        for &keyword in keywords {
            if word(keyword)(input.clone()).is_ok() {
                return Ok((input, ()));
            }
        }
        Err(nom::Err::Error(nom::error::ParseError::from_error_kind(input, nom::error::ErrorKind::Tag)))
    }
}

/// Wraps the given parser to consume surrounding inline whitespace.
pub(super) fn ws<'a, O, P>(parser: P) -> impl FnMut(Input<'a>) -> Output<'a, O>
where
    P: Parser<Input<'a>, O, Failure<'a>>
{
    delimited(sp0, parser, sp0)
}

/// Consumes 0 or more inline whitespace characters or block comments. Line breaks are significant and not consumed.
pub(super) fn sp0(input: Input<'_>) -> Output<Input<'_>> {
    recognize(many0(alt((
        take_while1(is_inline_space),
        block_comment,
    ))))(input)
}

/// Consumes 0 or more whitespace characters, line breaks or comments.
pub(super) fn blank0(input: Input<'_>) -> Output<Input<'_>> {
    recognize(many0(alt((
        take_while1(is_whitespace),
        line_comment,
        block_comment,
    ))))(input)
}

/// Consumes the end of a line: trailing space, an optional comment and the line break (or the end of input),
/// followed by any blank lines.
pub(super) fn eol(input: Input<'_>) -> Output<()> {
    value((), tuple((
        sp0,
        opt(line_comment),
        alt((recognize(char('\n')), eof)),
        blank0,
    )))(input)
}

fn line_comment(input: Input<'_>) -> Output<Input<'_>> {
    recognize(tuple((tag("//"), take_while(not_eol))))(input)
}

fn block_comment(input: Input<'_>) -> Output<Input<'_>> {
    recognize(tuple((tag("/*"), take_until("*/"), tag("*/"))))(input)
}

/// returns true if given character may start an identifier
pub(super) fn is_ident_start(chr: char) -> bool {
    chr.is_ascii_alphabetic() || chr == '_'
}

/// returns true if given character may continue an identifier
pub(super) fn is_ident_char(chr: char) -> bool {
    chr.is_ascii_alphanumeric() || chr == '_'
}

/// returns true if given character is whitespace that does not end a line
fn is_inline_space(chr: char) -> bool {
    chr == ' ' || chr == '\t' || chr == '\r'
}

/// returns true if given character is a whitespace character
fn is_whitespace(chr: char) -> bool {
    chr == ' ' || chr == '\t' || chr == '\r' || chr == '\n'
}

/// returns true if given character is not an end of line character
fn not_eol(chr: char) -> bool {
    chr != '\r' && chr != '\n'
}
