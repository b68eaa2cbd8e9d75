use crate::prelude::*;
use std::ops::Deref;
use crate::frontend::{ast::Position, parser::error::ParseErrorKind};

/// Internal parser state, shared via RC through the Input type.
#[derive(Clone, Debug, Default)]
pub(super) struct ParserState {
    /// Names of the structures declared so far. Types may only refer to these.
    pub structures: Vec<String>,
}

/// Parser input. Cloning the input is the checkpoint, dropping the clone the rewind.
#[derive(Clone, Debug)]
pub(super) struct Input<'a> {
    pub data: &'a str,
    /// Smallest number of remaining bytes seen by a failing parser.
    pub max_parsed: Rc<Cell<usize>>,
    pub state: Rc<RefCell<ParserState>>,
}

impl<'a> Input<'a> {
    pub fn new(data: &'a str) -> Self {
        Input {
            data        : data,
            max_parsed  : Rc::new(Cell::new(data.len())),
            state       : Rc::new(RefCell::new(ParserState::default())),
        }
    }
    pub fn position(self: &Self) -> Position {
        Position(self.data.len() as u32)
    }
    pub fn max_parsed(self: &Self) -> usize {
        self.max_parsed.get()
    }
    /// Records a failure at the current input position.
    pub fn fail_here(self: &Self) {
        let len = self.data.len();
        if len < self.max_parsed.get() {
            self.max_parsed.set(len);
        }
    }
    pub fn has_structure(self: &Self, name: &str) -> bool {
        self.state.borrow().structures.iter().any(|s| s == name)
    }
    pub fn declare_structure(self: &Self, name: &str) {
        self.state.borrow_mut().structures.push(name.to_string());
    }
    pub fn from_str(self: &Self, data: &'a str) -> Self {
        Input {
            data        : data,
            max_parsed  : self.max_parsed.clone(),
            state       : self.state.clone(),
        }
    }
}

impl<'a> Deref for Input<'a> {
    type Target = &'a str;
    fn deref(self: &Self) -> &Self::Target {
        &self.data
    }
}

impl<'a> PartialEq for Input<'a> {
    fn eq(self: &Self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// Parser output
pub(super) type Output<'a, O> = nom::IResult<Input<'a>, O, Failure<'a>>;

/// Parser error. Returned as `nom::Err::Error` it permits backtracking, as `nom::Err::Failure` it is committed.
#[derive(Debug)]
pub(super) struct Failure<'a> {
    pub input: Input<'a>,
    pub kind: ParseErrorKind,
}
