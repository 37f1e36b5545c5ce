//! Per-component mutation state of a builder.

use crate::{
    error::{BuildError, Component},
    pct_enc::{self, EStr, EString, Encoder},
};

/// How a component was last set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum State {
    /// Never set, or cleared.
    Unset,
    /// Set as a whole, either from unencoded or pre-encoded text.
    Set,
    /// Appended to piece by piece.
    Accumulating,
}

/// A mutation of a component that is allowed in every state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Op {
    Clear,
    SetRaw,
    Append,
}

impl Op {
    /// Returns the state after applying this operation.
    const fn target(self) -> State {
        match self {
            Op::Clear => State::Unset,
            Op::SetRaw => State::Set,
            Op::Append => State::Accumulating,
        }
    }
}

/// Returns the state after setting pre-encoded text,
/// or `None` if that is not allowed in the current state.
const fn set_encoded_target(from: State) -> Option<State> {
    match from {
        State::Unset | State::Set => Some(State::Set),
        State::Accumulating => None,
    }
}

/// An encoded component under construction.
///
/// The buffer is empty whenever the state is `Unset`.
#[derive(Clone, Debug)]
pub(crate) struct Field<E: Encoder> {
    component: Component,
    state: State,
    buf: EString<E>,
}

impl<E: Encoder> Field<E> {
    pub(crate) fn new(component: Component) -> Self {
        Self {
            component,
            state: State::Unset,
            buf: EString::new(),
        }
    }

    /// Creates a field set to already validated text, or an unset one.
    pub(crate) fn from_validated(component: Component, value: Option<&str>) -> Self {
        let mut field = Self::new(component);
        if let Some(value) = value {
            field.state = State::Set;
            field.buf = EString::new_validated(value.to_owned());
        }
        field
    }

    fn enter(&mut self, state: State) {
        if state == State::Unset {
            self.buf.clear();
        }
        self.state = state;
    }

    /// Replaces the value with unencoded text, or clears it.
    ///
    /// Always allowed. Resets any accumulated value.
    pub(crate) fn set_raw(&mut self, value: Option<&str>) {
        let op = if value.is_some() { Op::SetRaw } else { Op::Clear };
        self.enter(op.target());
        if let Some(value) = value {
            self.buf.clear();
            self.buf.encode_str::<E>(value);
        }
    }

    /// Replaces the value with pre-encoded text, or clears it.
    ///
    /// Leaves the field untouched on error.
    pub(crate) fn set_encoded(&mut self, value: Option<&str>) -> Result<(), BuildError> {
        let Some(next) = set_encoded_target(self.state) else {
            return Err(BuildError::AlreadyAppended(self.component));
        };
        match value {
            Some(value) => {
                pct_enc::check_component(value, self.component)?;
                self.enter(next);
                self.buf = EString::new_validated(value.to_owned());
            }
            None => self.enter(Op::Clear.target()),
        }
        Ok(())
    }

    /// Returns the buffer to append to, seeded with the current value.
    pub(crate) fn accumulator(&mut self) -> &mut EString<E> {
        self.enter(Op::Append.target());
        &mut self.buf
    }

    /// Returns the value, or `None` if unset.
    pub(crate) fn get(&self) -> Option<&EStr<E>> {
        match self.state {
            State::Unset => None,
            State::Set | State::Accumulating => Some(&self.buf),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> State {
        self.state
    }
}
