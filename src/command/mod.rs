//! Command descriptors and request construction.
//!
//! Every routable command is described by a static [`Command`] carrying the
//! key-arity model Redis itself publishes (first key, last key, step) plus
//! the flags the router classifies on. A [`Request`] pairs one of those
//! descriptors with raw argument bytes.

use bytes::Bytes;

pub mod commands;

/// Metadata describing how a Redis command addresses keys.
///
/// Positions are 1-based over the full argv *including* the command name,
/// matching the arity rows of the `COMMAND` reply: `first_key == 0` means
/// the command carries no keys, a negative `last_key` counts from the end
/// of the argument list (`-1` is the last argument).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    name: &'static str,
    first_key: i32,
    last_key: i32,
    key_step: i32,
    read_only: bool,
    keyless: bool,
    multi_key: bool,
    movable: bool,
}

impl Command {
    /// Creates a descriptor with the given key arity and no flags set.
    pub const fn new(name: &'static str, first_key: i32, last_key: i32, key_step: i32) -> Self {
        Self {
            name,
            first_key,
            last_key,
            key_step,
            read_only: false,
            keyless: false,
            multi_key: false,
            movable: false,
        }
    }

    /// Marks the command as safe to serve from a replica.
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Marks the command as carrying no key arguments.
    pub const fn keyless(mut self) -> Self {
        self.keyless = true;
        self
    }

    /// Marks the command as addressing more than one key.
    pub const fn multi_key(mut self) -> Self {
        self.multi_key = true;
        self
    }

    /// Marks the command's key positions as only known server-side.
    pub const fn movable(mut self) -> Self {
        self.movable = true;
        self
    }

    /// The lowercase wire name of the command.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if the command may be served by a replica.
    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns true if the command carries no key arguments.
    #[inline]
    pub fn is_keyless(&self) -> bool {
        self.keyless
    }

    /// Returns true if the command addresses more than one key.
    #[inline]
    pub fn is_multi_key(&self) -> bool {
        self.multi_key
    }

    /// Returns true if the command's key positions are only known server-side.
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.movable
    }

    /// Resolves the key positions over an argument list of `arg_count`
    /// entries (the command name excluded, as in [`Request::args`]).
    ///
    /// `start` is the index of the first key, `end` is exclusive, and keys
    /// sit at `start, start + step, ...` strictly below `end`.
    pub(crate) fn key_span(&self, arg_count: usize) -> KeySpan {
        let start = (self.first_key - 1).max(0);
        let mut end = self.last_key;
        if end > 0 {
            end -= 1;
        }
        if end < 0 {
            end = arg_count as i32 + (end + 1);
        }
        KeySpan {
            start: start as usize,
            end: end.clamp(0, arg_count as i32) as usize,
            step: self.key_step.max(1) as usize,
        }
    }
}

/// Resolved key positions over a concrete argument list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeySpan {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl KeySpan {
    /// Iterates the key indices of the span.
    pub(crate) fn keys(&self) -> impl Iterator<Item = usize> {
        (self.start..self.end).step_by(self.step)
    }
}

/// A command ready to be routed: a descriptor plus its raw arguments.
///
/// # Example
///
/// ```
/// use shardis::command::{commands, Request};
///
/// let request = Request::cmd(&commands::SET).arg("key").arg("value");
/// assert_eq!(request.command().name(), "set");
/// assert_eq!(request.args().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    command: &'static Command,
    args: Vec<Bytes>,
}

impl Request {
    /// Starts a request for the given command.
    #[inline]
    pub fn cmd(command: &'static Command) -> Self {
        Self {
            command,
            args: Vec::new(),
        }
    }

    /// Appends an argument to the request.
    #[inline]
    pub fn arg<T: Into<Bytes>>(mut self, arg: T) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends an argument in place; used by the splitter.
    #[inline]
    pub(crate) fn push_arg(&mut self, arg: Bytes) {
        self.args.push(arg);
    }

    /// The command descriptor this request was built from.
    #[inline]
    pub fn command(&self) -> &'static Command {
        self.command
    }

    /// The raw arguments, command name excluded.
    #[inline]
    pub fn args(&self) -> &[Bytes] {
        &self.args
    }
}
