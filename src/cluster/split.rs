//! Partitioning of multi-key argument lists across slots.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::command::{Command, KeySpan, Request};

use super::slot::key_slot;

/// Splits a multi-key request into one sub-request per slot.
///
/// Every sub-request keeps the command's envelope intact: the positional
/// arguments before the first key are prepended, each key carries the
/// `step - 1` arguments following it (values, for alternating commands
/// like `MSET`), and the arguments after the last key are appended to all
/// sub-requests as a shared tail.
///
/// The map is keyed by slot value, so iteration (and with it scatter
/// issue order) is ascending by slot.
pub(crate) fn split_request(
    command: &'static Command,
    args: &[Bytes],
    span: KeySpan,
) -> BTreeMap<u16, Request> {
    let mut requests: BTreeMap<u16, Request> = BTreeMap::new();

    for i in span.keys() {
        let slot = key_slot(&args[i]);
        let request = requests.entry(slot).or_insert_with(|| {
            let mut request = Request::cmd(command);
            for arg in &args[..span.start] {
                request.push_arg(arg.clone());
            }
            request
        });
        for arg in &args[i..(i + span.step).min(args.len())] {
            request.push_arg(arg.clone());
        }
    }

    for request in requests.values_mut() {
        for arg in &args[span.end.min(args.len())..] {
            request.push_arg(arg.clone());
        }
    }

    requests
}
