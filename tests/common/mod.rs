//! Shared test harness: a scripted in-memory connection.
//!
//! Tests enqueue the replies a node should give and inspect what the
//! router actually sent afterwards. Unscripted sends answer `Null` so
//! routing-only assertions don't need reply scripts.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use shardis::{
    ConnectionTable, EndHandler, ExceptionHandler, Frame, NodeConnection, ReplyHandler, Request,
    Result, SlotMap, SlotRange,
};

#[derive(Default)]
struct MockState {
    replies: Mutex<VecDeque<Result<Frame>>>,
    batch_replies: Mutex<VecDeque<Result<Vec<Frame>>>>,
    sent: Mutex<Vec<Request>>,
    batches: Mutex<Vec<Vec<Request>>>,
    closed: AtomicUsize,
    paused: AtomicUsize,
    resumed: AtomicUsize,
    fetched: AtomicUsize,
    exception_handlers: AtomicUsize,
    reply_handlers: AtomicUsize,
    end_handlers: AtomicUsize,
    queue_full: AtomicBool,
}

/// A scripted connection handle; clones share state, so tests keep one
/// clone for assertions after moving another into the router's table.
#[derive(Clone, Default)]
pub struct MockConnection {
    state: Arc<MockState>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues the reply for the next single send.
    pub fn reply(self, reply: Result<Frame>) -> Self {
        self.state.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Enqueues the reply for the next batch.
    pub fn batch_reply(self, reply: Result<Vec<Frame>>) -> Self {
        self.state.batch_replies.lock().unwrap().push_back(reply);
        self
    }

    /// Makes `pending_queue_full` report true.
    pub fn with_full_queue(self) -> Self {
        self.state.queue_full.store(true, Ordering::SeqCst);
        self
    }

    pub fn sent(&self) -> Vec<Request> {
        self.state.sent.lock().unwrap().clone()
    }

    pub fn sent_names(&self) -> Vec<&'static str> {
        self.sent().iter().map(|req| req.command().name()).collect()
    }

    pub fn batches(&self) -> Vec<Vec<Request>> {
        self.state.batches.lock().unwrap().clone()
    }

    pub fn close_count(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }

    pub fn pause_count(&self) -> usize {
        self.state.paused.load(Ordering::SeqCst)
    }

    pub fn resume_count(&self) -> usize {
        self.state.resumed.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.state.fetched.load(Ordering::SeqCst)
    }

    pub fn exception_handler_count(&self) -> usize {
        self.state.exception_handlers.load(Ordering::SeqCst)
    }

    pub fn reply_handler_count(&self) -> usize {
        self.state.reply_handlers.load(Ordering::SeqCst)
    }

    pub fn end_handler_count(&self) -> usize {
        self.state.end_handlers.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeConnection for MockConnection {
    async fn send(&self, request: &Request) -> Result<Frame> {
        self.state.sent.lock().unwrap().push(request.clone());
        self.state
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Frame::Null))
    }

    async fn batch(&self, requests: &[Request]) -> Result<Vec<Frame>> {
        self.state.batches.lock().unwrap().push(requests.to_vec());
        self.state
            .batch_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![Frame::Null; requests.len()]))
    }

    fn pause(&self) {
        self.state.paused.fetch_add(1, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.state.resumed.fetch_add(1, Ordering::SeqCst);
    }

    fn fetch(&self, _amount: usize) {
        self.state.fetched.fetch_add(1, Ordering::SeqCst);
    }

    fn set_exception_handler(&self, _handler: ExceptionHandler) {
        self.state.exception_handlers.fetch_add(1, Ordering::SeqCst);
    }

    fn set_reply_handler(&self, _handler: ReplyHandler) {
        self.state.reply_handlers.fetch_add(1, Ordering::SeqCst);
    }

    fn set_end_handler(&self, _handler: EndHandler) {
        self.state.end_handlers.fetch_add(1, Ordering::SeqCst);
    }

    fn pending_queue_full(&self) -> bool {
        self.state.queue_full.load(Ordering::SeqCst)
    }

    fn close(&self) {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Builds a slot map from `(start, end, endpoints)` triples.
pub fn slot_map(ranges: &[(u16, u16, &[&str])]) -> SlotMap {
    SlotMap::new(
        ranges
            .iter()
            .map(|(start, end, endpoints)| {
                SlotRange::new(
                    *start,
                    *end,
                    endpoints.iter().map(|e| e.to_string()).collect(),
                )
            })
            .collect(),
    )
}

/// Builds a connection table from endpoint/handle pairs; the handles are
/// cloned so the caller keeps its own for assertions.
pub fn connection_table(entries: &[(&str, &MockConnection)]) -> ConnectionTable<MockConnection> {
    entries
        .iter()
        .map(|(endpoint, connection)| (endpoint.to_string(), (*connection).clone()))
        .collect()
}
