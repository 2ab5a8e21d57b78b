//! Closable row stream: releases the underlying cursor exactly once.

use crate::db::Record;
use crate::error::AppError;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};

type ReleaseHook = Box<dyn FnOnce() + Send>;

/// Rows of one statement, in the order the database returns them.
///
/// The cursor is released when the stream is exhausted, when it yields an
/// error, when `close` is called, or when the stream is dropped, whichever
/// comes first. Nothing is buffered between the client and the caller.
pub struct RowStream {
    inner: Option<BoxStream<'static, Result<Record, AppError>>>,
    on_release: Option<ReleaseHook>,
}

impl RowStream {
    pub fn new(inner: BoxStream<'static, Result<Record, AppError>>) -> Self {
        RowStream {
            inner: Some(inner),
            on_release: None,
        }
    }

    /// Run `hook` once the cursor has been released.
    pub fn on_release(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Stop reading and release the cursor now.
    pub fn close(mut self) {
        self.release();
    }

    pub fn is_released(&self) -> bool {
        self.inner.is_none()
    }

    fn release(&mut self) {
        drop(self.inner.take());
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

impl Stream for RowStream {
    type Item = Result<Record, AppError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.poll_next_unpin(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(None) => {
                this.release();
                Poll::Ready(None)
            }
            Poll::Ready(Some(Err(e))) => {
                this.release();
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(Some(Ok(record))) => Poll::Ready(Some(Ok(record))),
        }
    }
}

impl Drop for RowStream {
    fn drop(&mut self) {
        self.release();
    }
}
