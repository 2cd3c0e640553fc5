//! Response capture for the request logger.
//!
//! [`CaptureBody`] wraps the body of a response on its way out and keeps a
//! [`ResponseCapture`]: the status the handler set and the last chunk
//! written. Frames go through untouched. Connection upgrades are reached
//! through [`Upgradable`], which reports [`Error::UpgradeUnsupported`]
//! instead of handing out an upgrade that can never complete.

use bytes::Bytes;
use http::{Extensions, Request, Response, StatusCode};
use http_body::{Body, Frame, SizeHint};
use hyper::upgrade::OnUpgrade;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use crate::error::{Error, Result};

/// What a response has written so far.
#[derive(Clone, Debug)]
pub struct ResponseCapture {
    status: StatusCode,
    last_chunk: Option<Bytes>,
}

impl ResponseCapture {
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            last_chunk: None,
        }
    }

    /// Records the status code sent with the response head.
    pub fn write_header(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Records a body chunk, replacing the previous one.
    pub fn write(&mut self, chunk: &Bytes) -> usize {
        self.last_chunk = Some(chunk.clone());
        chunk.len()
    }

    /// 200 unless a header was written.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn last_chunk(&self) -> Option<&Bytes> {
        self.last_chunk.as_ref()
    }
}

impl Default for ResponseCapture {
    fn default() -> Self {
        Self::new()
    }
}

pin_project! {
    /// Response body that records what passes through it.
    #[derive(Debug)]
    pub struct CaptureBody<B> {
        #[pin]
        inner: B,
        capture: ResponseCapture,
    }
}

impl<B> CaptureBody<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            capture: ResponseCapture::new(),
        }
    }

    /// Wraps `inner` with the status of the response head already recorded.
    pub fn with_status(inner: B, status: StatusCode) -> Self {
        let mut body = Self::new(inner);
        body.capture.write_header(status);
        body
    }

    pub fn capture(&self) -> &ResponseCapture {
        &self.capture
    }

    pub fn into_inner(self) -> B {
        self.inner
    }
}

impl<B> Body for CaptureBody<B>
where
    B: Body<Data = Bytes>,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, B::Error>>> {
        let this = self.project();
        let frame = ready!(this.inner.poll_frame(cx));
        if let Some(Ok(frame)) = &frame
            && let Some(chunk) = frame.data_ref()
        {
            this.capture.write(chunk);
        }
        Poll::Ready(frame)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Messages that may carry a pending connection upgrade.
pub trait Upgradable {
    /// Takes the pending upgrade, or fails when the connection offers none.
    fn take_upgrade(&mut self) -> Result<OnUpgrade>;
}

impl<B> Upgradable for Request<B> {
    fn take_upgrade(&mut self) -> Result<OnUpgrade> {
        take_upgrade(self.extensions_mut())
    }
}

impl<B> Upgradable for Response<B> {
    fn take_upgrade(&mut self) -> Result<OnUpgrade> {
        take_upgrade(self.extensions_mut())
    }
}

fn take_upgrade(extensions: &mut Extensions) -> Result<OnUpgrade> {
    extensions
        .remove::<OnUpgrade>()
        .ok_or(Error::UpgradeUnsupported)
}
