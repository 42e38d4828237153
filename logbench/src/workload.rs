//! Request construction for each kind of run.
use crate::error::CallError;
use crate::payload::{Payload, PayloadGenerator};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use reqwest::Client;
use std::future::Future;
use url::Url;

/// One kind of request issued by the worker pool.
///
/// The pool forks one instance per worker. `prepare` runs before the rate limiter is consulted
/// and `send` is timed, bounded by the run's request timeout.
pub trait Workload: Send + Sync + 'static {
    type Request: Send;

    /// Instance for a new worker. Must not share mutable state with `self`.
    fn fork(&mut self) -> Self
    where
        Self: Sized;

    fn prepare(&mut self) -> Self::Request;

    /// Issue the request, resolving to the response status code.
    fn send(&self, request: Self::Request) -> impl Future<Output = Result<u16, CallError>> + Send;
}

/// `GET` against a fixed URL, credentials come from the client's default headers.
#[derive(Clone, Debug)]
pub struct ReadWorkload {
    client: Client,
    url: Url,
}

impl ReadWorkload {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

impl Workload for ReadWorkload {
    type Request = ();

    fn fork(&mut self) -> Self {
        self.clone()
    }

    fn prepare(&mut self) {}

    fn send(&self, _: ()) -> impl Future<Output = Result<u16, CallError>> + Send {
        let request = self.client.get(self.url.clone());
        async move {
            let res = request.send().await?;
            let status = res.status().as_u16();
            // Latency covers the whole body, not just the headers.
            res.bytes().await?;
            Ok(status)
        }
    }
}

/// `POST` of a freshly generated JSON event.
#[derive(Debug)]
pub struct WriteWorkload<R = SmallRng> {
    client: Client,
    url: Url,
    generator: PayloadGenerator<R>,
}

impl<R> WriteWorkload<R> {
    pub fn new(client: Client, url: Url, generator: PayloadGenerator<R>) -> Self {
        Self {
            client,
            url,
            generator,
        }
    }
}

impl<R> Workload for WriteWorkload<R>
where
    R: Rng + SeedableRng + Send + Sync + 'static,
{
    type Request = Payload;

    fn fork(&mut self) -> Self {
        Self {
            client: self.client.clone(),
            url: self.url.clone(),
            generator: self.generator.fork(),
        }
    }

    fn prepare(&mut self) -> Payload {
        self.generator.generate()
    }

    fn send(&self, payload: Payload) -> impl Future<Output = Result<u16, CallError>> + Send {
        let request = self.client.post(self.url.clone()).json(&payload);
        async move {
            let res = request.send().await?;
            let status = res.status().as_u16();
            res.bytes().await?;
            Ok(status)
        }
    }
}
