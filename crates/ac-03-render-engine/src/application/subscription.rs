//! # Subscription Driver
//!
//! Turns streaming binding events into a stream of full re-renders.
//!
//! Each subscription is one spawned task feeding a bounded channel. The
//! task owns the upstream adapter stream and at most one in-flight render.
//! Dropping the `ChartStream` aborts the task, which drops both.
//!
//! Renders never overlap. Triggers that arrive during a render are either
//! collapsed into a single follow-up render (`Coalesce`) or each rendered
//! in turn (`Queue`). Output order always follows trigger order.

use std::pin::Pin;
use std::task::{Context, Poll};

use chart_telemetry::{ACTIVE_SUBSCRIPTIONS, SUBSCRIPTION_TRIGGERS};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde_json::Value;
use shared_types::{Params, RenderedOption};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use ac_01_datasource::AdapterError;

use crate::application::service::ChartRenderService;
use crate::config::{OverlapPolicy, StreamSelection};
use crate::domain::errors::RenderError;

/// Item produced by a chart subscription.
pub type ChartUpdate = Result<RenderedOption, RenderError>;

/// Upstream event tagged with the binding that produced it.
type TaggedEvent = (String, Result<Value, AdapterError>);

/// Live stream of rendered options.
///
/// Ends when the upstream ends, after a terminal error, or when the
/// template disappears. Dropping it cancels the subscription.
pub struct ChartStream {
    id: Uuid,
    inner: ReceiverStream<ChartUpdate>,
    task: Option<JoinHandle<()>>,
}

impl ChartStream {
    /// Subscription id used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// A stream that ends immediately.
    fn empty() -> Self {
        let (_, receiver) = mpsc::channel(1);
        Self {
            id: Uuid::new_v4(),
            inner: ReceiverStream::new(receiver),
            task: None,
        }
    }

    /// A stream that yields one error and ends.
    fn failed(error: RenderError) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        // Capacity 1 and a fresh channel: this send cannot fail.
        let _ = sender.try_send(Err(error));
        Self {
            id: Uuid::new_v4(),
            inner: ReceiverStream::new(receiver),
            task: None,
        }
    }
}

impl Stream for ChartStream {
    type Item = ChartUpdate;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for ChartStream {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(subscription_id = %self.id, "Subscription cancelled");
        }
    }
}

/// Open a subscription for `template_id`.
pub(crate) fn subscribe(
    service: &ChartRenderService,
    template_id: &str,
    params: &Params,
) -> ChartStream {
    let Some(template) = service.store().get(template_id) else {
        debug!(template_id = %template_id, "Subscribe: template not found");
        return ChartStream::empty();
    };

    let config = service.subscription_config().clone();
    let selected: Vec<_> = match config.selection {
        StreamSelection::First => template.streaming_bindings().take(1).collect(),
        StreamSelection::All => template.streaming_bindings().collect(),
    };
    if selected.is_empty() {
        debug!(template_id = %template_id, "Subscribe: no streaming binding");
        return ChartStream::empty();
    }

    let mut upstreams: Vec<BoxStream<'static, TaggedEvent>> = Vec::with_capacity(selected.len());
    for binding in selected {
        let Some(adapter) = service.registry().get(&binding.datasource_id) else {
            warn!(
                template_id = %template_id,
                adapter = %binding.datasource_id,
                "Subscribe: streaming adapter not registered"
            );
            return ChartStream::failed(RenderError::AdapterNotFound(
                binding.datasource_id.clone(),
            ));
        };
        let name = binding.name.clone();
        upstreams.push(
            adapter
                .subscribe(&binding.query, params)
                .map(move |event| (name.clone(), event))
                .boxed(),
        );
    }

    let id = Uuid::new_v4();
    let (sender, receiver) = mpsc::channel(config.channel_capacity.max(1));
    let driver = Driver {
        id,
        service: service.clone(),
        template_id: template_id.to_string(),
        params: params.clone(),
        overlap: config.overlap,
        sender,
    };

    info!(
        subscription_id = %id,
        template_id = %template_id,
        streams = upstreams.len(),
        overlap = ?config.overlap,
        "Subscription started"
    );

    let task = tokio::spawn(driver.run(stream::select_all(upstreams)));

    ChartStream {
        id,
        inner: ReceiverStream::new(receiver),
        task: Some(task),
    }
}

/// Keeps the active-subscription gauge accurate even when the task is
/// aborted.
struct ActiveGuard;

impl ActiveGuard {
    fn new() -> Self {
        ACTIVE_SUBSCRIPTIONS.inc();
        Self
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE_SUBSCRIPTIONS.dec();
    }
}

/// Why a subscription stopped.
#[derive(Debug)]
enum Exit {
    UpstreamEnded,
    UpstreamFailed,
    RenderFailed,
    TemplateRemoved,
    ConsumerGone,
}

struct Driver {
    id: Uuid,
    service: ChartRenderService,
    template_id: String,
    params: Params,
    overlap: OverlapPolicy,
    sender: mpsc::Sender<ChartUpdate>,
}

impl Driver {
    async fn run<S>(self, upstream: S)
    where
        S: Stream<Item = TaggedEvent> + Unpin + Send,
    {
        let _active = ActiveGuard::new();
        let exit = self.drive(upstream).await;
        info!(subscription_id = %self.id, template_id = %self.template_id, reason = ?exit, "Subscription ended");
    }

    async fn drive<S>(&self, mut upstream: S) -> Exit
    where
        S: Stream<Item = TaggedEvent> + Unpin + Send,
    {
        // Triggers waiting for a render, and a deferred upstream error.
        let mut pending: usize = 0;
        let mut upstream_done = false;
        let mut upstream_error: Option<RenderError> = None;

        loop {
            if pending == 0 {
                if upstream_done {
                    break;
                }
                match upstream.next().await {
                    Some((binding, Ok(_))) => {
                        self.on_trigger(&binding);
                        pending = 1;
                    }
                    Some((binding, Err(source))) => {
                        upstream_error = Some(RenderError::AdapterExecution { binding, source });
                        upstream_done = true;
                        continue;
                    }
                    None => {
                        upstream_done = true;
                        continue;
                    }
                }
            }

            pending -= 1;

            let render = self.service.render(&self.template_id, &self.params);
            tokio::pin!(render);

            let outcome = loop {
                tokio::select! {
                    biased;
                    outcome = &mut render => break outcome,
                    event = upstream.next(), if !upstream_done => match event {
                        Some((binding, Ok(_))) => {
                            self.on_trigger(&binding);
                            pending = match self.overlap {
                                OverlapPolicy::Coalesce => 1,
                                OverlapPolicy::Queue => pending + 1,
                            };
                        }
                        Some((binding, Err(source))) => {
                            upstream_error = Some(RenderError::AdapterExecution { binding, source });
                            upstream_done = true;
                        }
                        None => upstream_done = true,
                    },
                }
            };

            match outcome {
                Ok(Some(rendered)) => {
                    if self.sender.send(Ok(rendered)).await.is_err() {
                        return Exit::ConsumerGone;
                    }
                }
                Ok(None) => return Exit::TemplateRemoved,
                Err(e) => {
                    let _ = self.sender.send(Err(e)).await;
                    return Exit::RenderFailed;
                }
            }
        }

        match upstream_error {
            Some(e) => {
                let _ = self.sender.send(Err(e)).await;
                Exit::UpstreamFailed
            }
            None => Exit::UpstreamEnded,
        }
    }

    fn on_trigger(&self, binding: &str) {
        SUBSCRIPTION_TRIGGERS.inc();
        debug!(subscription_id = %self.id, binding = %binding, "Re-render triggered");
    }
}
