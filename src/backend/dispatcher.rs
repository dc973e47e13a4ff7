use std::sync::{mpsc::Sender, Arc};

use tokio::runtime::Handle;

use crate::{
    domain::events::{BackendFailure, EngineEvent},
    usecases::contracts::{AssistantRequest, ReplyDispatch, ResponderBackend},
};

const REPLY_CHANNEL_CLOSED: &str = "BACKEND_REPLY_CHANNEL_CLOSED";
const REQUEST_DISPATCHED: &str = "BACKEND_REQUEST_DISPATCHED";

/// Runs responder calls on the background runtime's blocking pool and
/// delivers every completion back to the shell loop as an engine event.
/// Panics inside the responder degrade to a failure event; nothing here can
/// take the host down.
pub struct ReplyDispatcher {
    handle: Handle,
    backend: Arc<dyn ResponderBackend>,
    events: Sender<EngineEvent>,
}

impl ReplyDispatcher {
    pub fn new(
        handle: Handle,
        backend: Arc<dyn ResponderBackend>,
        events: Sender<EngineEvent>,
    ) -> Self {
        Self {
            handle,
            backend,
            events,
        }
    }
}

impl ReplyDispatch for ReplyDispatcher {
    fn dispatch(&mut self, request_id: u64, request: AssistantRequest) {
        tracing::debug!(
            code = REQUEST_DISPATCHED,
            request_id,
            context = request.context.wire_tag(),
            "assistant request dispatched"
        );

        let backend = self.backend.clone();
        let events = self.events.clone();
        let task = self.handle.spawn_blocking(move || backend.respond(&request));

        self.handle.spawn(async move {
            let result = match task.await {
                Ok(result) => result,
                Err(join_error) => {
                    tracing::warn!(
                        request_id,
                        error = %join_error,
                        "responder task failed; reporting the backend as unavailable"
                    );
                    Err(BackendFailure::Unavailable)
                }
            };

            if events
                .send(EngineEvent::ReplyArrived { request_id, result })
                .is_err()
            {
                tracing::debug!(
                    code = REPLY_CHANNEL_CLOSED,
                    request_id,
                    "shell loop is gone; reply dropped"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::mpsc, time::Duration};

    use super::*;
    use crate::domain::context::Context;

    struct ScriptedBackend {
        result: Result<String, BackendFailure>,
    }

    impl ResponderBackend for ScriptedBackend {
        fn respond(&self, _request: &AssistantRequest) -> Result<String, BackendFailure> {
            self.result.clone()
        }
    }

    struct PanickingBackend;

    impl ResponderBackend for PanickingBackend {
        fn respond(&self, _request: &AssistantRequest) -> Result<String, BackendFailure> {
            panic!("responder blew up")
        }
    }

    fn request() -> AssistantRequest {
        AssistantRequest {
            message: "hello".to_owned(),
            context: Context::General,
        }
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_time()
            .build()
            .expect("test runtime")
    }

    #[test]
    fn delivers_the_reply_with_the_request_id() {
        let runtime = runtime();
        let (tx, rx) = mpsc::channel();
        let mut dispatcher = ReplyDispatcher::new(
            runtime.handle().clone(),
            Arc::new(ScriptedBackend {
                result: Ok("stub reply".to_owned()),
            }),
            tx,
        );

        dispatcher.dispatch(7, request());

        let event = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("reply should arrive");
        assert_eq!(
            event,
            EngineEvent::ReplyArrived {
                request_id: 7,
                result: Ok("stub reply".to_owned()),
            }
        );
    }

    #[test]
    fn delivers_backend_failures_untouched() {
        let runtime = runtime();
        let (tx, rx) = mpsc::channel();
        let mut dispatcher = ReplyDispatcher::new(
            runtime.handle().clone(),
            Arc::new(ScriptedBackend {
                result: Err(BackendFailure::Unavailable),
            }),
            tx,
        );

        dispatcher.dispatch(1, request());

        let event = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("failure should arrive");
        assert_eq!(
            event,
            EngineEvent::ReplyArrived {
                request_id: 1,
                result: Err(BackendFailure::Unavailable),
            }
        );
    }

    #[test]
    fn a_panicking_responder_degrades_to_unavailable() {
        let runtime = runtime();
        let (tx, rx) = mpsc::channel();
        let mut dispatcher =
            ReplyDispatcher::new(runtime.handle().clone(), Arc::new(PanickingBackend), tx);

        dispatcher.dispatch(2, request());

        let event = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("failure should arrive");
        assert_eq!(
            event,
            EngineEvent::ReplyArrived {
                request_id: 2,
                result: Err(BackendFailure::Unavailable),
            }
        );
    }

    #[test]
    fn a_closed_shell_channel_is_tolerated() {
        let runtime = runtime();
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut dispatcher = ReplyDispatcher::new(
            runtime.handle().clone(),
            Arc::new(ScriptedBackend {
                result: Ok("orphan".to_owned()),
            }),
            tx,
        );

        dispatcher.dispatch(3, request());
        // Give the task a moment to run; nothing should panic.
        std::thread::sleep(Duration::from_millis(100));
    }
}
