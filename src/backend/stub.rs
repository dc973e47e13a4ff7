use std::{thread, time::Duration};

use crate::{
    domain::{context::Context, events::BackendFailure},
    usecases::contracts::{AssistantRequest, ResponderBackend},
};

/// Placeholder responder standing in for the remote assistant service. It
/// pauses for a configured interval to imitate a network round-trip, then
/// answers with a canned, context-aware line. Swapped for a live variant at
/// composition time.
#[derive(Debug, Clone)]
pub struct StubResponderBackend {
    reply_delay: Duration,
}

impl StubResponderBackend {
    pub fn new(reply_delay_ms: u64) -> Self {
        Self {
            reply_delay: Duration::from_millis(reply_delay_ms),
        }
    }
}

/// The service contract caps request length independently of any UI cap.
const MAX_REQUEST_CHARS: usize = 1000;

impl ResponderBackend for StubResponderBackend {
    fn respond(&self, request: &AssistantRequest) -> Result<String, BackendFailure> {
        // Runs on the blocking pool, never on the shell thread.
        thread::sleep(self.reply_delay);

        if request.message.chars().count() > MAX_REQUEST_CHARS {
            return Err(BackendFailure::Rejected {
                detail: format!("message exceeds {MAX_REQUEST_CHARS} characters"),
            });
        }

        Ok(scripted_reply(request))
    }
}

fn scripted_reply(request: &AssistantRequest) -> String {
    let area = match request.context {
        Context::General => "your workspace".to_owned(),
        other => format!("the {} area", other.display_label().to_lowercase()),
    };
    format!(
        "I've noted your question about {area}: \"{}\". \
         I'm running in preview mode, so I can't act on it yet, but it has \
         been recorded for the team.",
        request.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: &str, context: Context) -> AssistantRequest {
        AssistantRequest {
            message: message.to_owned(),
            context,
        }
    }

    #[test]
    fn reply_echoes_the_question_and_the_context_area() {
        let backend = StubResponderBackend::new(0);

        let reply = backend
            .respond(&request("show my dues", Context::Payments))
            .expect("stub reply");

        assert!(reply.contains("show my dues"));
        assert!(reply.contains("payments"));
    }

    #[test]
    fn over_length_requests_are_rejected_by_the_service_contract() {
        let backend = StubResponderBackend::new(0);

        let result = backend.respond(&request(&"x".repeat(1001), Context::General));

        assert!(matches!(result, Err(BackendFailure::Rejected { .. })));
    }

    #[test]
    fn general_context_avoids_naming_an_area() {
        let backend = StubResponderBackend::new(0);

        let reply = backend
            .respond(&request("hello", Context::General))
            .expect("stub reply");

        assert!(reply.contains("your workspace"));
    }
}
