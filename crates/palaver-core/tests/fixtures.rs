//! Response fixtures for wiremock-backed integration tests.

#![allow(dead_code)]

use wiremock::ResponseTemplate;

/// SSE body for a streamed two-fragment agent reply.
pub const SSE_REPLY: &str = "event: message\ndata: {\"id\":\"{{ID}}\",\"source\":\"ai_agent\",\"kind\":\"content\",\"fragment\":\"Hi\"}\n\nevent: message\ndata: {\"id\":\"{{ID}}\",\"source\":\"ai_agent\",\"kind\":\"content\",\"fragment\":\" there\"}\n\nevent: done\ndata: {}\n\n";

/// SSE body for a stream that fails after a partial fragment.
pub const SSE_FAILING: &str = "event: message\ndata: {\"id\":\"{{ID}}\",\"source\":\"ai_agent\",\"kind\":\"content\",\"fragment\":\"partial\"}\n\nevent: error\ndata: {\"message\":\"{{MESSAGE}}\"}\n\n";

/// Substitutes the message id into the reply fixture.
pub fn reply_sse(message_id: &str) -> String {
    SSE_REPLY.replace("{{ID}}", message_id)
}

/// Substitutes id and error message into the failing fixture.
pub fn failing_sse(message_id: &str, message: &str) -> String {
    SSE_FAILING
        .replace("{{ID}}", message_id)
        .replace("{{MESSAGE}}", message)
}

/// Wraps an SSE body in a streaming response.
pub fn sse_response(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body.to_string())
}
