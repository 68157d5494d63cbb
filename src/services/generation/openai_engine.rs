use std::{collections::BTreeMap, pin::Pin};

use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use super::{
    ContentPart, ConversationTurn, GenerationEngine, GenerationEvent, GenerationStream, TurnRole,
};
use crate::{
    config::Config,
    constants::quiz_prompt::{
        QUIZ_AGENT_INSTRUCTIONS, QUIZ_AGENT_NAME, SHOW_QUIZ_TOOL_DESCRIPTION, SHOW_QUIZ_TOOL_NAME,
    },
    errors::{AppError, AppResult},
    models::dto::request::ShowQuizArgs,
    services::streaming::channel_stream,
};

type ChunkStream = Pin<Box<dyn Stream<Item = Result<ChatCompletionChunk, OpenAIError>> + Send>>;

/// Streams chat completions and stops at the first `show_quiz` call.
pub struct OpenAiGenerationEngine {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiGenerationEngine {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.openai_api_key.expose_secret())
            .with_api_base(&config.openai_api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.openai_model.clone(),
        }
    }

    pub fn build_request(&self, input: &[ConversationTurn]) -> AppResult<Value> {
        let mut messages = vec![json!({
            "role": "system",
            "content": QUIZ_AGENT_INSTRUCTIONS,
        })];
        messages.extend(input.iter().map(turn_to_message));

        Ok(json!({
            "model": self.model,
            "messages": messages,
            "tools": [{
                "type": "function",
                "function": {
                    "name": SHOW_QUIZ_TOOL_NAME,
                    "description": SHOW_QUIZ_TOOL_DESCRIPTION,
                    "parameters": ShowQuizArgs::parameters_schema()?,
                },
            }],
            "tool_choice": "required",
            "parallel_tool_calls": false,
            "stream": true,
        }))
    }
}

#[async_trait]
impl GenerationEngine for OpenAiGenerationEngine {
    async fn generate(&self, input: Vec<ConversationTurn>) -> AppResult<GenerationStream> {
        let request = self.build_request(&input)?;
        log::info!(
            "{} requesting completion from {} with {} turns",
            QUIZ_AGENT_NAME,
            self.model,
            input.len()
        );

        let upstream: ChunkStream = self.client.chat().create_stream_byot(request).await?;

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(forward_chunks(upstream, tx));
        Ok(channel_stream(rx))
    }
}

fn turn_to_message(turn: &ConversationTurn) -> Value {
    match turn.role {
        TurnRole::Assistant => json!({
            "role": "assistant",
            "content": turn.plain_text(),
        }),
        TurnRole::User => {
            let content: Vec<Value> = turn.content.iter().map(part_to_content).collect();
            json!({ "role": "user", "content": content })
        }
    }
}

fn part_to_content(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text { text } => json!({ "type": "text", "text": text }),
        ContentPart::Image { data_url } => json!({
            "type": "image_url",
            "image_url": { "url": data_url },
        }),
        ContentPart::File { filename, data_url } => json!({
            "type": "file",
            "file": { "filename": filename, "file_data": data_url },
        }),
    }
}

async fn forward_chunks(
    mut upstream: ChunkStream,
    tx: mpsc::Sender<AppResult<GenerationEvent>>,
) {
    let mut tool_calls = ToolCallAccumulator::default();

    while let Some(chunk) = upstream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                log::error!("Completion stream failed: {}", err);
                let _ = tx.send(Err(err.into())).await;
                return;
            }
        };

        for choice in chunk.choices {
            if let Some(text) = choice.delta.content.filter(|t| !t.is_empty()) {
                if tx.send(Ok(GenerationEvent::TextDelta(text))).await.is_err() {
                    log::info!("Generation consumer went away; dropping completion");
                    return;
                }
            }
            for call in choice.delta.tool_calls.into_iter().flatten() {
                tool_calls.push(call);
            }
        }
    }

    if let Some(result) = tool_calls.finish() {
        let _ = tx.send(result.map(GenerationEvent::ShowQuiz)).await;
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Debug, Deserialize)]
struct ToolCallDelta {
    #[serde(default)]
    index: u32,
    #[serde(default)]
    function: Option<FunctionDelta>,
}

#[derive(Debug, Deserialize)]
struct FunctionDelta {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    arguments: Option<String>,
}

#[derive(Debug, Default)]
struct PendingToolCall {
    name: String,
    arguments: String,
}

/// Tool calls arrive as fragments keyed by index.
#[derive(Debug, Default)]
struct ToolCallAccumulator {
    calls: BTreeMap<u32, PendingToolCall>,
}

impl ToolCallAccumulator {
    fn push(&mut self, delta: ToolCallDelta) {
        let call = self.calls.entry(delta.index).or_default();
        if let Some(function) = delta.function {
            if let Some(name) = function.name {
                call.name.push_str(&name);
            }
            if let Some(arguments) = function.arguments {
                call.arguments.push_str(&arguments);
            }
        }
    }

    /// Parsed arguments of the first `show_quiz` call, if there was one.
    fn finish(self) -> Option<AppResult<ShowQuizArgs>> {
        let mut show_quiz = None;
        for (index, call) in self.calls {
            if call.name != SHOW_QUIZ_TOOL_NAME {
                log::warn!("Ignoring call to unknown tool '{}' at index {}", call.name, index);
            } else if show_quiz.is_none() {
                show_quiz = Some(call);
            }
        }

        show_quiz.map(|call| {
            log::info!("[TOOL CALL] {} ({} bytes of arguments)", call.name, call.arguments.len());
            ShowQuizArgs::parse(&call.arguments).map_err(|err| {
                AppError::GenerationError(format!("invalid show_quiz arguments: {}", err))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> OpenAiGenerationEngine {
        OpenAiGenerationEngine::new(&Config::test_config())
    }

    fn chunk(raw: &str) -> Result<ChatCompletionChunk, OpenAIError> {
        Ok(serde_json::from_str(raw).expect("valid chunk"))
    }

    fn upstream(chunks: Vec<&str>) -> ChunkStream {
        let items: Vec<_> = chunks.into_iter().map(chunk).collect();
        Box::pin(futures::stream::iter(items))
    }

    async fn forwarded(chunks: Vec<&str>) -> Vec<AppResult<GenerationEvent>> {
        let (tx, rx) = mpsc::channel(8);
        forward_chunks(upstream(chunks), tx).await;
        channel_stream(rx).collect().await
    }

    #[test]
    fn request_forces_the_show_quiz_tool() {
        let request = engine()
            .build_request(&[ConversationTurn {
                role: TurnRole::User,
                content: vec![ContentPart::text("Quiz me on capitals")],
            }])
            .expect("request");

        assert_eq!(request["model"], "gpt-4o");
        assert_eq!(request["stream"], true);
        assert_eq!(request["tool_choice"], "required");
        assert_eq!(request["tools"][0]["function"]["name"], "show_quiz");
        assert!(request["tools"][0]["function"]["parameters"]["properties"]["questions"].is_object());
        assert_eq!(request["messages"][0]["role"], "system");
        assert_eq!(request["messages"][1]["content"][0]["text"], "Quiz me on capitals");
    }

    #[test]
    fn attachments_map_to_image_and_file_parts() {
        let request = engine()
            .build_request(&[
                ConversationTurn {
                    role: TurnRole::User,
                    content: vec![
                        ContentPart::Image {
                            data_url: "data:image/png;base64,AA==".to_string(),
                        },
                        ContentPart::File {
                            filename: "notes.pdf".to_string(),
                            data_url: "data:application/pdf;base64,AA==".to_string(),
                        },
                    ],
                },
                ConversationTurn::assistant("Quiz: Capitals"),
            ])
            .expect("request");

        let user = &request["messages"][1]["content"];
        assert_eq!(user[0]["type"], "image_url");
        assert_eq!(user[0]["image_url"]["url"], "data:image/png;base64,AA==");
        assert_eq!(user[1]["type"], "file");
        assert_eq!(user[1]["file"]["filename"], "notes.pdf");
        assert_eq!(request["messages"][2]["content"], "Quiz: Capitals");
    }

    #[tokio::test]
    async fn text_deltas_are_forwarded_in_order() {
        let events = forwarded(vec![
            r#"{"choices":[{"index":0,"delta":{"role":"assistant","content":"Hel"}}]}"#,
            r#"{"choices":[{"index":0,"delta":{"content":""}}]}"#,
            r#"{"choices":[{"index":0,"delta":{"content":"lo"}}]}"#,
            r#"{"choices":[]}"#,
        ])
        .await;

        let texts: Vec<_> = events
            .into_iter()
            .map(|e| match e.expect("ok") {
                GenerationEvent::TextDelta(text) => text,
                other => panic!("unexpected event: {:?}", other),
            })
            .collect();
        assert_eq!(texts, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn fragmented_tool_call_is_reassembled() {
        let events = forwarded(vec![
            r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"id":"call_1","type":"function","function":{"name":"show_quiz","arguments":""}}]}}]}"#,
            r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"arguments":"{\"title\":\"Capitals\","}}]}}]}"#,
            r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"arguments":"\"questions\":[]}"}}]}}]}"#,
        ])
        .await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            Ok(GenerationEvent::ShowQuiz(args)) => {
                assert_eq!(args.title, "Capitals");
                assert!(args.questions.is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_tool_arguments_are_a_generation_error() {
        let events = forwarded(vec![
            r#"{"choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"function":{"name":"show_quiz","arguments":"{\"title\":"}}]}}]}"#,
        ])
        .await;

        assert!(matches!(events.as_slice(), [Err(AppError::GenerationError(_))]));
    }

    #[test]
    fn unknown_tools_are_ignored() {
        let mut calls = ToolCallAccumulator::default();
        calls.push(ToolCallDelta {
            index: 0,
            function: Some(FunctionDelta {
                name: Some("web_search".to_string()),
                arguments: Some("{}".to_string()),
            }),
        });

        assert!(calls.finish().is_none());
    }
}
