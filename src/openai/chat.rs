use anyhow::{Error, Result, anyhow, bail};
use serde_json::Value;

use crate::openai::{BoxedToolCall, FunctionCall, FunctionCallFn, Message, Role, completion};

async fn handle_tool_call(
    tools: &[BoxedToolCall],
    tool_call: &Value,
) -> Result<Vec<Message>, Error> {
    let tool_call_id = tool_call["id"]
        .as_str()
        .ok_or(anyhow!("Tool call missing ID: {}", tool_call))?;
    let tool_call_function = &tool_call["function"];
    let tool_call_args = tool_call_function["arguments"]
        .as_str()
        .ok_or(anyhow!("Tool call missing arguments: {}", tool_call))?;
    let tool_call_name = tool_call_function["name"]
        .as_str()
        .ok_or(anyhow!("Tool call missing name: {}", tool_call))?;

    tracing::debug!(
        "\nTool call: {}\nargs: {}",
        &tool_call_name,
        &tool_call_args
    );

    let tool_call_result = tools
        .iter()
        .find(|i| *i.function_name() == *tool_call_name)
        .ok_or(anyhow!(
            "Received tool call that doesn't exist: {}",
            tool_call_name
        ))?
        .call(tool_call_args)
        .await?;

    let tool_call_request = vec![FunctionCall {
        function: FunctionCallFn {
            arguments: tool_call_args.to_string(),
            name: tool_call_name.to_string(),
        },
        id: tool_call_id.to_string(),
        r#type: String::from("function"),
    }];
    let results = vec![
        Message::new_tool_call_request(tool_call_request),
        Message::new_tool_call_response(&tool_call_result, tool_call_id),
    ];

    Ok(results)
}

/// Run each requested tool call strictly in order. The agent reasons
/// over every result before deciding the next step, so there is no
/// parallel tool execution.
async fn handle_tool_calls(
    tools: &[BoxedToolCall],
    tool_calls: &[Value],
) -> Result<Vec<Message>, Error> {
    let mut results = Vec::new();
    for call in tool_calls {
        results.extend(handle_tool_call(tools, call).await?);
    }
    Ok(results)
}

/// Runs one reasoning turn by passing the transcript to the LLM for
/// the next response, feeding tool results back in until the model
/// produces a final answer. Can return multiple messages when there
/// are tool calls.
///
/// The loop is bounded: after `max_iterations` rounds of tool calls
/// the tools are withheld and the model is asked for a best-effort
/// answer from whatever was gathered.
pub async fn chat(
    tools: &Option<Vec<BoxedToolCall>>,
    history: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
    max_iterations: usize,
) -> Result<Vec<Message>, Error> {
    let mut updated_history = history.to_owned();
    let mut messages = Vec::new();

    let mut resp = completion(&updated_history, tools, api_hostname, api_key, model).await?;
    let mut rounds = 0;

    while let Some(tool_calls) = resp["choices"][0]["message"]["tool_calls"].as_array() {
        if tool_calls.is_empty() {
            break;
        }

        if rounds >= max_iterations {
            tracing::warn!("Tool call budget exhausted after {} rounds", rounds);
            updated_history.push(Message::new(
                Role::User,
                "Stop calling tools and answer now with the information you already have.",
            ));
            resp = completion(&updated_history, &None, api_hostname, api_key, model).await?;
            break;
        }
        rounds += 1;

        let tools_ref = tools
            .as_ref()
            .ok_or_else(|| anyhow!("Received a tool call but no tools were provided"))?;

        let tool_call_msgs = handle_tool_calls(tools_ref, tool_calls).await?;
        for m in tool_call_msgs.into_iter() {
            messages.push(m.clone());
            updated_history.push(m);
        }

        // Provide the results of the tool calls back to the chat
        resp = completion(&updated_history, tools, api_hostname, api_key, model).await?;
    }

    match resp["choices"][0]["message"]["content"].as_str() {
        Some(content) => messages.push(Message::new(Role::Assistant, content)),
        None => bail!("No message received. Resp:\n\n{}", resp),
    }

    Ok(messages)
}
