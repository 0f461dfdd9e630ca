//! Interaction loop — read a request, answer it, repeat

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::router::{render, IntentRouter};

/// Serve requests from `input` until it is closed.
///
/// Each line is handled on its own; nothing carries over between turns.
pub async fn run<R, W>(router: &IntentRouter, mut input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        write!(output, "You: ")?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .await
            .context("Failed to read from input")?;
        if read == 0 {
            writeln!(output)?;
            info!("Input closed, exiting");
            return Ok(());
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        turn(router, message, &mut output).await?;
    }
}

async fn turn<W: Write>(router: &IntentRouter, message: &str, output: &mut W) -> Result<()> {
    debug!(message, "User request");

    let reply = match router.ask(message).await {
        Ok(model_text) => {
            writeln!(output, "LLM decided: {model_text}")?;
            output.flush()?;
            render(router.act(&model_text).await)
        }
        Err(e) => e.render(),
    };

    writeln!(output, "Assistant: {reply}")?;
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use netcheck_tools::testing::{succeeded, ScriptedRunner};

    use super::*;
    use crate::router::tests::{router, CannedModel};

    async fn transcript(router: &IntentRouter, input: &str) -> String {
        let mut output = Vec::new();
        run(router, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_one_turn() {
        let runner = Arc::new(ScriptedRunner::new().on("ping", succeeded("4 received\n")));
        let decision = r#"{"function":"ping_test","args":{"host":"8.8.8.8"}}"#;
        let router = router(CannedModel::replying(decision), &runner);

        let text = transcript(&router, "is 8.8.8.8 reachable?\n").await;
        assert_eq!(
            text,
            format!(
                "You: LLM decided: {decision}\nAssistant: Ping successful:\n4 received\n\nYou: \n"
            )
        );
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let runner = Arc::new(ScriptedRunner::new());
        let model = CannedModel::replying("nonsense");
        let prompts = model.prompts.clone();
        let router = router(model, &runner);

        let text = transcript(&router, "\n   \n").await;
        assert_eq!(text, "You: You: You: \n");
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_each_turn_gets_a_reply() {
        let runner = Arc::new(ScriptedRunner::new());
        let router = router(CannedModel::replying("not json"), &runner);

        let text = transcript(&router, "first\nsecond\n").await;
        assert_eq!(text.matches("LLM decided: not json\n").count(), 2);
        assert_eq!(
            text.matches("Assistant: Error processing request:").count(),
            2
        );
    }

    #[tokio::test]
    async fn test_model_failure_skips_decision_line() {
        let runner = Arc::new(ScriptedRunner::new());
        let router = router(CannedModel::offline(), &runner);

        let text = transcript(&router, "hello\n").await;
        assert!(!text.contains("LLM decided:"));
        let expected = "Assistant: Error processing request: language model request failed";
        assert!(text.contains(expected));
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let runner = Arc::new(ScriptedRunner::new());
        let router = router(
            CannedModel::replying(r#"{"function":"nope","args":{}}"#),
            &runner,
        );

        let text = transcript(&router, "do something").await;
        assert!(text.contains("Assistant: Function 'nope' is not implemented.\n"));
    }
}
