//! Terminal chat loop over a single session.
//!
//! Each input line is one submission. Lines starting with `/` are commands:
//! `/prompts` lists the quick prompts, `/history` reprints the transcript,
//! `/quit` ends the session.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use floatchat_chat::{ChatError, ChatSession, Message, Sender, QUICK_PROMPTS};

fn render(message: &Message) -> String {
    let who = match message.sender {
        Sender::User => "you",
        Sender::Assistant => "floatchat",
    };
    format!("[{}] {}: {}\n", message.display_time(), who, message.text)
}

/// Run the chat loop until `/quit` or end of input.
pub async fn run<R, W>(session: Arc<ChatSession>, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    for message in session.transcript() {
        output.write_all(render(&message).as_bytes()).await?;
    }
    output.flush().await?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/prompts" => {
                for (i, prompt) in QUICK_PROMPTS.iter().enumerate() {
                    let entry = format!("  {}. {}: {}\n", i + 1, prompt.label, prompt.text);
                    output.write_all(entry.as_bytes()).await?;
                }
            }
            "/history" => {
                for message in session.transcript() {
                    output.write_all(render(&message).as_bytes()).await?;
                }
            }
            _ => {
                if !session.reply_delay().is_zero() && !line.trim().is_empty() {
                    output.write_all(b"floatchat is typing...\n").await?;
                    output.flush().await?;
                }
                match session.submit(&line).await {
                    Ok(Some(reply)) => output.write_all(render(&reply).as_bytes()).await?,
                    Ok(None) => {}
                    Err(ChatError::ReplyPending) => {
                        output.write_all(b"(still answering, try again)\n").await?
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Chat submission failed");
                        output.write_all(format!("error: {}\n", e).as_bytes()).await?;
                    }
                }
            }
        }
        output.flush().await?;
    }

    tracing::info!(session_id = %session.id(), "Terminal chat ended");
    Ok(())
}
